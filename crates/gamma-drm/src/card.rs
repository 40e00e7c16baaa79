//! DRM 显卡设备节点.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::{AsFd, BorrowedFd};
use std::path::{Path, PathBuf};

use drm::ClientCapability;
use gamma_core::{GammaError, GammaResult};
use log::{debug, warn};

/// 设备节点所在目录
pub const DRI_DIR: &str = "/dev/dri";

/// 依次尝试的 `cardN` 节点数
pub const MAX_CARDS: usize = 4;

/// 已打开的 DRM 显卡 (读写, close-on-exec)
///
/// 文件句柄随 `Drop` 关闭.
#[derive(Debug)]
pub struct DrmCard {
    file: File,
    path: PathBuf,
}

impl AsFd for DrmCard {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl drm::Device for DrmCard {}
impl drm::control::Device for DrmCard {}

impl DrmCard {
    /// 打开指定节点
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        // std 在 Linux 上默认带 O_CLOEXEC
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// 打开 `/dev/dri` 下第一个可用的显卡
    pub fn open_first() -> GammaResult<Self> {
        Self::open_first_in(DRI_DIR)
    }

    /// 在 `dir` 下依次尝试 `card0` .. `card3`
    ///
    /// 某个节点不存在时停止搜索, 其他错误则继续尝试下一个.
    pub fn open_first_in(dir: impl AsRef<Path>) -> GammaResult<Self> {
        let dir = dir.as_ref();
        for index in 0..MAX_CARDS {
            let path = dir.join(format!("card{index}"));
            match Self::open(&path) {
                Ok(card) => {
                    debug!("已打开 {}", path.display());
                    return Ok(card);
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    debug!("{} 不存在, 停止搜索", path.display());
                    break;
                }
                Err(err) => debug!("打开 {} 失败: {err}", path.display()),
            }
        }
        Err(GammaError::Device(format!(
            "无法打开 {}/card0..card{}",
            dir.display(),
            MAX_CARDS - 1
        )))
    }

    /// 设备节点路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 请求原子模式设置能力
    ///
    /// 失败只记录警告, 真正的问题会在提交时暴露.
    pub fn enable_atomic(&self) {
        if let Err(err) = drm::Device::set_client_capability(self, ClientCapability::Atomic, true) {
            warn!("{} 不支持原子模式设置: {err}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_open_first_in_empty_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = DrmCard::open_first_in(dir.path()).unwrap_err();
        assert!(matches!(err, GammaError::Device(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_open_first_in_picks_card0() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("card0"), b"").unwrap();
        fs::write(dir.path().join("card1"), b"").unwrap();
        let card = DrmCard::open_first_in(dir.path()).unwrap();
        assert_eq!(card.path(), dir.path().join("card0"));
    }

    #[test]
    fn test_open_first_in_skips_unopenable() {
        let dir = tempfile::tempdir().unwrap();
        // 目录无法以读写方式打开, 应跳过
        fs::create_dir(dir.path().join("card0")).unwrap();
        fs::write(dir.path().join("card1"), b"").unwrap();
        let card = DrmCard::open_first_in(dir.path()).unwrap();
        assert_eq!(card.path(), dir.path().join("card1"));
    }

    #[test]
    fn test_open_first_in_stops_at_gap() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("card0")).unwrap();
        // card1 缺失, card2 不应被尝试
        fs::write(dir.path().join("card2"), b"").unwrap();
        assert!(DrmCard::open_first_in(dir.path()).is_err());
    }
}
