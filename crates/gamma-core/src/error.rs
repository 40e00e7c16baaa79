//! 统一错误类型定义.
//!
//! gamma 各 crate 共用的错误类型, 每种错误归属一个 [`ErrorClass`],
//! 由类别决定进程退出码.

use std::path::PathBuf;

use thiserror::Error;

/// 错误类别
///
/// 平台类错误退出码为 1, 其余均为 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// 用法错误 (参数数量、选项组合)
    Usage,
    /// 取值校验错误 (数值格式、范围)
    Validation,
    /// 查找错误 (预设不存在)
    Lookup,
    /// 预设/配置文件解析错误
    Parse,
    /// 平台/硬件操作失败
    Platform,
}

/// gamma 统一错误类型
#[derive(Debug, Error)]
pub enum GammaError {
    /// 命令行用法错误
    #[error("{0}")]
    Usage(String),

    /// 位置参数数量不在 1..=6 之间
    #[error("参数数量无效 ({0}), 选项之后应有 1..6 个数值")]
    ArgumentCount(usize),

    /// 数值文本格式错误
    #[error("无效的 {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// 数值超出允许范围
    #[error("{field} 超出范围: {value} (允许 {min:.2}..{max:.2})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// CRTC 标识格式错误
    #[error("无效的 {context} crtc: '{value}'")]
    InvalidCrtc { context: &'static str, value: String },

    /// LUT 长度无效
    #[error("无效的 LUT 长度: {0}")]
    InvalidLutSize(usize),

    /// 所有预设文件中都没有该预设
    #[error("未找到预设 '{0}'")]
    PresetNotFound(String),

    /// 预设缺少必需的 gamma 键
    #[error("预设 '{0}' 缺少必需的键 'gamma'")]
    MissingGamma(String),

    /// 解析预设段时遇到无效值
    #[error("解析预设 '{preset}' 出错 ({}:{line}): {source}", path.display())]
    PresetParse {
        preset: String,
        path: PathBuf,
        line: usize,
        #[source]
        source: Box<GammaError>,
    },

    /// 解析 `[config]` 段时遇到无效值
    #[error("解析配置段出错 ({}:{line}): {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        line: usize,
        #[source]
        source: Box<GammaError>,
    },

    /// 显示设备不可用或缺少能力
    #[error("{0}")]
    Device(String),

    /// 平台调用失败
    #[error("{op} 失败: {source}")]
    Platform {
        op: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl GammaError {
    /// 包装平台调用错误
    pub fn platform(op: &'static str, source: std::io::Error) -> Self {
        Self::Platform { op, source }
    }

    /// 错误所属类别
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Usage(_) | Self::ArgumentCount(_) => ErrorClass::Usage,
            Self::InvalidNumber { .. }
            | Self::OutOfRange { .. }
            | Self::InvalidCrtc { .. }
            | Self::InvalidLutSize(_) => ErrorClass::Validation,
            Self::PresetNotFound(_) => ErrorClass::Lookup,
            Self::MissingGamma(_) | Self::PresetParse { .. } | Self::ConfigParse { .. } => {
                ErrorClass::Parse
            }
            Self::Device(_) | Self::Platform { .. } | Self::Io(_) => ErrorClass::Platform,
        }
    }

    /// 进程退出码: 平台错误为 1, 其余为 2
    pub fn exit_code(&self) -> u8 {
        match self.class() {
            ErrorClass::Platform => 1,
            _ => 2,
        }
    }
}

/// gamma 统一 Result 类型
pub type GammaResult<T> = Result<T, GammaError>;
