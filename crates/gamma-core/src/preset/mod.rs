//! 预设加载与列举.
//!
//! 预设文件按固定顺序查找 (除非显式指定 `--presets <file>`):
//! 1. `./presets.ini`
//! 2. `/etc/gamma-presets.ini`
//!
//! 第一个包含目标段的文件胜出, 不同文件之间不做合并.
//! 内置预设 `reset` 总是可用.

mod scanner;

use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{GammaError, GammaResult};
use crate::number::{parse_crtc, parse_in_range};
use crate::params::{
    BLUE_RANGE, CrtcId, CurveParams, GAIN_RANGE, GAMMA_RANGE, GREEN_RANGE, LIFT_RANGE, RED_RANGE,
};

use scanner::{SectionScanner, section_names};

/// 项目本地预设文件
pub const LOCAL_PRESETS: &str = "./presets.ini";

/// 系统级预设文件
pub const SYSTEM_PRESETS: &str = "/etc/gamma-presets.ini";

/// 保留段名, 存放全局默认值
pub const CONFIG_SECTION: &str = "config";

/// 内置中性预设名
pub const RESET_PRESET: &str = "reset";

/// 预设文件来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetSources {
    /// 通过 `--presets` 显式指定的单个文件
    Explicit(PathBuf),
    /// 按顺序查找的文件列表
    SearchOrder(Vec<PathBuf>),
}

impl PresetSources {
    /// 默认查找顺序: 本地文件, 然后系统文件
    pub fn default_search() -> Self {
        Self::SearchOrder(vec![
            PathBuf::from(LOCAL_PRESETS),
            PathBuf::from(SYSTEM_PRESETS),
        ])
    }

    /// 有显式路径时只用该文件, 否则使用默认查找顺序
    pub fn from_option(explicit: Option<PathBuf>) -> Self {
        match explicit {
            Some(path) => Self::Explicit(path),
            None => Self::default_search(),
        }
    }

    /// 按查找顺序排列的文件路径
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            Self::Explicit(path) => std::slice::from_ref(path),
            Self::SearchOrder(paths) => paths,
        }
    }

    /// 显式指定的文件 (若有)
    pub fn explicit(&self) -> Option<&PathBuf> {
        match self {
            Self::Explicit(path) => Some(path),
            Self::SearchOrder(_) => None,
        }
    }
}

/// 命名预设
///
/// 字段均可缺省; 转换为 [`CurveParams`] 时 gamma 必须存在,
/// 其余字段回落到中性值.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedPreset {
    /// 预设名 (段名)
    pub name: String,
    /// 来源文件, 内置预设为 `None`
    pub source: Option<PathBuf>,
    pub gamma: Option<f64>,
    pub lift: Option<f64>,
    pub gain: Option<f64>,
    pub red: Option<f64>,
    pub green: Option<f64>,
    pub blue: Option<f64>,
    /// 预设内嵌的 CRTC 覆盖
    pub crtc: Option<CrtcId>,
}

impl NamedPreset {
    /// 创建空预设
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// 内置预设 `reset`: 所有字段为中性值
    pub fn reset() -> Self {
        let neutral = CurveParams::NEUTRAL;
        Self {
            name: RESET_PRESET.to_string(),
            source: None,
            gamma: Some(neutral.gamma),
            lift: Some(neutral.lift),
            gain: Some(neutral.gain),
            red: Some(neutral.red),
            green: Some(neutral.green),
            blue: Some(neutral.blue),
            crtc: None,
        }
    }

    /// 写入一个条目, 未识别的键忽略
    pub fn set(&mut self, key: &str, value: &str) -> GammaResult<()> {
        match key {
            "gamma" => self.gamma = Some(parse_in_range(&GAMMA_RANGE, value)?),
            "lift" => self.lift = Some(parse_in_range(&LIFT_RANGE, value)?),
            "gain" => self.gain = Some(parse_in_range(&GAIN_RANGE, value)?),
            "r" => self.red = Some(parse_in_range(&RED_RANGE, value)?),
            "g" => self.green = Some(parse_in_range(&GREEN_RANGE, value)?),
            "b" => self.blue = Some(parse_in_range(&BLUE_RANGE, value)?),
            "crtc" => self.crtc = Some(parse_crtc("preset", value)?),
            _ => debug!("预设 '{}' 忽略未知键 '{key}'", self.name),
        }
        Ok(())
    }

    /// 补全缺省字段, 得到曲线参数
    pub fn curve(&self) -> GammaResult<CurveParams> {
        let gamma = self
            .gamma
            .ok_or_else(|| GammaError::MissingGamma(self.name.clone()))?;
        let neutral = CurveParams::NEUTRAL;
        Ok(CurveParams {
            gamma,
            lift: self.lift.unwrap_or(neutral.lift),
            gain: self.gain.unwrap_or(neutral.gain),
            red: self.red.unwrap_or(neutral.red),
            green: self.green.unwrap_or(neutral.green),
            blue: self.blue.unwrap_or(neutral.blue),
        })
    }
}

/// 读取预设文件, 无法打开或读取时视为不存在
fn read_source(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            debug!("跳过预设文件 {}: {e}", path.display());
            None
        }
    }
}

/// 在单个文件内容中查找预设段
///
/// 段不存在返回 `Ok(None)`; 遇到第一个无效值即停止扫描并返回错误.
pub fn preset_from_text(text: &str, name: &str, path: &Path) -> GammaResult<Option<NamedPreset>> {
    let mut preset = NamedPreset::new(name);
    preset.source = Some(path.to_path_buf());

    let mut scanner = SectionScanner::new(text, name);
    for entry in scanner.by_ref() {
        preset
            .set(entry.key, entry.value)
            .map_err(|e| GammaError::PresetParse {
                preset: name.to_string(),
                path: path.to_path_buf(),
                line: entry.line,
                source: Box::new(e),
            })?;
    }

    Ok(scanner.found().then_some(preset))
}

/// 按来源顺序加载预设, `reset` 为内置预设
pub fn load_preset(name: &str, sources: &PresetSources) -> GammaResult<NamedPreset> {
    if name == RESET_PRESET {
        debug!("使用内置预设 '{RESET_PRESET}'");
        return Ok(NamedPreset::reset());
    }

    for path in sources.paths() {
        let Some(text) = read_source(path) else {
            continue;
        };
        if let Some(preset) = preset_from_text(&text, name, path)? {
            debug!("预设 '{name}' 来自 {}", path.display());
            return Ok(preset);
        }
    }

    Err(GammaError::PresetNotFound(name.to_string()))
}

/// 在单个文件内容中查找 `[config]` 段的 `crtc` 键
///
/// 找到第一个 `crtc` 键即停止扫描.
pub fn config_crtc_from_text(text: &str, path: &Path) -> GammaResult<Option<CrtcId>> {
    let found = SectionScanner::new(text, CONFIG_SECTION).find(|entry| entry.key == "crtc");
    match found {
        Some(entry) => parse_crtc("config", entry.value)
            .map(Some)
            .map_err(|e| GammaError::ConfigParse {
                path: path.to_path_buf(),
                line: entry.line,
                source: Box::new(e),
            }),
        None => Ok(None),
    }
}

/// 按来源顺序查找 `[config]` 段的默认 CRTC, 返回值及其来源文件
pub fn load_config_crtc(sources: &PresetSources) -> GammaResult<Option<(CrtcId, PathBuf)>> {
    for path in sources.paths() {
        let Some(text) = read_source(path) else {
            continue;
        };
        if let Some(crtc) = config_crtc_from_text(&text, path)? {
            debug!("默认 CRTC {crtc} 来自 {}", path.display());
            return Ok(Some((crtc, path.clone())));
        }
    }
    Ok(None)
}

/// 预设列举结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetListing {
    /// 显式指定的文件 (若有), 用于空结果提示
    pub explicit: Option<PathBuf>,
    /// 每个可读文件及其段名 (不含 `config`, 不去重)
    pub files: Vec<(PathBuf, Vec<String>)>,
}

impl PresetListing {
    /// 所有预设名: 文件顺序, 内置 `reset` 在最后
    pub fn names(&self) -> Vec<&str> {
        self.files
            .iter()
            .flat_map(|(_, names)| names.iter().map(String::as_str))
            .chain(std::iter::once(RESET_PRESET))
            .collect()
    }

    /// 文件中的预设总数 (不含内置)
    pub fn file_preset_count(&self) -> usize {
        self.files.iter().map(|(_, names)| names.len()).sum()
    }
}

impl fmt::Display for PresetListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (path, names) in &self.files {
            if names.is_empty() {
                continue;
            }
            writeln!(f, "{} 中的可用预设:", path.display())?;
            for name in names {
                writeln!(f, "  {name}")?;
            }
        }
        if self.file_preset_count() == 0 {
            match &self.explicit {
                Some(path) => writeln!(f, "{} 中没有预设.", path.display())?,
                None => writeln!(f, "未找到 presets.ini.")?,
            }
        }
        writeln!(f, "  {RESET_PRESET}")
    }
}

/// 列出所有来源中的预设名
pub fn list_presets(sources: &PresetSources) -> PresetListing {
    let files = sources
        .paths()
        .iter()
        .filter_map(|path| {
            let text = read_source(path)?;
            let names = section_names(&text)
                .filter(|name| !name.is_empty() && *name != CONFIG_SECTION)
                .map(str::to_string)
                .collect();
            Some((path.clone(), names))
        })
        .collect();

    PresetListing {
        explicit: sources.explicit().cloned(),
        files,
    }
}
