//! # gamma-core
//!
//! DRM 伽马校正工具的核心库, 与具体显示平台无关.
//!
//! 处理流程: 解析配置 → 合成查找表 (LUT) → 交给目标提交.
//!
//! - [`params`]: 参数模型与取值范围
//! - [`number`]: 严格的数值文本解析
//! - [`preset`]: INI 预设文件扫描与预设列举
//! - [`resolve`]: 命令行参数 / 预设 / `[config]` 默认值的合并
//! - [`curve`]: 伽马曲线查找表合成
//! - [`target`]: 硬件目标抽象 ([`GammaTarget`])

pub mod curve;
pub mod error;
pub mod number;
pub mod params;
pub mod preset;
pub mod resolve;
pub mod target;

// 重导出常用类型
pub use curve::{GammaLut, LutEntry, synthesize};
pub use error::{ErrorClass, GammaError, GammaResult};
pub use params::{ColorCorrectionParams, CrtcId, CurveParams, DEFAULT_CRTC, ParamRange};
pub use preset::{NamedPreset, PresetListing, PresetSources};
pub use resolve::{Invocation, resolve_params};
pub use target::{GammaTarget, apply_params};
