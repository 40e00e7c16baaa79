//! # gamma
//!
//! 通过 DRM/KMS 原子提交设置显示输出的伽马查找表 (GAMMA_LUT).
//!
//! 参数: 伽马指数、lift、gain 与 R/G/B 通道倍率, 来源为命令行数值、
//! INI 预设文件中的命名预设, 或内置的 `reset`.
//!
//! # 快速开始
//!
//! ```rust
//! use gamma::core::{CurveParams, synthesize};
//!
//! let params = CurveParams { gamma: 2.2, ..CurveParams::NEUTRAL };
//! let lut = synthesize(&params, 256).unwrap();
//! assert_eq!(lut.len(), 256);
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `gamma-core` | 参数、预设解析、配置合并、LUT 合成 |
//! | `gamma-drm` | DRM/KMS 后端 |

/// 核心类型与算法
pub use gamma_core as core;

/// DRM/KMS 后端
pub use gamma_drm as kms;

pub mod logging;

use gamma_core::{ColorCorrectionParams, GammaResult, apply_params};

/// 获取 gamma 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 打开目标 CRTC, 合成并提交查找表, 返回写入的表项数
pub fn apply(params: &ColorCorrectionParams) -> GammaResult<usize> {
    let mut target = gamma_drm::open_crtc(params.target)?;
    apply_params(&mut target, &params.curve)
}
