//! 输出渲染: --dry-run 报告与错误信息.

use std::fmt::Write as _;

use gamma_core::resolve::{CurveOrigin, Resolution, TargetOrigin};
use gamma_core::{CrtcId, CurveParams, GammaLut};
use serde::Serialize;

/// --dry-run 报告
#[derive(Debug, Serialize)]
pub struct DryRunReport {
    pub crtc: CrtcId,
    pub crtc_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    pub curve: CurveParams,
    pub lut_size: usize,
    pub lut: GammaLut,
}

impl DryRunReport {
    pub fn new(resolution: &Resolution, lut: GammaLut) -> Self {
        let preset = match &resolution.curve_origin {
            CurveOrigin::Numeric => None,
            CurveOrigin::Preset(preset) => Some(preset.name.clone()),
        };
        Self {
            crtc: resolution.params.target,
            crtc_source: describe_target(&resolution.target_origin),
            preset,
            curve: resolution.params.curve,
            lut_size: lut.len(),
            lut,
        }
    }

    /// 文本格式
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "CRTC: {} ({})", self.crtc, self.crtc_source);
        if let Some(preset) = &self.preset {
            let _ = writeln!(out, "预设: {preset}");
        }
        let _ = writeln!(out, "曲线: {}", self.curve);
        let _ = writeln!(out, "LUT: {} 项", self.lut_size);
        for (i, e) in self.lut.entries().iter().enumerate() {
            let _ = writeln!(out, "{i:5}: {:5} {:5} {:5}", e.red, e.green, e.blue);
        }
        out
    }
}

/// 目标 CRTC 来源的描述
pub fn describe_target(origin: &TargetOrigin) -> String {
    match origin {
        TargetOrigin::CommandLine => "命令行 --crtc".to_string(),
        TargetOrigin::Preset => "预设".to_string(),
        TargetOrigin::Config(path) => format!("{} [config]", path.display()),
        TargetOrigin::BuiltIn => "默认值".to_string(),
    }
}
