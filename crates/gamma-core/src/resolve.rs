//! 配置合并: 命令行数值参数 > 命名预设 > `[config]` 默认值.
//!
//! 目标 CRTC 的优先级: 命令行 `--crtc` > 预设内嵌 `crtc` >
//! `[config]` 段 `crtc` > 编译期默认值 [`DEFAULT_CRTC`].

use std::path::PathBuf;

use log::{debug, warn};

use crate::error::{GammaError, GammaResult};
use crate::number::{parse_in_range, parse_real};
use crate::params::{
    ColorCorrectionParams, CrtcId, CurveParams, DEFAULT_CRTC, POSITIONAL_RANGES,
};
use crate::preset::{NamedPreset, PresetSources, load_config_crtc, load_preset};

/// 一次调用的原始输入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// 命令行 `--crtc`
    pub crtc: Option<CrtcId>,
    /// 命令行 `--presets`
    pub presets: Option<PathBuf>,
    /// 选项之后的位置参数
    pub positionals: Vec<String>,
}

impl Invocation {
    /// 预设文件来源
    pub fn sources(&self) -> PresetSources {
        PresetSources::from_option(self.presets.clone())
    }
}

/// 目标 CRTC 的来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOrigin {
    /// 命令行 `--crtc`
    CommandLine,
    /// 预设内嵌 `crtc`
    Preset,
    /// 某个文件的 `[config]` 段
    Config(PathBuf),
    /// 编译期默认值
    BuiltIn,
}

/// 曲线参数的来源
#[derive(Debug, Clone, PartialEq)]
pub enum CurveOrigin {
    /// 命令行数值参数
    Numeric,
    /// 命名预设
    Preset(NamedPreset),
}

/// 合并结果
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub params: ColorCorrectionParams,
    pub curve_origin: CurveOrigin,
    pub target_origin: TargetOrigin,
}

/// 解析不依赖位置参数的默认目标: 命令行 > `[config]` > 内置默认值
///
/// 未给出 `--crtc` 时总会扫描 `[config]`, 其中的无效值是致命错误.
pub fn resolve_base_target(
    crtc: Option<CrtcId>,
    sources: &PresetSources,
) -> GammaResult<(CrtcId, TargetOrigin)> {
    if let Some(id) = crtc {
        return Ok((id, TargetOrigin::CommandLine));
    }
    match load_config_crtc(sources)? {
        Some((id, path)) => Ok((id, TargetOrigin::Config(path))),
        None => Ok((DEFAULT_CRTC, TargetOrigin::BuiltIn)),
    }
}

/// 解析数值参数 `gamma [lift gain r g b]`
pub fn parse_numeric_args<S: AsRef<str>>(args: &[S]) -> GammaResult<CurveParams> {
    if args.is_empty() || args.len() > POSITIONAL_RANGES.len() {
        return Err(GammaError::ArgumentCount(args.len()));
    }

    let mut values = [
        CurveParams::NEUTRAL.gamma,
        CurveParams::NEUTRAL.lift,
        CurveParams::NEUTRAL.gain,
        CurveParams::NEUTRAL.red,
        CurveParams::NEUTRAL.green,
        CurveParams::NEUTRAL.blue,
    ];
    for ((slot, range), text) in values.iter_mut().zip(&POSITIONAL_RANGES).zip(args) {
        *slot = parse_in_range(range, text.as_ref())?;
    }

    let [gamma, lift, gain, red, green, blue] = values;
    Ok(CurveParams {
        gamma,
        lift,
        gain,
        red,
        green,
        blue,
    })
}

/// 合并所有来源, 得到最终参数
///
/// 第一个位置参数能解析为有限实数时走数值路径, 否则视为预设名.
pub fn resolve_params(invocation: &Invocation) -> GammaResult<Resolution> {
    let sources = invocation.sources();
    let (base_target, base_origin) = resolve_base_target(invocation.crtc, &sources)?;

    let Some(first) = invocation.positionals.first() else {
        return Err(GammaError::Usage("缺少参数".to_string()));
    };

    if parse_real(first).is_some() {
        let curve = parse_numeric_args(&invocation.positionals)?;
        debug!("数值参数: {curve}");
        return Ok(Resolution {
            params: ColorCorrectionParams {
                target: base_target,
                curve,
            },
            curve_origin: CurveOrigin::Numeric,
            target_origin: base_origin,
        });
    }

    if invocation.positionals.len() > 1 {
        warn!(
            "预设名之后的 {} 个参数被忽略",
            invocation.positionals.len() - 1
        );
    }

    let preset = load_preset(first, &sources)?;
    let curve = preset.curve()?;
    debug!("预设 '{}': {curve}", preset.name);

    let (target, target_origin) = match (base_origin, preset.crtc) {
        (TargetOrigin::CommandLine, _) => (base_target, TargetOrigin::CommandLine),
        (_, Some(id)) => (id, TargetOrigin::Preset),
        (origin, None) => (base_target, origin),
    };

    Ok(Resolution {
        params: ColorCorrectionParams { target, curve },
        curve_origin: CurveOrigin::Preset(preset),
        target_origin,
    })
}
