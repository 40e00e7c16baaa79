//! 伽马校正参数模型.
//!
//! 每个数值字段都有闭区间取值范围 ([`ParamRange`]), 超出范围的值在解析时
//! 直接拒绝, 不做静默截断. 截断只发生在 LUT 的 16 位量化阶段.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GammaError, GammaResult};

/// CRTC 标识 (显示管线中被调整的元素)
pub type CrtcId = u32;

/// 未配置时使用的默认 CRTC
pub const DEFAULT_CRTC: CrtcId = 68;

/// 数值参数的闭区间取值范围
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// 字段名 (用于错误信息)
    pub name: &'static str,
    /// 下限 (含)
    pub min: f64,
    /// 上限 (含)
    pub max: f64,
}

impl ParamRange {
    /// 创建取值范围
    pub const fn new(name: &'static str, min: f64, max: f64) -> Self {
        Self { name, min, max }
    }

    /// 判断值是否在范围内
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// 校验值, 超出范围时返回带字段名的错误
    pub fn check(&self, value: f64) -> GammaResult<f64> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(GammaError::OutOfRange {
                field: self.name,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

impl fmt::Display for ParamRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ∈ [{:.2}, {:.2}]", self.name, self.min, self.max)
    }
}

/// 幂指数范围
pub const GAMMA_RANGE: ParamRange = ParamRange::new("gamma", 0.20, 5.00);
/// 暗部提升范围
pub const LIFT_RANGE: ParamRange = ParamRange::new("lift", -0.50, 0.50);
/// 增益范围
pub const GAIN_RANGE: ParamRange = ParamRange::new("gain", 0.50, 1.50);
/// 红通道倍率范围
pub const RED_RANGE: ParamRange = ParamRange::new("r", 0.50, 1.50);
/// 绿通道倍率范围
pub const GREEN_RANGE: ParamRange = ParamRange::new("g", 0.50, 1.50);
/// 蓝通道倍率范围
pub const BLUE_RANGE: ParamRange = ParamRange::new("b", 0.50, 1.50);

/// 位置参数顺序对应的取值范围: gamma [lift gain r g b]
pub const POSITIONAL_RANGES: [ParamRange; 6] = [
    GAMMA_RANGE,
    LIFT_RANGE,
    GAIN_RANGE,
    RED_RANGE,
    GREEN_RANGE,
    BLUE_RANGE,
];

/// 曲线参数
///
/// 默认值为中性曲线 (恒等映射): gamma=1, lift=0, gain=1, r=g=b=1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveParams {
    /// 幂指数
    pub gamma: f64,
    /// 幂运算前对归一化输入的加性偏移
    pub lift: f64,
    /// 幂运算后的乘性缩放
    pub gain: f64,
    /// 红通道倍率
    pub red: f64,
    /// 绿通道倍率
    pub green: f64,
    /// 蓝通道倍率
    pub blue: f64,
}

impl CurveParams {
    /// 中性曲线, 即内置预设 `reset`
    pub const NEUTRAL: Self = Self {
        gamma: 1.0,
        lift: 0.0,
        gain: 1.0,
        red: 1.0,
        green: 1.0,
        blue: 1.0,
    };

    /// 通道倍率 [r, g, b]
    pub fn multipliers(&self) -> [f64; 3] {
        [self.red, self.green, self.blue]
    }

    /// 校验所有字段都在范围内
    pub fn validate(&self) -> GammaResult<()> {
        GAMMA_RANGE.check(self.gamma)?;
        LIFT_RANGE.check(self.lift)?;
        GAIN_RANGE.check(self.gain)?;
        RED_RANGE.check(self.red)?;
        GREEN_RANGE.check(self.green)?;
        BLUE_RANGE.check(self.blue)?;
        Ok(())
    }
}

impl Default for CurveParams {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for CurveParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gamma={} lift={} gain={} r={} g={} b={}",
            self.gamma, self.lift, self.gain, self.red, self.green, self.blue
        )
    }
}

/// 合并后的完整校正参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorCorrectionParams {
    /// 目标 CRTC
    pub target: CrtcId,
    /// 曲线参数
    pub curve: CurveParams,
}
