//! 伽马曲线查找表合成.
//!
//! # 公式
//! 对第 i 项 (共 N 项):
//! ```text
//!   x       = i / (N - 1)              (N = 1 时 x = 0)
//!   y       = clamp01( max(0, x + lift) ^ gamma × gain )
//!   value_c = clamp01( y × multiplier_c )          c ∈ {r, g, b}
//!   out_c   = round( value_c × 65535 )
//! ```
//!
//! `x + lift` 先截到 0 再求幂, 避免负底数分数次幂产生 NaN.
//! 这里是唯一做截断 (而不是拒绝) 的地方, 因为量化必须总能成功.

use serde::{Deserialize, Serialize};

use crate::error::{GammaError, GammaResult};
use crate::params::CurveParams;

/// 16 位量化的满幅值
const FULL_SCALE: f64 = 65535.0;

/// 查找表的一项 (对应内核 `struct drm_color_lut`, 不含保留字段)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LutEntry {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

/// 伽马查找表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GammaLut {
    entries: Vec<LutEntry>,
}

impl GammaLut {
    /// 表项数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空 (合成结果不会为空)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 所有表项
    pub fn entries(&self) -> &[LutEntry] {
        &self.entries
    }

    /// 序列化为内核 `drm_color_lut` 数组的字节布局
    ///
    /// 每项 4 个本机字节序 u16: red, green, blue, reserved (0).
    pub fn to_color_lut_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.entries.len() * 8);
        for entry in &self.entries {
            for word in [entry.red, entry.green, entry.blue, 0] {
                bytes.extend_from_slice(&word.to_ne_bytes());
            }
        }
        bytes
    }
}

/// 归一化位置 x 处的亮度 y (截断到 [0, 1])
pub fn luminance(params: &CurveParams, x: f64) -> f64 {
    let base = (x + params.lift).max(0.0);
    (base.powf(params.gamma) * params.gain).clamp(0.0, 1.0)
}

/// [0, 1] 的值量化为 16 位, 四舍五入
fn quantize(value: f64) -> u16 {
    let scaled = value * FULL_SCALE;
    if scaled.is_nan() || scaled < 0.0 {
        0
    } else if scaled > FULL_SCALE {
        u16::MAX
    } else {
        (scaled + 0.5) as u16
    }
}

/// 按参数合成长度为 `len` 的查找表
///
/// 纯函数: 相同输入总得到相同输出. `len` 必须至少为 1.
pub fn synthesize(params: &CurveParams, len: usize) -> GammaResult<GammaLut> {
    if len == 0 {
        return Err(GammaError::InvalidLutSize(len));
    }

    let denom = (len - 1) as f64;
    let multipliers = params.multipliers();
    let entries = (0..len)
        .map(|i| {
            let x = if len == 1 { 0.0 } else { i as f64 / denom };
            let y = luminance(params, x);
            let [red, green, blue] = multipliers.map(|m| quantize((y * m).clamp(0.0, 1.0)));
            LutEntry { red, green, blue }
        })
        .collect();

    Ok(GammaLut { entries })
}
