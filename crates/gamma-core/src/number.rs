//! 数值文本解析.
//!
//! 命令行参数与预设文件共用同一套规则:
//! - 实数: 允许前导空白, 其后必须是完整的十进制实数, 且必须有限
//! - CRTC: 无符号整数, 按前缀选择进制 (`0x` 十六进制, 前导 `0` 八进制)

use crate::error::{GammaError, GammaResult};
use crate::params::{CrtcId, ParamRange};

/// 严格解析实数, 非法文本或非有限值返回 `None`
pub fn parse_real(text: &str) -> Option<f64> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 解析实数并校验取值范围
pub fn parse_in_range(range: &ParamRange, text: &str) -> GammaResult<f64> {
    let value = parse_real(text).ok_or_else(|| GammaError::InvalidNumber {
        field: range.name,
        value: text.to_string(),
    })?;
    range.check(value)
}

/// 解析 CRTC 标识
///
/// `context` 标明来源 (如 "--crtc"、"preset"), 用于错误信息.
pub fn parse_crtc(context: &'static str, text: &str) -> GammaResult<CrtcId> {
    parse_prefixed_u32(text).ok_or_else(|| GammaError::InvalidCrtc {
        context,
        value: text.to_string(),
    })
}

/// 按进制前缀解析 u32
fn parse_prefixed_u32(text: &str) -> Option<u32> {
    let text = text.trim_start();
    let text = text.strip_prefix('+').unwrap_or(text);

    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    // from_str_radix 接受符号位, 这里只允许纯数字
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}
