//! 伽马查找表的写入目标.
//!
//! 核心库不依赖具体平台, 由实现方 (如 `gamma-drm`) 提供表长查询与提交.

use log::{debug, info};

use crate::curve::{GammaLut, synthesize};
use crate::error::GammaResult;
use crate::params::{CrtcId, CurveParams};

/// 可写入伽马查找表的显示管线
pub trait GammaTarget {
    /// 目标 CRTC 标识
    fn id(&self) -> CrtcId;

    /// 硬件期望的查找表长度
    fn lut_size(&self) -> GammaResult<usize>;

    /// 提交查找表
    ///
    /// 调用方保证 `lut.len()` 等于 [`GammaTarget::lut_size`] 的返回值.
    fn commit_lut(&mut self, lut: &GammaLut) -> GammaResult<()>;
}

/// 查询表长, 合成查找表并提交, 返回写入的表项数
///
/// 超出范围的参数在访问目标之前即被拒绝.
pub fn apply_params<T: GammaTarget + ?Sized>(
    target: &mut T,
    params: &CurveParams,
) -> GammaResult<usize> {
    params.validate()?;
    let size = target.lut_size()?;
    debug!("CRTC {} 查找表长度: {size}", target.id());

    let lut = synthesize(params, size)?;
    target.commit_lut(&lut)?;
    info!("已写入 CRTC {}: {size} 项, {params}", target.id());
    Ok(size)
}
