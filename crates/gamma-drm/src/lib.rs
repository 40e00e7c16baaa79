//! # gamma-drm
//!
//! [`GammaTarget`](gamma_core::GammaTarget) 的 DRM/KMS 实现.
//!
//! 流程: 打开 `/dev/dri/cardN` → 请求原子能力 → 读取 CRTC 的
//! `GAMMA_LUT`/`GAMMA_LUT_SIZE` → 创建 blob → 原子提交 → 销毁 blob.

pub mod blob;
pub mod card;
pub mod crtc;

pub use blob::PropertyBlob;
pub use card::DrmCard;
pub use crtc::{CrtcGamma, GammaProps, locate_gamma_props};

use gamma_core::{CrtcId, GammaResult};

/// 打开第一块可用显卡上的指定 CRTC
pub fn open_crtc(id: CrtcId) -> GammaResult<CrtcGamma> {
    let card = DrmCard::open_first()?;
    CrtcGamma::open(card, id)
}
