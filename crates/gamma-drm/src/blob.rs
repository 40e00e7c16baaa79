//! 属性 blob 的 RAII 封装.

use std::os::fd::AsFd;

use drm::control::Device as ControlDevice;
use gamma_core::{GammaError, GammaResult};
use log::{trace, warn};

use crate::card::DrmCard;

/// 内核中的属性 blob, 离开作用域时销毁
pub struct PropertyBlob<'a> {
    card: &'a DrmCard,
    id: u32,
}

impl<'a> PropertyBlob<'a> {
    /// 以 `data` 的内容创建 blob
    pub fn create(card: &'a DrmCard, data: &mut [u8]) -> GammaResult<Self> {
        let created = drm_ffi::mode::create_property_blob(card.as_fd(), data)
            .map_err(|err| GammaError::platform("创建属性 blob", err))?;
        trace!("创建 blob {} ({} 字节)", created.blob_id, data.len());
        Ok(Self {
            card,
            id: created.blob_id,
        })
    }

    /// blob 标识, 用作属性值
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Drop for PropertyBlob<'_> {
    fn drop(&mut self) {
        match self.card.destroy_property_blob(u64::from(self.id)) {
            Ok(()) => trace!("销毁 blob {}", self.id),
            Err(err) => warn!("销毁 blob {} 失败: {err}", self.id),
        }
    }
}
