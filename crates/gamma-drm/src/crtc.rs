//! CRTC 伽马属性与原子提交.

use drm::control::atomic::AtomicModeReq;
use drm::control::{AtomicCommitFlags, Device as ControlDevice, crtc, from_u32, property};
use gamma_core::{CrtcId, GammaError, GammaLut, GammaResult, GammaTarget};
use log::{debug, trace};

use crate::blob::PropertyBlob;
use crate::card::DrmCard;

/// 伽马查找表属性名
pub const GAMMA_LUT: &str = "GAMMA_LUT";

/// 查找表长度属性名
pub const GAMMA_LUT_SIZE: &str = "GAMMA_LUT_SIZE";

/// 驱动未报告 `GAMMA_LUT_SIZE` 时采用的长度
pub const DEFAULT_LUT_SIZE: usize = 256;

/// CRTC 上与伽马相关的属性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GammaProps {
    /// `GAMMA_LUT` 属性句柄
    pub lut: property::Handle,
    /// 查找表长度
    pub size: usize,
}

/// 从 (属性名, 句柄, 当前值) 列表中找出伽马属性
pub fn locate_gamma_props<I, S>(crtc: CrtcId, props: I) -> GammaResult<GammaProps>
where
    I: IntoIterator<Item = (S, property::Handle, property::RawValue)>,
    S: AsRef<str>,
{
    let mut lut = None;
    let mut size = None;
    for (name, handle, value) in props {
        match name.as_ref() {
            GAMMA_LUT => lut = Some(handle),
            GAMMA_LUT_SIZE => size = Some(usize::try_from(value).unwrap_or(0)),
            _ => {}
        }
    }

    let size = size.unwrap_or(DEFAULT_LUT_SIZE);
    match lut {
        Some(lut) if size > 0 => Ok(GammaProps { lut, size }),
        _ => Err(GammaError::Device(format!(
            "CRTC {crtc} 没有 {GAMMA_LUT}/{GAMMA_LUT_SIZE} 属性"
        ))),
    }
}

/// 可写入伽马查找表的 CRTC
pub struct CrtcGamma {
    card: DrmCard,
    id: CrtcId,
    handle: crtc::Handle,
    props: GammaProps,
}

impl CrtcGamma {
    /// 在已打开的显卡上定位 CRTC 及其伽马属性
    pub fn open(card: DrmCard, id: CrtcId) -> GammaResult<Self> {
        let handle = from_u32::<crtc::Handle>(id)
            .ok_or_else(|| GammaError::Device(format!("无效的 CRTC 标识 {id}")))?;

        card.enable_atomic();

        let set = card
            .get_properties(handle)
            .map_err(|err| GammaError::platform("读取 CRTC 属性", err))?;
        let (handles, values) = set.as_props_and_values();

        let mut named = Vec::with_capacity(handles.len());
        for (&prop, &value) in handles.iter().zip(values) {
            match card.get_property(prop) {
                Ok(info) => {
                    let name = info.name().to_string_lossy().into_owned();
                    trace!("CRTC {id} 属性 {name} = {value}");
                    named.push((name, prop, value));
                }
                Err(err) => debug!("读取属性 {prop:?} 失败: {err}"),
            }
        }

        let props = locate_gamma_props(id, named)?;
        debug!("CRTC {id}: {GAMMA_LUT_SIZE} = {}", props.size);
        Ok(Self {
            card,
            id,
            handle,
            props,
        })
    }
}

impl GammaTarget for CrtcGamma {
    fn id(&self) -> CrtcId {
        self.id
    }

    fn lut_size(&self) -> GammaResult<usize> {
        Ok(self.props.size)
    }

    fn commit_lut(&mut self, lut: &GammaLut) -> GammaResult<()> {
        if lut.len() != self.props.size {
            return Err(GammaError::InvalidLutSize(lut.len()));
        }

        let mut bytes = lut.to_color_lut_bytes();
        let blob = PropertyBlob::create(&self.card, &mut bytes)?;

        let mut req = AtomicModeReq::new();
        req.add_property(
            self.handle,
            self.props.lut,
            property::Value::Blob(u64::from(blob.id())),
        );
        self.card
            .atomic_commit(AtomicCommitFlags::empty(), req)
            .map_err(|err| GammaError::platform("原子提交", err))?;
        debug!("CRTC {} 已提交 blob {}", self.id, blob.id());
        Ok(())
    }
}
