use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;

use super::backend::{Program, UniformMapping};

/// Per-frame parameters every shader program exposes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformSlot {
    Resolution,
    CameraPos,
    CameraZoom,
}

impl UniformSlot {
    pub const ALL: [UniformSlot; 3] = [
        UniformSlot::Resolution,
        UniformSlot::CameraPos,
        UniformSlot::CameraZoom,
    ];

    /// Member name in the WGSL uniform struct.
    pub const fn name(self) -> &'static str {
        match self {
            UniformSlot::Resolution => "resolution",
            UniformSlot::CameraPos => "camera_pos",
            UniformSlot::CameraZoom => "camera_zoom",
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }

    fn accepts(self, value: UniformValue) -> bool {
        matches!(
            (self, value),
            (UniformSlot::Resolution | UniformSlot::CameraPos, UniformValue::Vec2(_))
                | (UniformSlot::CameraZoom, UniformValue::Float(_))
        )
    }
}

/// GPU-side location of a uniform: byte offset into the program's uniform buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformLocation(pub u64);

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Vec2(Vec2),
    Float(f32),
}

impl UniformValue {
    /// Raw bytes as laid out in the uniform buffer.
    pub fn to_bytes(self) -> Vec<u8> {
        match self {
            UniformValue::Vec2(v) => bytemuck::cast_slice(&v.to_array()).to_vec(),
            UniformValue::Float(f) => bytemuck::bytes_of(&f).to_vec(),
        }
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<f32> for UniformValue {
    fn from(f: f32) -> Self {
        UniformValue::Float(f)
    }
}

/// Slot → location table for one program.
///
/// Resolved once when the renderer is created and reused every frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UniformTable {
    locations: [UniformLocation; UniformSlot::ALL.len()],
}

impl UniformTable {
    /// Looks every slot up by name through `mapping`.
    pub fn resolve(mapping: &impl UniformMapping, program: Program) -> anyhow::Result<Self> {
        let mut locations = [UniformLocation(0); UniformSlot::ALL.len()];
        for slot in UniformSlot::ALL {
            let Some(loc) = mapping.uniform_location(program, slot.name()) else {
                anyhow::bail!("{program:?} program has no uniform named `{}`", slot.name());
            };
            locations[slot.index()] = loc;
        }
        log::debug!("{program:?} uniforms resolved: {locations:?}");
        Ok(Self { locations })
    }

    #[inline]
    pub fn location(&self, slot: UniformSlot) -> UniformLocation {
        self.locations[slot.index()]
    }

    /// Checks that `value` has the type `slot` expects.
    pub(crate) fn check(slot: UniformSlot, value: UniformValue) {
        debug_assert!(slot.accepts(value), "{value:?} does not fit uniform `{}`", slot.name());
    }
}

/// CPU mirror of the WGSL `Uniforms` struct (group 0, binding 0).
///
/// ```wgsl
/// struct Uniforms {
///     resolution: vec2<f32>,
///     camera_pos: vec2<f32>,
///     camera_zoom: f32,
/// };
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
pub(crate) struct UniformBlock {
    pub resolution: [f32; 2],
    pub camera_pos: [f32; 2],
    pub camera_zoom: f32,
    pub _pad: [f32; 3], // 16-byte alignment
}

impl UniformBlock {
    pub const SIZE: u64 = std::mem::size_of::<UniformBlock>() as u64;

    /// Byte offset of the member called `name`, if any.
    pub fn offset_of(name: &str) -> Option<u64> {
        let offset = match name {
            "resolution" => std::mem::offset_of!(UniformBlock, resolution),
            "camera_pos" => std::mem::offset_of!(UniformBlock, camera_pos),
            "camera_zoom" => std::mem::offset_of!(UniformBlock, camera_zoom),
            _ => return None,
        };
        Some(offset as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BlockMapping;

    impl UniformMapping for BlockMapping {
        fn uniform_location(&self, _program: Program, name: &str) -> Option<UniformLocation> {
            UniformBlock::offset_of(name).map(UniformLocation)
        }
    }

    struct NoZoom;

    impl UniformMapping for NoZoom {
        fn uniform_location(&self, _program: Program, name: &str) -> Option<UniformLocation> {
            (name != "camera_zoom").then_some(UniformLocation(0))
        }
    }

    #[test]
    fn block_layout_matches_wgsl() {
        assert_eq!(UniformBlock::SIZE, 32);
        assert_eq!(UniformBlock::offset_of("resolution"), Some(0));
        assert_eq!(UniformBlock::offset_of("camera_pos"), Some(8));
        assert_eq!(UniformBlock::offset_of("camera_zoom"), Some(16));
        assert_eq!(UniformBlock::offset_of("time"), None);
    }

    #[test]
    fn table_resolves_every_slot() {
        let table = UniformTable::resolve(&BlockMapping, Program::Fill).unwrap();
        assert_eq!(table.location(UniformSlot::Resolution), UniformLocation(0));
        assert_eq!(table.location(UniformSlot::CameraPos), UniformLocation(8));
        assert_eq!(table.location(UniformSlot::CameraZoom), UniformLocation(16));
    }

    #[test]
    fn missing_uniform_is_an_error() {
        let err = UniformTable::resolve(&NoZoom, Program::Line).unwrap_err();
        assert!(err.to_string().contains("camera_zoom"));
    }

    #[test]
    fn value_bytes() {
        assert_eq!(UniformValue::Float(1.0).to_bytes(), 1.0f32.to_ne_bytes().to_vec());
        assert_eq!(UniformValue::Vec2(Vec2::new(1.0, 2.0)).to_bytes().len(), 8);
    }

    #[test]
    fn slots_accept_matching_types() {
        assert!(UniformSlot::Resolution.accepts(Vec2::ONE.into()));
        assert!(UniformSlot::CameraZoom.accepts(2.0f32.into()));
        assert!(!UniformSlot::CameraZoom.accepts(Vec2::ONE.into()));
    }
}
