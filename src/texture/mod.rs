//! Shadow records for textures, and the per-target binding table.
use super::{gl, GLEnum, GLenum, TextureName};

pub mod sampler;

/// The binding point a texture is permanently associated with once it is first used.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    D1 = gl::TEXTURE_1D,
    D2 = gl::TEXTURE_2D,
    D3 = gl::TEXTURE_3D,
    D1Array = gl::TEXTURE_1D_ARRAY,
    D2Array = gl::TEXTURE_2D_ARRAY,
    Rectangle = gl::TEXTURE_RECTANGLE,
    Cube = gl::TEXTURE_CUBE_MAP,
    CubeArray = gl::TEXTURE_CUBE_MAP_ARRAY,
    Buffer = gl::TEXTURE_BUFFER,
    D2Multisample = gl::TEXTURE_2D_MULTISAMPLE,
    D2MultisampleArray = gl::TEXTURE_2D_MULTISAMPLE_ARRAY,
}
// Safety: is repr(u32) enum.
unsafe impl GLEnum for Target {}

impl Target {
    pub const ALL: [Self; 11] = [
        Self::D1,
        Self::D2,
        Self::D3,
        Self::D1Array,
        Self::D2Array,
        Self::Rectangle,
        Self::Cube,
        Self::CubeArray,
        Self::Buffer,
        Self::D2Multisample,
        Self::D2MultisampleArray,
    ];
    /// Parse a raw `target` argument.
    #[must_use]
    pub fn from_gl(value: GLenum) -> Option<Self> {
        Self::ALL.into_iter().find(|target| target.as_gl() == value)
    }
    /// Position in [`Self::ALL`], used to index the binding table.
    fn index(self) -> usize {
        // The GL values are scattered, so no arithmetic here.
        match self {
            Self::D1 => 0,
            Self::D2 => 1,
            Self::D3 => 2,
            Self::D1Array => 3,
            Self::D2Array => 4,
            Self::Rectangle => 5,
            Self::Cube => 6,
            Self::CubeArray => 7,
            Self::Buffer => 8,
            Self::D2Multisample => 9,
            Self::D2MultisampleArray => 10,
        }
    }
}
impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::enums::EnumName(self.as_gl()).fmt(f)
    }
}

/// A texture the host generated or created.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub(crate) name: TextureName,
    /// `None` until the first bind, for `glGenTextures` names.
    pub(crate) target: Option<Target>,
    pub(crate) sampler: sampler::SamplerState,
}
impl Texture {
    /// A texture from `glGenTextures`, with no target yet.
    #[must_use]
    pub fn new(name: TextureName) -> Self {
        Self {
            name,
            target: None,
            sampler: sampler::SamplerState::default(),
        }
    }
    #[must_use]
    pub fn name(&self) -> TextureName {
        self.name
    }
    #[must_use]
    pub fn target(&self) -> Option<Target> {
        self.target
    }
    #[must_use]
    pub fn sampler(&self) -> &sampler::SamplerState {
        &self.sampler
    }
    /// Associate the texture with `target`. The first association sticks; after that, only the
    /// same target is accepted.
    ///
    /// # Errors
    /// The target the texture is already associated with, if it differs from `target`.
    pub fn associate(&mut self, target: Target) -> Result<(), Target> {
        match self.target {
            None => {
                self.target = Some(target);
                Ok(())
            }
            Some(existing) if existing == target => Ok(()),
            Some(existing) => Err(existing),
        }
    }
}

/// One binding slot per target, as `glBindTexture` sees them. Texture units are not modeled:
/// this is the binding table of whichever unit the host happens to have active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings([Option<TextureName>; Target::ALL.len()]);
impl Bindings {
    #[must_use]
    pub fn get(&self, target: Target) -> Option<TextureName> {
        self.0[target.index()]
    }
    pub fn set(&mut self, target: Target, texture: TextureName) {
        self.0[target.index()] = Some(texture);
    }
    /// Iterate over the occupied slots.
    pub fn iter(&self) -> impl Iterator<Item = (Target, TextureName)> + '_ {
        Target::ALL
            .into_iter()
            .filter_map(|target| self.get(target).map(|texture| (target, texture)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn targets_round_trip_through_gl() {
        for target in Target::ALL {
            assert_eq!(Target::from_gl(target.as_gl()), Some(target));
        }
        assert_eq!(Target::from_gl(gl::FLOAT), None);
    }

    #[test]
    fn table_indices_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for target in Target::ALL {
            assert!(target.index() < Target::ALL.len(), "{target} out of range");
            assert!(seen.insert(target.index()));
        }
    }

    #[test]
    fn first_association_sticks() {
        let mut texture = Texture::new(TextureName(4));
        assert_eq!(texture.target(), None);
        assert_eq!(texture.associate(Target::D2), Ok(()));
        assert_eq!(texture.associate(Target::D2), Ok(()));
        assert_eq!(texture.associate(Target::Cube), Err(Target::D2));
        assert_eq!(texture.target(), Some(Target::D2));
    }

    #[test]
    fn bindings_are_per_target() {
        let mut bindings = Bindings::default();
        bindings.set(Target::D2, TextureName(1));
        bindings.set(Target::Cube, TextureName(2));
        bindings.set(Target::D2, TextureName(3));

        assert_eq!(bindings.get(Target::D2), Some(TextureName(3)));
        assert_eq!(bindings.get(Target::Cube), Some(TextureName(2)));
        assert_eq!(bindings.get(Target::D3), None);
        assert_eq!(bindings.iter().count(), 2);
    }
}
