//! Sampling parameters of a texture.
//!
//! Modeled so the shadow state is complete, no validation reads these yet. Defaults are the
//! values the GL gives a freshly created texture.

use crate::{gl, GLEnum, GLenum};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    /// For Color images, enables linear filtering.
    /// For Depth images, enables Percentage-Closer Filtering
    Linear,
}

/// `GL_TEXTURE_MIN_FILTER`: a texel filter, plus an optional filter between mip levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinFilter {
    pub texel: Filter,
    pub mip: Option<Filter>,
}
impl MinFilter {
    #[must_use]
    pub fn as_gl(self) -> GLenum {
        match (self.texel, self.mip) {
            (Filter::Nearest, None) => gl::NEAREST,
            (Filter::Linear, None) => gl::LINEAR,
            (Filter::Nearest, Some(Filter::Nearest)) => gl::NEAREST_MIPMAP_NEAREST,
            (Filter::Nearest, Some(Filter::Linear)) => gl::NEAREST_MIPMAP_LINEAR,
            (Filter::Linear, Some(Filter::Nearest)) => gl::LINEAR_MIPMAP_NEAREST,
            (Filter::Linear, Some(Filter::Linear)) => gl::LINEAR_MIPMAP_LINEAR,
        }
    }
    #[must_use]
    pub fn from_gl(value: GLenum) -> Option<Self> {
        let (texel, mip) = match value {
            gl::NEAREST => (Filter::Nearest, None),
            gl::LINEAR => (Filter::Linear, None),
            gl::NEAREST_MIPMAP_NEAREST => (Filter::Nearest, Some(Filter::Nearest)),
            gl::NEAREST_MIPMAP_LINEAR => (Filter::Nearest, Some(Filter::Linear)),
            gl::LINEAR_MIPMAP_NEAREST => (Filter::Linear, Some(Filter::Nearest)),
            gl::LINEAR_MIPMAP_LINEAR => (Filter::Linear, Some(Filter::Linear)),
            _ => return None,
        };
        Some(Self { texel, mip })
    }
}
impl Default for MinFilter {
    fn default() -> Self {
        Self {
            texel: Filter::Nearest,
            mip: Some(Filter::Linear),
        }
    }
}

/// `GL_TEXTURE_WRAP_{S, T, R}`
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wrap {
    ClampToEdge = gl::CLAMP_TO_EDGE,
    ClampToBorder = gl::CLAMP_TO_BORDER,
    MirroredRepeat = gl::MIRRORED_REPEAT,
    MirrorClampToEdge = gl::MIRROR_CLAMP_TO_EDGE,
    #[default]
    Repeat = gl::REPEAT,
}
// Safety: is repr(u32) enum.
unsafe impl GLEnum for Wrap {}

/// `GL_TEXTURE_BORDER_COLOR`, always stored as float.
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}
impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Color { r, g, b, a }
    }
}
impl Color {
    /// View as the `GLfloat[4]` that `glTexParameterfv` takes.
    #[must_use]
    pub fn as_array(&self) -> &[f32; 4] {
        bytemuck::cast_ref(self)
    }
}

/// Level-of-detail clamping and bias.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lod {
    pub min: f32,
    pub max: f32,
    pub bias: f32,
}
impl Default for Lod {
    fn default() -> Self {
        // This is the GL default *very big* range, lol
        Self {
            min: -1000.0,
            max: 1000.0,
            bias: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerState {
    pub min_filter: MinFilter,
    pub mag_filter: Filter,
    /// `1.0` disables anisotropic filtering.
    pub max_anisotropy: f32,
    pub lod: Lod,
    /// Wrapping in the S, T, and R dimensions, respectively.
    pub wrap: [Wrap; 3],
    pub border_color: Color,
    pub seamless_cube_map: bool,
}
impl Default for SamplerState {
    fn default() -> Self {
        Self {
            min_filter: MinFilter::default(),
            mag_filter: Filter::Linear,
            max_anisotropy: 1.0,
            lod: Lod::default(),
            wrap: [Wrap::Repeat; 3],
            border_color: Color::default(),
            seamless_cube_map: false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn min_filter_gl_mapping() {
        for value in [
            gl::NEAREST,
            gl::LINEAR,
            gl::NEAREST_MIPMAP_NEAREST,
            gl::NEAREST_MIPMAP_LINEAR,
            gl::LINEAR_MIPMAP_NEAREST,
            gl::LINEAR_MIPMAP_LINEAR,
        ] {
            let filter = MinFilter::from_gl(value).unwrap();
            assert_eq!(filter.as_gl(), value);
        }
        assert_eq!(MinFilter::from_gl(gl::REPEAT), None);
    }

    #[test]
    fn defaults_match_gl() {
        let state = SamplerState::default();
        assert_eq!(state.min_filter.as_gl(), gl::NEAREST_MIPMAP_LINEAR);
        assert_eq!(state.mag_filter, Filter::Linear);
        assert_eq!(state.wrap.map(|wrap| wrap.as_gl()), [gl::REPEAT; 3]);
        assert_eq!(state.border_color.as_array(), &[0.0; 4]);
        assert!(!state.seamless_cube_map);
    }

    #[test]
    fn border_color_layout() {
        let color = Color::from([0.25, 0.5, 0.75, 1.0]);
        assert_eq!(color.as_array(), &[0.25, 0.5, 0.75, 1.0]);
    }
}
