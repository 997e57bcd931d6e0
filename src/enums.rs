//! Turning raw `GLenum`s back into their `GL_*` spelling, for messages.

use crate::{gl, GLenum};

/// The `GL_*` name of a constant, if the layer knows it.
///
/// Only the constants that can show up in a diagnostic are listed.
#[must_use]
pub fn name(value: GLenum) -> Option<&'static str> {
    let name = match value {
        // Shader and program parameters.
        gl::SHADER_TYPE => "GL_SHADER_TYPE",
        gl::DELETE_STATUS => "GL_DELETE_STATUS",
        gl::COMPILE_STATUS => "GL_COMPILE_STATUS",
        gl::LINK_STATUS => "GL_LINK_STATUS",
        gl::VALIDATE_STATUS => "GL_VALIDATE_STATUS",
        gl::INFO_LOG_LENGTH => "GL_INFO_LOG_LENGTH",
        gl::ATTACHED_SHADERS => "GL_ATTACHED_SHADERS",
        gl::ACTIVE_UNIFORMS => "GL_ACTIVE_UNIFORMS",
        gl::ACTIVE_UNIFORM_MAX_LENGTH => "GL_ACTIVE_UNIFORM_MAX_LENGTH",
        gl::ACTIVE_ATTRIBUTES => "GL_ACTIVE_ATTRIBUTES",
        gl::SHADER_SOURCE_LENGTH => "GL_SHADER_SOURCE_LENGTH",

        // Texture targets.
        gl::TEXTURE_1D => "GL_TEXTURE_1D",
        gl::TEXTURE_2D => "GL_TEXTURE_2D",
        gl::TEXTURE_3D => "GL_TEXTURE_3D",
        gl::TEXTURE_1D_ARRAY => "GL_TEXTURE_1D_ARRAY",
        gl::TEXTURE_2D_ARRAY => "GL_TEXTURE_2D_ARRAY",
        gl::TEXTURE_RECTANGLE => "GL_TEXTURE_RECTANGLE",
        gl::TEXTURE_CUBE_MAP => "GL_TEXTURE_CUBE_MAP",
        gl::TEXTURE_CUBE_MAP_ARRAY => "GL_TEXTURE_CUBE_MAP_ARRAY",
        gl::TEXTURE_BUFFER => "GL_TEXTURE_BUFFER",
        gl::TEXTURE_2D_MULTISAMPLE => "GL_TEXTURE_2D_MULTISAMPLE",
        gl::TEXTURE_2D_MULTISAMPLE_ARRAY => "GL_TEXTURE_2D_MULTISAMPLE_ARRAY",

        // Uniform types.
        gl::FLOAT => "GL_FLOAT",
        gl::FLOAT_VEC2 => "GL_FLOAT_VEC2",
        gl::FLOAT_VEC3 => "GL_FLOAT_VEC3",
        gl::FLOAT_VEC4 => "GL_FLOAT_VEC4",
        gl::INT => "GL_INT",
        gl::INT_VEC2 => "GL_INT_VEC2",
        gl::INT_VEC3 => "GL_INT_VEC3",
        gl::INT_VEC4 => "GL_INT_VEC4",
        gl::UNSIGNED_INT => "GL_UNSIGNED_INT",
        gl::BOOL => "GL_BOOL",
        gl::FLOAT_MAT2 => "GL_FLOAT_MAT2",
        gl::FLOAT_MAT3 => "GL_FLOAT_MAT3",
        gl::FLOAT_MAT4 => "GL_FLOAT_MAT4",
        gl::SAMPLER_2D => "GL_SAMPLER_2D",
        gl::SAMPLER_3D => "GL_SAMPLER_3D",
        gl::SAMPLER_CUBE => "GL_SAMPLER_CUBE",
        gl::SAMPLER_2D_SHADOW => "GL_SAMPLER_2D_SHADOW",
        gl::SAMPLER_2D_ARRAY => "GL_SAMPLER_2D_ARRAY",

        // Sampler parameters.
        gl::NEAREST => "GL_NEAREST",
        gl::LINEAR => "GL_LINEAR",
        gl::NEAREST_MIPMAP_NEAREST => "GL_NEAREST_MIPMAP_NEAREST",
        gl::NEAREST_MIPMAP_LINEAR => "GL_NEAREST_MIPMAP_LINEAR",
        gl::LINEAR_MIPMAP_NEAREST => "GL_LINEAR_MIPMAP_NEAREST",
        gl::LINEAR_MIPMAP_LINEAR => "GL_LINEAR_MIPMAP_LINEAR",
        gl::REPEAT => "GL_REPEAT",
        gl::MIRRORED_REPEAT => "GL_MIRRORED_REPEAT",
        gl::CLAMP_TO_EDGE => "GL_CLAMP_TO_EDGE",
        gl::CLAMP_TO_BORDER => "GL_CLAMP_TO_BORDER",
        gl::MIRROR_CLAMP_TO_EDGE => "GL_MIRROR_CLAMP_TO_EDGE",
        _ => return None,
    };
    Some(name)
}

/// Displays a `GLenum` by name, falling back to hex for unknown values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumName(pub GLenum);
impl std::fmt::Display for EnumName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match name(self.0) {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#06X}", self.0),
        }
    }
}
