//! Shadow records for shaders and programs.
use std::collections::BTreeMap;

use crate::{
    gl::types::{GLint, GLenum},
    ProgramName, ShaderName,
};

/// What the host last learned about a compile or link, through its own `glGet*iv` query.
///
/// Starts out [`Status::Unchecked`]. Once the host has asked, it is [`Status::Ok`] or
/// [`Status::Failed`] forever after - a later query overwrites the answer but never forgets
/// that one was asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// The host never queried the status.
    #[default]
    Unchecked,
    Failed,
    Ok,
}
impl Status {
    /// Interpret the value the GL wrote for `GL_COMPILE_STATUS` or `GL_LINK_STATUS`.
    #[must_use]
    pub fn from_gl(value: GLint) -> Self {
        if value == GLint::from(crate::gl::FALSE) {
            Self::Failed
        } else {
            Self::Ok
        }
    }
    #[must_use]
    pub fn is_checked(self) -> bool {
        self != Self::Unchecked
    }
}

/// A shader the host has compiled at least once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    pub(crate) name: ShaderName,
    pub(crate) compile_status: Status,
}
impl Shader {
    #[must_use]
    pub fn new(name: ShaderName) -> Self {
        Self {
            name,
            compile_status: Status::Unchecked,
        }
    }
    #[must_use]
    pub fn name(&self) -> ShaderName {
        self.name
    }
    #[must_use]
    pub fn compile_status(&self) -> Status {
        self.compile_status
    }
}

/// Shape of an active uniform, as reported by `glGetActiveUniform`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformInfo {
    /// Number of array elements, `1` for non-arrays.
    pub array_size: GLint,
    /// Type constant, e.g. `GL_FLOAT_VEC4` or `GL_SAMPLER_2D`.
    pub ty: GLenum,
}

/// A program the host has attached at least one shader to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub(crate) name: ProgramName,
    /// In attach order. The GL forbids attaching the same shader twice, but we record what we saw.
    pub(crate) shaders: Vec<ShaderName>,
    /// Uniform location -> info. Filled in at link time.
    pub(crate) uniforms: BTreeMap<GLint, UniformInfo>,
    pub(crate) link_status: Status,
}
impl Program {
    #[must_use]
    pub fn new(name: ProgramName) -> Self {
        Self {
            name,
            shaders: Vec::new(),
            uniforms: BTreeMap::new(),
            link_status: Status::Unchecked,
        }
    }
    #[must_use]
    pub fn name(&self) -> ProgramName {
        self.name
    }
    #[must_use]
    pub fn shaders(&self) -> &[ShaderName] {
        &self.shaders
    }
    #[must_use]
    pub fn uniforms(&self) -> &BTreeMap<GLint, UniformInfo> {
        &self.uniforms
    }
    /// Info for the uniform bound at `location`, if the last link reported one there.
    #[must_use]
    pub fn uniform(&self, location: GLint) -> Option<&UniformInfo> {
        self.uniforms.get(&location)
    }
    #[must_use]
    pub fn link_status(&self) -> Status {
        self.link_status
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_from_gl() {
        assert_eq!(Status::from_gl(0), Status::Failed);
        assert_eq!(Status::from_gl(1), Status::Ok);
        // Anything non-FALSE is truthy as far as the GL is concerned.
        assert_eq!(Status::from_gl(-1), Status::Ok);
        assert!(!Status::default().is_checked());
    }

    #[test]
    fn fresh_objects_are_unchecked() {
        let shader = Shader::new(ShaderName(3));
        assert_eq!(shader.compile_status(), Status::Unchecked);

        let program = Program::new(ProgramName(7));
        assert!(program.shaders().is_empty());
        assert!(program.uniforms().is_empty());
        assert_eq!(program.link_status(), Status::Unchecked);
    }
}
