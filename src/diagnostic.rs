//! Reports produced by the validation engine.
use crate::{call::Call, texture::Target, Checks};

/// How a [`Violation`] is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// The call sequence broke a usage rule - use before check, target mismatch, double compile.
    UsageViolation,
    /// The call named an object the layer is not tracking. The call is otherwise ignored.
    InvalidHandle,
}

/// Something the host did wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("Shader is already compiled.")]
    ShaderAlreadyCompiled,
    #[error("Invalid shader handle.")]
    InvalidShader,
    #[error("Always check shader compilation status before trying to use the object.")]
    ShaderStatusUnchecked,
    #[error("Attached shader has a compilation error.")]
    ShaderCompileFailed,
    #[error("Invalid program handle.")]
    InvalidProgram,
    #[error("Always check program link status before trying to use the object.")]
    ProgramStatusUnchecked,
    #[error("Program has a linker error.")]
    ProgramLinkFailed,
    #[error("Invalid texture handle.")]
    InvalidTexture,
    #[error("Invalid texture target (texture is already {existing}).")]
    TextureTargetMismatch { existing: Target },
}
impl Violation {
    #[must_use]
    pub fn kind(self) -> Kind {
        match self {
            Self::InvalidShader | Self::InvalidProgram | Self::InvalidTexture => Kind::InvalidHandle,
            Self::ShaderAlreadyCompiled
            | Self::ShaderStatusUnchecked
            | Self::ShaderCompileFailed
            | Self::ProgramStatusUnchecked
            | Self::ProgramLinkFailed
            | Self::TextureTargetMismatch { .. } => Kind::UsageViolation,
        }
    }
    /// The category that has to be enabled for this to be reported.
    #[must_use]
    pub fn check(self) -> Checks {
        match self {
            Self::InvalidShader | Self::InvalidProgram | Self::InvalidTexture => Checks::HANDLES,
            Self::ShaderAlreadyCompiled
            | Self::ShaderStatusUnchecked
            | Self::ShaderCompileFailed => Checks::SHADER_STATUS,
            Self::ProgramStatusUnchecked | Self::ProgramLinkFailed => Checks::PROGRAM_STATUS,
            Self::TextureTargetMismatch { .. } => Checks::TEXTURE_TARGET,
        }
    }
}

/// A [`Violation`] along with the call that caused it.
///
/// Displays as the call in GL notation followed by the message, e.g.
/// `glAttachShader(program = 10, shader = 1): Invalid shader handle.`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{call}: {violation}")]
pub struct Diagnostic {
    pub call: Call,
    pub violation: Violation,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ProgramName, ShaderName, TextureName};

    #[test]
    fn renders_call_and_message() {
        let diagnostic = Diagnostic {
            call: Call::AttachShader {
                program: ProgramName(10),
                shader: ShaderName(1),
            },
            violation: Violation::InvalidShader,
        };
        assert_eq!(
            diagnostic.to_string(),
            "glAttachShader(program = 10, shader = 1): Invalid shader handle."
        );
    }

    #[test]
    fn target_mismatch_names_existing_target() {
        let diagnostic = Diagnostic {
            call: Call::BindTexture {
                target: Target::D3,
                texture: TextureName(5),
            },
            violation: Violation::TextureTargetMismatch {
                existing: Target::D2,
            },
        };
        assert_eq!(
            diagnostic.to_string(),
            "glBindTexture(target = GL_TEXTURE_3D, texture = 5): \
             Invalid texture target (texture is already GL_TEXTURE_2D)."
        );
    }

    #[test]
    fn handle_violations_are_classified() {
        assert_eq!(Violation::InvalidTexture.kind(), Kind::InvalidHandle);
        assert_eq!(Violation::InvalidTexture.check(), Checks::HANDLES);
        assert_eq!(Violation::ProgramLinkFailed.kind(), Kind::UsageViolation);
        assert_eq!(Violation::ProgramLinkFailed.check(), Checks::PROGRAM_STATUS);
    }
}
