//! Typed records of the GL calls the layer understands.
//!
//! These are what the [validation engine](crate::Context) consumes. Building one from raw
//! arguments is the job of [`crate::decode`].

use std::fmt;

use crate::{
    enums::EnumName,
    gl::types::{GLenum, GLint},
    texture::Target,
    ProgramName, ShaderName, TextureName,
};

/// One intercepted call, with its arguments already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `glCompileShader`
    CompileShader { shader: ShaderName },
    /// `glGetShaderiv`. `value` is what the GL wrote to `params`.
    GetShaderiv {
        shader: ShaderName,
        pname: GLenum,
        value: GLint,
    },
    /// `glAttachShader`
    AttachShader {
        program: ProgramName,
        shader: ShaderName,
    },
    /// `glGetProgramiv`. `value` is what the GL wrote to `params`.
    GetProgramiv {
        program: ProgramName,
        pname: GLenum,
        value: GLint,
    },
    /// `glLinkProgram`
    LinkProgram { program: ProgramName },
    /// `glUseProgram`
    UseProgram { program: ProgramName },
    /// `glDeleteProgram`
    DeleteProgram { program: ProgramName },
    /// `glGenTextures`
    GenTextures { textures: Vec<TextureName> },
    /// `glCreateTextures`
    CreateTextures {
        target: Target,
        textures: Vec<TextureName>,
    },
    /// `glBindTexture`
    BindTexture {
        target: Target,
        texture: TextureName,
    },
    /// `glDeleteTextures`
    DeleteTextures { textures: Vec<TextureName> },
}

impl Call {
    /// The GL entry point this call came through.
    #[must_use]
    pub fn function(&self) -> &'static str {
        match self {
            Self::CompileShader { .. } => "glCompileShader",
            Self::GetShaderiv { .. } => "glGetShaderiv",
            Self::AttachShader { .. } => "glAttachShader",
            Self::GetProgramiv { .. } => "glGetProgramiv",
            Self::LinkProgram { .. } => "glLinkProgram",
            Self::UseProgram { .. } => "glUseProgram",
            Self::DeleteProgram { .. } => "glDeleteProgram",
            Self::GenTextures { .. } => "glGenTextures",
            Self::CreateTextures { .. } => "glCreateTextures",
            Self::BindTexture { .. } => "glBindTexture",
            Self::DeleteTextures { .. } => "glDeleteTextures",
        }
    }
}

/// `[1, 2, 3]`
struct List<'a>(&'a [TextureName]);
impl fmt::Display for List<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, name) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}")?;
        }
        f.write_str("]")
    }
}

/// GL notation, e.g. `glBindTexture(target = GL_TEXTURE_2D, texture = 5)`.
impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function())?;
        match self {
            Self::CompileShader { shader } => write!(f, "shader = {shader}")?,
            Self::GetShaderiv {
                shader,
                pname,
                value,
            } => write!(
                f,
                "shader = {shader}, pname = {}, params = {value}",
                EnumName(*pname)
            )?,
            Self::AttachShader { program, shader } => {
                write!(f, "program = {program}, shader = {shader}")?;
            }
            Self::GetProgramiv {
                program,
                pname,
                value,
            } => write!(
                f,
                "program = {program}, pname = {}, params = {value}",
                EnumName(*pname)
            )?,
            Self::LinkProgram { program }
            | Self::UseProgram { program }
            | Self::DeleteProgram { program } => write!(f, "program = {program}")?,
            Self::GenTextures { textures } | Self::DeleteTextures { textures } => write!(
                f,
                "n = {}, textures = {}",
                textures.len(),
                List(textures)
            )?,
            Self::CreateTextures { target, textures } => write!(
                f,
                "target = {target}, n = {}, textures = {}",
                textures.len(),
                List(textures)
            )?,
            Self::BindTexture { target, texture } => {
                write!(f, "target = {target}, texture = {texture}")?;
            }
        }
        f.write_str(")")
    }
}
