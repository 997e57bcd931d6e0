//! Turning a function name and a list of untyped arguments into a [`Call`].
//!
//! The host's loader hands us the name of the function it just called and that function's
//! arguments, with no type information. The [`REGISTRY`] knows the native parameter list of each
//! function the layer understands; arguments are pulled out of an [`ArgSource`] one at a time,
//! left to right, each with its declared native type. Reading a slot with the wrong width
//! would misinterpret every argument after it, so the order of reads in each decoder matches
//! the C signature exactly.
//!
//! All knowledge of the native argument layout lives in [`RawArgs`]. [`Args`] is the safe
//! equivalent, for Rust hosts and tests.

use std::ffi::c_void;

use crate::{
    call::Call,
    gl::types::{GLenum, GLint, GLsizei, GLuint},
    texture::Target,
    ProgramName, ShaderName, TextureName,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("argument {index} is missing")]
    MissingArgument { index: usize },
    /// `expected` is the native type the slot should hold, e.g. `GLuint`.
    #[error("argument {index} is not a {expected}")]
    ArgumentType {
        index: usize,
        expected: &'static str,
    },
    #[error("argument {index} is a null pointer")]
    NullPointer { index: usize },
    #[error("argument {index} holds {found} names, expected at least {expected}")]
    ShortArray {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("negative object count {0}")]
    NegativeCount(GLsizei),
    #[error("unknown texture target {0:#06X}")]
    UnknownTarget(GLenum),
}

/// Native type of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// `GLuint`, an object name.
    Name,
    /// `GLenum`
    Enum,
    /// `GLsizei`, the length of a following array.
    Count,
    /// `GLint *`, written by the GL before the layer sees the call.
    IntOut,
    /// `const GLuint *` holding as many names as the preceding [`Param::Count`].
    NameArray,
}

/// Where a decoder pulls arguments from. Each read consumes the next argument.
pub trait ArgSource {
    /// Read a `GLuint` or `GLenum`.
    ///
    /// # Errors
    /// No argument left, or it isn't an unsigned integer.
    fn uint(&mut self) -> Result<GLuint, DecodeError>;
    /// Read a `GLint` or `GLsizei`.
    ///
    /// # Errors
    /// No argument left, or it isn't a signed integer.
    fn int(&mut self) -> Result<GLint, DecodeError>;
    /// Read the value behind a `GLint *` out-parameter.
    ///
    /// # Errors
    /// No argument left, or it isn't a readable pointer.
    fn int_out(&mut self) -> Result<GLint, DecodeError>;
    /// Read `count` names from a `const GLuint *`.
    ///
    /// # Errors
    /// No argument left, or it doesn't hold `count` names.
    fn uint_array(&mut self, count: usize) -> Result<Vec<GLuint>, DecodeError>;
}

/// One argument of the safe [`Args`] list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A `GLuint` or `GLenum`.
    UInt(GLuint),
    /// A `GLint` or `GLsizei`, or the value the GL wrote through a `GLint *`.
    Int(GLint),
    /// The contents of a `const GLuint *`.
    UIntArray(Vec<GLuint>),
}

/// Arguments as a list of typed [`Value`]s.
///
/// ```
/// use gl_layer::decode::{Args, Value};
/// // glAttachShader(10, 1)
/// let args = Args::new([Value::UInt(10), Value::UInt(1)]);
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Args {
    values: Vec<Value>,
    next: usize,
}
impl Args {
    pub fn new(values: impl Into<Vec<Value>>) -> Self {
        Self {
            values: values.into(),
            next: 0,
        }
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    /// How many arguments have not been read yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len().saturating_sub(self.next)
    }
    fn take(&mut self) -> Result<(usize, &Value), DecodeError> {
        let index = self.next;
        let value = self
            .values
            .get(index)
            .ok_or(DecodeError::MissingArgument { index })?;
        self.next += 1;
        Ok((index, value))
    }
}
impl ArgSource for Args {
    fn uint(&mut self) -> Result<GLuint, DecodeError> {
        match self.take()? {
            (_, Value::UInt(value)) => Ok(*value),
            (index, _) => Err(DecodeError::ArgumentType {
                index,
                expected: "GLuint",
            }),
        }
    }
    fn int(&mut self) -> Result<GLint, DecodeError> {
        match self.take()? {
            (_, Value::Int(value)) => Ok(*value),
            (index, _) => Err(DecodeError::ArgumentType {
                index,
                expected: "GLint",
            }),
        }
    }
    fn int_out(&mut self) -> Result<GLint, DecodeError> {
        match self.take()? {
            (_, Value::Int(value)) => Ok(*value),
            (index, _) => Err(DecodeError::ArgumentType {
                index,
                expected: "GLint *",
            }),
        }
    }
    fn uint_array(&mut self, count: usize) -> Result<Vec<GLuint>, DecodeError> {
        match self.take()? {
            (_, Value::UIntArray(names)) if names.len() >= count => Ok(names[..count].to_vec()),
            (index, Value::UIntArray(names)) => Err(DecodeError::ShortArray {
                index,
                expected: count,
                found: names.len(),
            }),
            (index, _) => Err(DecodeError::ArgumentType {
                index,
                expected: "const GLuint *",
            }),
        }
    }
}

/// One native argument slot, as the host's loader writes it.
///
/// The loader stores each argument through the member matching its C type: `GLuint` and
/// `GLenum` through `uint`, `GLint` and `GLsizei` through `int`, pointers through `ptr`.
#[repr(C)]
#[derive(Clone, Copy)]
pub union RawArg {
    pub uint: GLuint,
    pub int: GLint,
    pub ptr: *const c_void,
}
impl From<GLuint> for RawArg {
    fn from(uint: GLuint) -> Self {
        Self { uint }
    }
}
impl From<GLint> for RawArg {
    fn from(int: GLint) -> Self {
        Self { int }
    }
}
impl<T> From<*const T> for RawArg {
    fn from(ptr: *const T) -> Self {
        Self { ptr: ptr.cast() }
    }
}
impl<T> From<*mut T> for RawArg {
    fn from(ptr: *mut T) -> Self {
        Self {
            ptr: ptr.cast_const().cast(),
        }
    }
}

/// Arguments straight off the native hook.
pub struct RawArgs<'a> {
    args: &'a [RawArg],
    next: usize,
}
impl<'a> RawArgs<'a> {
    /// # Safety
    /// * Each slot must have been written through the member matching the native type of the
    ///   corresponding parameter of the function being decoded.
    /// * Pointer slots must be null or valid for reads of what the real function accesses
    ///   through them: one `GLint` for out-parameters, `n` names for name arrays.
    #[must_use]
    pub unsafe fn new(args: &'a [RawArg]) -> Self {
        Self { args, next: 0 }
    }
    fn take(&mut self) -> Result<(usize, RawArg), DecodeError> {
        let index = self.next;
        let arg = self
            .args
            .get(index)
            .copied()
            .ok_or(DecodeError::MissingArgument { index })?;
        self.next += 1;
        Ok((index, arg))
    }
    fn pointer<T>(&mut self) -> Result<*const T, DecodeError> {
        let (index, arg) = self.take()?;
        // Safety: precondition of `new`, this slot was declared as a pointer.
        let ptr = unsafe { arg.ptr }.cast::<T>();
        if ptr.is_null() {
            Err(DecodeError::NullPointer { index })
        } else {
            Ok(ptr)
        }
    }
}
impl ArgSource for RawArgs<'_> {
    fn uint(&mut self) -> Result<GLuint, DecodeError> {
        let (_, arg) = self.take()?;
        // Safety: precondition of `new`.
        Ok(unsafe { arg.uint })
    }
    fn int(&mut self) -> Result<GLint, DecodeError> {
        let (_, arg) = self.take()?;
        // Safety: precondition of `new`.
        Ok(unsafe { arg.int })
    }
    fn int_out(&mut self) -> Result<GLint, DecodeError> {
        let ptr = self.pointer::<GLint>()?;
        // Safety: non-null, and valid for one read by precondition of `new`.
        Ok(unsafe { ptr.read() })
    }
    fn uint_array(&mut self, count: usize) -> Result<Vec<GLuint>, DecodeError> {
        if count == 0 {
            // The GL never reads the pointer here, so it may be anything.
            self.take()?;
            return Ok(Vec::new());
        }
        let ptr = self.pointer::<GLuint>()?;
        // Safety: non-null, and valid for `count` reads by precondition of `new`.
        Ok(unsafe { std::slice::from_raw_parts(ptr, count) }.to_vec())
    }
}

/// A function the layer knows how to decode.
pub struct Entry {
    /// The GL name, e.g. `glBindTexture`.
    pub name: &'static str,
    /// The native parameter list, in order.
    pub params: &'static [Param],
    decode: fn(&mut dyn ArgSource) -> Result<Call, DecodeError>,
}
impl Entry {
    /// Read this function's arguments from `args`.
    ///
    /// # Errors
    /// See [`DecodeError`]. Arguments after the failing one are not read.
    pub fn decode(&self, args: &mut dyn ArgSource) -> Result<Call, DecodeError> {
        (self.decode)(args)
    }
}
impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Every function the layer validates. Anything else passes through untouched.
pub static REGISTRY: [Entry; 11] = [
    Entry {
        name: "glCompileShader",
        params: &[Param::Name],
        decode: compile_shader,
    },
    Entry {
        name: "glGetShaderiv",
        params: &[Param::Name, Param::Enum, Param::IntOut],
        decode: get_shader_iv,
    },
    Entry {
        name: "glAttachShader",
        params: &[Param::Name, Param::Name],
        decode: attach_shader,
    },
    Entry {
        name: "glGetProgramiv",
        params: &[Param::Name, Param::Enum, Param::IntOut],
        decode: get_program_iv,
    },
    Entry {
        name: "glLinkProgram",
        params: &[Param::Name],
        decode: link_program,
    },
    Entry {
        name: "glUseProgram",
        params: &[Param::Name],
        decode: use_program,
    },
    Entry {
        name: "glDeleteProgram",
        params: &[Param::Name],
        decode: delete_program,
    },
    Entry {
        name: "glGenTextures",
        params: &[Param::Count, Param::NameArray],
        decode: gen_textures,
    },
    Entry {
        name: "glCreateTextures",
        params: &[Param::Enum, Param::Count, Param::NameArray],
        decode: create_textures,
    },
    Entry {
        name: "glBindTexture",
        params: &[Param::Enum, Param::Name],
        decode: bind_texture,
    },
    Entry {
        name: "glDeleteTextures",
        params: &[Param::Count, Param::NameArray],
        decode: delete_textures,
    },
];

/// Find the registry entry for a GL function name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static Entry> {
    REGISTRY.iter().find(|entry| entry.name == name)
}

fn count(args: &mut dyn ArgSource) -> Result<usize, DecodeError> {
    let n = args.int()?;
    usize::try_from(n).map_err(|_| DecodeError::NegativeCount(n))
}
fn target(args: &mut dyn ArgSource) -> Result<Target, DecodeError> {
    let raw = args.uint()?;
    Target::from_gl(raw).ok_or(DecodeError::UnknownTarget(raw))
}
fn texture_names(args: &mut dyn ArgSource, count: usize) -> Result<Vec<TextureName>, DecodeError> {
    Ok(args
        .uint_array(count)?
        .into_iter()
        .map(TextureName)
        .collect())
}

fn compile_shader(args: &mut dyn ArgSource) -> Result<Call, DecodeError> {
    let shader = ShaderName(args.uint()?);
    Ok(Call::CompileShader { shader })
}
fn get_shader_iv(args: &mut dyn ArgSource) -> Result<Call, DecodeError> {
    let shader = ShaderName(args.uint()?);
    let pname = args.uint()?;
    let value = args.int_out()?;
    Ok(Call::GetShaderiv {
        shader,
        pname,
        value,
    })
}
fn attach_shader(args: &mut dyn ArgSource) -> Result<Call, DecodeError> {
    let program = ProgramName(args.uint()?);
    let shader = ShaderName(args.uint()?);
    Ok(Call::AttachShader { program, shader })
}
fn get_program_iv(args: &mut dyn ArgSource) -> Result<Call, DecodeError> {
    let program = ProgramName(args.uint()?);
    let pname = args.uint()?;
    let value = args.int_out()?;
    Ok(Call::GetProgramiv {
        program,
        pname,
        value,
    })
}
fn link_program(args: &mut dyn ArgSource) -> Result<Call, DecodeError> {
    let program = ProgramName(args.uint()?);
    Ok(Call::LinkProgram { program })
}
fn use_program(args: &mut dyn ArgSource) -> Result<Call, DecodeError> {
    let program = ProgramName(args.uint()?);
    Ok(Call::UseProgram { program })
}
fn delete_program(args: &mut dyn ArgSource) -> Result<Call, DecodeError> {
    let program = ProgramName(args.uint()?);
    Ok(Call::DeleteProgram { program })
}
fn gen_textures(args: &mut dyn ArgSource) -> Result<Call, DecodeError> {
    let n = count(args)?;
    let textures = texture_names(args, n)?;
    Ok(Call::GenTextures { textures })
}
fn create_textures(args: &mut dyn ArgSource) -> Result<Call, DecodeError> {
    let target = target(args)?;
    let n = count(args)?;
    let textures = texture_names(args, n)?;
    Ok(Call::CreateTextures { target, textures })
}
fn bind_texture(args: &mut dyn ArgSource) -> Result<Call, DecodeError> {
    let target = target(args)?;
    let texture = TextureName(args.uint()?);
    Ok(Call::BindTexture { target, texture })
}
fn delete_textures(args: &mut dyn ArgSource) -> Result<Call, DecodeError> {
    let n = count(args)?;
    let textures = texture_names(args, n)?;
    Ok(Call::DeleteTextures { textures })
}
