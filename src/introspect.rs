//! The only GL functions the layer ever calls itself, to learn a program's uniforms at link time.
use std::ffi::{CStr, CString};

use crate::{
    gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint},
    ProgramName,
};

/// An active uniform, as `glGetActiveUniform` describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUniform {
    pub name: CString,
    pub array_size: GLint,
    pub ty: GLenum,
}

/// Read-only queries into the real GL.
///
/// Only used while handling `glLinkProgram`, always with the host's context current.
pub trait Introspect: Send {
    /// `glGetProgramiv`
    fn program_iv(&self, program: ProgramName, pname: GLenum) -> GLint;
    /// `glGetActiveUniform`. `max_name_length` includes the NUL terminator, as
    /// `GL_ACTIVE_UNIFORM_MAX_LENGTH` reports it.
    fn active_uniform(
        &self,
        program: ProgramName,
        index: GLuint,
        max_name_length: usize,
    ) -> Option<ActiveUniform>;
    /// `glGetUniformLocation`
    fn uniform_location(&self, program: ProgramName, name: &CStr) -> GLint;
}

pub type GetActiveUniformFn = unsafe extern "system" fn(
    program: GLuint,
    index: GLuint,
    buf_size: GLsizei,
    length: *mut GLsizei,
    size: *mut GLint,
    ty: *mut GLenum,
    name: *mut GLchar,
);
pub type GetUniformLocationFn =
    unsafe extern "system" fn(program: GLuint, name: *const GLchar) -> GLint;
pub type GetProgramivFn = unsafe extern "system" fn(program: GLuint, pname: GLenum, params: *mut GLint);

/// The host's GL entry points, laid out for the C ABI. Missing entries are null.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct IntrospectionTable {
    pub get_active_uniform: Option<GetActiveUniformFn>,
    pub get_uniform_location: Option<GetUniformLocationFn>,
    pub get_program_iv: Option<GetProgramivFn>,
}

/// [`Introspect`] through an [`IntrospectionTable`].
///
/// A missing entry behaves like a program with no active uniforms.
///
/// Plain function pointers, so this is `Send`. The host still has to make the GL calls
/// sound: see [`Self::new`].
#[derive(Debug, Clone, Copy)]
pub struct HostIntrospection(IntrospectionTable);
impl HostIntrospection {
    /// # Safety
    /// * Every non-null entry must be the real GL function it's named after, or behave like it.
    /// * The context the functions belong to must be current on whichever thread hands the
    ///   layer a `glLinkProgram`.
    #[must_use]
    pub unsafe fn new(table: IntrospectionTable) -> Self {
        Self(table)
    }
}
impl Introspect for HostIntrospection {
    fn program_iv(&self, program: ProgramName, pname: GLenum) -> GLint {
        let Some(get_program_iv) = self.0.get_program_iv else {
            return 0;
        };
        let mut value = 0;
        // Safety: precondition of `new`.
        unsafe { get_program_iv(program.get(), pname, std::ptr::addr_of_mut!(value)) };
        value
    }
    fn active_uniform(
        &self,
        program: ProgramName,
        index: GLuint,
        max_name_length: usize,
    ) -> Option<ActiveUniform> {
        let get_active_uniform = self.0.get_active_uniform?;

        // Room for at least the terminator, drivers have been known to report zero.
        let mut bytes = vec![0u8; max_name_length.max(1)];
        let mut length: GLsizei = 0;
        let mut array_size: GLint = 0;
        let mut ty: GLenum = 0;
        // Safety: precondition of `new`. The buffer is as long as we say it is.
        unsafe {
            get_active_uniform(
                program.get(),
                index,
                bytes.len().try_into().ok()?,
                std::ptr::addr_of_mut!(length),
                std::ptr::addr_of_mut!(array_size),
                std::ptr::addr_of_mut!(ty),
                // GL uses i8 char, we want u8. This is totally fine.
                bytes.as_mut_ptr().cast(),
            );
        }
        // `length` excludes the terminator.
        let length = usize::try_from(length).ok()?.min(bytes.len() - 1);
        bytes.truncate(length);
        let name = CString::new(bytes).ok()?;
        Some(ActiveUniform {
            name,
            array_size,
            ty,
        })
    }
    fn uniform_location(&self, program: ProgramName, name: &CStr) -> GLint {
        let Some(get_uniform_location) = self.0.get_uniform_location else {
            return -1;
        };
        // Safety: precondition of `new`, and `name` is NUL-terminated.
        unsafe { get_uniform_location(program.get(), name.as_ptr()) }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gl;

    // A single program (name 1) with two uniforms: `tint` and `lights[0]`.
    const UNIFORMS: [(&[u8], GLint, GLenum, GLint); 2] = [
        (b"tint", 1, gl::FLOAT_VEC4, 0),
        (b"lights[0]", 4, gl::FLOAT_VEC3, 2),
    ];

    unsafe extern "system" fn get_program_iv(program: GLuint, pname: GLenum, params: *mut GLint) {
        *params = match (program, pname) {
            (1, gl::ACTIVE_UNIFORMS) => UNIFORMS.len() as GLint,
            (1, gl::ACTIVE_UNIFORM_MAX_LENGTH) => 10,
            _ => 0,
        };
    }
    unsafe extern "system" fn get_active_uniform(
        _program: GLuint,
        index: GLuint,
        buf_size: GLsizei,
        length: *mut GLsizei,
        size: *mut GLint,
        ty: *mut GLenum,
        name: *mut GLchar,
    ) {
        let (text, array_size, uniform_ty, _) = UNIFORMS[index as usize];
        let written = text.len().min(buf_size as usize - 1);
        std::ptr::copy_nonoverlapping(text.as_ptr(), name.cast::<u8>(), written);
        *name.add(written) = 0;
        *length = written as GLsizei;
        *size = array_size;
        *ty = uniform_ty;
    }
    unsafe extern "system" fn get_uniform_location(_program: GLuint, name: *const GLchar) -> GLint {
        let name = CStr::from_ptr(name).to_bytes();
        UNIFORMS
            .iter()
            .find(|(text, ..)| *text == name)
            .map_or(-1, |&(.., location)| location)
    }

    fn table() -> HostIntrospection {
        unsafe {
            HostIntrospection::new(IntrospectionTable {
                get_active_uniform: Some(get_active_uniform),
                get_uniform_location: Some(get_uniform_location),
                get_program_iv: Some(get_program_iv),
            })
        }
    }

    #[test]
    fn queries_through_table() {
        let host = table();
        let program = ProgramName(1);
        assert_eq!(host.program_iv(program, gl::ACTIVE_UNIFORMS), 2);

        let uniform = host.active_uniform(program, 1, 10).unwrap();
        assert_eq!(uniform.name.as_bytes(), b"lights[0]");
        assert_eq!(uniform.array_size, 4);
        assert_eq!(uniform.ty, gl::FLOAT_VEC3);
        assert_eq!(host.uniform_location(program, &uniform.name), 2);
    }

    #[test]
    fn truncates_to_buffer() {
        let uniform = table().active_uniform(ProgramName(1), 1, 4).unwrap();
        assert_eq!(uniform.name.as_bytes(), b"lig");
    }

    #[test]
    fn empty_table_reports_nothing() {
        let host = unsafe { HostIntrospection::new(IntrospectionTable::default()) };
        assert_eq!(host.program_iv(ProgramName(1), gl::ACTIVE_UNIFORMS), 0);
        assert_eq!(host.active_uniform(ProgramName(1), 0, 16), None);
        assert_eq!(host.uniform_location(ProgramName(1), c"tint"), -1);
    }
}
