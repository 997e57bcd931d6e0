//! # GL layer.
//!
//! A runtime validation layer for OpenGL. The GL silently accepts a lot of misuse - attaching
//! shaders nobody checked the compile status of, `glUseProgram`ing a program that failed to link,
//! rebinding a texture to a second target - and the only symptom is a black screen. This crate
//! sits at the call boundary, watches every call the host's loader forwards to it, rebuilds a
//! shadow copy of the host's shader, program, and texture objects, and reports sequences that
//! break the GL's unwritten usage contract.
//!
//! The layer never makes a GL call of its own (except the tiny [`introspect`] surface used while
//! linking), and never blocks or alters the host's calls. Problems are reported as text through an
//! [output sink](output::Sink), and processing carries on.
//!
//! ## Layout
//! * [`Layer`] owns the engine between `init` and `terminate`, and is the entry point for the
//!   host's loader hook.
//! * [`call`] and [`decode`] turn a function name plus raw arguments into a typed [`Call`].
//! * [`Context`] is the validation engine. It holds all shadow state.
//! * [`ffi`] exposes the whole thing over the C ABI.
//!
//! ## Object creation
//! The layer never sees the return value of `glCreateShader` or `glCreateProgram`. Objects are
//! therefore created lazily, on the first call that could only be valid for a live object:
//! shaders on `glCompileShader`, programs on `glAttachShader`, textures on `glGen`/`glCreateTextures`.

#![warn(rustdoc::all)]

use gl::types::{GLenum, GLuint};

pub mod gl {
    #![doc(hidden)]
    #![allow(clippy::all)]
    #![allow(dead_code)]
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

pub mod call;
pub mod config;
pub mod context;
pub mod decode;
pub mod diagnostic;
pub mod enums;
pub mod ffi;
pub mod introspect;
pub mod layer;
pub mod output;
pub mod program;
pub mod texture;

pub use call::Call;
pub use config::{Checks, Config, Version};
pub use context::Context;
pub use diagnostic::{Diagnostic, Violation};
pub use layer::{Layer, LayerError};

/// Trait for rusty `GLenum`s.
///
/// # Safety
/// * Must be implemented only on enums.
/// * The enum must be `#[repr(u32)]`
/// * Every variant must be a correct constant of `GLenum`.
pub unsafe trait GLEnum {
    /// Access the raw `GLenum` value of this enum.
    fn as_gl(&self) -> GLenum {
        unsafe { *std::ptr::from_ref(self).cast() }
    }
}

/// Object names are plain integers on the GL side. Each kind gets its own type here so a
/// shader name can never be looked up in the program map.
macro_rules! name {
    ($(#[$meta:meta])* pub struct $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub GLuint);
        impl $name {
            /// The zero name, which the GL reserves.
            pub const ZERO: Self = Self(0);
            #[must_use]
            pub fn get(self) -> GLuint {
                self.0
            }
            #[must_use]
            pub fn is_zero(self) -> bool {
                self.0 == 0
            }
        }
        impl From<GLuint> for $name {
            fn from(value: GLuint) -> Self {
                Self(value)
            }
        }
        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

name!(
    /// The name of a shader object, as returned by `glCreateShader`.
    pub struct ShaderName
);
name!(
    /// The name of a program object, as returned by `glCreateProgram`.
    pub struct ProgramName
);
name!(
    /// The name of a texture object, as returned by `glGenTextures` or `glCreateTextures`.
    pub struct TextureName
);
