//! The C ABI.
//!
//! One [`Layer`] for the whole process, bracketed by `gl_layer_init` and `gl_layer_terminate`.
//! Any thread may call in, but the host must not call in from two threads at once: GL calls
//! are serialized by the host anyway, since only one thread has the context current.
//!
//! ```c
//! int  gl_layer_init(unsigned major, unsigned minor, const IntrospectionTable *table);
//! void gl_layer_terminate(void);
//! void gl_layer_callback(const char *name, const void *func_ptr, int num_args, const RawArg *args);
//! void gl_layer_set_output_callback(void (*callback)(const char *, void *), void *user_data);
//! ```
//!
//! None of these unwind, and none of them report errors beyond `gl_layer_init`'s status:
//! problems are logged through `tracing` and the call is dropped.

use std::{
    ffi::{c_char, c_int, c_uint, c_void, CStr},
    panic::AssertUnwindSafe,
    sync::{Mutex, TryLockError},
};

use crate::{
    decode::{RawArg, RawArgs},
    introspect::{HostIntrospection, Introspect, IntrospectionTable},
    output::{Callback, OutputFun, Stdout},
    Config, Layer, LayerError, Version,
};

static LAYER: Mutex<Layer> = Mutex::new(Layer::new());

/// Run `f` on the process' layer. Refuses reentry, catches panics.
///
/// The lock is only ever tried, never waited on: a busy layer means a sink called back in.
fn with_layer<R>(f: impl FnOnce(&mut Layer) -> Result<R, LayerError>) -> Result<R, LayerError> {
    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
        let mut layer = match LAYER.try_lock() {
            Ok(layer) => layer,
            Err(TryLockError::WouldBlock) => return Err(LayerError::Reentrant),
            // Left behind by a caught panic. Carry on with whatever state it got to.
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };
        f(&mut *layer)
    }));
    let result = result.unwrap_or(Err(LayerError::Panicked));
    if let Err(err @ (LayerError::Reentrant | LayerError::Panicked)) = &result {
        tracing::warn!("{err}");
    }
    result
}

/// Start validating. Returns zero on success, non-zero if the layer is already running.
///
/// # Safety
/// `table` must be null or point to a valid [`IntrospectionTable`] whose non-null entries
/// are the GL functions of the host's context. That context must be current on whichever
/// thread calls `gl_layer_callback` with `glLinkProgram`.
#[no_mangle]
pub unsafe extern "C" fn gl_layer_init(
    major: c_uint,
    minor: c_uint,
    table: *const IntrospectionTable,
) -> c_int {
    // Safety: precondition.
    let introspect = unsafe { table.as_ref() }.map(|&table| {
        // Safety: precondition.
        Box::new(unsafe { HostIntrospection::new(table) }) as Box<dyn Introspect>
    });
    let config = Config::new(Version::new(major, minor));
    match with_layer(|layer| layer.init(config, introspect).map(|_| ())) {
        Ok(()) => 0,
        Err(err) => {
            tracing::warn!("gl_layer_init: {err}");
            1
        }
    }
}

/// Stop validating and drop all state. Safe to call any number of times.
#[no_mangle]
pub extern "C" fn gl_layer_terminate() {
    let _ = with_layer(|layer| {
        layer.terminate();
        Ok(())
    });
}

/// Hand the layer one call the host just made. `func_ptr` is the entry point that was called
/// and is not used.
///
/// # Safety
/// * `name` must be a valid NUL-terminated string.
/// * `args` must point to `num_args` slots, filled as described on [`RawArg`]. It may be
///   null if `num_args` is zero.
/// * Pointer arguments must be valid for what the real GL function reads through them.
#[no_mangle]
pub unsafe extern "C" fn gl_layer_callback(
    name: *const c_char,
    _func_ptr: *const c_void,
    num_args: c_int,
    args: *const RawArg,
) {
    if name.is_null() {
        tracing::warn!("gl_layer_callback: null function name");
        return;
    }
    // Safety: precondition.
    let Ok(name) = unsafe { CStr::from_ptr(name) }.to_str() else {
        tracing::trace!("ignored non UTF-8 function name");
        return;
    };
    let Ok(declared) = usize::try_from(num_args) else {
        tracing::warn!(name, num_args, "gl_layer_callback: negative argument count");
        return;
    };
    let args = if declared == 0 {
        &[][..]
    } else if args.is_null() {
        tracing::warn!(name, num_args, "gl_layer_callback: null argument list");
        return;
    } else {
        // Safety: precondition.
        unsafe { std::slice::from_raw_parts(args, declared) }
    };
    // Safety: precondition.
    let mut args = unsafe { RawArgs::new(args) };
    // Already logged.
    let _ = with_layer(|layer| layer.hook(name, declared, &mut args));
}

/// Send diagnostics to `callback` from now on, or back to standard output if it is null.
///
/// # Safety
/// `callback`, if not null, must be safe to call with any NUL-terminated string and
/// `user_data` until it is replaced or the layer is terminated.
#[no_mangle]
pub unsafe extern "C" fn gl_layer_set_output_callback(
    callback: Option<OutputFun>,
    user_data: *mut c_void,
) {
    let _ = with_layer(|layer| match callback {
        // Safety: precondition.
        Some(fun) => layer.set_output(unsafe { Callback::new(fun, user_data) }),
        None => layer.set_output(Stdout),
    });
}
