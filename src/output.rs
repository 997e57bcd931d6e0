//! Where diagnostics go.
use std::ffi::{c_char, c_void, CString};

/// Receives each diagnostic, fully formatted, exactly once and in the order the
/// offending calls were intercepted.
///
/// Sinks are `Send` so the layer behind the C entry points can be shared by the whole process.
pub trait Sink: Send {
    fn emit(&mut self, message: &str);
}

/// Any `FnMut(&str) + Send` is a sink.
impl<F: FnMut(&str) + Send> Sink for F {
    fn emit(&mut self, message: &str) {
        self(message);
    }
}

/// The default sink. Writes each message on its own line to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdout;
impl Sink for Stdout {
    fn emit(&mut self, message: &str) {
        println!("{message}");
    }
}

/// `void (*)(const char *text, void *user_data)`
pub type OutputFun = unsafe extern "C" fn(text: *const c_char, user_data: *mut c_void);

/// A C callback and the opaque pointer to hand back with every message.
///
/// The text buffer is NUL-terminated and only lives for the duration of the call.
#[derive(Debug)]
pub struct Callback {
    fun: OutputFun,
    user_data: *mut c_void,
}
impl Callback {
    /// # Safety
    /// `fun` must be safe to call with any NUL-terminated string and `user_data`, from any
    /// thread the host calls into the layer from, for as long as this sink is installed.
    #[must_use]
    pub unsafe fn new(fun: OutputFun, user_data: *mut c_void) -> Self {
        Self { fun, user_data }
    }
}
// Safety: `user_data` is only ever handed back to `fun`, never dereferenced here. The host
// serializes every call into the layer, so `fun` never runs on two threads at once.
unsafe impl Send for Callback {}
impl Sink for Callback {
    fn emit(&mut self, message: &str) {
        // Messages are built from formatted integers and static text, they never contain NUL.
        // Drop any anyway rather than lose the whole message.
        let text = CString::new(message).unwrap_or_else(|err| {
            let mut bytes = err.into_vec();
            bytes.retain(|&byte| byte != 0);
            CString::new(bytes).unwrap_or_default()
        });
        // Safety: precondition of `new`.
        unsafe { (self.fun)(text.as_ptr(), self.user_data) }
    }
}
