//! The layer's lifecycle, and the hook the host's loader forwards every call to.

use crate::{
    decode::{self, ArgSource, DecodeError},
    introspect::Introspect,
    output::Sink,
    Config, Context,
};

#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    #[error("layer is already initialized")]
    AlreadyInitialized,
    #[error("layer is not initialized")]
    NotInitialized,
    #[error("{function} takes {expected} arguments, hook declared {declared}")]
    ArgumentCount {
        function: &'static str,
        declared: usize,
        expected: usize,
    },
    #[error("could not decode arguments of {function}")]
    Decode {
        function: &'static str,
        #[source]
        source: DecodeError,
    },
    #[error("layer entered again while already handling a call")]
    Reentrant,
    #[error("layer panicked while handling a call")]
    Panicked,
}

/// Holds a [`Context`] between [`Layer::init`] and [`Layer::terminate`].
#[derive(Debug, Default)]
pub struct Layer {
    context: Option<Context>,
}

impl Layer {
    /// An uninitialized layer. Every call is rejected until [`Self::init`].
    #[must_use]
    pub const fn new() -> Self {
        Self { context: None }
    }
    /// Start tracking with empty state.
    ///
    /// # Errors
    /// [`LayerError::AlreadyInitialized`] if called twice without a `terminate` in between. The
    /// existing state is kept.
    pub fn init(
        &mut self,
        config: Config,
        introspect: Option<Box<dyn Introspect>>,
    ) -> Result<&mut Context, LayerError> {
        if self.context.is_some() {
            return Err(LayerError::AlreadyInitialized);
        }
        tracing::debug!(
            version = %config.version,
            checks = ?config.checks,
            introspect = introspect.is_some(),
            "layer init"
        );
        Ok(self.context.insert(Context::new(config, introspect)))
    }
    /// Drop all tracked state. Does nothing if not initialized.
    pub fn terminate(&mut self) {
        if self.context.take().is_some() {
            tracing::debug!("layer terminate");
        }
    }
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.context.is_some()
    }
    #[must_use]
    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }
    pub fn context_mut(&mut self) -> Option<&mut Context> {
        self.context.as_mut()
    }
    fn initialized(&mut self) -> Result<&mut Context, LayerError> {
        self.context.as_mut().ok_or_else(|| {
            tracing::warn!("layer used while not initialized");
            LayerError::NotInitialized
        })
    }

    /// Send diagnostics to `sink` from now on.
    ///
    /// # Errors
    /// [`LayerError::NotInitialized`]
    pub fn set_output(&mut self, sink: impl Sink + 'static) -> Result<(), LayerError> {
        self.initialized()?.set_output(sink);
        Ok(())
    }

    /// Handle one call the host made. `declared_args` is the number of arguments the host says
    /// `args` holds.
    ///
    /// Functions the layer doesn't track are ignored. Tracked ones are decoded and validated,
    /// with any problems reported through the sink.
    ///
    /// # Errors
    /// * [`LayerError::NotInitialized`]
    /// * [`LayerError::ArgumentCount`] or [`LayerError::Decode`] if the arguments don't fit the
    ///   function's signature. The call is not validated.
    pub fn hook(
        &mut self,
        name: &str,
        declared_args: usize,
        args: &mut dyn ArgSource,
    ) -> Result<(), LayerError> {
        let context = self.initialized()?;
        let Some(entry) = decode::lookup(name) else {
            tracing::trace!(name, "ignored");
            return Ok(());
        };
        if declared_args != entry.params.len() {
            let err = LayerError::ArgumentCount {
                function: entry.name,
                declared: declared_args,
                expected: entry.params.len(),
            };
            tracing::warn!("{err}");
            return Err(err);
        }
        let call = entry.decode(args).map_err(|source| {
            tracing::warn!(function = entry.name, %source, "decode failed");
            LayerError::Decode {
                function: entry.name,
                source,
            }
        })?;
        context.dispatch(call);
        Ok(())
    }
}
