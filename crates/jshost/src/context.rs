use crate::error::{error_message, panic_message, pending_exception_message};
use crate::quickjs::{Context, Ctx, Object, Runtime};
use crate::Config;
use anyhow::Result;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// An isolated JavaScript context owned by the host.
///
/// The context is created and populated by a one-shot initializer during
/// [`Self::new()`]; afterwards [`Self::handle()`] exposes it to the engine's
/// own execution API. Failures are never raised from here. They are recorded
/// as a plain message that the host reads back with [`Self::err()`].
///
/// ## Examples
///
/// ```
/// # use jshost::ExecutionContext;
/// # use jshost::quickjs::Function;
/// let context = ExecutionContext::new(|scope| {
///     let add = Function::new(scope.ctx().clone(), |a: i32, b: i32| a + b)?;
///     scope.globals().set("add", add)
/// })
/// .unwrap();
///
/// let sum: i32 = context.handle().with(|cx| cx.eval("add(2, 3)")).unwrap();
/// assert_eq!(5, sum);
/// assert!(context.err().is_empty());
/// ```
pub struct ExecutionContext {
    id: u64,
    // Fields drop in declaration order: the context is released before the
    // runtime that backs it.
    context: Context,
    runtime: Runtime,
    last_error: String,
}

impl ExecutionContext {
    /// Creates a new [`ExecutionContext`] with the default [`Config`] and runs
    /// `initializer` against it.
    pub fn new<F>(initializer: F) -> Result<Self>
    where
        F: FnOnce(&mut InitScope<'_, '_>) -> crate::quickjs::Result<()>,
    {
        Self::with_config(Config::default(), initializer)
    }

    /// Creates a new [`ExecutionContext`] with the limits in `config` and runs
    /// `initializer` against it.
    ///
    /// Only a failure to allocate the engine runtime or context is returned
    /// as an error. A failing initializer leaves its message in
    /// [`Self::err()`] and the context is still returned.
    pub fn with_config<F>(config: Config, initializer: F) -> Result<Self>
    where
        F: FnOnce(&mut InitScope<'_, '_>) -> crate::quickjs::Result<()>,
    {
        let runtime = Runtime::new()?;
        config.apply(&runtime);
        let context = Context::full(&runtime)?;

        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(id, ?config, "execution context created");

        let mut last_error = String::new();
        context.with(|cx| {
            let mut scope = InitScope {
                cx: cx.clone(),
                last_error: &mut last_error,
            };
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| initializer(&mut scope)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => scope.set_err(error_message(&cx, e)),
                Err(payload) => scope.set_err(panic_message(payload.as_ref())),
            }
            // Discard an exception the initializer left pending.
            let _ = cx.catch();
        });

        if !last_error.is_empty() {
            tracing::warn!(id, error = %last_error, "initializer reported a failure");
        }

        Ok(Self {
            id,
            context,
            runtime,
            last_error,
        })
    }

    /// The identity of this context, unique within the process.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// A reference to the owned [`Context`].
    ///
    /// The same context is returned for the whole life of `self`, including
    /// when the initializer failed.
    pub fn handle(&self) -> &Context {
        &self.context
    }

    /// The most recently recorded failure, or an empty string.
    pub fn err(&self) -> &str {
        &self.last_error
    }

    /// Records `message` as the current failure, replacing any previous one.
    ///
    /// An empty message means "no error".
    pub fn set_err(&mut self, message: impl Into<String>) {
        self.last_error = message.into();
    }

    /// Resets the current failure to "no error".
    pub fn clear_err(&mut self) {
        self.last_error.clear();
    }

    /// Whether a failure message is currently recorded.
    pub fn has_err(&self) -> bool {
        !self.last_error.is_empty()
    }

    /// Enters the context and runs `f`.
    ///
    /// If `f` fails, the failure is rendered with
    /// [`error_message`](crate::error_message), stored as the current error
    /// and `None` is returned. A successful call leaves the stored error
    /// untouched.
    pub fn run<F, R>(&mut self, f: F) -> Option<R>
    where
        F: for<'js> FnOnce(Ctx<'js>) -> crate::quickjs::Result<R>,
    {
        let outcome = self
            .context
            .with(|cx| f(cx.clone()).map_err(|e| error_message(&cx, e)));

        match outcome {
            Ok(value) => Some(value),
            Err(message) => {
                tracing::debug!(id = self.id, error = %message, "script failure recorded");
                self.set_err(message);
                None
            }
        }
    }

    /// Resolves all pending jobs in the job queue.
    ///
    /// A job that throws stops the draining: its exception is stored as the
    /// current error and `false` is returned. Jobs still queued behind it are
    /// left for the next call.
    pub fn resolve_pending_jobs(&mut self) -> bool {
        while self.runtime.is_job_pending() {
            match self.runtime.execute_pending_job() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    let message = e.0.with(|cx| pending_exception_message(&cx));
                    tracing::debug!(id = self.id, error = %message, "pending job failed");
                    self.set_err(message);
                    return false;
                }
            }
        }
        true
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        tracing::debug!(id = self.id, "execution context released");
    }
}

/// The view of a new context handed to an initializer.
pub struct InitScope<'a, 'js> {
    cx: Ctx<'js>,
    last_error: &'a mut String,
}

impl<'js> InitScope<'_, 'js> {
    /// The new context, entered.
    pub fn ctx(&self) -> &Ctx<'js> {
        &self.cx
    }

    /// The global object of the new context.
    pub fn globals(&self) -> Object<'js> {
        self.cx.globals()
    }

    /// The failure recorded so far during initialization, or an empty string.
    pub fn err(&self) -> &str {
        self.last_error
    }

    /// Records `message` as the context's current failure.
    pub fn set_err(&mut self, message: impl Into<String>) {
        *self.last_error = message.into();
    }
}
