use serde::Deserialize;

/// A configuration for [`ExecutionContext`](crate::ExecutionContext)
///
/// Every limit is optional; an unset limit keeps the QuickJS default.
///
/// ```
/// # use jshost::Config;
/// let mut config = Config::default();
/// config.memory_limit(16 * 1024 * 1024).max_stack_size(512 * 1024);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    memory_limit: Option<usize>,
    max_stack_size: Option<usize>,
    gc_threshold: Option<usize>,
}

impl Config {
    /// The maximum number of bytes the engine heap may allocate.
    pub fn memory_limit(&mut self, bytes: usize) -> &mut Self {
        self.memory_limit = Some(bytes);
        self
    }

    /// The maximum size of the engine's native stack, in bytes.
    pub fn max_stack_size(&mut self, bytes: usize) -> &mut Self {
        self.max_stack_size = Some(bytes);
        self
    }

    /// The number of allocated bytes after which the engine runs its garbage
    /// collector.
    pub fn gc_threshold(&mut self, bytes: usize) -> &mut Self {
        self.gc_threshold = Some(bytes);
        self
    }

    pub(crate) fn apply(&self, runtime: &rquickjs::Runtime) {
        if let Some(bytes) = self.memory_limit {
            runtime.set_memory_limit(bytes);
        }
        if let Some(bytes) = self.max_stack_size {
            runtime.set_max_stack_size(bytes);
        }
        if let Some(bytes) = self.gc_threshold {
            runtime.set_gc_threshold(bytes);
        }
    }
}
