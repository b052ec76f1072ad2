//! Owned JavaScript execution contexts for host applications.
//!
//! An [`ExecutionContext`] owns one QuickJS context for its whole lifetime.
//! The host populates the context's global object from a one-shot initializer
//! at construction, then drives scripts through the engine API re-exported as
//! [`quickjs`]. Failures cross back to the host as a plain message read with
//! [`ExecutionContext::err()`] rather than as engine exceptions.
//!
//! Example usage:
//! ```rust
//! use anyhow::Result;
//! use jshost::{quickjs::Function, Config, ExecutionContext};
//!
//! fn main() -> Result<()> {
//!     let mut config = Config::default();
//!     config.memory_limit(8 * 1024 * 1024);
//!
//!     let mut context = ExecutionContext::with_config(config, |scope| {
//!         let greet = Function::new(scope.ctx().clone(), |name: String| {
//!             format!("hello, {name}")
//!         })?;
//!         scope.globals().set("greet", greet)
//!     })?;
//!     assert!(context.err().is_empty());
//!
//!     let greeting = context.run(|cx| cx.eval::<String, _>("greet('host')"));
//!     assert_eq!(Some("hello, host".to_string()), greeting);
//!
//!     let missing = context.run(|cx| cx.eval::<String, _>("farewell()"));
//!     assert!(missing.is_none());
//!     assert!(context.err().contains("farewell"));
//!     Ok(())
//! }
//! ```
//!
//! ## Threading
//!
//! The engine types are neither `Send` nor `Sync`, so an [`ExecutionContext`]
//! stays on the thread that created it. Hosts that want parallelism build one
//! context per thread.

pub use config::Config;
pub use context::{ExecutionContext, InitScope};
pub use error::error_message;
pub use rquickjs as quickjs;

mod config;
mod context;
mod error;
