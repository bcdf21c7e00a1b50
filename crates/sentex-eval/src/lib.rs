//! Sandboxed evaluator for sentex syntax trees.
//!
//! [`evaluate`] walks a tree produced by `sentex_syntax::parse` against a
//! read-only [`Gettable`] context, calling only functions found in a
//! [`FunctionRegistry`] snapshot.

mod binary_ops;
pub mod error;
mod executor;
pub mod gettable;
pub mod registry;
pub mod value;

pub use error::{Diagnostic, ErrorCategory, Span, host_failure};
pub use executor::{Evaluator, evaluate};
pub use gettable::{Gettable, PropertyKey};
pub use registry::{FunctionRegistry, HostFunction};
pub use value::Value;

/// Test utilities for enabling logging in tests.
#[cfg(test)]
pub(crate) mod test_utils {
    /// Routes `tracing` output through the test harness. Safe to call from
    /// every test; only the first call installs the subscriber.
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
