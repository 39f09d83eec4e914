//! The narrow seam between the harness and whatever actually issues
//! requests. Adapters produce the tool's raw console output; the reducer
//! scrapes timings out of it without knowing which adapter ran.

mod ab;
#[cfg(feature = "http")]
mod http;

pub use ab::AbExecutor;
#[cfg(feature = "http")]
pub use http::HttpExecutor;

use std::future::Future;

/// Raw result of one request-execution unit.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Whatever the tool printed, untouched.
    pub raw: String,
    /// Whether the unit terminated successfully (tool exit status or
    /// transport-level success).
    pub ok: bool,
}

/// Issues one unit's worth of requests against a fully-formed target.
pub trait RequestExecutor: Clone + Send + Sync + 'static {
    fn execute(&self, target: String) -> impl Future<Output = ExecOutput> + Send;
}
