//! Benchmark setup error type.

use ustcon_core::{GraphError, HarnessError};

/// Errors that may occur while preparing benchmark inputs.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// The generated graph failed validation.
    #[error("graph construction failed: {0}")]
    Graph(#[from] GraphError),
    /// The trial harness rejected its configuration.
    #[error("harness setup failed: {0}")]
    Harness(#[from] HarnessError),
    /// The requested vertex count does not fit the `u32` labels.
    #[error("{vertices} vertices exceed the u32 label space")]
    TooLarge {
        /// Requested vertex count.
        vertices: usize,
    },
}
