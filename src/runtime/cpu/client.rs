//! CPU client

/// CPU client for operation dispatch
///
/// Stateless: every matrix function is available on it through
/// [`MatrixFunctionsAlgorithms`](crate::algorithm::linalg::MatrixFunctionsAlgorithms).
#[derive(Clone, Debug, Default)]
pub struct CpuClient {
    _private: (),
}

impl CpuClient {
    /// Create a new CPU client
    pub fn new() -> Self {
        Self::default()
    }
}
