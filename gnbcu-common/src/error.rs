//! Error types for the gNB CU-CP

use thiserror::Error;

/// Error types for the CU-CP library.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dispatch onto a task executor failed after the retry budget was spent.
    #[error("Dispatch to executor '{executor}' failed after {attempts} attempts")]
    DispatchExhausted {
        /// Name of the destination executor.
        executor: String,
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    /// The destination executor has stopped accepting work.
    #[error("Executor '{0}' is stopped")]
    ExecutorStopped(String),

    /// Lifecycle state machine errors.
    #[error("State machine error: {0}")]
    StateMachine(String),

    /// YAML parsing errors.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// File I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
