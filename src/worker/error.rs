//! Worker lifecycle errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Worker '{0}' is still running; call stop() before join()")]
    NotStopped(String),

    #[error("Worker thread panicked: {0}")]
    Panicked(String),
}
