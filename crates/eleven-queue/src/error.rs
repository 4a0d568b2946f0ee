//! Executor error types

use thiserror::Error;

/// Error surfaced by a queue run
///
/// Only one error is reported per run, even when several steps of the
/// failing stage returned an error.
#[derive(Error, Debug)]
pub enum QueueError<E> {
    #[error("{0}")]
    Step(E),

    #[error("Step panicked in stage {stage}: {message}")]
    Panicked { stage: usize, message: String },
}

impl<E> QueueError<E> {
    /// Collapse into the step error type, converting a panic with `on_panic`
    pub fn into_step_error(self, on_panic: impl FnOnce(usize, String) -> E) -> E {
        match self {
            QueueError::Step(err) => err,
            QueueError::Panicked { stage, message } => on_panic(stage, message),
        }
    }
}

pub type Result<T, E> = std::result::Result<T, QueueError<E>>;
