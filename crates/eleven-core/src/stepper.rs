//! Progress reporting

use std::sync::Mutex;

/// Scoped progress-message sink.
///
/// Starting a step replaces the current one. Nothing reported here feeds back
/// into the orchestration.
pub trait Stepper: Send + Sync {
    /// Start a step that stays visible once finished
    fn start_step(&self, step: &str);

    /// Start a step that is cleared once finished
    fn start_temporary_step(&self, step: &str);

    fn stop_current_step(&self);
}

/// Stepper that discards every message
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStepper;

impl Stepper for NoopStepper {
    fn start_step(&self, _step: &str) {}

    fn start_temporary_step(&self, _step: &str) {}

    fn stop_current_step(&self) {}
}

/// Stepper reporting steps as `tracing` events
#[derive(Debug, Default)]
pub struct TracingStepper {
    current: Mutex<Option<String>>,
}

impl TracingStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step in progress, if any
    pub fn current_step(&self) -> Option<String> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn replace_current(&self, step: Option<String>) -> Option<String> {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *current, step)
    }
}

impl Stepper for TracingStepper {
    fn start_step(&self, step: &str) {
        self.replace_current(Some(step.to_string()));
        tracing::info!("{}", step);
    }

    fn start_temporary_step(&self, step: &str) {
        self.replace_current(Some(step.to_string()));
        tracing::debug!("{}", step);
    }

    fn stop_current_step(&self) {
        if let Some(step) = self.replace_current(None) {
            tracing::debug!(step = %step, "step finished");
        }
    }
}
