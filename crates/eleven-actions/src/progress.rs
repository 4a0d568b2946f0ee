use eleven_core::Stepper;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

struct CurrentStep {
    progress_bar: ProgressBar,
    temporary: bool,
}

impl CurrentStep {
    fn finish(self) {
        if self.temporary {
            self.progress_bar.finish_and_clear();
        } else {
            self.progress_bar.finish();
        }
    }
}

/// Stepper rendering each step as a terminal spinner
pub struct SpinnerStepper {
    draw_hidden: bool,
    current: Mutex<Option<CurrentStep>>,
}

impl Default for SpinnerStepper {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinnerStepper {
    pub fn new() -> Self {
        Self {
            draw_hidden: false,
            current: Mutex::new(None),
        }
    }

    /// Stepper that tracks steps without drawing anything
    pub fn hidden() -> Self {
        Self {
            draw_hidden: true,
            current: Mutex::new(None),
        }
    }

    /// Message of the step in progress, if any
    pub fn current_message(&self) -> Option<String> {
        self.lock()
            .as_ref()
            .map(|current| current.progress_bar.message())
    }

    fn lock(&self) -> MutexGuard<'_, Option<CurrentStep>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn start(&self, step: &str, temporary: bool) {
        let progress_bar = ProgressBar::new_spinner();
        if self.draw_hidden {
            progress_bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        progress_bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress_bar.set_message(step.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(100));

        let previous = self.lock().replace(CurrentStep {
            progress_bar,
            temporary,
        });

        if let Some(previous) = previous {
            previous.finish();
        }
    }
}

impl Stepper for SpinnerStepper {
    fn start_step(&self, step: &str) {
        self.start(step, false);
    }

    fn start_temporary_step(&self, step: &str) {
        self.start(step, true);
    }

    fn stop_current_step(&self) {
        let current = self.lock().take();

        if let Some(current) = current {
            current.finish();
        }
    }
}

impl Drop for SpinnerStepper {
    fn drop(&mut self) {
        self.stop_current_step();
    }
}
