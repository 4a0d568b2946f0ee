//! Eleven Actions
//!
//! Sandbox lifecycle orchestration: the action layer pairs provider effects
//! with config saves so that any failure can be retried, and the feature
//! layer exposes one entry point per command on top of it.
//!
//! ```text
//! feature::serve ──▶ action::open_port ──▶ CloudService::open_port
//!                                      └─▶ CloudService::save_config
//! ```

pub mod action;
pub mod feature;
pub mod progress;

// Re-exports
pub use feature::{
    EditInput, EditOutput, InitInput, InitOutput, RemoveInput, RemoveOutput, ServeInput,
    ServeOutput, UninstallOutput, UnserveInput, UnserveOutput, edit, init, remove, serve,
    uninstall, unserve,
};
pub use progress::SpinnerStepper;
