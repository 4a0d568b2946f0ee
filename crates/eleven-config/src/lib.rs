//! Eleven Config
//!
//! Local settings, the file-backed config store and logging setup.

pub mod error;
pub mod logging;
pub mod settings;
pub mod store;

// Re-exports
pub use error::{ConfigError, Result};
pub use logging::init_tracing;
pub use settings::Settings;
pub use store::ConfigStore;
