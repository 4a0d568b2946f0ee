//! Entity model
//!
//! The configuration root owns clusters, which own sandboxes (envs).
//! Each entity lives in its own module together with its validation rules.

mod cluster;
mod config;
mod env;
mod naming;
mod repository;
mod runtime;
mod served_port;
mod ssh;
mod status;

// Re-exports
pub use cluster::*;
pub use config::*;
pub use env::*;
pub use naming::*;
pub use repository::*;
pub use runtime::*;
pub use served_port::*;
pub use ssh::*;
pub use status::*;
