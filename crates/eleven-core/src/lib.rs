//! Eleven Core
//!
//! Entity model, validation rules and provider capabilities shared by every
//! Eleven crate.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              eleven-actions                  │
//! │      (features → actions → persistence)      │
//! └──────────────┬───────────────┬──────────────┘
//!                │               │
//! ┌──────────────▼─────┐ ┌───────▼──────────────┐
//! │    eleven-core     │ │    eleven-queue      │
//! │  model / service   │ │  staged executor     │
//! └────────────────────┘ └──────────────────────┘
//! ```
//!
//! The configuration root ([`Config`]) owns clusters, which own sandboxes
//! ([`Env`]). Cloud effects are reached through [`CloudService`].

pub mod error;
pub mod model;
pub mod service;
pub mod stepper;

// Re-exports
pub use error::{BoxError, EnvOperation, Error, Result};
pub use model::*;
pub use service::{CloudService, DomainReachability, DomainReachabilityChecker, HookRunner};
pub use stepper::{NoopStepper, Stepper, TracingStepper};
