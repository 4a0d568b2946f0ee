//! Eleven Infrastructure Queue
//!
//! Staged parallel executor used by cloud providers to apply infrastructure
//! changes in an ordered manner: stages run one after the other, the steps
//! of a stage run concurrently against a shared context.
//!
//! ```no_run
//! use eleven_queue::{InfrastructureQueue, step};
//! use std::sync::{Arc, Mutex};
//!
//! # async fn example() -> Result<(), eleven_queue::QueueError<String>> {
//! let mut queue = InfrastructureQueue::new();
//! queue
//!     .add_steps([
//!         step(|infra: Arc<Mutex<Vec<String>>>| async move {
//!             infra.lock().unwrap().push("network".to_string());
//!             Ok::<(), String>(())
//!         }),
//!         step(|infra: Arc<Mutex<Vec<String>>>| async move {
//!             infra.lock().unwrap().push("key pair".to_string());
//!             Ok(())
//!         }),
//!     ])
//!     .add_steps([step(|infra: Arc<Mutex<Vec<String>>>| async move {
//!         infra.lock().unwrap().push("instance".to_string());
//!         Ok(())
//!     })]);
//!
//! queue.run(Arc::new(Mutex::new(Vec::new()))).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod queue;

// Re-exports
pub use error::QueueError;
pub use queue::{InfrastructureQueue, InfrastructureQueueStep, step};
