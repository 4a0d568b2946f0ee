//! Infrastructure queue
//!
//! A queue is an ordered list of stages, each stage being a set of steps
//! that run at the same time against a shared infrastructure context.
//!
//! `[[a1, a2, a3], [b1, b2]]` runs `a1`, `a2` and `a3` concurrently and
//! only starts `b1` and `b2` once all three are done.

use crate::error::{QueueError, Result};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};

/// Single step of a stage
///
/// Steps receive the shared context and coordinate their own access to its
/// mutable parts.
pub type InfrastructureQueueStep<T, E> =
    Arc<dyn Fn(Arc<T>) -> BoxFuture<'static, std::result::Result<(), E>> + Send + Sync>;

/// Wrap an async closure into a queue step
pub fn step<T, E, F, Fut>(f: F) -> InfrastructureQueueStep<T, E>
where
    F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
{
    Arc::new(move |infrastructure| f(infrastructure).boxed())
}

/// Ordered stages of concurrent steps
pub struct InfrastructureQueue<T, E> {
    stages: Vec<Vec<InfrastructureQueueStep<T, E>>>,
}

impl<T, E> Default for InfrastructureQueue<T, E> {
    fn default() -> Self {
        Self { stages: Vec::new() }
    }
}

impl<T, E> std::fmt::Debug for InfrastructureQueue<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage_sizes: Vec<usize> = self.stages.iter().map(Vec::len).collect();
        f.debug_struct("InfrastructureQueue")
            .field("stages", &stage_sizes)
            .finish()
    }
}

impl<T, E> InfrastructureQueue<T, E>
where
    T: Send + Sync + 'static,
    E: Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage. Steps of the same stage run concurrently.
    pub fn add_steps(&mut self, steps: impl IntoIterator<Item = InfrastructureQueueStep<T, E>>) -> &mut Self {
        self.stages.push(steps.into_iter().collect());
        self
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.iter().all(Vec::is_empty)
    }

    /// Run every stage in order.
    ///
    /// All steps of a stage are awaited before their results are looked at,
    /// so a failing step never leaves its siblings half done. The first
    /// collected error stops the run before the next stage starts.
    pub async fn run(&self, infrastructure: Arc<T>) -> Result<(), E> {
        for (index, steps) in self.stages.iter().enumerate() {
            if steps.is_empty() {
                continue;
            }

            tracing::debug!(stage = index, steps = steps.len(), "Running infrastructure stage");

            let mut join_set = JoinSet::new();
            for step in steps {
                join_set.spawn(step(Arc::clone(&infrastructure)));
            }

            let mut stage_error = None;
            while let Some(joined) = join_set.join_next().await {
                let err = match joined {
                    Ok(Ok(())) => continue,
                    Ok(Err(err)) => QueueError::Step(err),
                    Err(join_error) => QueueError::Panicked {
                        stage: index,
                        message: panic_message(join_error),
                    },
                };

                if stage_error.is_none() {
                    stage_error = Some(err);
                }
            }

            if let Some(err) = stage_error {
                tracing::debug!(stage = index, "Infrastructure stage failed");
                return Err(err);
            }
        }

        Ok(())
    }
}

fn panic_message(join_error: JoinError) -> String {
    if !join_error.is_panic() {
        return join_error.to_string();
    }

    let payload = join_error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
