use serde::{Deserialize, Serialize};

/// Lifecycle status of a cluster or a sandbox
///
/// Entities are created as `Creating`, switch to `Created` once the provider
/// effect and a persistence round-trip both succeed, and switch to `Removing`
/// before any destructive effect runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Creating,
    Created,
    Removing,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Creating => write!(f, "creating"),
            Status::Created => write!(f, "created"),
            Status::Removing => write!(f, "removing"),
        }
    }
}
