//! Cluster definition

use super::env::Env;
use super::naming::build_slug;
use super::status::Status;
use crate::error::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of the only cluster the orchestration layer creates for now
pub const DEFAULT_CLUSTER_NAME: &str = "default";

/// Named group of sandboxes sharing default infrastructure settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    pub default_instance_type: String,
    /// Provider-specific infrastructure, stored as an opaque JSON document
    pub infrastructure_json: String,
    pub envs: HashMap<String, Env>,
    pub is_default: bool,
    pub status: Status,
    pub created_at_timestamp: i64,
}

impl Cluster {
    pub fn new(
        name: impl Into<String>,
        default_instance_type: impl Into<String>,
        is_default: bool,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            default_instance_type: default_instance_type.into(),
            infrastructure_json: String::new(),
            envs: HashMap::new(),
            is_default,
            status: Status::Creating,
            created_at_timestamp: Utc::now().timestamp(),
        }
    }

    pub fn name_slug(&self) -> String {
        build_slug(&self.name)
    }

    /// Serialize and store the provider infrastructure
    pub fn set_infrastructure_json<T: Serialize + ?Sized>(&mut self, infrastructure: &T) -> Result<()> {
        self.infrastructure_json = serde_json::to_string(infrastructure)?;
        Ok(())
    }
}
