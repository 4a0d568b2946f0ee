//! Eleven configuration root

use super::cluster::Cluster;
use super::env::Env;
use crate::error::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root aggregate persisted as a whole on every mutating action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub id: String,
    pub clusters: HashMap<String, Cluster>,
    pub created_at_timestamp: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            clusters: HashMap::new(),
            created_at_timestamp: Utc::now().timestamp(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a cluster, keyed by its name
    pub fn set_cluster(&mut self, cluster: Cluster) {
        self.clusters.insert(cluster.name.clone(), cluster);
    }

    pub fn cluster_exists(&self, cluster_name: &str) -> bool {
        self.clusters.contains_key(cluster_name)
    }

    pub fn cluster(&self, cluster_name: &str) -> Result<&Cluster> {
        self.clusters
            .get(cluster_name)
            .ok_or_else(|| cluster_not_found(cluster_name))
    }

    pub fn cluster_mut(&mut self, cluster_name: &str) -> Result<&mut Cluster> {
        self.clusters
            .get_mut(cluster_name)
            .ok_or_else(|| cluster_not_found(cluster_name))
    }

    pub fn remove_cluster(&mut self, cluster_name: &str) -> Result<Cluster> {
        self.clusters
            .remove(cluster_name)
            .ok_or_else(|| cluster_not_found(cluster_name))
    }

    /// Insert or replace a sandbox of an existing cluster
    pub fn set_env(&mut self, cluster_name: &str, env: Env) -> Result<()> {
        let cluster = self.cluster_mut(cluster_name)?;
        cluster.envs.insert(env.name.clone(), env);
        Ok(())
    }

    pub fn env_exists(&self, cluster_name: &str, env_name: &str) -> bool {
        self.clusters
            .get(cluster_name)
            .is_some_and(|cluster| cluster.envs.contains_key(env_name))
    }

    pub fn env(&self, cluster_name: &str, env_name: &str) -> Result<&Env> {
        self.clusters
            .get(cluster_name)
            .and_then(|cluster| cluster.envs.get(env_name))
            .ok_or_else(|| env_not_found(cluster_name, env_name))
    }

    pub fn remove_env(&mut self, cluster_name: &str, env_name: &str) -> Result<Env> {
        self.clusters
            .get_mut(cluster_name)
            .and_then(|cluster| cluster.envs.remove(env_name))
            .ok_or_else(|| env_not_found(cluster_name, env_name))
    }

    pub fn count_envs_in_cluster(&self, cluster_name: &str) -> Result<usize> {
        Ok(self.cluster(cluster_name)?.envs.len())
    }
}

fn cluster_not_found(cluster_name: &str) -> Error {
    Error::ClusterNotFound {
        cluster_name: cluster_name.to_string(),
    }
}

fn env_not_found(cluster_name: &str, env_name: &str) -> Error {
    Error::EnvNotFound {
        cluster_name: cluster_name.to_string(),
        env_name: env_name.to_string(),
    }
}
