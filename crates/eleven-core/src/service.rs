//! Capabilities consumed by the orchestration layer
//!
//! Concrete providers (cloud backends, hooks, DNS checks) live outside the
//! core and implement these traits. Every provider call receives the full
//! context it needs and writes provider-assigned fields (identifiers, IP
//! addresses, infrastructure JSON) back into the entity passed as `&mut`.

use crate::error::Result;
use crate::model::{Cluster, Config, Env};
use crate::stepper::Stepper;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Cloud provider abstraction
#[async_trait]
pub trait CloudService: Send + Sync {
    /// Create the remote storage holding the Eleven config
    async fn create_config_storage(&self, stepper: &dyn Stepper) -> Result<()>;

    async fn remove_config_storage(&self, stepper: &dyn Stepper) -> Result<()>;

    /// Load the persisted config.
    ///
    /// Returns [`Error::NotInstalled`](crate::Error::NotInstalled) when the
    /// storage does not exist.
    async fn lookup_config(&self, stepper: &dyn Stepper) -> Result<Config>;

    /// Persist the whole config aggregate
    async fn save_config(&self, stepper: &dyn Stepper, config: &Config) -> Result<()>;

    async fn create_cluster(
        &self,
        stepper: &dyn Stepper,
        config: &Config,
        cluster: &mut Cluster,
    ) -> Result<()>;

    async fn remove_cluster(
        &self,
        stepper: &dyn Stepper,
        config: &Config,
        cluster: &mut Cluster,
    ) -> Result<()>;

    async fn check_instance_type_validity(
        &self,
        stepper: &dyn Stepper,
        instance_type: &str,
    ) -> Result<()>;

    async fn create_env(
        &self,
        stepper: &dyn Stepper,
        config: &Config,
        cluster: &Cluster,
        env: &mut Env,
    ) -> Result<()>;

    async fn remove_env(
        &self,
        stepper: &dyn Stepper,
        config: &Config,
        cluster: &Cluster,
        env: &mut Env,
    ) -> Result<()>;

    async fn open_port(
        &self,
        stepper: &dyn Stepper,
        config: &Config,
        cluster: &Cluster,
        env: &mut Env,
        port: &str,
    ) -> Result<()>;

    async fn close_port(
        &self,
        stepper: &dyn Stepper,
        config: &Config,
        cluster: &Cluster,
        env: &mut Env,
        port: &str,
    ) -> Result<()>;
}

/// Hook run during sandbox removal, after the provider resources are gone
/// and before the sandbox is dropped from the config
#[async_trait]
pub trait HookRunner: Send + Sync {
    async fn run(
        &self,
        cloud_service: &dyn CloudService,
        config: &Config,
        cluster: &Cluster,
        env: &Env,
    ) -> Result<()>;
}

/// Outcome of a domain reachability check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomainReachability {
    /// Whether the domain resolves to the sandbox public address
    pub reachable: bool,
    pub redirect_to_https: bool,
}

impl DomainReachability {
    pub fn reachable(redirect_to_https: bool) -> Self {
        Self {
            reachable: true,
            redirect_to_https,
        }
    }

    pub fn unreachable() -> Self {
        Self::default()
    }
}

#[async_trait]
pub trait DomainReachabilityChecker: Send + Sync {
    async fn check(&self, env: &Env, domain: &str) -> Result<DomainReachability>;
}
