//! Action layer
//!
//! Each action pairs one provider effect with the config saves that make it
//! resumable. The effect error is held back until the resulting state has
//! been saved: a failed save is reported in preference to the effect error,
//! since it means local state no longer matches the provider.

mod cluster;
mod env;
mod install;
mod port;

pub use cluster::{create_cluster, remove_cluster};
pub use env::{create_env, remove_env};
pub use install::install;
pub use port::{close_port, open_port};

use eleven_core::{CloudService, Cluster, Config, Env, Result, Stepper};

/// Store `cluster` in the config and save it
pub async fn update_cluster_in_config(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    config: &mut Config,
    cluster: &Cluster,
) -> Result<()> {
    config.set_cluster(cluster.clone());
    cloud_service.save_config(stepper, config).await
}

/// Drop `cluster_name` from the config and save it
pub async fn remove_cluster_in_config(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    config: &mut Config,
    cluster_name: &str,
) -> Result<()> {
    config.remove_cluster(cluster_name)?;
    cloud_service.save_config(stepper, config).await
}

/// Store `env` in its cluster and save the config
pub async fn update_env_in_config(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    config: &mut Config,
    cluster_name: &str,
    env: &Env,
) -> Result<()> {
    config.set_env(cluster_name, env.clone())?;
    cloud_service.save_config(stepper, config).await
}

/// Drop `env_name` from its cluster and save the config
pub async fn remove_env_in_config(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    config: &mut Config,
    cluster_name: &str,
    env_name: &str,
) -> Result<()> {
    config.remove_env(cluster_name, env_name)?;
    cloud_service.save_config(stepper, config).await
}

/// Combine the outcome of an effect with the save that followed it
fn settle(effect: Result<()>, persisted: Result<()>) -> Result<()> {
    match (effect, persisted) {
        (Err(effect_err), Err(persist_err)) => {
            tracing::warn!(
                error = %effect_err,
                "Provider error superseded by a config persistence failure"
            );
            Err(persist_err)
        }
        (_, Err(persist_err)) => Err(persist_err),
        (Err(effect_err), Ok(())) => {
            tracing::warn!(error = %effect_err, "Provider effect failed, partial state saved");
            Err(effect_err)
        }
        (Ok(()), Ok(())) => Ok(()),
    }
}
