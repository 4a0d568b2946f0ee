use super::{remove_env_in_config, settle, update_env_in_config};
use eleven_core::{CloudService, Config, Env, HookRunner, Result, Status, Stepper};

/// Create `env` in the cluster named `cluster_name`.
///
/// Same contract as [`create_cluster`](super::create_cluster): saved
/// whatever the provider outcome, marked `Created` once both succeed.
pub async fn create_env(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    config: &mut Config,
    cluster_name: &str,
    env: &mut Env,
) -> Result<()> {
    let created = {
        let cluster = config.cluster(cluster_name)?;
        cloud_service.create_env(stepper, config, cluster, env).await
    };
    let persisted = update_env_in_config(stepper, cloud_service, config, cluster_name, env).await;
    settle(created, persisted)?;

    env.status = Status::Created;
    update_env_in_config(stepper, cloud_service, config, cluster_name, env).await?;

    tracing::info!(cluster = %cluster_name, env = %env.name, "Sandbox created");
    Ok(())
}

/// Remove `env` from the provider, run the optional hook, then drop it
/// from the config.
///
/// A failing hook leaves the sandbox in the config, still `Removing`.
pub async fn remove_env(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    config: &mut Config,
    cluster_name: &str,
    env: &mut Env,
    pre_remove_hook: Option<&dyn HookRunner>,
) -> Result<()> {
    env.status = Status::Removing;
    update_env_in_config(stepper, cloud_service, config, cluster_name, env).await?;

    let removed = {
        let cluster = config.cluster(cluster_name)?;
        cloud_service.remove_env(stepper, config, cluster, env).await
    };
    let persisted = update_env_in_config(stepper, cloud_service, config, cluster_name, env).await;
    settle(removed, persisted)?;

    if let Some(hook) = pre_remove_hook {
        let cluster = config.cluster(cluster_name)?;
        hook.run(cloud_service, config, cluster, env).await?;
    }

    remove_env_in_config(stepper, cloud_service, config, cluster_name, &env.name).await?;

    tracing::info!(cluster = %cluster_name, env = %env.name, "Sandbox removed");
    Ok(())
}
