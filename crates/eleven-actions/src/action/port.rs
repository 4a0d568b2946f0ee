use super::{settle, update_env_in_config};
use eleven_core::{CloudService, Config, Env, Result, Stepper};

pub async fn open_port(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    config: &mut Config,
    cluster_name: &str,
    env: &mut Env,
    port: &str,
) -> Result<()> {
    let opened = {
        let cluster = config.cluster(cluster_name)?;
        cloud_service.open_port(stepper, config, cluster, env, port).await
    };
    let persisted = update_env_in_config(stepper, cloud_service, config, cluster_name, env).await;
    settle(opened, persisted)?;

    tracing::debug!(env = %env.name, port, "Port opened");
    Ok(())
}

pub async fn close_port(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    config: &mut Config,
    cluster_name: &str,
    env: &mut Env,
    port: &str,
) -> Result<()> {
    let closed = {
        let cluster = config.cluster(cluster_name)?;
        cloud_service.close_port(stepper, config, cluster, env, port).await
    };
    let persisted = update_env_in_config(stepper, cloud_service, config, cluster_name, env).await;
    settle(closed, persisted)?;

    tracing::debug!(env = %env.name, port, "Port closed");
    Ok(())
}
