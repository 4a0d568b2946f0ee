use super::{remove_cluster_in_config, settle, update_cluster_in_config};
use eleven_core::{CloudService, Cluster, Config, Result, Status, Stepper};

/// Create `cluster` with the provider.
///
/// The cluster is saved whatever the provider outcome, so partially created
/// infrastructure stays tracked. It is marked `Created` once both succeed.
pub async fn create_cluster(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    config: &mut Config,
    cluster: &mut Cluster,
) -> Result<()> {
    let created = cloud_service.create_cluster(stepper, config, cluster).await;
    let persisted = update_cluster_in_config(stepper, cloud_service, config, cluster).await;
    settle(created, persisted)?;

    cluster.status = Status::Created;
    update_cluster_in_config(stepper, cloud_service, config, cluster).await?;

    tracing::info!(cluster = %cluster.name, "Cluster created");
    Ok(())
}

/// Remove `cluster` from the provider, then from the config.
///
/// The cluster is saved as `Removing` before anything is destroyed and stays
/// in the config until the provider removal succeeded.
pub async fn remove_cluster(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    config: &mut Config,
    cluster: &mut Cluster,
) -> Result<()> {
    cluster.status = Status::Removing;
    update_cluster_in_config(stepper, cloud_service, config, cluster).await?;

    let removed = cloud_service.remove_cluster(stepper, config, cluster).await;
    let persisted = update_cluster_in_config(stepper, cloud_service, config, cluster).await;
    settle(removed, persisted)?;

    remove_cluster_in_config(stepper, cloud_service, config, &cluster.name).await?;

    tracing::info!(cluster = %cluster.name, "Cluster removed");
    Ok(())
}
