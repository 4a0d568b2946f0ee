use crate::action::remove_cluster;
use eleven_core::{CloudService, DEFAULT_CLUSTER_NAME, Error, Result, Stepper};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UninstallOutput {
    pub already_uninstalled: bool,
}

/// Remove the default cluster and the config storage.
///
/// Refused while the cluster still contains sandboxes. Running it when
/// Eleven is not installed is not an error.
pub async fn uninstall(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
) -> Result<UninstallOutput> {
    stepper.start_temporary_step("Uninstalling Eleven");

    let mut config = match cloud_service.lookup_config(stepper).await {
        Ok(config) => config,
        Err(err) if err.is_not_installed() => {
            return Ok(UninstallOutput {
                already_uninstalled: true,
            });
        }
        Err(err) => return Err(err),
    };

    let cluster_name = DEFAULT_CLUSTER_NAME;

    // Storage may exist without a cluster when a previous install failed
    if let Some(mut cluster) = config.cluster(cluster_name).ok().cloned() {
        let env_count = config.count_envs_in_cluster(cluster_name)?;

        if env_count > 0 {
            return Err(Error::UninstallExistingEnvs {
                cluster_name: cluster_name.to_string(),
                env_count,
            });
        }

        remove_cluster(stepper, cloud_service, &mut config, &mut cluster).await?;
    }

    cloud_service.remove_config_storage(stepper).await?;

    tracing::info!("Eleven uninstalled");
    Ok(UninstallOutput {
        already_uninstalled: false,
    })
}
