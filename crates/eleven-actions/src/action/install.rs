use eleven_core::{CloudService, Config, Result, Stepper};

/// Create the config storage and save a first config in it
pub async fn install(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    config: &Config,
) -> Result<()> {
    cloud_service.create_config_storage(stepper).await?;
    cloud_service.save_config(stepper, config).await?;

    tracing::info!(config_id = %config.id, "Eleven installed");
    Ok(())
}
