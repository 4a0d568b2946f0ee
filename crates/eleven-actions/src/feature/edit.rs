use super::{ensure_env_created, lookup_env};
use eleven_core::{CloudService, Cluster, DEFAULT_CLUSTER_NAME, Env, EnvOperation, Result, Stepper};

#[derive(Debug, Clone)]
pub struct EditInput {
    pub env_name: String,
}

#[derive(Debug, Clone)]
pub struct EditOutput {
    pub cluster: Cluster,
    pub env: Env,
}

/// Resolve a sandbox that is ready to be edited
pub async fn edit(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    input: EditInput,
) -> Result<EditOutput> {
    stepper.start_temporary_step(&format!("Editing the sandbox \"{}\"", input.env_name));

    let (config, env) = lookup_env(stepper, cloud_service, &input.env_name).await?;
    ensure_env_created(&env, EnvOperation::Edit)?;

    let cluster = config.cluster(DEFAULT_CLUSTER_NAME)?.clone();

    Ok(EditOutput { cluster, env })
}
