use super::lookup_env;
use crate::action::remove_env;
use eleven_core::{CloudService, Cluster, DEFAULT_CLUSTER_NAME, Env, HookRunner, Result, Stepper};

/// Asks the user whether the sandbox should really be removed
pub type ConfirmRemove<'a> = Box<dyn FnOnce(&Env) -> Result<bool> + Send + 'a>;

pub struct RemoveInput<'a> {
    pub env_name: String,
    /// Run once the provider resources are gone, before the sandbox leaves the config
    pub pre_remove_hook: Option<&'a dyn HookRunner>,
    /// Skip the confirmation
    pub force: bool,
    pub confirm: Option<ConfirmRemove<'a>>,
}

#[derive(Debug, Clone)]
pub struct RemoveOutput {
    pub cluster: Cluster,
    pub env: Env,
    /// False when the user declined the confirmation
    pub removed: bool,
}

/// Remove a sandbox, whatever its status.
///
/// A sandbox stuck in `Creating` or `Removing` can be removed to retry a
/// failed run.
pub async fn remove(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    input: RemoveInput<'_>,
) -> Result<RemoveOutput> {
    let step = format!("Removing the sandbox \"{}\"", input.env_name);
    stepper.start_temporary_step(&step);

    let (mut config, mut env) = lookup_env(stepper, cloud_service, &input.env_name).await?;
    let cluster_name = DEFAULT_CLUSTER_NAME;

    if !input.force {
        if let Some(confirm) = input.confirm {
            stepper.stop_current_step();

            if !confirm(&env)? {
                tracing::debug!(env = %env.name, "Removal declined");
                let cluster = config.cluster(cluster_name)?.clone();
                return Ok(RemoveOutput {
                    cluster,
                    env,
                    removed: false,
                });
            }

            stepper.start_temporary_step(&step);
        }
    }

    remove_env(
        stepper,
        cloud_service,
        &mut config,
        cluster_name,
        &mut env,
        input.pre_remove_hook,
    )
    .await?;

    let cluster = config.cluster(cluster_name)?.clone();

    Ok(RemoveOutput {
        cluster,
        env,
        removed: true,
    })
}
