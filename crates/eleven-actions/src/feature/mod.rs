//! Feature layer
//!
//! One module per command. Features validate their input before any provider
//! effect runs, resolve the sandbox in the default cluster, check that its
//! status allows the operation and delegate the effects to the action layer.

mod edit;
mod init;
mod remove;
mod serve;
mod uninstall;
mod unserve;

pub use edit::{EditInput, EditOutput, edit};
pub use init::{InitInput, InitOutput, init};
pub use remove::{ConfirmRemove, RemoveInput, RemoveOutput, remove};
pub use serve::{ServeInput, ServeOutput, serve};
pub use uninstall::{UninstallOutput, uninstall};
pub use unserve::{UnserveInput, UnserveOutput, unserve};

use eleven_core::{
    CloudService, Config, DEFAULT_CLUSTER_NAME, Env, EnvOperation, Error, Result, Status, Stepper,
};

/// Load the config and a detached copy of `env_name` from the default cluster
async fn lookup_env(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    env_name: &str,
) -> Result<(Config, Env)> {
    let config = cloud_service.lookup_config(stepper).await?;
    let cluster = config.cluster(DEFAULT_CLUSTER_NAME)?;
    let env = config.env(&cluster.name, env_name)?.clone();

    Ok((config, env))
}

/// Only fully created sandboxes can be edited or have ports served
fn ensure_env_created(env: &Env, operation: EnvOperation) -> Result<()> {
    match env.status {
        Status::Created => Ok(()),
        status => Err(Error::IllegalEnvState {
            env_name: env.name.clone(),
            operation,
            status,
        }),
    }
}
