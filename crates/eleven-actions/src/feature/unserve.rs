use super::{ensure_env_created, lookup_env};
use crate::action::{close_port, update_env_in_config};
use eleven_core::{
    CloudService, Cluster, DEFAULT_CLUSTER_NAME, Env, EnvOperation, Result, Stepper,
    check_port_validity,
};

#[derive(Debug, Clone)]
pub struct UnserveInput {
    pub env_name: String,
    pub reserved_ports: Vec<String>,
    pub port: String,
}

#[derive(Debug, Clone)]
pub struct UnserveOutput {
    pub cluster: Cluster,
    pub env: Env,
    pub port: String,
    /// True when the port was not served in the first place
    pub already_unserved: bool,
}

/// Stop serving a port: close every port binding, then forget the port
pub async fn unserve(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    input: UnserveInput,
) -> Result<UnserveOutput> {
    let UnserveInput {
        env_name,
        reserved_ports,
        port,
    } = input;

    stepper.start_temporary_step(&format!("Unserving port \"{}\"", port));

    check_port_validity(&port, &reserved_ports)?;

    let (mut config, mut env) = lookup_env(stepper, cloud_service, &env_name).await?;
    ensure_env_created(&env, EnvOperation::Unserve)?;

    let cluster_name = DEFAULT_CLUSTER_NAME;
    let bindings = env.served_ports.get(&port).cloned();
    let already_unserved = bindings.is_none();

    if let Some(bindings) = bindings {
        for binding in bindings.iter().filter(|binding| binding.is_port()) {
            close_port(
                stepper,
                cloud_service,
                &mut config,
                cluster_name,
                &mut env,
                &binding.value,
            )
            .await?;

            env.remove_served_port_binding(&port, &binding.value);
            update_env_in_config(stepper, cloud_service, &mut config, cluster_name, &env).await?;
        }

        env.remove_served_port(&port);
        update_env_in_config(stepper, cloud_service, &mut config, cluster_name, &env).await?;

        tracing::info!(env = %env.name, port = %port, "Port unserved");
    }

    let cluster = config.cluster(cluster_name)?.clone();

    Ok(UnserveOutput {
        cluster,
        env,
        port,
        already_unserved,
    })
}
