use super::{ensure_env_created, lookup_env};
use crate::action::{open_port, update_env_in_config};
use eleven_core::{
    CloudService, Cluster, DEFAULT_CLUSTER_NAME, DomainReachabilityChecker, Env, EnvOperation,
    Error, Result, Stepper, check_domain_validity, check_port_validity, is_port,
};

pub struct ServeInput<'a> {
    pub env_name: String,
    pub reserved_ports: Vec<String>,
    pub port: String,
    /// Domain exposing the port. The port is served as itself when absent.
    pub binding: Option<String>,
    pub domain_reachability_checker: &'a dyn DomainReachabilityChecker,
}

#[derive(Debug, Clone)]
pub struct ServeOutput {
    pub cluster: Cluster,
    pub env: Env,
    pub port: String,
    pub binding: String,
}

/// Expose a sandbox port, either as itself or through a domain.
///
/// A binding already used by the same port is replaced, which refreshes its
/// HTTPS redirection. A binding used by another port is refused before any
/// provider effect runs.
pub async fn serve(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    input: ServeInput<'_>,
) -> Result<ServeOutput> {
    let ServeInput {
        env_name,
        reserved_ports,
        port,
        binding,
        domain_reachability_checker,
    } = input;

    let step = match &binding {
        Some(binding) => format!("Serving port \"{}\" as \"{}\"", port, binding),
        None => format!("Serving port \"{}\"", port),
    };
    stepper.start_temporary_step(&step);

    check_port_validity(&port, &reserved_ports)?;

    // Explicit bindings are domains
    if let Some(binding) = &binding {
        check_domain_validity(binding)?;
    }

    let (mut config, mut env) = lookup_env(stepper, cloud_service, &env_name).await?;
    ensure_env_created(&env, EnvOperation::Serve)?;

    let cluster_name = DEFAULT_CLUSTER_NAME;
    let binding = binding.unwrap_or_else(|| port.clone());

    if let Some(bound_port) = env.served_port_of_binding(&binding) {
        if bound_port != port {
            return Err(Error::ServedPortBindingAlreadyExists {
                port: bound_port.to_string(),
                binding,
            });
        }
    }

    let binding_already_used = env.does_served_port_binding_exist(&binding);

    if !binding_already_used && is_port(&binding) {
        open_port(
            stepper,
            cloud_service,
            &mut config,
            cluster_name,
            &mut env,
            &binding,
        )
        .await?;
    }

    let mut redirect_to_https = false;

    if !is_port(&binding) {
        stepper.start_temporary_step(&format!(
            "Checking that \"{}\" resolves to your sandbox's public IP address",
            binding
        ));

        let reachability = domain_reachability_checker.check(&env, &binding).await?;

        if !reachability.reachable {
            return Err(Error::UnresolvableDomain {
                domain: binding,
                env_ip_address: env.instance_public_ip_address,
            });
        }

        redirect_to_https = reachability.redirect_to_https;
    }

    if binding_already_used {
        env.remove_served_port_binding(&port, &binding);
    }

    env.add_served_port_binding(&port, &binding, redirect_to_https)?;
    update_env_in_config(stepper, cloud_service, &mut config, cluster_name, &env).await?;

    tracing::info!(env = %env.name, port = %port, binding = %binding, "Port served");

    let cluster = config.cluster(cluster_name)?.clone();

    Ok(ServeOutput {
        cluster,
        env,
        port,
        binding,
    })
}
