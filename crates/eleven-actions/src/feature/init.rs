use crate::action::{create_cluster, create_env, install};
use eleven_core::{
    CloudService, Cluster, Config, DEFAULT_CLUSTER_NAME, Env, EnvOperation, EnvRepository, Error,
    Result, Runtimes, Status, Stepper, check_env_name_validity, check_repositories_uniqueness,
    parse_runtimes,
};

#[derive(Debug, Clone)]
pub struct InitInput {
    pub env_name: String,
    pub instance_type: String,
    /// Number of SSH config hosts already using the sandbox hostname
    pub local_ssh_config_dup_host_count: usize,
    pub repositories: Vec<EnvRepository>,
    /// `name` or `name@version` tokens
    pub runtimes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct InitOutput {
    pub config: Config,
    pub cluster: Cluster,
    pub env: Env,
    /// False when the sandbox already existed and was left untouched
    pub env_created: bool,
    pub runtimes: Runtimes,
}

/// Create a sandbox, installing Eleven and the default cluster on first use.
///
/// A cluster or sandbox left in `Creating` by a previous failed run is
/// resumed rather than created twice.
pub async fn init(
    stepper: &dyn Stepper,
    cloud_service: &dyn CloudService,
    input: InitInput,
) -> Result<InitOutput> {
    let InitInput {
        env_name,
        instance_type,
        local_ssh_config_dup_host_count,
        repositories,
        runtimes,
    } = input;

    let step = format!("Initializing the sandbox \"{}\"", env_name);
    stepper.start_temporary_step(&step);

    check_env_name_validity(&env_name)?;
    let runtimes = parse_runtimes(&runtimes)?;
    check_repositories_uniqueness(&repositories)?;

    cloud_service
        .check_instance_type_validity(stepper, &instance_type)
        .await?;

    let mut config = match cloud_service.lookup_config(stepper).await {
        Ok(config) => config,
        Err(err) if err.is_not_installed() => {
            stepper.start_temporary_step("Installing Eleven");

            let config = Config::new();
            install(stepper, cloud_service, &config).await?;
            config
        }
        Err(err) => return Err(err),
    };

    let cluster_name = DEFAULT_CLUSTER_NAME;
    let existing_cluster = config.cluster(cluster_name).ok().cloned();

    if existing_cluster
        .as_ref()
        .is_none_or(|cluster| cluster.status == Status::Creating)
    {
        stepper.start_temporary_step("Creating default cluster");

        let mut cluster = existing_cluster
            .unwrap_or_else(|| Cluster::new(cluster_name, instance_type.as_str(), true));
        create_cluster(stepper, cloud_service, &mut config, &mut cluster).await?;
    }

    let existing_env = config.env(cluster_name, &env_name).ok().cloned();

    let (env, env_created) = match existing_env {
        Some(env) if env.status == Status::Removing => {
            return Err(Error::IllegalEnvState {
                env_name: env.name,
                operation: EnvOperation::Init,
                status: env.status,
            });
        }
        Some(env) if env.status == Status::Created => (env, false),
        existing => {
            let mut env = match existing {
                Some(mut env) => {
                    if env.instance_type != instance_type {
                        return Err(Error::UpdateInstanceTypeCreatingEnv { env_name });
                    }

                    env.repositories = repositories;
                    env.runtimes = runtimes.clone();
                    env
                }
                None => Env::new(
                    env_name.as_str(),
                    local_ssh_config_dup_host_count,
                    instance_type.as_str(),
                    repositories,
                    runtimes.clone(),
                ),
            };

            create_env(stepper, cloud_service, &mut config, cluster_name, &mut env).await?;
            (env, true)
        }
    };

    stepper.start_temporary_step(&step);

    let cluster = config.cluster(cluster_name)?.clone();

    Ok(InitOutput {
        config,
        cluster,
        env,
        env_created,
        runtimes,
    })
}
