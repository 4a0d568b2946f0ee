use async_trait::async_trait;
use eleven_core::{
    CloudService, Cluster, Config, DEFAULT_CLUSTER_NAME, DomainReachability,
    DomainReachabilityChecker, Env, Error, HookRunner, Result, Runtimes, Status, Stepper,
};
use eleven_queue::{InfrastructureQueue, step};
use serde_json::{Map, Value, json};
use std::sync::{Arc, Mutex};

pub const ENV_IP_ADDRESS: &str = "203.0.113.10";

/// Effects that should fail
#[derive(Debug, Default, Clone)]
pub struct Failures {
    pub create_cluster: bool,
    pub remove_cluster: bool,
    pub create_env: bool,
    pub remove_env: bool,
    pub open_port: bool,
    pub close_port: bool,
    pub instance_type: bool,
    /// Number of saves that succeed before every following save fails
    pub saves_before_failure: Option<usize>,
}

#[derive(Debug, Default)]
pub struct FakeState {
    /// Persisted config, `None` when Eleven is not installed
    pub config: Option<Config>,
    pub storage_created: bool,
    pub save_attempts: usize,
    /// Every successfully saved config, in order
    pub saved: Vec<Config>,
    /// Effects in call order, e.g. `create_env:api`
    pub calls: Vec<String>,
    /// Persisted status of the entity at the time its removal effect ran
    pub status_seen_by_removal: Option<Status>,
}

/// In-memory cloud provider recording every call
#[derive(Debug, Default)]
pub struct FakeCloudService {
    pub state: Mutex<FakeState>,
    pub failures: Mutex<Failures>,
}

#[allow(dead_code)]
impl FakeCloudService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider where `config` is already persisted
    pub fn installed(config: Config) -> Self {
        let cloud = Self::new();
        {
            let mut state = cloud.state.lock().unwrap();
            state.config = Some(config);
            state.storage_created = true;
        }
        cloud
    }

    pub fn fail(&self, configure: impl FnOnce(&mut Failures)) {
        configure(&mut self.failures.lock().unwrap());
    }

    pub fn persisted(&self) -> Option<Config> {
        self.state.lock().unwrap().config.clone()
    }

    pub fn persisted_env(&self, env_name: &str) -> Option<Env> {
        self.persisted()
            .and_then(|config| config.env(DEFAULT_CLUSTER_NAME, env_name).ok().cloned())
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn saved(&self) -> Vec<Config> {
        self.state.lock().unwrap().saved.clone()
    }

    pub fn status_seen_by_removal(&self) -> Option<Status> {
        self.state.lock().unwrap().status_seen_by_removal
    }

    fn failures(&self) -> Failures {
        self.failures.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl CloudService for FakeCloudService {
    async fn create_config_storage(&self, _stepper: &dyn Stepper) -> Result<()> {
        self.record("create_config_storage".to_string());
        self.state.lock().unwrap().storage_created = true;
        Ok(())
    }

    async fn remove_config_storage(&self, _stepper: &dyn Stepper) -> Result<()> {
        self.record("remove_config_storage".to_string());
        let mut state = self.state.lock().unwrap();
        state.storage_created = false;
        state.config = None;
        Ok(())
    }

    async fn lookup_config(&self, _stepper: &dyn Stepper) -> Result<Config> {
        self.state
            .lock()
            .unwrap()
            .config
            .clone()
            .ok_or(Error::NotInstalled)
    }

    async fn save_config(&self, _stepper: &dyn Stepper, config: &Config) -> Result<()> {
        let saves_before_failure = self.failures().saves_before_failure;
        let mut state = self.state.lock().unwrap();

        state.save_attempts += 1;
        if saves_before_failure.is_some_and(|allowed| state.save_attempts > allowed) {
            return Err(Error::persistence(anyhow::anyhow!("disk full")));
        }

        state.config = Some(config.clone());
        state.saved.push(config.clone());
        Ok(())
    }

    async fn create_cluster(
        &self,
        _stepper: &dyn Stepper,
        _config: &Config,
        cluster: &mut Cluster,
    ) -> Result<()> {
        self.record(format!("create_cluster:{}", cluster.name));

        cluster.set_infrastructure_json(&json!({ "vpc_id": "vpc-1" }))?;

        if self.failures().create_cluster {
            return Err(Error::cloud(anyhow::anyhow!("cluster quota exceeded")));
        }
        Ok(())
    }

    async fn remove_cluster(
        &self,
        _stepper: &dyn Stepper,
        _config: &Config,
        cluster: &mut Cluster,
    ) -> Result<()> {
        self.record(format!("remove_cluster:{}", cluster.name));

        {
            let mut state = self.state.lock().unwrap();
            state.status_seen_by_removal = state
                .config
                .as_ref()
                .and_then(|config| config.cluster(&cluster.name).ok())
                .map(|cluster| cluster.status);
        }

        if self.failures().remove_cluster {
            return Err(Error::cloud(anyhow::anyhow!("vpc still in use")));
        }

        cluster.infrastructure_json.clear();
        Ok(())
    }

    async fn check_instance_type_validity(
        &self,
        _stepper: &dyn Stepper,
        instance_type: &str,
    ) -> Result<()> {
        self.record(format!("check_instance_type_validity:{}", instance_type));

        if self.failures().instance_type {
            return Err(Error::cloud(anyhow::anyhow!(
                "unknown instance type {}",
                instance_type
            )));
        }
        Ok(())
    }

    async fn create_env(
        &self,
        _stepper: &dyn Stepper,
        _config: &Config,
        _cluster: &Cluster,
        env: &mut Env,
    ) -> Result<()> {
        self.record(format!("create_env:{}", env.name));

        let fail_instance = self.failures().create_env;
        let key_pair_name = env.ssh_key_pair_name();

        let mut queue = InfrastructureQueue::new();
        queue
            .add_steps([
                step(|infra: Arc<Mutex<Map<String, Value>>>| async move {
                    infra.lock().unwrap().insert("network_id".to_string(), json!("net-1"));
                    Ok(())
                }),
                step(move |infra: Arc<Mutex<Map<String, Value>>>| {
                    let key_pair_name = key_pair_name.clone();
                    async move {
                        infra.lock().unwrap().insert("key_pair_name".to_string(), json!(key_pair_name));
                        Ok(())
                    }
                }),
            ])
            .add_steps([step(move |infra: Arc<Mutex<Map<String, Value>>>| async move {
                if fail_instance {
                    return Err(Error::cloud(anyhow::anyhow!("instance capacity exhausted")));
                }
                infra.lock().unwrap().insert("instance_id".to_string(), json!("i-1"));
                Ok(())
            })]);

        let infrastructure = Arc::new(Mutex::new(Map::new()));
        let result = queue.run(Arc::clone(&infrastructure)).await;

        let infrastructure = Value::Object(infrastructure.lock().unwrap().clone());
        env.set_infrastructure_json(&infrastructure)?;

        result.map_err(|err| {
            err.into_step_error(|stage, message| {
                Error::cloud(anyhow::anyhow!("stage {} panicked: {}", stage, message))
            })
        })?;

        env.instance_public_ip_address = ENV_IP_ADDRESS.to_string();
        Ok(())
    }

    async fn remove_env(
        &self,
        _stepper: &dyn Stepper,
        _config: &Config,
        cluster: &Cluster,
        env: &mut Env,
    ) -> Result<()> {
        self.record(format!("remove_env:{}", env.name));

        {
            let mut state = self.state.lock().unwrap();
            state.status_seen_by_removal = state
                .config
                .as_ref()
                .and_then(|config| config.env(&cluster.name, &env.name).ok())
                .map(|env| env.status);
        }

        if self.failures().remove_env {
            return Err(Error::cloud(anyhow::anyhow!("instance termination failed")));
        }

        env.infrastructure_json.clear();
        env.instance_public_ip_address.clear();
        Ok(())
    }

    async fn open_port(
        &self,
        _stepper: &dyn Stepper,
        _config: &Config,
        _cluster: &Cluster,
        env: &mut Env,
        port: &str,
    ) -> Result<()> {
        self.record(format!("open_port:{}:{}", env.name, port));

        if self.failures().open_port {
            return Err(Error::cloud(anyhow::anyhow!("security group limit reached")));
        }

        env.set_additional_properties_json(&json!({ "last_opened_port": port }))?;
        Ok(())
    }

    async fn close_port(
        &self,
        _stepper: &dyn Stepper,
        _config: &Config,
        _cluster: &Cluster,
        env: &mut Env,
        port: &str,
    ) -> Result<()> {
        self.record(format!("close_port:{}:{}", env.name, port));

        if self.failures().close_port {
            return Err(Error::cloud(anyhow::anyhow!("rule not found")));
        }

        env.set_additional_properties_json(&json!({ "last_closed_port": port }))?;
        Ok(())
    }
}

/// Stepper keeping every reported message
#[derive(Debug, Default)]
pub struct RecordingStepper {
    pub events: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingStepper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl Stepper for RecordingStepper {
    fn start_step(&self, step: &str) {
        self.events.lock().unwrap().push(format!("step:{}", step));
    }

    fn start_temporary_step(&self, step: &str) {
        self.events.lock().unwrap().push(format!("temporary:{}", step));
    }

    fn stop_current_step(&self) {
        self.events.lock().unwrap().push("stop".to_string());
    }
}

/// Hook recording the sandboxes it ran for
#[derive(Debug, Default)]
pub struct RecordingHook {
    pub fail: bool,
    pub runs: Mutex<Vec<(String, Status)>>,
}

#[allow(dead_code)]
impl RecordingHook {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn runs(&self) -> Vec<(String, Status)> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl HookRunner for RecordingHook {
    async fn run(
        &self,
        _cloud_service: &dyn CloudService,
        _config: &Config,
        _cluster: &Cluster,
        env: &Env,
    ) -> Result<()> {
        self.runs.lock().unwrap().push((env.name.clone(), env.status));

        if self.fail {
            return Err(Error::hook(anyhow::anyhow!("ssh config cleanup failed")));
        }
        Ok(())
    }
}

/// Reachability checker answering the same thing for every domain
#[allow(dead_code)]
#[derive(Debug)]
pub struct ScriptedReachability {
    pub reachability: DomainReachability,
    pub checked: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedReachability {
    pub fn new(reachability: DomainReachability) -> Self {
        Self {
            reachability,
            checked: Mutex::new(Vec::new()),
        }
    }

    pub fn checked(&self) -> Vec<String> {
        self.checked.lock().unwrap().clone()
    }
}

#[async_trait]
impl DomainReachabilityChecker for ScriptedReachability {
    async fn check(&self, _env: &Env, domain: &str) -> Result<DomainReachability> {
        self.checked.lock().unwrap().push(domain.to_string());
        Ok(self.reachability)
    }
}

/// Config holding the default cluster in `Created` status
#[allow(dead_code)]
pub fn config_with_cluster() -> Config {
    let mut cluster = Cluster::new(DEFAULT_CLUSTER_NAME, "t2.medium", true);
    cluster.status = Status::Created;

    let mut config = Config::new();
    config.set_cluster(cluster);
    config
}

/// Config holding the default cluster and one sandbox with `status`
#[allow(dead_code)]
pub fn config_with_env(env_name: &str, status: Status) -> Config {
    let mut env = Env::new(env_name, 0, "t2.medium", Vec::new(), Runtimes::new());
    env.status = status;
    env.instance_public_ip_address = ENV_IP_ADDRESS.to_string();

    let mut config = config_with_cluster();
    config
        .set_env(DEFAULT_CLUSTER_NAME, env)
        .expect("default cluster exists");
    config
}
