//! Sandbox (env) definition

use super::naming::build_slug;
use super::repository::EnvRepository;
use super::runtime::Runtimes;
use super::served_port::ServedPorts;
use super::ssh::SshHostKey;
use super::status::Status;
use crate::error::{Error, Result};
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const ENV_NAME_PATTERN: &str = r"^[a-z0-9]+(-[a-z0-9]+)*$";
pub const ENV_NAME_MAX_LENGTH: usize = 16;

const LOCAL_SSH_CONFIG_HOSTNAME_PREFIX: &str = "eleven/";

static ENV_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ENV_NAME_PATTERN).expect("env name pattern is a valid regex"));

/// A provisioned remote development environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Env {
    pub id: String,
    pub name: String,
    pub local_ssh_config_hostname: String,
    pub infrastructure_json: String,
    pub instance_type: String,
    pub instance_public_ip_address: String,
    pub ssh_host_keys: Vec<SshHostKey>,
    pub ssh_key_pair_pem_content: String,
    pub repositories: Vec<EnvRepository>,
    pub runtimes: Runtimes,
    pub served_ports: ServedPorts,
    pub status: Status,
    pub additional_properties_json: String,
    pub created_at_timestamp: i64,
}

impl Env {
    /// Create a sandbox in the `Creating` status.
    ///
    /// `local_ssh_config_dup_host_count` is the number of hosts already using
    /// the same SSH config hostname; the caller owns collision detection.
    pub fn new(
        name: impl Into<String>,
        local_ssh_config_dup_host_count: usize,
        instance_type: impl Into<String>,
        repositories: Vec<EnvRepository>,
        runtimes: Runtimes,
    ) -> Self {
        let name = name.into();
        let local_ssh_config_hostname =
            local_ssh_config_hostname(&name, local_ssh_config_dup_host_count);

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            local_ssh_config_hostname,
            infrastructure_json: String::new(),
            instance_type: instance_type.into(),
            instance_public_ip_address: String::new(),
            ssh_host_keys: Vec::new(),
            ssh_key_pair_pem_content: String::new(),
            repositories,
            runtimes,
            served_ports: ServedPorts::new(),
            status: Status::Creating,
            additional_properties_json: String::new(),
            created_at_timestamp: Utc::now().timestamp(),
        }
    }

    pub fn name_slug(&self) -> String {
        build_slug(&self.name)
    }

    /// Name of the provider-side SSH key pair, derived from the SSH hostname
    pub fn ssh_key_pair_name(&self) -> String {
        build_slug(&self.local_ssh_config_hostname)
    }

    pub fn set_infrastructure_json<T: Serialize + ?Sized>(&mut self, infrastructure: &T) -> Result<()> {
        self.infrastructure_json = serde_json::to_string(infrastructure)?;
        Ok(())
    }

    pub fn set_additional_properties_json<T: Serialize + ?Sized>(
        &mut self,
        additional_properties: &T,
    ) -> Result<()> {
        self.additional_properties_json = serde_json::to_string(additional_properties)?;
        Ok(())
    }
}

/// SSH config hostname a sandbox gets when no other host uses it
pub fn initial_local_ssh_config_hostname(env_name: &str) -> String {
    format!("{}{}", LOCAL_SSH_CONFIG_HOSTNAME_PREFIX, build_slug(env_name))
}

fn local_ssh_config_hostname(env_name: &str, duplicate_hostnames_count: usize) -> String {
    let hostname = initial_local_ssh_config_hostname(env_name);

    if duplicate_hostnames_count == 0 {
        return hostname;
    }

    format!("{}-{}", hostname, duplicate_hostnames_count)
}

pub fn check_env_name_validity(env_name: &str) -> Result<()> {
    if !ENV_NAME_REGEX.is_match(env_name) || env_name.len() > ENV_NAME_MAX_LENGTH {
        return Err(Error::InvalidEnvName {
            env_name: env_name.to_string(),
            pattern: ENV_NAME_PATTERN.to_string(),
            max_length: ENV_NAME_MAX_LENGTH,
        });
    }

    Ok(())
}
