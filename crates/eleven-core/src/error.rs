//! Error taxonomy shared by every Eleven crate

use crate::model::Status;
use thiserror::Error;

/// Opaque error coming from outside the core (cloud provider, storage, hooks)
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Operation that was refused because of the current sandbox status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvOperation {
    Init,
    Edit,
    Serve,
    Unserve,
}

impl std::fmt::Display for EnvOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvOperation::Init => write!(f, "initialize"),
            EnvOperation::Edit => write!(f, "edit"),
            EnvOperation::Serve => write!(f, "serve a port of"),
            EnvOperation::Unserve => write!(f, "unserve a port of"),
        }
    }
}

/// Eleven errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Eleven is not installed")]
    NotInstalled,

    #[error("Cluster not found: {cluster_name}")]
    ClusterNotFound { cluster_name: String },

    #[error("Sandbox not found: {env_name} (cluster: {cluster_name})")]
    EnvNotFound {
        cluster_name: String,
        env_name: String,
    },

    #[error(
        "Invalid sandbox name \"{env_name}\": must match {pattern} and be at most {max_length} characters"
    )]
    InvalidEnvName {
        env_name: String,
        pattern: String,
        max_length: usize,
    },

    #[error("Cannot {operation} the sandbox \"{env_name}\" while it is {status}")]
    IllegalEnvState {
        env_name: String,
        operation: EnvOperation,
        status: Status,
    },

    #[error("Cannot change the instance type of the sandbox \"{env_name}\" while it is creating")]
    UpdateInstanceTypeCreatingEnv { env_name: String },

    #[error("Cannot uninstall: cluster \"{cluster_name}\" still contains {env_count} sandbox(es)")]
    UninstallExistingEnvs {
        cluster_name: String,
        env_count: usize,
    },

    #[error("Invalid port: {port}")]
    InvalidPort { port: String },

    #[error("Reserved port: {port}")]
    ReservedPort { port: String },

    #[error("Invalid domain: {domain}")]
    InvalidDomain { domain: String },

    #[error("Binding \"{binding}\" is already used by the served port {port}")]
    ServedPortBindingAlreadyExists { port: String, binding: String },

    #[error("Domain \"{domain}\" does not resolve to the sandbox address {env_ip_address}")]
    UnresolvableDomain {
        domain: String,
        env_ip_address: String,
    },

    #[error("Unsupported runtime: {runtime}")]
    InvalidRuntime { runtime: String },

    #[error("Runtime passed more than once: {runtime}")]
    DuplicatedRuntime { runtime: String },

    #[error(
        "Invalid version \"{version}\" for runtime \"{runtime}\" (valid examples: {})",
        .examples.join(", ")
    )]
    InvalidRuntimeVersion {
        runtime: String,
        version: String,
        examples: Vec<String>,
    },

    #[error("Invalid SSH host key \"{line}\": {reason}")]
    InvalidSshHostKey { line: String, reason: String },

    #[error("Invalid repository name: {name}")]
    InvalidRepositoryName { name: String },

    #[error("Repository passed more than once: {owner}/{name}")]
    DuplicatedRepository { owner: String, name: String },

    #[error("Cloud provider error: {0}")]
    Cloud(#[source] BoxError),

    #[error("Failed to persist the Eleven config: {0}")]
    Persistence(#[source] BoxError),

    #[error("Pre-remove hook failed: {0}")]
    Hook(#[source] BoxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn cloud(err: impl Into<BoxError>) -> Self {
        Self::Cloud(err.into())
    }

    pub fn persistence(err: impl Into<BoxError>) -> Self {
        Self::Persistence(err.into())
    }

    pub fn hook(err: impl Into<BoxError>) -> Self {
        Self::Hook(err.into())
    }

    /// Whether the error means that a cluster or a sandbox does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ClusterNotFound { .. } | Error::EnvNotFound { .. }
        )
    }

    pub fn is_not_installed(&self) -> bool {
        matches!(self, Error::NotInstalled)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_version_message_lists_examples() {
        let err = Error::InvalidRuntimeVersion {
            runtime: "php".to_string(),
            version: "8.1.3".to_string(),
            examples: vec!["latest".to_string(), "8.0".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "Invalid version \"8.1.3\" for runtime \"php\" (valid examples: latest, 8.0)"
        );
    }

    #[test]
    fn test_opaque_errors_keep_their_source() {
        let err = Error::cloud("quota exceeded");

        assert_eq!(err.to_string(), "Cloud provider error: quota exceeded");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_classification() {
        let not_found = Error::EnvNotFound {
            cluster_name: "default".to_string(),
            env_name: "api".to_string(),
        };

        assert!(not_found.is_not_found());
        assert!(!not_found.is_not_installed());
        assert!(Error::NotInstalled.is_not_installed());
        assert!(!Error::persistence("disk full").is_not_found());
    }
}
