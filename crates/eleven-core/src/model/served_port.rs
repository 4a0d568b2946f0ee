//! Served ports and their bindings

use super::env::Env;
use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

pub const DOMAIN_MAX_LENGTH: usize = 253;

static DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9][a-z0-9-]{0,62})(\.[a-z0-9][a-z0-9-]{0,62})+$")
        .expect("domain pattern is a valid regex")
});

/// Logical port of a sandbox to the bindings exposing it
pub type ServedPorts = HashMap<String, Vec<ServedPortBinding>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServedPortBindingType {
    Port,
    Domain,
}

/// Concrete exposure of a served port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServedPortBinding {
    pub value: String,
    #[serde(rename = "type")]
    pub binding_type: ServedPortBindingType,
    pub redirect_to_https: bool,
}

impl ServedPortBinding {
    /// Build a binding, classifying `value` as a port when it parses as one
    pub fn new(value: impl Into<String>, redirect_to_https: bool) -> Self {
        let value = value.into();
        let binding_type = if is_port(&value) {
            ServedPortBindingType::Port
        } else {
            ServedPortBindingType::Domain
        };

        Self {
            value,
            binding_type,
            redirect_to_https,
        }
    }

    pub fn is_port(&self) -> bool {
        self.binding_type == ServedPortBindingType::Port
    }
}

/// Whether `value` is an integer in `[1, 65535]`
pub fn is_port(value: &str) -> bool {
    matches!(value.parse::<u16>(), Ok(port) if port != 0)
}

pub fn check_port_validity<S: AsRef<str>>(port: &str, reserved_ports: &[S]) -> Result<()> {
    if !is_port(port) {
        return Err(Error::InvalidPort {
            port: port.to_string(),
        });
    }

    if reserved_ports.iter().any(|reserved| reserved.as_ref() == port) {
        return Err(Error::ReservedPort {
            port: port.to_string(),
        });
    }

    Ok(())
}

pub fn check_domain_validity(domain: &str) -> Result<()> {
    if !DOMAIN_REGEX.is_match(domain) || domain.len() > DOMAIN_MAX_LENGTH {
        return Err(Error::InvalidDomain {
            domain: domain.to_string(),
        });
    }

    Ok(())
}

impl Env {
    pub fn does_served_port_exist(&self, port: &str) -> bool {
        self.served_ports.contains_key(port)
    }

    /// Append a binding to `port`.
    ///
    /// A value can only be bound once per sandbox: re-binding requires
    /// removing the previous binding first.
    pub fn add_served_port_binding(
        &mut self,
        port: &str,
        binding: &str,
        redirect_to_https: bool,
    ) -> Result<()> {
        if let Some(bound_port) = self.served_port_of_binding(binding) {
            return Err(Error::ServedPortBindingAlreadyExists {
                port: bound_port.to_string(),
                binding: binding.to_string(),
            });
        }

        self.served_ports
            .entry(port.to_string())
            .or_default()
            .push(ServedPortBinding::new(binding, redirect_to_https));

        Ok(())
    }

    pub fn does_served_port_binding_exist(&self, binding: &str) -> bool {
        self.served_port_of_binding(binding).is_some()
    }

    /// Served port currently exposed through `binding`, if any
    pub fn served_port_of_binding(&self, binding: &str) -> Option<&str> {
        self.served_ports
            .iter()
            .find(|(_, bindings)| bindings.iter().any(|b| b.value == binding))
            .map(|(port, _)| port.as_str())
    }

    /// Remove `binding` from `port`, leaving an empty list when it was the last one
    pub fn remove_served_port_binding(&mut self, port: &str, binding: &str) {
        if let Some(bindings) = self.served_ports.get_mut(port) {
            bindings.retain(|b| b.value != binding);
        }
    }

    pub fn remove_served_port(&mut self, port: &str) {
        self.served_ports.remove(port);
    }
}
