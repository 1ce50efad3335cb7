//! Data type for constructing a service type

use std::fmt;
use std::str::FromStr;

use crate::{Result, error::Error};

/// Data type for the DNS-SD type of a broadcast service, e.g. `_http._tcp`.
#[derive(Default, Debug, Getters, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ServiceType {
    name: String,
    protocol: String,
}

impl ServiceType {
    /// Creates a new `ServiceType` with the specified name (e.g. `http`) and protocol (e.g. `tcp`)
    pub fn new(name: &str, protocol: &str) -> Result<Self> {
        Ok(Self {
            name: check_valid_characters(name)?.to_string(),
            protocol: check_valid_characters(protocol)?.to_string(),
        })
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_{}._{}", self.name, self.protocol)
    }
}

impl FromStr for ServiceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s.split('.').collect::<Vec<_>>();

        if parts.len() != 2 {
            return Err(Error::InvalidServiceType(format!(
                "expected `_name._protocol`, got `{s}`"
            )));
        }

        let name = lstrip_underscore(parts[0]);
        let protocol = lstrip_underscore(parts[1]);

        Self::new(name, protocol)
    }
}

fn check_valid_characters(part: &str) -> Result<&str> {
    if part.is_empty() {
        Err(Error::InvalidServiceType("cannot be empty".to_string()))
    } else if let Some(c) = part.chars().find(|c| *c == '.' || *c == ',' || c.is_whitespace()) {
        Err(Error::InvalidServiceType(format!("invalid character: {c}")))
    } else {
        Ok(part)
    }
}

fn lstrip_underscore(s: &str) -> &str {
    s.strip_prefix('_').unwrap_or(s)
}
