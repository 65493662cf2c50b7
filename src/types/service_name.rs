// ABOUTME: DNS-compatible name of the service or deployment being rolled back.
// ABOUTME: Accepts Docker service names and Kubernetes DNS subdomain names.

use serde::{Deserialize, Deserializer};
use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 253;

#[derive(Debug, Error)]
pub enum ServiceNameError {
    #[error("service name cannot be empty")]
    Empty,

    #[error("service name exceeds maximum length of {MAX_LEN} characters")]
    TooLong,

    #[error("service name must start and end with an alphanumeric character")]
    BadBoundary,

    #[error("service name must be lowercase")]
    NotLowercase,

    #[error("invalid character in service name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(value: &str) -> Result<Self, ServiceNameError> {
        if value.is_empty() {
            return Err(ServiceNameError::Empty);
        }

        if value.len() > MAX_LEN {
            return Err(ServiceNameError::TooLong);
        }

        let boundary_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
        if !boundary_ok(value.chars().next()) || !boundary_ok(value.chars().last()) {
            return Err(ServiceNameError::BadBoundary);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(ServiceNameError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' && c != '.' {
                return Err(ServiceNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for ServiceName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ServiceName::new(&s).map_err(serde::de::Error::custom)
    }
}
