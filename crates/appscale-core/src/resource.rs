//! Container app resource references (`{resource_group}/{name}`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies the container app whose scale template a wizard mutates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    pub resource_group: String,
    pub name: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("invalid resource reference {0:?}: expected <resource-group>/<name>")]
    InvalidFormat(String),
    #[error("invalid resource reference {0:?}: empty segment")]
    EmptySegment(String),
}

impl ResourceRef {
    pub fn new(resource_group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_group: resource_group.into(),
            name: name.into(),
        }
    }

    pub fn parse(reference: &str) -> Result<Self, ResourceError> {
        let reference = reference.trim();
        let (group, name) = reference
            .split_once('/')
            .ok_or_else(|| ResourceError::InvalidFormat(reference.to_string()))?;
        if name.contains('/') {
            return Err(ResourceError::InvalidFormat(reference.to_string()));
        }
        if group.is_empty() || name.is_empty() {
            return Err(ResourceError::EmptySegment(reference.to_string()));
        }
        Ok(Self::new(group, name))
    }

    /// Composite key used by the state store.
    pub fn key(&self) -> String {
        format!("{}/{}", self.resource_group, self.name)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_group, self.name)
    }
}

impl FromStr for ResourceRef {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group_and_name() {
        let r = ResourceRef::parse("prod-rg/orders-api").unwrap();
        assert_eq!(r.resource_group, "prod-rg");
        assert_eq!(r.name, "orders-api");
        assert_eq!(r.key(), "prod-rg/orders-api");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let r: ResourceRef = "  rg/app ".parse().unwrap();
        assert_eq!(r.to_string(), "rg/app");
    }

    #[test]
    fn test_parse_missing_separator() {
        assert!(matches!(
            ResourceRef::parse("orders-api"),
            Err(ResourceError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_extra_segment() {
        assert!(matches!(
            ResourceRef::parse("rg/app/extra"),
            Err(ResourceError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_empty_segment() {
        assert!(matches!(
            ResourceRef::parse("/app"),
            Err(ResourceError::EmptySegment(_))
        ));
    }
}
