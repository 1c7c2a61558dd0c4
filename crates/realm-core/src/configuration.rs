//! Legacy named configurations and their inheritance closures.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A descriptor configuration: a name and the configurations it extends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: String,
    #[serde(default, rename = "extends-from")]
    pub extends_from: Vec<String>,
}

impl Configuration {
    pub fn new(name: &str, extends_from: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            extends_from: extends_from.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Every configuration reachable from `name` through extends-from, `name` included.
///
/// Members are kept in discovery order: the configuration itself first, then
/// its ancestors depth-first in declaration order. Each name appears once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hierarchy {
    name: String,
    members: Vec<String>,
}

impl Hierarchy {
    /// Closure of a configuration that extends nothing.
    pub fn singleton(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: vec![name.to_string()],
        }
    }

    /// Build from an ordered member list whose first entry is `name`.
    pub fn from_members(name: &str, members: Vec<String>) -> Self {
        debug_assert_eq!(members.first().map(String::as_str), Some(name));
        Self {
            name: name.to_string(),
            members,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn to_set(&self) -> HashSet<String> {
        self.members.iter().cloned().collect()
    }
}

impl fmt::Display for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.members.join(", "))
    }
}
