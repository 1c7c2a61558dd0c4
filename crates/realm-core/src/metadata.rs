//! Component metadata documents: one component, its variants and its
//! legacy configurations, as a TOML file.
//!
//! ```toml
//! [component]
//! group = "org.example"
//! module = "lib"
//! version = "1.0"
//!
//! [[variants]]
//! name = "runtimeElements"
//! attributes = { "org.gradle.usage" = "java-runtime" }
//!
//! [[variants.dependencies]]
//! group = "org.slf4j"
//! module = "slf4j-api"
//! version = "2.0.9"
//!
//! [configurations.runtime]
//! extends-from = ["compile"]
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use realm_util::errors::RealmError;

use crate::configuration::Configuration;
use crate::identifier::ComponentIdentifier;
use crate::variant::ComponentVariant;

/// A parsed component metadata document.
#[derive(Debug, Clone)]
pub struct ComponentMetadata {
    pub component: ComponentIdentifier,
    /// Variants in declaration order.
    pub variants: Vec<ComponentVariant>,
    /// Configuration definitions keyed by name.
    pub configurations: BTreeMap<String, Configuration>,
}

#[derive(Deserialize)]
struct RawDocument {
    component: ComponentIdentifier,
    #[serde(default)]
    variants: Vec<ComponentVariant>,
    #[serde(default)]
    configurations: BTreeMap<String, RawConfiguration>,
}

#[derive(Deserialize)]
struct RawConfiguration {
    #[serde(default, rename = "extends-from")]
    extends_from: Vec<String>,
}

impl ComponentMetadata {
    /// Load and parse a metadata document from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RealmError::Metadata {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Ok(Self::from_str(&content)?)
    }

    /// Parse a metadata document from a string.
    pub fn from_str(content: &str) -> Result<Self, RealmError> {
        let raw: RawDocument = toml::from_str(content).map_err(|e| RealmError::Metadata {
            message: format!("Failed to parse metadata document: {e}"),
        })?;

        let mut seen = HashSet::new();
        for variant in &raw.variants {
            if variant.name.is_empty() {
                return Err(RealmError::Metadata {
                    message: format!("Component {} declares a variant without a name", raw.component),
                });
            }
            if !seen.insert(variant.name.as_str()) {
                return Err(RealmError::Metadata {
                    message: format!(
                        "Component {} declares variant '{}' more than once",
                        raw.component, variant.name
                    ),
                });
            }
        }

        let configurations = raw
            .configurations
            .into_iter()
            .map(|(name, c)| {
                let configuration = Configuration {
                    name: name.clone(),
                    extends_from: c.extends_from,
                };
                (name, configuration)
            })
            .collect();

        tracing::debug!(
            "Loaded metadata for {} ({} variants)",
            raw.component,
            raw.variants.len()
        );

        Ok(Self {
            component: raw.component,
            variants: raw.variants,
            configurations,
        })
    }

    pub fn variant(&self, name: &str) -> Option<&ComponentVariant> {
        self.variants.iter().find(|v| v.name == name)
    }
}
