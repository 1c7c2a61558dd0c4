use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use realm_util::errors::RealmError;

use crate::attributes::{AttributeValue, CATEGORY_ATTRIBUTE};
use crate::capability::Capability;
use crate::dependency::VersionConstraint;
use crate::identifier::ModuleIdentifier;

/// File name looked up next to a metadata document when no config is given.
pub const CONFIG_FILE_NAME: &str = "Realm.toml";

/// Realization settings loaded from `Realm.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealmConfig {
    #[serde(default)]
    pub platform: PlatformConfig,

    #[serde(default)]
    pub rules: RulesConfig,
}

/// Platform detection settings from `[platform]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default = "default_category_attribute", rename = "category-attribute")]
    pub category_attribute: String,
    #[serde(default = "default_forced_categories", rename = "forced-categories")]
    pub forced_categories: Vec<String>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            category_attribute: default_category_attribute(),
            forced_categories: default_forced_categories(),
        }
    }
}

fn default_category_attribute() -> String {
    CATEGORY_ATTRIBUTE.to_string()
}

fn default_forced_categories() -> Vec<String> {
    vec!["enforced-platform".to_string()]
}

/// Declarative metadata rules from `[rules]`, each list in application order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub attributes: Vec<AttributeRuleSpec>,
    #[serde(default)]
    pub capabilities: Vec<CapabilityRuleSpec>,
    #[serde(default)]
    pub dependencies: Vec<DependencyRuleSpec>,
}

impl RulesConfig {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.capabilities.is_empty() && self.dependencies.is_empty()
    }

    /// Check that every dependency rule key is a `group:module` pair.
    pub fn validate(&self) -> Result<(), RealmError> {
        for rule in &self.dependencies {
            for key in rule.remove.iter().chain(rule.versions.keys()) {
                if ModuleIdentifier::parse(key).is_none() {
                    return Err(RealmError::Config {
                        message: format!(
                            "Dependency rule '{}' refers to '{key}', expected 'group:module'",
                            rule.name
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Sets and removes attributes. Removals run after additions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeRuleSpec {
    pub name: String,
    /// Only apply to the variant with this name.
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub set: BTreeMap<String, AttributeValue>,
    #[serde(default)]
    pub remove: Vec<String>,
}

/// Adds and removes capabilities. Removals run after additions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityRuleSpec {
    pub name: String,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub add: Vec<Capability>,
    #[serde(default)]
    pub remove: Vec<Capability>,
}

/// Removes, re-versions and adds dependencies, in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyRuleSpec {
    pub name: String,
    #[serde(default)]
    pub variant: Option<String>,
    /// `group:module` keys to drop.
    #[serde(default)]
    pub remove: Vec<String>,
    /// `group:module` keys mapped to their replacement version constraint.
    #[serde(default)]
    pub versions: BTreeMap<String, VersionConstraint>,
    /// Recorded on re-versioned dependencies.
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub add: Vec<AddedDependency>,
}

/// A dependency or constraint appended by a rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddedDependency {
    pub group: String,
    pub module: String,
    #[serde(default)]
    pub version: VersionConstraint,
    #[serde(default)]
    pub constraint: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

impl RealmConfig {
    /// Load `Realm.toml` from `dir`, or return defaults if the file doesn't exist.
    pub fn discover(dir: &Path) -> miette::Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::from_path(&path)
        } else {
            tracing::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
            Ok(Self::default())
        }
    }

    /// Load and parse a config file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RealmError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Ok(Self::from_str(&content)?)
    }

    /// Parse a config from a string and validate its rule keys.
    pub fn from_str(content: &str) -> Result<Self, RealmError> {
        let config: Self = toml::from_str(content).map_err(|e| RealmError::Config {
            message: format!("Failed to parse {CONFIG_FILE_NAME}: {e}"),
        })?;
        config.rules.validate()?;
        Ok(config)
    }
}
