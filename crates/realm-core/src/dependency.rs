//! Dependency declarations as authored by a metadata source, and the
//! realized form handed to the graph resolver.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeSet;
use crate::identifier::ModuleIdentifier;

/// Rich version constraint: required, preferred, strict and rejected versions.
///
/// Accepts either a plain string (`"1.0"`, meaning `requires = "1.0"`) or a
/// detailed table in metadata documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "VersionSpec")]
pub struct VersionConstraint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strictly: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl VersionConstraint {
    /// A constraint that only requires `version`.
    pub fn requires(version: &str) -> Self {
        Self {
            requires: Some(version.to_string()),
            ..Self::default()
        }
    }

    /// A constraint that strictly pins `version`.
    pub fn strictly(version: &str) -> Self {
        Self {
            requires: Some(version.to_string()),
            strictly: Some(version.to_string()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.requires.is_none()
            && self.prefers.is_none()
            && self.strictly.is_none()
            && self.rejects.is_empty()
            && self.branch.is_none()
    }

    fn is_plain_requirement(&self) -> bool {
        self.requires.is_some()
            && self.prefers.is_none()
            && self.strictly.is_none()
            && self.rejects.is_empty()
            && self.branch.is_none()
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_plain_requirement() {
            if let Some(ref requires) = self.requires {
                return write!(f, "{requires}");
            }
        }
        let mut parts = Vec::new();
        if let Some(ref v) = self.strictly {
            parts.push(format!("strictly {v}"));
        } else if let Some(ref v) = self.requires {
            parts.push(format!("require {v}"));
        }
        if let Some(ref v) = self.prefers {
            parts.push(format!("prefer {v}"));
        }
        if !self.rejects.is_empty() {
            parts.push(format!("reject {}", self.rejects.join(" & ")));
        }
        if let Some(ref v) = self.branch {
            parts.push(format!("branch {v}"));
        }
        write!(f, "{{{}}}", parts.join("; "))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VersionSpec {
    Short(String),
    Detailed(DetailedVersion),
}

#[derive(Deserialize)]
struct DetailedVersion {
    #[serde(default)]
    requires: Option<String>,
    #[serde(default)]
    prefers: Option<String>,
    #[serde(default)]
    strictly: Option<String>,
    #[serde(default)]
    rejects: Vec<String>,
    #[serde(default)]
    branch: Option<String>,
}

impl From<VersionSpec> for VersionConstraint {
    fn from(spec: VersionSpec) -> Self {
        match spec {
            VersionSpec::Short(v) => Self::requires(&v),
            VersionSpec::Detailed(d) => Self {
                // A strict version is also the required one.
                requires: d.requires.or_else(|| d.strictly.clone()),
                prefers: d.prefers,
                strictly: d.strictly,
                rejects: d.rejects,
                branch: d.branch,
            },
        }
    }
}

/// A transitive module to exclude. A missing part matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExcludeRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

impl ExcludeRule {
    pub fn new(group: Option<&str>, module: Option<&str>) -> Self {
        Self {
            group: group.map(str::to_string),
            module: module.map(str::to_string),
        }
    }

    pub fn matches(&self, id: &ModuleIdentifier) -> bool {
        self.group.as_deref().map_or(true, |g| g == &*id.group)
            && self.module.as_deref().map_or(true, |m| m == &*id.name)
    }
}

impl fmt::Display for ExcludeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.group.as_deref().unwrap_or("*"),
            self.module.as_deref().unwrap_or("*")
        )
    }
}

/// A dependency as declared by a variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyDeclaration {
    pub group: String,
    pub module: String,
    #[serde(default)]
    pub version: VersionConstraint,
    #[serde(default, skip_serializing_if = "AttributeSet::is_empty")]
    pub attributes: AttributeSet,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<ExcludeRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DependencyDeclaration {
    pub fn new(group: &str, module: &str, version: VersionConstraint) -> Self {
        Self {
            group: group.to_string(),
            module: module.to_string(),
            version,
            attributes: AttributeSet::new(),
            excludes: Vec::new(),
            reason: None,
        }
    }
}

/// A dependency constraint as declared by a variant. Constraints never carry excludes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyConstraintDeclaration {
    pub group: String,
    pub module: String,
    #[serde(default)]
    pub version: VersionConstraint,
    #[serde(default, skip_serializing_if = "AttributeSet::is_empty")]
    pub attributes: AttributeSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DependencyConstraintDeclaration {
    pub fn new(group: &str, module: &str, version: VersionConstraint) -> Self {
        Self {
            group: group.to_string(),
            module: module.to_string(),
            version,
            attributes: AttributeSet::new(),
            reason: None,
        }
    }
}

/// Module, version constraint and requested attributes of a dependency target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleComponentSelector {
    pub module: ModuleIdentifier,
    pub version: VersionConstraint,
    #[serde(default, skip_serializing_if = "AttributeSet::is_empty")]
    pub attributes: AttributeSet,
}

impl fmt::Display for ModuleComponentSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.version)
    }
}

/// Normalized dependency or constraint, ready for the graph resolver.
///
/// Fields are read-only; the `with_*` methods return a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RealizedDependency {
    selector: ModuleComponentSelector,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    excludes: Vec<ExcludeRule>,
    constraint: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    force: bool,
}

impl RealizedDependency {
    pub fn dependency(
        selector: ModuleComponentSelector,
        excludes: Vec<ExcludeRule>,
        reason: Option<String>,
        force: bool,
    ) -> Self {
        Self {
            selector,
            excludes,
            constraint: false,
            reason,
            force,
        }
    }

    pub fn constraint(selector: ModuleComponentSelector, reason: Option<String>, force: bool) -> Self {
        Self {
            selector,
            excludes: Vec::new(),
            constraint: true,
            reason,
            force,
        }
    }

    pub fn selector(&self) -> &ModuleComponentSelector {
        &self.selector
    }

    pub fn module(&self) -> &ModuleIdentifier {
        &self.selector.module
    }

    pub fn excludes(&self) -> &[ExcludeRule] {
        &self.excludes
    }

    pub fn is_constraint(&self) -> bool {
        self.constraint
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn is_force(&self) -> bool {
        self.force
    }

    pub fn with_version(mut self, version: VersionConstraint) -> Self {
        self.selector.version = version;
        self
    }

    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Replace the excludes. Has no effect on constraints.
    pub fn with_excludes(mut self, excludes: Vec<ExcludeRule>) -> Self {
        if !self.constraint {
            self.excludes = excludes;
        }
        self
    }
}

impl fmt::Display for RealizedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector)?;
        if self.constraint {
            write!(f, " (constraint)")?;
        }
        if self.force {
            write!(f, " (forced)")?;
        }
        Ok(())
    }
}
