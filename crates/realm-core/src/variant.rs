//! Component variants as authored, and their realized snapshots.

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeSet;
use crate::capability::CapabilitySet;
use crate::dependency::{DependencyConstraintDeclaration, DependencyDeclaration, RealizedDependency};
use crate::identifier::ComponentIdentifier;

/// A file published by a variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantFile {
    pub name: String,
    pub uri: String,
}

/// A named facet of a component, as declared by the metadata source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentVariant {
    pub name: String,
    #[serde(default)]
    pub attributes: AttributeSet,
    #[serde(default)]
    pub capabilities: CapabilitySet,
    #[serde(default)]
    pub dependencies: Vec<DependencyDeclaration>,
    #[serde(default, rename = "dependency-constraints")]
    pub dependency_constraints: Vec<DependencyConstraintDeclaration>,
    #[serde(default)]
    pub files: Vec<VariantFile>,
}

impl ComponentVariant {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: AttributeSet::new(),
            capabilities: CapabilitySet::new(),
            dependencies: Vec::new(),
            dependency_constraints: Vec::new(),
            files: Vec::new(),
        }
    }
}

/// Final, rule-applied snapshot of a variant.
///
/// Built once by the realizer and only readable afterwards. The declared
/// dependency and constraint lists are kept next to the realized ones for
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealizedVariant {
    component: ComponentIdentifier,
    name: String,
    attributes: AttributeSet,
    #[serde(rename = "declared-dependencies")]
    declared_dependencies: Vec<DependencyDeclaration>,
    #[serde(rename = "declared-dependency-constraints")]
    declared_dependency_constraints: Vec<DependencyConstraintDeclaration>,
    files: Vec<VariantFile>,
    capabilities: CapabilitySet,
    dependencies: Vec<RealizedDependency>,
}

impl RealizedVariant {
    /// Assemble a snapshot from the declared variant and the rule outputs.
    pub fn new(
        component: ComponentIdentifier,
        declared: &ComponentVariant,
        attributes: AttributeSet,
        capabilities: CapabilitySet,
        dependencies: Vec<RealizedDependency>,
    ) -> Self {
        Self {
            component,
            name: declared.name.clone(),
            attributes,
            declared_dependencies: declared.dependencies.clone(),
            declared_dependency_constraints: declared.dependency_constraints.clone(),
            files: declared.files.clone(),
            capabilities,
            dependencies,
        }
    }

    pub fn component(&self) -> &ComponentIdentifier {
        &self.component
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn declared_dependencies(&self) -> &[DependencyDeclaration] {
        &self.declared_dependencies
    }

    pub fn declared_dependency_constraints(&self) -> &[DependencyConstraintDeclaration] {
        &self.declared_dependency_constraints
    }

    pub fn files(&self) -> &[VariantFile] {
        &self.files
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Realized dependencies followed by realized constraints, after rules.
    pub fn dependencies(&self) -> &[RealizedDependency] {
        &self.dependencies
    }
}
