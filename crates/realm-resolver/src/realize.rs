//! Variant realization: turns declared, rule-mutable variants into immutable
//! snapshots for the graph resolver.
//!
//! Per variant, in input order: attribute rules, capability rules, dependency
//! conversion, dependency rules, then assembly. The realizer keeps no state
//! between calls, so identical inputs always give equal outputs and callers
//! may memoize per component (see [`crate::cache::RealizationCache`]).

use std::sync::Arc;

use realm_core::config::PlatformConfig;
use realm_core::identifier::{ComponentIdentifier, DefaultModuleIdentifierFactory, ModuleIdentifierFactory};
use realm_core::variant::{ComponentVariant, RealizedVariant};
use realm_util::errors::RealmError;

use crate::convert::convert_dependencies;
use crate::platform::{CategoryPlatformSupport, PlatformSupport};
use crate::rules::RuleEngine;

/// Realizes the variants of a component with its collaborators.
#[derive(Clone)]
pub struct VariantRealizer {
    platform: Arc<dyn PlatformSupport>,
    ids: Arc<dyn ModuleIdentifierFactory>,
}

impl VariantRealizer {
    pub fn new(platform: Arc<dyn PlatformSupport>, ids: Arc<dyn ModuleIdentifierFactory>) -> Self {
        Self { platform, ids }
    }

    /// Category-based platform detection with plain identifiers.
    ///
    /// Holds no shared state; pass an
    /// [`InterningModuleIdentifierFactory`](realm_core::identifier::InterningModuleIdentifierFactory)
    /// to [`VariantRealizer::new`] to share identifier storage instead.
    pub fn from_config(config: &PlatformConfig) -> Self {
        Self::new(
            Arc::new(CategoryPlatformSupport::new(config)),
            Arc::new(DefaultModuleIdentifierFactory),
        )
    }

    /// Realize every variant of `component`, preserving input order.
    ///
    /// A component without variants realizes to an empty list without
    /// consulting the rules. The first failing rule aborts the component.
    pub fn realize_variants(
        &self,
        component: &ComponentIdentifier,
        rules: &RuleEngine,
        variants: &[ComponentVariant],
    ) -> Result<Vec<RealizedVariant>, RealmError> {
        if variants.is_empty() {
            return Ok(Vec::new());
        }
        let realized = variants
            .iter()
            .map(|variant| self.realize_variant(component, rules, variant))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!("Realized {} variants of {}", realized.len(), component);
        Ok(realized)
    }

    /// Realize a single variant.
    pub fn realize_variant(
        &self,
        component: &ComponentIdentifier,
        rules: &RuleEngine,
        variant: &ComponentVariant,
    ) -> Result<RealizedVariant, RealmError> {
        let attributes = rules.apply_attribute_rules(component, variant, variant.attributes.clone())?;
        let capabilities =
            rules.apply_capability_rules(component, variant, variant.capabilities.clone())?;

        let force = self.platform.is_forced_dependency_source(variant);
        let base = convert_dependencies(
            &variant.dependencies,
            &variant.dependency_constraints,
            force,
            self.ids.as_ref(),
        );
        let dependencies = rules
            .apply_dependency_rules(component, variant, base)?
            .into_iter()
            // Records added by rules take the variant's force flag too.
            .map(|d| if d.is_force() == force { d } else { d.with_force(force) })
            .collect();

        tracing::trace!("Realized variant {}/{} (force: {})", component, variant.name, force);
        Ok(RealizedVariant::new(
            component.clone(),
            variant,
            attributes,
            capabilities,
            dependencies,
        ))
    }
}

impl Default for VariantRealizer {
    fn default() -> Self {
        Self::from_config(&PlatformConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realm_core::attributes::AttributeSet;
    use realm_core::dependency::{
        DependencyConstraintDeclaration, DependencyDeclaration, ModuleComponentSelector,
        RealizedDependency, VersionConstraint,
    };
    use realm_core::identifier::{DefaultModuleIdentifierFactory, ModuleIdentifier};

    use crate::rules::Rule;

    #[test]
    fn empty_variants_skip_the_rules() {
        let mut rules = RuleEngine::new();
        rules.add_attribute_rule(Rule::new("must-not-run", |_, _: AttributeSet| {
            panic!("rules must not run for a variant-less component")
        }));
        let realizer = VariantRealizer::default();
        let out = realizer
            .realize_variants(&ComponentIdentifier::new("g", "m", "1"), &rules, &[])
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn rule_added_dependencies_take_the_variant_force_flag() {
        let mut rules = RuleEngine::new();
        rules.add_dependency_rule(Rule::new(
            "add",
            |_, mut deps: Vec<RealizedDependency>| {
                let selector = ModuleComponentSelector {
                    module: ModuleIdentifier::new("g", "added"),
                    version: VersionConstraint::requires("1"),
                    attributes: AttributeSet::new(),
                };
                deps.push(RealizedDependency::dependency(selector, Vec::new(), None, false));
                Ok(deps)
            },
        ));
        let mut variant = ComponentVariant::new("platform");
        variant.dependencies = vec![DependencyDeclaration::new(
            "g",
            "a",
            VersionConstraint::requires("1"),
        )];
        variant.dependency_constraints = vec![DependencyConstraintDeclaration::new(
            "g",
            "c",
            VersionConstraint::requires("1"),
        )];

        let realizer = VariantRealizer::new(
            Arc::new(|_: &ComponentVariant| true),
            Arc::new(DefaultModuleIdentifierFactory),
        );
        let realized = realizer
            .realize_variant(&ComponentIdentifier::new("g", "m", "1"), &rules, &variant)
            .unwrap();
        assert_eq!(realized.dependencies().len(), 3);
        assert!(realized.dependencies().iter().all(|d| d.is_force()));
        assert_eq!(&*realized.dependencies()[2].module().name, "added");
    }
}
