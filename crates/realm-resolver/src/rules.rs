//! Variant metadata rules: ordered, user-supplied mutations of a variant's
//! attributes, capabilities and realized dependencies.
//!
//! Each rule list is a left fold. Rule `i` receives the value produced by
//! rule `i - 1`; the first rule receives the base value. A rule restricted to
//! one variant name is an identity step for every other variant. A failing
//! rule aborts the fold and is reported with the component, variant and rule
//! that failed.

use std::fmt;
use std::sync::Arc;

use realm_core::attributes::AttributeSet;
use realm_core::capability::CapabilitySet;
use realm_core::config::{AttributeRuleSpec, CapabilityRuleSpec, DependencyRuleSpec, RulesConfig};
use realm_core::dependency::{ModuleComponentSelector, RealizedDependency};
use realm_core::identifier::{ComponentIdentifier, ModuleIdentifier};
use realm_core::variant::ComponentVariant;
use realm_util::errors::RealmError;

/// The function a rule runs: it sees the variant being realized and the
/// current accumulator, and returns the next accumulator.
pub type RuleAction<T> = Arc<dyn Fn(&ComponentVariant, T) -> miette::Result<T> + Send + Sync>;

/// A named rule, optionally restricted to one variant.
pub struct Rule<T> {
    name: String,
    variant: Option<String>,
    action: RuleAction<T>,
}

impl<T> Rule<T> {
    pub fn new<F>(name: &str, action: F) -> Self
    where
        F: Fn(&ComponentVariant, T) -> miette::Result<T> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            variant: None,
            action: Arc::new(action),
        }
    }

    /// Restrict the rule to the variant named `variant`.
    pub fn for_variant(mut self, variant: &str) -> Self {
        self.variant = Some(variant.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn applies_to(&self, variant: &ComponentVariant) -> bool {
        self.variant.as_deref().map_or(true, |v| v == variant.name)
    }
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            variant: self.variant.clone(),
            action: Arc::clone(&self.action),
        }
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}

/// Reduce `rules` left to right over `initial`.
pub fn apply_rules<T>(
    rules: &[Rule<T>],
    component: &ComponentIdentifier,
    variant: &ComponentVariant,
    initial: T,
) -> Result<T, RealmError> {
    rules
        .iter()
        .filter(|rule| rule.applies_to(variant))
        .try_fold(initial, |acc, rule| {
            tracing::trace!("Applying rule '{}' to {}/{}", rule.name, component, variant.name);
            (rule.action)(variant, acc).map_err(|e| {
                tracing::warn!(
                    "Rule '{}' failed for {}/{}: {e}",
                    rule.name,
                    component,
                    variant.name
                );
                RealmError::RuleExecution {
                    component: component.to_string(),
                    variant: variant.name.clone(),
                    rule: rule.name.clone(),
                    message: e.to_string(),
                }
            })
        })
}

/// Ordered attribute, capability and dependency rules for one resolution.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    attribute_rules: Vec<Rule<AttributeSet>>,
    capability_rules: Vec<Rule<CapabilitySet>>,
    dependency_rules: Vec<Rule<Vec<RealizedDependency>>>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile declarative rules into an engine, keeping file order.
    ///
    /// Fails if a dependency rule names a module key that is not `group:module`.
    pub fn from_config(config: &RulesConfig) -> Result<Self, RealmError> {
        config.validate()?;
        let mut engine = Self::new();
        for spec in &config.attributes {
            engine.add_attribute_rule(attribute_rule(spec));
        }
        for spec in &config.capabilities {
            engine.add_capability_rule(capability_rule(spec));
        }
        for spec in &config.dependencies {
            engine.add_dependency_rule(dependency_rule(spec));
        }
        Ok(engine)
    }

    pub fn add_attribute_rule(&mut self, rule: Rule<AttributeSet>) -> &mut Self {
        self.attribute_rules.push(rule);
        self
    }

    pub fn add_capability_rule(&mut self, rule: Rule<CapabilitySet>) -> &mut Self {
        self.capability_rules.push(rule);
        self
    }

    pub fn add_dependency_rule(&mut self, rule: Rule<Vec<RealizedDependency>>) -> &mut Self {
        self.dependency_rules.push(rule);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.attribute_rules.is_empty()
            && self.capability_rules.is_empty()
            && self.dependency_rules.is_empty()
    }

    pub fn apply_attribute_rules(
        &self,
        component: &ComponentIdentifier,
        variant: &ComponentVariant,
        base: AttributeSet,
    ) -> Result<AttributeSet, RealmError> {
        apply_rules(&self.attribute_rules, component, variant, base)
    }

    pub fn apply_capability_rules(
        &self,
        component: &ComponentIdentifier,
        variant: &ComponentVariant,
        base: CapabilitySet,
    ) -> Result<CapabilitySet, RealmError> {
        apply_rules(&self.capability_rules, component, variant, base)
    }

    pub fn apply_dependency_rules(
        &self,
        component: &ComponentIdentifier,
        variant: &ComponentVariant,
        base: Vec<RealizedDependency>,
    ) -> Result<Vec<RealizedDependency>, RealmError> {
        apply_rules(&self.dependency_rules, component, variant, base)
    }
}

fn scoped<T>(rule: Rule<T>, variant: Option<&str>) -> Rule<T> {
    match variant {
        Some(v) => rule.for_variant(v),
        None => rule,
    }
}

fn attribute_rule(spec: &AttributeRuleSpec) -> Rule<AttributeSet> {
    let set = spec.set.clone();
    let remove = spec.remove.clone();
    let rule = Rule::new(&spec.name, move |_, attributes: AttributeSet| {
        let attributes = set
            .iter()
            .fold(attributes, |acc, (k, v)| acc.with(k, v.clone()));
        Ok(remove.iter().fold(attributes, |acc, k| acc.without(k)))
    });
    scoped(rule, spec.variant.as_deref())
}

fn capability_rule(spec: &CapabilityRuleSpec) -> Rule<CapabilitySet> {
    let add = spec.add.clone();
    let remove = spec.remove.clone();
    let rule = Rule::new(&spec.name, move |_, capabilities: CapabilitySet| {
        let capabilities = add.iter().cloned().fold(capabilities, CapabilitySet::with);
        Ok(remove.iter().fold(capabilities, |acc, c| acc.without(c)))
    });
    scoped(rule, spec.variant.as_deref())
}

fn dependency_rule(spec: &DependencyRuleSpec) -> Rule<Vec<RealizedDependency>> {
    // Keys are checked by `from_config` before any rule is compiled.
    let remove: Vec<ModuleIdentifier> = spec
        .remove
        .iter()
        .filter_map(|k| ModuleIdentifier::parse(k))
        .collect();
    let versions: Vec<_> = spec
        .versions
        .iter()
        .filter_map(|(k, v)| ModuleIdentifier::parse(k).map(|id| (id, v.clone())))
        .collect();
    let reason = spec.reason.clone();
    let add = spec.add.clone();

    let rule = Rule::new(&spec.name, move |_, dependencies: Vec<RealizedDependency>| {
        let mut result: Vec<RealizedDependency> = dependencies
            .into_iter()
            .filter(|d| !remove.contains(d.module()))
            .map(|d| match versions.iter().find(|(id, _)| id == d.module()) {
                Some((_, version)) => {
                    let d = d.with_version(version.clone());
                    match reason {
                        Some(ref reason) => d.with_reason(Some(reason.clone())),
                        None => d,
                    }
                }
                None => d,
            })
            .collect();
        for added in &add {
            let selector = ModuleComponentSelector {
                module: ModuleIdentifier::new(&added.group, &added.module),
                version: added.version.clone(),
                attributes: AttributeSet::new(),
            };
            let dependency = if added.constraint {
                RealizedDependency::constraint(selector, added.reason.clone(), false)
            } else {
                RealizedDependency::dependency(selector, Vec::new(), added.reason.clone(), false)
            };
            result.push(dependency);
        }
        Ok(result)
    });
    scoped(rule, spec.variant.as_deref())
}
