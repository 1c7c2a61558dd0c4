use std::sync::Arc;

use realm_core::attributes::{AttributeSet, AttributeValue, CATEGORY_ATTRIBUTE};
use realm_core::capability::{Capability, CapabilitySet};
use realm_core::config::RealmConfig;
use realm_core::dependency::{
    DependencyConstraintDeclaration, DependencyDeclaration, ExcludeRule, RealizedDependency,
    VersionConstraint,
};
use realm_core::identifier::{
    ComponentIdentifier, DefaultModuleIdentifierFactory, InterningModuleIdentifierFactory,
};
use realm_core::metadata::ComponentMetadata;
use realm_core::variant::{ComponentVariant, VariantFile};
use realm_resolver::realize::VariantRealizer;
use realm_resolver::rules::{Rule, RuleEngine};
use realm_util::errors::RealmError;

fn component() -> ComponentIdentifier {
    ComponentIdentifier::new("org.example", "lib", "1.0")
}

fn library_variant(name: &str) -> ComponentVariant {
    let mut variant = ComponentVariant::new(name);
    variant.attributes = AttributeSet::new()
        .with(CATEGORY_ATTRIBUTE, "library")
        .with("org.gradle.usage", "java-api");
    variant.capabilities = CapabilitySet::of([Capability::new("org.example", "lib", "1.0")]);

    let mut first = DependencyDeclaration::new("org.slf4j", "slf4j-api", VersionConstraint::requires("2.0.9"));
    first.excludes = vec![ExcludeRule::new(Some("commons-logging"), None)];
    let second = DependencyDeclaration::new("com.google.guava", "guava", VersionConstraint::requires("33.0.0"));
    variant.dependencies = vec![first, second];
    variant.dependency_constraints = vec![DependencyConstraintDeclaration::new(
        "com.fasterxml.jackson.core",
        "jackson-databind",
        VersionConstraint::strictly("2.15.0"),
    )];
    variant.files = vec![VariantFile {
        name: "lib-1.0.jar".to_string(),
        uri: "lib-1.0.jar".to_string(),
    }];
    variant
}

fn platform_variant(name: &str) -> ComponentVariant {
    let mut variant = library_variant(name);
    variant.attributes = variant
        .attributes
        .clone()
        .with(CATEGORY_ATTRIBUTE, "enforced-platform");
    variant
}

#[test]
fn empty_variant_list_realizes_to_empty() {
    let realizer = VariantRealizer::default();
    let out = realizer
        .realize_variants(&component(), &RuleEngine::new(), &[])
        .unwrap();
    assert!(out.is_empty());
}

#[test]
fn output_order_matches_input_order() {
    let variants = vec![
        library_variant("runtimeElements"),
        library_variant("apiElements"),
        library_variant("sourcesElements"),
    ];
    let out = VariantRealizer::default()
        .realize_variants(&component(), &RuleEngine::new(), &variants)
        .unwrap();
    let names: Vec<&str> = out.iter().map(|v| v.name()).collect();
    assert_eq!(names, vec!["runtimeElements", "apiElements", "sourcesElements"]);
    assert!(out.iter().all(|v| v.component() == &component()));
}

#[test]
fn dependencies_precede_constraints() {
    let out = VariantRealizer::default()
        .realize_variants(&component(), &RuleEngine::new(), &[library_variant("api")])
        .unwrap();
    let deps = out[0].dependencies();

    assert_eq!(deps.len(), 3);
    assert_eq!(deps[0].module().to_string(), "org.slf4j:slf4j-api");
    assert_eq!(deps[1].module().to_string(), "com.google.guava:guava");
    assert_eq!(deps[2].module().to_string(), "com.fasterxml.jackson.core:jackson-databind");
    assert!(!deps[0].is_constraint());
    assert!(!deps[1].is_constraint());
    assert!(deps[2].is_constraint());
    assert_eq!(deps[0].excludes().len(), 1);
    assert!(deps[2].excludes().is_empty());
}

#[test]
fn enforced_platform_forces_every_record() {
    let out = VariantRealizer::default()
        .realize_variants(
            &component(),
            &RuleEngine::new(),
            &[platform_variant("platform"), library_variant("library")],
        )
        .unwrap();
    assert!(out[0].dependencies().iter().all(RealizedDependency::is_force));
    assert!(out[1].dependencies().iter().all(|d| !d.is_force()));
}

#[test]
fn force_decision_uses_the_platform_collaborator() {
    let realizer = VariantRealizer::new(
        Arc::new(|variant: &ComponentVariant| variant.name == "bom"),
        Arc::new(DefaultModuleIdentifierFactory),
    );
    let out = realizer
        .realize_variants(
            &component(),
            &RuleEngine::new(),
            &[library_variant("bom"), library_variant("api")],
        )
        .unwrap();
    assert!(out[0].dependencies().iter().all(|d| d.is_force()));
    assert!(out[1].dependencies().iter().all(|d| !d.is_force()));
}

#[test]
fn interning_is_opt_in() {
    let ids = Arc::new(InterningModuleIdentifierFactory::new());
    let interning = VariantRealizer::new(
        Arc::new(realm_resolver::platform::CategoryPlatformSupport::default()),
        ids.clone(),
    );
    let variants = vec![library_variant("api"), library_variant("runtime")];

    let shared = interning
        .realize_variants(&component(), &RuleEngine::new(), &variants)
        .unwrap();
    assert_eq!(ids.len(), 3);

    let plain = VariantRealizer::default()
        .realize_variants(&component(), &RuleEngine::new(), &variants)
        .unwrap();
    assert_eq!(shared, plain);
}

#[test]
fn identical_inputs_give_equal_outputs() {
    let mut rules = RuleEngine::new();
    rules.add_attribute_rule(Rule::new("status", |_, a: AttributeSet| Ok(a.with("status", "release"))));
    let variants = vec![library_variant("api"), platform_variant("platform")];

    let first = VariantRealizer::default()
        .realize_variants(&component(), &rules, &variants)
        .unwrap();
    let second = VariantRealizer::default()
        .realize_variants(&component(), &rules, &variants)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn attribute_rule_order_is_a_fold() {
    let set = |value: &'static str| {
        Rule::new(&format!("k={value}"), move |_, a: AttributeSet| Ok(a.with("k", value)))
    };
    let variants = vec![library_variant("api")];

    let mut forward = RuleEngine::new();
    forward.add_attribute_rule(set("1")).add_attribute_rule(set("2"));
    let out = VariantRealizer::default()
        .realize_variants(&component(), &forward, &variants)
        .unwrap();
    assert_eq!(out[0].attributes().get("k"), Some(&AttributeValue::from("2")));

    let mut reversed = RuleEngine::new();
    reversed.add_attribute_rule(set("2")).add_attribute_rule(set("1"));
    let out = VariantRealizer::default()
        .realize_variants(&component(), &reversed, &variants)
        .unwrap();
    assert_eq!(out[0].attributes().get("k"), Some(&AttributeValue::from("1")));
}

#[test]
fn rules_never_touch_the_declared_variant() {
    let mut rules = RuleEngine::new();
    rules
        .add_attribute_rule(Rule::new("drop-usage", |_, a: AttributeSet| Ok(a.without("org.gradle.usage"))))
        .add_dependency_rule(Rule::new("drop-all", |_, _: Vec<RealizedDependency>| Ok(Vec::new())));
    let variant = library_variant("api");

    let out = VariantRealizer::default()
        .realize_variants(&component(), &rules, std::slice::from_ref(&variant))
        .unwrap();

    assert!(!out[0].attributes().contains("org.gradle.usage"));
    assert!(out[0].dependencies().is_empty());
    assert!(variant.attributes.contains("org.gradle.usage"));
    // Declared lists are kept for diagnostics.
    assert_eq!(out[0].declared_dependencies(), variant.dependencies.as_slice());
    assert_eq!(
        out[0].declared_dependency_constraints(),
        variant.dependency_constraints.as_slice()
    );
    assert_eq!(out[0].files(), variant.files.as_slice());
}

#[test]
fn dependency_rules_keep_untouched_entries_in_order() {
    let mut rules = RuleEngine::new();
    rules.add_dependency_rule(Rule::new("drop-guava", |_, deps: Vec<RealizedDependency>| {
        Ok(deps
            .into_iter()
            .filter(|d| &*d.module().name != "guava")
            .collect())
    }));
    let out = VariantRealizer::default()
        .realize_variants(&component(), &rules, &[library_variant("api")])
        .unwrap();
    let names: Vec<&str> = out[0].dependencies().iter().map(|d| &*d.module().name).collect();
    assert_eq!(names, vec!["slf4j-api", "jackson-databind"]);
}

#[test]
fn rule_failure_aborts_with_context() {
    let mut rules = RuleEngine::new();
    rules.add_capability_rule(
        Rule::new("reject-runtime", |_, _: CapabilitySet| Err(miette::miette!("unsupported")))
            .for_variant("runtimeElements"),
    );
    let err = VariantRealizer::default()
        .realize_variants(
            &component(),
            &rules,
            &[library_variant("apiElements"), library_variant("runtimeElements")],
        )
        .unwrap_err();
    match err {
        RealmError::RuleExecution { component, variant, rule, .. } => {
            assert_eq!(component, "org.example:lib:1.0");
            assert_eq!(variant, "runtimeElements");
            assert_eq!(rule, "reject-runtime");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rule_failure_leaves_other_variants_realizable() {
    let mut rules = RuleEngine::new();
    rules.add_attribute_rule(
        Rule::new("broken", |_, _: AttributeSet| Err(miette::miette!("broken")))
            .for_variant("runtimeElements"),
    );
    let realizer = VariantRealizer::default();
    assert!(realizer
        .realize_variant(&component(), &rules, &library_variant("runtimeElements"))
        .is_err());
    let api = realizer
        .realize_variant(&component(), &rules, &library_variant("apiElements"))
        .unwrap();
    assert_eq!(api.name(), "apiElements");
}

#[test]
fn declarative_rules_from_config() {
    let config = RealmConfig::from_str(
        r#"
[[rules.attributes]]
name = "status"
set = { "org.gradle.status" = "release" }

[[rules.capabilities]]
name = "shaded"
variant = "runtimeElements"
add = [{ group = "org.example", name = "lib-shaded", version = "1.0" }]

[[rules.dependencies]]
name = "swap-logging"
remove = ["com.google.guava:guava"]
versions = { "org.slf4j:slf4j-api" = "2.0.12" }
reason = "align with the logging backend"
add = [{ group = "org.slf4j", module = "slf4j-bom", version = "2.0.12", constraint = true }]
"#,
    )
    .unwrap();
    let rules = RuleEngine::from_config(&config.rules).unwrap();
    let out = VariantRealizer::from_config(&config.platform)
        .realize_variants(
            &component(),
            &rules,
            &[library_variant("apiElements"), library_variant("runtimeElements")],
        )
        .unwrap();

    for variant in &out {
        assert_eq!(
            variant.attributes().get("org.gradle.status"),
            Some(&AttributeValue::from("release"))
        );
        let deps = variant.dependencies();
        let keys: Vec<String> = deps.iter().map(|d| d.module().to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "org.slf4j:slf4j-api",
                "com.fasterxml.jackson.core:jackson-databind",
                "org.slf4j:slf4j-bom",
            ]
        );
        assert_eq!(deps[0].selector().version.to_string(), "2.0.12");
        assert_eq!(deps[0].reason(), Some("align with the logging backend"));
        assert_eq!(deps[1].reason(), None);
        assert!(deps[2].is_constraint());
    }
    assert_eq!(out[0].capabilities().len(), 1);
    assert_eq!(out[1].capabilities().len(), 2);
}

#[test]
fn realizes_a_loaded_document() {
    let metadata = ComponentMetadata::from_str(
        r#"
[component]
group = "org.example"
module = "bom"
version = "3.1"

[[variants]]
name = "enforcedApiElements"
attributes = { "org.gradle.category" = "enforced-platform" }

[[variants.dependency-constraints]]
group = "org.example"
module = "core"
version = "3.1"
"#,
    )
    .unwrap();
    let out = VariantRealizer::default()
        .realize_variants(&metadata.component, &RuleEngine::new(), &metadata.variants)
        .unwrap();
    assert_eq!(out.len(), 1);
    let deps = out[0].dependencies();
    assert_eq!(deps.len(), 1);
    assert!(deps[0].is_constraint());
    assert!(deps[0].is_force());
}
