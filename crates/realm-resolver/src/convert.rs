//! Normalization of declared dependencies and constraints into one ordered
//! list of realized dependencies.

use realm_core::dependency::{
    DependencyConstraintDeclaration, DependencyDeclaration, ModuleComponentSelector,
    RealizedDependency,
};
use realm_core::identifier::ModuleIdentifierFactory;

/// Convert one variant's declarations into realized dependencies.
///
/// Dependencies come first, in declared order, with their excludes. Constraints
/// follow, in declared order, without excludes. Every record carries `force`.
/// Downstream exclude merging and conflict messages depend on this order.
pub fn convert_dependencies(
    dependencies: &[DependencyDeclaration],
    constraints: &[DependencyConstraintDeclaration],
    force: bool,
    ids: &dyn ModuleIdentifierFactory,
) -> Vec<RealizedDependency> {
    let mut result = Vec::with_capacity(dependencies.len() + constraints.len());
    for dep in dependencies {
        let selector = ModuleComponentSelector {
            module: ids.module(&dep.group, &dep.module),
            version: dep.version.clone(),
            attributes: dep.attributes.clone(),
        };
        result.push(RealizedDependency::dependency(
            selector,
            dep.excludes.clone(),
            dep.reason.clone(),
            force,
        ));
    }
    for constraint in constraints {
        let selector = ModuleComponentSelector {
            module: ids.module(&constraint.group, &constraint.module),
            version: constraint.version.clone(),
            attributes: constraint.attributes.clone(),
        };
        result.push(RealizedDependency::constraint(
            selector,
            constraint.reason.clone(),
            force,
        ));
    }
    result
}
