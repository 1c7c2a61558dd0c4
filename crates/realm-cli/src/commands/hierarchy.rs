//! Handler for `realm hierarchy`.

use std::path::Path;

use miette::Result;

use realm_core::metadata::ComponentMetadata;
use realm_resolver::hierarchy::{render_cycle, ConfigurationGraph};
use realm_util::errors::RealmError;
use realm_util::status;

pub fn exec(metadata_path: &Path, configuration: Option<&str>, check: bool) -> Result<()> {
    let metadata = ComponentMetadata::from_path(metadata_path)?;
    let graph = ConfigurationGraph::new(&metadata.configurations);

    if check {
        return check_graph(&graph);
    }

    match configuration {
        Some(name) => println!("{}", graph.hierarchy_of(name)?),
        None => print_all(&graph)?,
    }
    Ok(())
}

fn print_all(graph: &ConfigurationGraph<'_>) -> Result<()> {
    let mut failed = 0usize;
    for (name, closure) in graph.hierarchies() {
        match closure {
            Ok(hierarchy) => println!("{hierarchy}"),
            Err(e) => {
                failed += 1;
                status::status_warn("Skipped", &format!("'{name}': {e}"));
            }
        }
    }
    if failed > 0 {
        return Err(RealmError::Generic {
            message: format!(
                "{failed} of {} configuration hierarchies could not be computed",
                graph.len()
            ),
        }
        .into());
    }
    Ok(())
}

fn check_graph(graph: &ConfigurationGraph<'_>) -> Result<()> {
    let cycles = graph.cycles();
    let missing = graph.undeclared_references();

    for cycle in &cycles {
        status::status_warn("Cycle", &render_cycle(cycle));
    }
    for (configuration, parent) in &missing {
        status::status_warn(
            "Undeclared",
            &format!("'{configuration}' extends from '{parent}'"),
        );
    }

    if let Some((configuration, parent)) = missing.into_iter().next() {
        return Err(RealmError::UndeclaredConfiguration {
            name: parent,
            referenced_by: configuration,
        }
        .into());
    }
    if let Some(cycle) = cycles.into_iter().next() {
        return Err(RealmError::ConfigurationCycle {
            path: render_cycle(&cycle),
        }
        .into());
    }

    status::status(
        "Checked",
        &format!("{} configuration(s), no problems found", graph.len()),
    );
    Ok(())
}
