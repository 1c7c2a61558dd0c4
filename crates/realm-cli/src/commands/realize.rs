//! Handler for `realm realize`.

use std::io::Write;
use std::path::Path;

use miette::Result;

use realm_core::config::RealmConfig;
use realm_core::metadata::ComponentMetadata;
use realm_core::variant::RealizedVariant;
use realm_resolver::realize::VariantRealizer;
use realm_resolver::rules::RuleEngine;
use realm_util::errors::RealmError;
use realm_util::status;

pub fn exec(metadata_path: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    let metadata = ComponentMetadata::from_path(metadata_path)?;
    let config = match config_path {
        Some(path) => RealmConfig::from_path(path)?,
        None => {
            let dir = metadata_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            RealmConfig::discover(dir)?
        }
    };

    let rules = RuleEngine::from_config(&config.rules)?;
    let realizer = VariantRealizer::from_config(&config.platform);
    let realized = realizer.realize_variants(&metadata.component, &rules, &metadata.variants)?;

    let mut out = std::io::stdout().lock();
    if json {
        let rendered = serde_json::to_string_pretty(&realized).map_err(|e| RealmError::Generic {
            message: format!("Failed to serialize realized variants: {e}"),
        })?;
        writeln!(out, "{rendered}").map_err(RealmError::Io)?;
    } else {
        write_variants(&mut out, &realized).map_err(RealmError::Io)?;
    }

    status::status(
        "Realized",
        &format!("{} variant(s) of {}", realized.len(), metadata.component),
    );
    Ok(())
}

fn write_variants(out: &mut impl Write, variants: &[RealizedVariant]) -> std::io::Result<()> {
    for variant in variants {
        writeln!(out, "{}", variant.name())?;
        writeln!(out, "  attributes: {}", variant.attributes())?;
        if !variant.capabilities().is_empty() {
            let capabilities: Vec<String> =
                variant.capabilities().iter().map(ToString::to_string).collect();
            writeln!(out, "  capabilities: {}", capabilities.join(", "))?;
        }
        if variant.dependencies().is_empty() {
            writeln!(out, "  dependencies: none")?;
        } else {
            writeln!(out, "  dependencies:")?;
            for dependency in variant.dependencies() {
                writeln!(out, "    {dependency}")?;
            }
        }
    }
    Ok(())
}
