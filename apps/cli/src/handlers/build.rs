use crate::catalog::Catalog;
use crate::settings::OutputFormat;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use strata::tree::{ConfigTree, Value, remove_unused_components};
use tracing::info;

/// Constructs a catalog class and renders the summary of the instance.
///
/// The argument tree starts from the class defaults, then `file` is deep-merged over it,
/// then each override is set at its dotted path. Unselected variants are pruned before
/// construction.
///
/// # Errors
/// Returns an error for unknown classes, unreadable files, invalid override paths and any
/// construction error.
pub fn build(
    catalog: &Catalog,
    name: &str,
    file: Option<&Path>,
    overrides: &[(String, Value)],
    format: OutputFormat,
) -> Result<String> {
    let class = catalog.class(name)?;
    let registry = catalog.registry();
    let mut args = registry
        .default_args(class)
        .with_context(|| format!("Extracting the defaults of {name}"))?;

    if let Some(path) = file {
        args.merge(&read_tree(path)?);
    }
    for (key, value) in overrides {
        args.set_path(key, value.clone()).with_context(|| format!("Applying override '{key}'"))?;
    }
    remove_unused_components(&mut args);

    let instance =
        registry.construct(class, &args).with_context(|| format!("Constructing {name}"))?;
    info!(class = name, members = instance.members().count(), "Constructed");

    Ok(format.render(&instance.summary())?)
}

fn read_tree(path: &Path) -> Result<ConfigTree> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config tree {}", path.display()))?;
    let tree = if path.extension().is_some_and(|ext| ext == "json") {
        ConfigTree::from_json(&text)
    } else {
        ConfigTree::from_yaml(&text)
    };
    tree.with_context(|| format!("Failed to parse config tree {}", path.display()))
}
