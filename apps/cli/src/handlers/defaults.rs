use crate::catalog::Catalog;
use crate::settings::OutputFormat;
use anyhow::{Context, Result};
use strata::tree::remove_unused_components;

/// Renders the default argument tree of a catalog entry.
///
/// With `prune`, argument subtrees of implementations that are not selected are removed.
///
/// # Errors
/// Returns an error for unknown entries, failed extraction or rendering.
pub fn defaults(catalog: &Catalog, name: &str, prune: bool, format: OutputFormat) -> Result<String> {
    let target = catalog.lookup(name)?;
    let mut tree = catalog
        .registry()
        .default_args(target.clone())
        .with_context(|| format!("Extracting the defaults of {name}"))?;

    if prune {
        remove_unused_components(&mut tree);
    }

    Ok(format.render(&tree)?)
}
