use crate::catalog::Catalog;
use crate::settings::OutputFormat;
use anyhow::Result;
use strata::kernel::{Class, Target};
use strata::tree::{ConfigTree, Value};

/// Renders the registry namespaces with their implementations in registration order,
/// followed by every catalog entry grouped by kind.
///
/// # Errors
/// Returns an error if the listing cannot be rendered in `format`.
pub fn list(catalog: &Catalog, format: OutputFormat) -> Result<String> {
    let namespaces: ConfigTree = catalog
        .registry()
        .namespaces()
        .into_iter()
        .map(|(root, implementations)| {
            let names: Vec<Value> =
                implementations.iter().map(Class::name).map(Value::from).collect();
            (root.name().to_owned(), Value::List(names))
        })
        .collect();

    let (classes, callables): (Vec<_>, Vec<_>) =
        catalog.entries().partition(|(_, target)| matches!(target, Target::Class(_)));
    let names = |entries: Vec<(&str, &Target)>| -> Value {
        Value::List(entries.into_iter().map(|(name, _)| Value::from(name)).collect())
    };

    let mut listing = ConfigTree::new();
    listing.insert("namespaces", namespaces);
    listing.insert("classes", names(classes));
    listing.insert("callables", names(callables));

    Ok(format.render(&listing)?)
}
