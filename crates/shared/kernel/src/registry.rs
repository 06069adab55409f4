use crate::class::{Class, ClassId};
use crate::error::SchemaError;
use fxhash::FxHashMap;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

#[derive(Debug)]
struct Namespace {
    root: Class,
    entries: IndexMap<String, Class>,
}

/// Namespaced store of named implementations.
///
/// Every replaceable namespace root owns one namespace; registered classes are keyed by
/// name within it and listed in registration order. The registry is a cheap clonable
/// handle: clones share the same namespaces. [`Registry::global`] is the process-wide
/// instance behind the crate-level functions.
///
/// The lock is never held while expansion or user hooks run.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    namespaces: Arc<RwLock<FxHashMap<ClassId, Namespace>>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Registers `class` under its name in the namespace of its root and returns it.
    ///
    /// Registering a different class under a name that is already taken replaces the
    /// entry (keeping its position) and logs a warning.
    ///
    /// # Errors
    /// [`SchemaError::UnknownNamespace`] if the class is not replaceable, and
    /// [`SchemaError::RootRegistration`] if it is a namespace root itself.
    pub fn register(&self, class: Class) -> Result<Class, SchemaError> {
        let Some(root) = class.namespace_root().cloned() else {
            return Err(SchemaError::UnknownNamespace {
                message: format!("cannot register {class}: cannot tell what it is").into(),
                context: None,
            });
        };
        if root == class {
            return Err(SchemaError::RootRegistration {
                message: format!("attempted to register the namespace root {class}").into(),
                context: None,
            });
        }

        let previous = self
            .namespaces
            .write()
            .entry(root.id())
            .or_insert_with(|| Namespace { root: root.clone(), entries: IndexMap::new() })
            .entries
            .insert(class.name().to_owned(), class.clone());

        match previous {
            Some(previous) if previous != class => {
                warn!(namespace = %root, implementation = %class, "Replacing a registered implementation");
            },
            _ => debug!(namespace = %root, implementation = %class, "Registered implementation"),
        }
        Ok(class)
    }

    /// Resolves `name` within the namespace of `base`.
    ///
    /// # Errors
    /// [`SchemaError::UnknownNamespace`] if `base` is not replaceable,
    /// [`SchemaError::NotRegistered`] if the name is absent and
    /// [`SchemaError::NotSubclass`] if it resolves outside `base`.
    pub fn get(&self, base: &Class, name: &str) -> Result<Class, SchemaError> {
        let root = namespace_of(base)?;
        let found = self
            .namespaces
            .read()
            .get(&root.id())
            .and_then(|namespace| namespace.entries.get(name).cloned());

        let Some(found) = found else {
            return Err(SchemaError::NotRegistered {
                message: format!("{name} has not been registered").into(),
                context: Some(format!("Resolving {base}").into()),
            });
        };
        if !found.is_subclass_of(base) {
            return Err(SchemaError::NotSubclass {
                message: format!("{name} resolves to {found}, which does not subclass {base}").into(),
                context: None,
            });
        }
        Ok(found)
    }

    /// Every registered subclass of `base` other than `base`, in registration order.
    ///
    /// # Errors
    /// [`SchemaError::UnknownNamespace`] if `base` is not replaceable.
    pub fn get_all(&self, base: &Class) -> Result<Vec<Class>, SchemaError> {
        let root = namespace_of(base)?;
        let namespaces = self.namespaces.read();
        Ok(namespaces.get(&root.id()).map_or_else(Vec::new, |namespace| {
            namespace
                .entries
                .values()
                .filter(|class| *class != base && class.is_subclass_of(base))
                .cloned()
                .collect()
        }))
    }

    /// Each namespace root with its implementations, roots in declaration order.
    #[must_use]
    pub fn namespaces(&self) -> Vec<(Class, Vec<Class>)> {
        let mut listing: Vec<(Class, Vec<Class>)> = self
            .namespaces
            .read()
            .values()
            .map(|namespace| (namespace.root.clone(), namespace.entries.values().cloned().collect()))
            .collect();
        listing.sort_by_key(|(root, _)| root.id());
        listing
    }
}

fn namespace_of(base: &Class) -> Result<&Class, SchemaError> {
    base.namespace_root().ok_or_else(|| SchemaError::UnknownNamespace {
        message: format!("cannot look up implementations of {base}: cannot tell what it is").into(),
        context: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> (Class, Class, Class) {
        let base = Class::replaceable("BaseRenderer").build();
        let marcher = Class::extends(&base, "MultiPassEmissionAbsorptionRenderer").build();
        let lstm = Class::extends(&base, "LSTMRenderer").build();
        (base, marcher, lstm)
    }

    #[test]
    fn register_and_get() {
        let registry = Registry::new();
        let (base, marcher, lstm) = hierarchy();
        registry.register(marcher.clone()).unwrap();
        registry.register(lstm.clone()).unwrap();

        assert_eq!(registry.get(&base, "LSTMRenderer").unwrap(), lstm);
        assert_eq!(registry.get_all(&base).unwrap(), [marcher, lstm]);
    }

    #[test]
    fn roots_and_configurables_cannot_be_registered() {
        let registry = Registry::new();
        let (base, _, _) = hierarchy();
        let model = Class::configurable("Model").build();

        let err = registry.register(base).unwrap_err();
        assert!(matches!(err, SchemaError::RootRegistration { .. }));
        let err = registry.register(model).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownNamespace { .. }));
    }

    #[test]
    fn get_reports_unknown_names() {
        let registry = Registry::new();
        let (base, _, _) = hierarchy();
        let err = registry.get(&base, "Nope").unwrap_err();
        assert_eq!(err.kind(), "NotRegistered");
    }

    #[test]
    fn get_with_a_narrower_base_checks_the_subtype() {
        let registry = Registry::new();
        let (base, marcher, lstm) = hierarchy();
        registry.register(marcher.clone()).unwrap();
        registry.register(lstm).unwrap();

        assert_eq!(registry.get(&marcher, "MultiPassEmissionAbsorptionRenderer").unwrap(), marcher);
        let err = registry.get(&marcher, "LSTMRenderer").unwrap_err();
        assert!(matches!(err, SchemaError::NotSubclass { .. }));
        assert!(registry.get_all(&marcher).unwrap().is_empty());
        assert_eq!(registry.get_all(&base).unwrap().len(), 2);
    }

    #[test]
    fn reregistration_replaces_in_place() {
        let registry = Registry::new();
        let (base, marcher, lstm) = hierarchy();
        registry.register(marcher).unwrap();
        registry.register(lstm).unwrap();
        let replacement = Class::extends(&base, "MultiPassEmissionAbsorptionRenderer").build();
        registry.register(replacement.clone()).unwrap();

        let names: Vec<_> =
            registry.get_all(&base).unwrap().iter().map(|class| class.name().to_owned()).collect();
        assert_eq!(names, ["MultiPassEmissionAbsorptionRenderer", "LSTMRenderer"]);
        assert_eq!(registry.get(&base, "MultiPassEmissionAbsorptionRenderer").unwrap(), replacement);
    }

    #[test]
    fn clones_share_state() {
        let registry = Registry::new();
        let (base, marcher, _) = hierarchy();
        registry.clone().register(marcher).unwrap();
        assert_eq!(registry.namespaces().len(), 1);
        assert_eq!(registry.namespaces()[0].0, base);
    }
}
