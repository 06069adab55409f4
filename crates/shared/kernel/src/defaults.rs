use crate::callable::Signature;
use crate::class::{Class, FieldDefault};
use crate::error::SchemaError;
use crate::expand::ExpansionGuard;
use crate::registry::Registry;
use std::fmt;
use std::sync::Arc;
use strata_tree::{ConfigTree, Value};

type Produce = dyn Fn(&Registry, &ExpansionGuard) -> Result<Value, SchemaError> + Send + Sync;

/// A lazily evaluated default. Each call produces a fresh value.
#[derive(Clone)]
pub struct DefaultFactory {
    produce: Arc<Produce>,
}

impl DefaultFactory {
    pub fn new<F>(produce: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self { produce: Arc::new(move |_, _| Ok(produce())) }
    }

    fn guarded<F>(produce: F) -> Self
    where
        F: Fn(&Registry, &ExpansionGuard) -> Result<Value, SchemaError> + Send + Sync + 'static,
    {
        Self { produce: Arc::new(produce) }
    }

    /// # Errors
    /// Whatever producing the default fails with, typically expansion errors of the class
    /// whose defaults it extracts.
    pub fn produce(&self, registry: &Registry) -> Result<Value, SchemaError> {
        (self.produce)(registry, &ExpansionGuard::default())
    }

    pub(crate) fn produce_guarded(
        &self,
        registry: &Registry,
        guard: &ExpansionGuard,
    ) -> Result<Value, SchemaError> {
        (self.produce)(registry, guard)
    }
}

impl fmt::Debug for DefaultFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultFactory").finish_non_exhaustive()
    }
}

/// Anything default arguments can be extracted from.
#[derive(Debug, Clone)]
pub enum Target {
    Class(Class),
    Callable(Signature),
}

impl From<Class> for Target {
    fn from(class: Class) -> Self {
        Self::Class(class)
    }
}

impl From<&Class> for Target {
    fn from(class: &Class) -> Self {
        Self::Class(class.clone())
    }
}

impl From<Signature> for Target {
    fn from(signature: Signature) -> Self {
        Self::Callable(signature)
    }
}

impl From<&Signature> for Target {
    fn from(signature: &Signature) -> Self {
        Self::Callable(signature.clone())
    }
}

impl Registry {
    /// A fresh tree of default arguments.
    ///
    /// For a class, the class is expanded first and the tree follows its sealed fields;
    /// required fields appear as `???`. For a callable, only defaulted parameters appear.
    ///
    /// # Errors
    /// Expansion errors of the class or of any class nested in its defaults.
    pub fn default_args(&self, target: impl Into<Target>) -> Result<ConfigTree, SchemaError> {
        match target.into() {
            Target::Class(class) => self.class_defaults(&class, &ExpansionGuard::default()),
            Target::Callable(signature) => Ok(signature.defaults()),
        }
    }

    /// A default factory evaluating to [`Registry::default_args`] of `target`, for use as
    /// the default of a field of another class.
    #[must_use]
    pub fn default_args_field(&self, target: impl Into<Target>) -> DefaultFactory {
        match target.into() {
            Target::Class(class) => class_args_factory(class, ExpansionGuard::default()),
            Target::Callable(signature) => DefaultFactory::new(move || Value::Tree(signature.defaults())),
        }
    }

    pub(crate) fn class_defaults(
        &self,
        class: &Class,
        guard: &ExpansionGuard,
    ) -> Result<ConfigTree, SchemaError> {
        if guard.contains(class) {
            return Err(SchemaError::RecursiveExpansion {
                message: format!("defaults of {class} are needed while they are being extracted").into(),
                context: Some(guard.describe().into()),
            });
        }

        let schema = self.expand_guarded(class, guard)?;
        let inner = guard.with(class);
        let mut tree = ConfigTree::new();
        for field in schema.visible_fields() {
            let value = match field.default() {
                FieldDefault::Required => Value::Missing,
                FieldDefault::Value(value) => value.clone(),
                FieldDefault::Factory(factory) => factory.produce_guarded(self, &inner)?,
            };
            tree.insert(field.name(), value);
        }
        Ok(tree)
    }
}

/// The default of a generated `_args` field: the defaults of `class`, extracted with every
/// class of the expansion chain that generated it still marked as in progress.
pub(crate) fn class_args_factory(class: Class, captured: ExpansionGuard) -> DefaultFactory {
    DefaultFactory::guarded(move |registry, guard| {
        registry.class_defaults(&class, &captured.union(guard)).map(Value::Tree)
    })
}
