use crate::class::{Class, FieldDefault};
use crate::error::SchemaError;
use crate::registry::Registry;
use crate::schema::{CreationStep, Schema, StepKind};
use indexmap::IndexMap;
use strata_tree::naming::{args_field, class_type_field, implementation_args_field};
use strata_tree::{ConfigTree, Value};
use tracing::{debug, warn};

/// A constructed class: validated field values plus the members its creation steps built.
#[derive(Debug, Clone)]
pub struct Instance {
    class: Class,
    fields: ConfigTree,
    members: IndexMap<String, Instance>,
}

impl Instance {
    #[must_use]
    pub const fn class(&self) -> &Class {
        &self.class
    }

    /// Whether this is an instance of `class` or one of its subclasses.
    #[must_use]
    pub fn is_a(&self, class: &Class) -> bool {
        self.class.is_subclass_of(class)
    }

    #[must_use]
    pub const fn fields(&self) -> &ConfigTree {
        &self.fields
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Overwrites a field value, for use by custom hooks. No shape check is made.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field, value)
    }

    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Self> {
        self.members.get(name)
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, &Self)> {
        self.members.iter().map(|(name, member)| (name.as_str(), member))
    }

    pub fn set_member(&mut self, name: impl Into<String>, member: Self) {
        self.members.insert(name.into(), member);
    }

    /// The instance as a tree: its class name, field values and members, recursively.
    #[must_use]
    pub fn summary(&self) -> ConfigTree {
        let mut tree = ConfigTree::new();
        tree.insert("class", self.class.name());
        tree.insert("fields", self.fields.clone());
        if !self.members.is_empty() {
            let members: ConfigTree =
                self.members.iter().map(|(name, member)| (name.clone(), member.summary())).collect();
            tree.insert("members", members);
        }
        tree
    }
}

impl Registry {
    /// Validates `args` against the schema of `class` and builds an instance without
    /// running any creation step.
    ///
    /// Entries absent from `args` take their defaults. Constructing a class that has not
    /// been expanded yet is allowed but logged.
    ///
    /// # Errors
    /// [`SchemaError::UnexpectedArgument`] for keys that are not fields,
    /// [`SchemaError::MissingArgument`] for required fields left unset or set to `???`,
    /// [`SchemaError::TypeMismatch`] for values of the wrong shape, and any expansion error.
    pub fn construct_raw(&self, class: &Class, args: &ConfigTree) -> Result<Instance, SchemaError> {
        if !class.is_sealed() {
            warn!(class = %class, "{class} must be expanded before it can be constructed; expanding it now");
        }
        let schema = self.expand(class)?;

        if let Some(unknown) = args.keys().find(|key| !schema.is_visible(key)) {
            return Err(SchemaError::UnexpectedArgument {
                message: format!("'{unknown}'").into(),
                context: Some(format!("Constructing {class}").into()),
            });
        }

        let mut fields = ConfigTree::new();
        for field in schema.visible_fields() {
            let value = match (args.get(field.name()), field.default()) {
                (Some(value), _) | (None, FieldDefault::Value(value)) => value.clone(),
                (None, FieldDefault::Factory(factory)) => factory.produce(self)?,
                (None, FieldDefault::Required) => Value::Missing,
            };
            if value.is_missing() {
                return Err(SchemaError::MissingArgument {
                    message: format!("'{}' has no value", field.name()).into(),
                    context: Some(format!("Constructing {class}").into()),
                });
            }
            if !field.ty().accepts(&value) {
                return Err(SchemaError::TypeMismatch {
                    message: format!(
                        "'{}' expects {}, got {} ({value})",
                        field.name(),
                        field.ty(),
                        value.type_name()
                    )
                    .into(),
                    context: Some(format!("Constructing {class}").into()),
                });
            }
            fields.insert(field.name(), value);
        }

        Ok(Instance { class: class.clone(), fields, members: IndexMap::new() })
    }

    /// Raw construction followed by the mandatory finalize step.
    ///
    /// # Errors
    /// See [`Registry::construct_raw`] and [`Registry::finalize`].
    pub fn construct(&self, class: &Class, args: &ConfigTree) -> Result<Instance, SchemaError> {
        let mut instance = self.construct_raw(class, args)?;
        self.finalize(&mut instance)?;
        Ok(instance)
    }

    /// Runs the post-construction hook of the instance's class, which defaults to
    /// [`Registry::run_auto_creation`].
    ///
    /// # Errors
    /// Whatever the hook fails with.
    pub fn finalize(&self, instance: &mut Instance) -> Result<(), SchemaError> {
        match instance.class.post_init() {
            Some(hook) => hook(self, instance),
            None => self.run_auto_creation(instance),
        }
    }

    /// Runs every creation step of the instance's class in order. A custom step declared
    /// on the class or an ancestor replaces the generated one.
    ///
    /// # Errors
    /// Any error of a step: unresolvable selectors, missing subtrees, or construction
    /// errors of the members.
    pub fn run_auto_creation(&self, instance: &mut Instance) -> Result<(), SchemaError> {
        let schema = self.expand(&instance.class)?;
        for step in schema.creation_steps() {
            match instance.class.creator(step.name()) {
                Some(custom) => custom(self, instance)?,
                None => self.run_step(instance, step, &schema)?,
            }
        }
        Ok(())
    }

    /// Runs the generated creation step of `member`, for custom steps that wrap it.
    ///
    /// # Errors
    /// [`SchemaError::MissingMember`] if the class has no such member, otherwise as
    /// [`Registry::run_auto_creation`].
    pub fn create_default(&self, instance: &mut Instance, member: &str) -> Result<(), SchemaError> {
        let schema = self.expand(&instance.class)?;
        let step = schema.creation_step(member).ok_or_else(|| SchemaError::MissingMember {
            message: format!("{} has no member '{member}'", instance.class).into(),
            context: None,
        })?;
        self.run_step(instance, step, &schema)
    }

    fn run_step(
        &self,
        instance: &mut Instance,
        step: &CreationStep,
        schema: &Schema,
    ) -> Result<(), SchemaError> {
        let member = step.member();
        let (chosen, args_key) = match step.kind() {
            StepKind::Fixed(declared) => (declared.clone(), args_field(member)),
            StepKind::Pluggable(declared) => {
                let selector_key = class_type_field(member);
                let selected = instance.get(&selector_key).and_then(Value::as_str).ok_or_else(|| {
                    SchemaError::MissingMember {
                        message: format!("'{selector_key}' does not name an implementation").into(),
                        context: Some(format!("Creating {}.{member}", instance.class).into()),
                    }
                })?;

                let chosen = self.get(declared, selected)?;
                if schema.known_implementation(selected).is_some_and(|known| *known != chosen) {
                    warn!(
                        class = %instance.class,
                        member,
                        implementation = selected,
                        "New implementation of {selected} is being chosen."
                    );
                }
                let args_key = implementation_args_field(member, selected);
                (chosen, args_key)
            },
        };

        let args = instance.fields.get_tree(&args_key).cloned().ok_or_else(|| {
            SchemaError::MissingMember {
                message: format!("'{args_key}' is not a config tree").into(),
                context: Some(format!("Creating {}.{member}", instance.class).into()),
            }
        })?;

        let built = self.construct(&chosen, &args)?;
        debug!(class = %instance.class, member, implementation = %chosen, "Member created");
        instance.set_member(member, built);
        Ok(())
    }
}
