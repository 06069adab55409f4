use crate::class::{Class, Declaration, FieldDefault, FieldSpec, FieldType};
use crate::defaults::class_args_factory;
use crate::error::SchemaError;
use crate::registry::Registry;
use crate::schema::{CreationStep, Schema, SchemaDraft, StepKind};
use std::sync::Arc;
use strata_tree::naming::{self, UNDEFAULTED};
use tracing::debug;

/// The classes currently being expanded or extracted along one dependency chain.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExpansionGuard {
    chain: Vec<Class>,
}

impl ExpansionGuard {
    pub(crate) fn contains(&self, class: &Class) -> bool {
        self.chain.contains(class)
    }

    #[must_use]
    pub(crate) fn with(&self, class: &Class) -> Self {
        let mut next = self.clone();
        if !next.contains(class) {
            next.chain.push(class.clone());
        }
        next
    }

    #[must_use]
    pub(crate) fn union(&self, other: &Self) -> Self {
        other.chain.iter().fold(self.clone(), |guard, class| guard.with(class))
    }

    pub(crate) fn describe(&self) -> String {
        let names: Vec<&str> = self.chain.iter().map(Class::name).collect();
        format!("Chain: {}", names.join(" -> "))
    }
}

impl Registry {
    /// Expands `class` into its sealed schema, or returns the schema it was sealed with.
    ///
    /// Ancestors are expanded first. Every member typed by a namespace root becomes a
    /// `<member>_class_type` selector plus one `<member>_<Impl>_args` subtree per
    /// implementation registered at this point; every other member becomes a
    /// `<member>_args` subtree. Each member gets a `create_<member>` step.
    ///
    /// # Errors
    /// [`SchemaError::FieldCollision`] if a generated field is already declared,
    /// [`SchemaError::CyclicMember`] if a member nests the class in itself, and
    /// [`SchemaError::RecursiveExpansion`] if the class is reached through its own
    /// dependency chain. A class that fails stays unsealed.
    pub fn expand(&self, class: &Class) -> Result<Arc<Schema>, SchemaError> {
        self.expand_guarded(class, &ExpansionGuard::default())
    }

    pub(crate) fn expand_guarded(
        &self,
        class: &Class,
        guard: &ExpansionGuard,
    ) -> Result<Arc<Schema>, SchemaError> {
        if let Some(schema) = class.schema() {
            return Ok(schema);
        }
        if guard.contains(class) {
            return Err(SchemaError::RecursiveExpansion {
                message: format!("{class} is needed while it is being expanded").into(),
                context: Some(guard.describe().into()),
            });
        }

        let mut draft = SchemaDraft::default();
        let ancestors: Vec<&Class> = class.ancestors().collect();
        for ancestor in ancestors.iter().rev() {
            let schema = self.expand_guarded(ancestor, guard)?;
            draft.inherit_bookkeeping(&schema);
            if class.parent() == Some(*ancestor) {
                draft.inherit_fields(&schema);
            }
        }

        for declaration in class.declarations() {
            if let Declaration::Field(field) = declaration {
                draft.declare_field(field.clone());
            }
        }
        for declaration in class.declarations() {
            if let Declaration::Member { name, class: declared } = declaration {
                self.expand_member(class, name, declared, guard, &mut draft)?;
            }
        }

        let schema = class.seal(draft.finish(class));
        debug!(
            class = %class,
            fields = schema.fields().len(),
            steps = schema.creation_steps().len(),
            "Class expanded"
        );
        Ok(schema)
    }

    fn expand_member(
        &self,
        owner: &Class,
        member: &str,
        declared: &Class,
        guard: &ExpansionGuard,
        draft: &mut SchemaDraft,
    ) -> Result<(), SchemaError> {
        let inner = guard.with(owner);

        let kind = if declared.is_namespace_root() {
            let selector = naming::class_type_field(member);
            if !draft.declares(&selector) {
                draft.generate_field(
                    owner,
                    FieldSpec::new(selector, FieldType::Str, FieldDefault::Value(UNDEFAULTED.into())),
                )?;
            }

            for candidate in self.get_all(declared)? {
                // Skips the class itself, its subclasses, and anything mid-expansion.
                if guard.contains(&candidate) || candidate.is_subclass_of(owner) {
                    continue;
                }
                draft.know(&candidate);
                draft.generate_field(
                    owner,
                    FieldSpec::new(
                        naming::implementation_args_field(member, candidate.name()),
                        FieldType::Tree,
                        FieldDefault::Factory(class_args_factory(candidate, inner.clone())),
                    ),
                )?;
            }
            StepKind::Pluggable(declared.clone())
        } else {
            if declared.is_subclass_of(owner) || guard.contains(declared) {
                return Err(SchemaError::CyclicMember {
                    message: format!("cannot process {declared} inside {owner}").into(),
                    context: Some(format!("Member '{member}'; {}", inner.describe()).into()),
                });
            }
            draft.generate_field(
                owner,
                FieldSpec::new(
                    naming::args_field(member),
                    FieldType::Tree,
                    FieldDefault::Factory(class_args_factory(declared.clone(), inner)),
                ),
            )?;
            StepKind::Fixed(declared.clone())
        };

        draft.add_step(member, CreationStep::new(naming::creation_step(member), member.to_owned(), kind));
        Ok(())
    }
}
