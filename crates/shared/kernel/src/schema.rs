use crate::class::{Class, FieldSpec};
use crate::error::SchemaError;
use fxhash::FxHashSet;
use indexmap::IndexMap;
use tracing::warn;

/// How a creation step builds its member.
#[derive(Debug, Clone)]
pub enum StepKind {
    /// Constructs the declared class from `<member>_args`.
    Fixed(Class),
    /// Resolves `<member>_class_type` inside the namespace of the declared root, then
    /// constructs the chosen class from `<member>_<Chosen>_args`.
    Pluggable(Class),
}

/// A generated `create_<member>` step.
#[derive(Debug, Clone)]
pub struct CreationStep {
    name: String,
    member: String,
    kind: StepKind,
}

impl CreationStep {
    pub(crate) const fn new(name: String, member: String, kind: StepKind) -> Self {
        Self { name, member, kind }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn member(&self) -> &str {
        &self.member
    }

    #[must_use]
    pub const fn kind(&self) -> &StepKind {
        &self.kind
    }

    #[must_use]
    pub const fn is_pluggable(&self) -> bool {
        matches!(self.kind, StepKind::Pluggable(_))
    }
}

/// The sealed, fixed-layout result of expanding a class. Never mutated once sealed.
#[derive(Debug, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    creation_steps: Vec<CreationStep>,
    declared_steps: Vec<CreationStep>,
    processed_members: FxHashSet<String>,
    generated_fields: FxHashSet<String>,
    known_implementations: IndexMap<String, Class>,
}

impl Schema {
    /// Inherited fields first, then own fields, then generated ones.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Creation steps in execution order, inherited ones first.
    #[must_use]
    pub fn creation_steps(&self) -> &[CreationStep] {
        &self.creation_steps
    }

    #[must_use]
    pub fn creation_step(&self, member: &str) -> Option<&CreationStep> {
        self.creation_steps.iter().find(|step| step.member() == member)
    }

    /// Whether `name` was declared as a member (here or in an ancestor) and replaced by
    /// generated fields.
    #[must_use]
    pub fn is_processed_member(&self, name: &str) -> bool {
        self.processed_members.contains(name)
    }

    /// The implementation registered under `name` when the class was sealed.
    #[must_use]
    pub fn known_implementation(&self, name: &str) -> Option<&Class> {
        self.known_implementations.get(name)
    }

    pub fn known_implementations(&self) -> impl Iterator<Item = (&str, &Class)> {
        self.known_implementations.iter().map(|(name, class)| (name.as_str(), class))
    }

    /// Whether `name` is a selector or subtree field produced by member processing.
    #[must_use]
    pub fn is_generated(&self, name: &str) -> bool {
        self.generated_fields.contains(name)
    }

    /// Whether `name` is a field that extracted trees and constructor arguments carry.
    /// A generated field stays visible even when it shares its name with a member.
    #[must_use]
    pub fn is_visible(&self, name: &str) -> bool {
        self.field(name).is_some() && (self.is_generated(name) || !self.is_processed_member(name))
    }

    /// Fields that appear in extracted trees and constructor arguments.
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields
            .iter()
            .filter(|field| self.is_generated(field.name()) || !self.is_processed_member(field.name()))
    }
}

/// The first phase of schema building: an ordered field list and bookkeeping, assembled
/// from the ancestors and the class body before the schema is sealed.
#[derive(Debug, Default)]
pub(crate) struct SchemaDraft {
    fields: Vec<FieldSpec>,
    own_names: FxHashSet<String>,
    steps: Vec<CreationStep>,
    declared_steps: Vec<CreationStep>,
    processed_members: FxHashSet<String>,
    generated_fields: FxHashSet<String>,
    known_implementations: IndexMap<String, Class>,
}

impl SchemaDraft {
    /// Merges the steps an ancestor declared itself, its transformed members and its known
    /// implementations. Ancestors are merged root-most first.
    pub(crate) fn inherit_bookkeeping(&mut self, ancestor: &Schema) {
        self.steps.extend(ancestor.declared_steps.iter().cloned());
        self.processed_members.extend(ancestor.processed_members.iter().cloned());
        self.generated_fields.extend(ancestor.generated_fields.iter().cloned());
        self.known_implementations.extend(
            ancestor.known_implementations.iter().map(|(name, class)| (name.clone(), class.clone())),
        );
    }

    pub(crate) fn inherit_fields(&mut self, parent: &Schema) {
        self.fields.clone_from(&parent.fields);
    }

    /// Whether the class body itself declares `name`, or a generated field already took it.
    pub(crate) fn declares(&self, name: &str) -> bool {
        self.own_names.contains(name)
    }

    pub(crate) fn declare_field(&mut self, field: FieldSpec) {
        self.own_names.insert(field.name().to_owned());
        self.upsert(field);
    }

    /// Adds a generated field. Inherited fields of the same name are overridden in place;
    /// own ones are a collision.
    pub(crate) fn generate_field(&mut self, owner: &Class, field: FieldSpec) -> Result<(), SchemaError> {
        if self.declares(field.name()) {
            return Err(SchemaError::FieldCollision {
                message: format!("cannot generate '{}' because it is already present", field.name())
                    .into(),
                context: Some(format!("Expanding {owner}").into()),
            });
        }
        self.generated_fields.insert(field.name().to_owned());
        self.declare_field(field);
        Ok(())
    }

    pub(crate) fn know(&mut self, implementation: &Class) {
        self.known_implementations.insert(implementation.name().to_owned(), implementation.clone());
    }

    pub(crate) fn add_step(&mut self, member: &str, step: CreationStep) {
        self.processed_members.insert(member.to_owned());
        self.declared_steps.push(step.clone());
        self.steps.push(step);
    }

    /// Seals the draft. A step name seen more than once keeps its first position and its
    /// last definition.
    pub(crate) fn finish(self, owner: &Class) -> Schema {
        let mut steps: IndexMap<String, CreationStep> = IndexMap::with_capacity(self.steps.len());
        for step in self.steps {
            if steps.contains_key(step.name()) {
                warn!(class = %owner, step = step.name(), "Creation step clashes with one declared in a base class");
            }
            steps.insert(step.name().to_owned(), step);
        }

        Schema {
            fields: self.fields,
            creation_steps: steps.into_values().collect(),
            declared_steps: self.declared_steps,
            processed_members: self.processed_members,
            generated_fields: self.generated_fields,
            known_implementations: self.known_implementations,
        }
    }

    fn upsert(&mut self, field: FieldSpec) {
        match self.fields.iter_mut().find(|existing| existing.name() == field.name()) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }
}
