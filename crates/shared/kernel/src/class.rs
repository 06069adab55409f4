//! Class declarations.
//!
//! A [`Class`] is a cheap, clonable handle on an immutable declaration: a name, a marker
//! role, an optional parent, an ordered list of declared fields and members, and optional
//! creation hooks. The only mutable part is the sealed [`Schema`] slot, filled exactly once
//! by the expander.

use crate::defaults::DefaultFactory;
use crate::error::SchemaError;
use crate::instance::Instance;
use crate::registry::Registry;
use crate::schema::Schema;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use strata_tree::Value;
use strata_tree::naming::creation_step;

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Class`]. Two classes with the same name are still
/// different classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u64);

impl ClassId {
    fn next() -> Self {
        Self(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Role of a class in expansion and registration. Inherited from the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// A class with exactly one implementation. Expanded, never registered.
    Configurable,
    /// Part of a pluggable hierarchy. A replaceable class without a parent is a namespace
    /// root; its descendants can be registered as named implementations.
    Replaceable,
}

/// A construction hook: a custom creation step or a post-construction hook.
pub type Hook = Arc<dyn Fn(&Registry, &mut Instance) -> Result<(), SchemaError> + Send + Sync>;

/// Structural shape of a plain field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    #[default]
    Any,
    Bool,
    Int,
    Float,
    Str,
    List,
    Tree,
}

impl FieldType {
    /// The shape of a default value. `null` and `???` say nothing, so they give `Any`.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Bool(_) => Self::Bool,
            Value::Int(_) => Self::Int,
            Value::Float(_) => Self::Float,
            Value::Str(_) => Self::Str,
            Value::List(_) => Self::List,
            Value::Tree(_) => Self::Tree,
            Value::Null | Value::Missing => Self::Any,
        }
    }

    /// Whether `value` may be stored in a field of this shape. Integers are accepted for
    /// floats, `null` is accepted everywhere and the missing placeholder nowhere.
    #[must_use]
    pub const fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Missing) => false,
            (Self::Any, _)
            | (_, Value::Null)
            | (Self::Bool, Value::Bool(_))
            | (Self::Int, Value::Int(_))
            | (Self::Float, Value::Float(_) | Value::Int(_))
            | (Self::Str, Value::Str(_))
            | (Self::List, Value::List(_))
            | (Self::Tree, Value::Tree(_)) => true,
            _ => false,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::List => "list",
            Self::Tree => "tree",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the default of a field comes from.
#[derive(Debug, Clone)]
pub enum FieldDefault {
    /// No default: extracted as `???`, must be supplied at construction.
    Required,
    Value(Value),
    /// Evaluated every time a default is needed, so each tree gets a fresh value.
    Factory(DefaultFactory),
}

/// A plain (non-member) field of a class schema.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    ty: FieldType,
    default: FieldDefault,
}

impl FieldSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType, default: FieldDefault) -> Self {
        Self { name: name.into(), ty, default }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn ty(&self) -> FieldType {
        self.ty
    }

    #[must_use]
    pub const fn default(&self) -> &FieldDefault {
        &self.default
    }
}

/// One entry of a class body, in declaration order.
#[derive(Debug, Clone)]
pub enum Declaration {
    Field(FieldSpec),
    /// A member whose type is another class. Replaced by generated fields on expansion.
    Member { name: String, class: Class },
}

impl Declaration {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Field(spec) => spec.name(),
            Self::Member { name, .. } => name,
        }
    }
}

struct ClassInner {
    id: ClassId,
    name: String,
    marker: Marker,
    parent: Option<Class>,
    declarations: Vec<Declaration>,
    creators: FxHashMap<String, Hook>,
    post_init: Option<Hook>,
    schema: RwLock<Option<Arc<Schema>>>,
}

/// Handle on a declared class. Equality and hashing go by identity.
#[derive(Clone)]
pub struct Class(Arc<ClassInner>);

impl Class {
    /// Starts a class with a single implementation.
    pub fn configurable(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name.into(), Marker::Configurable, None)
    }

    /// Starts a namespace root of a pluggable hierarchy.
    pub fn replaceable(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name.into(), Marker::Replaceable, None)
    }

    /// Starts a subclass of `parent`, inheriting its marker, fields, members and hooks.
    pub fn extends(parent: &Self, name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name.into(), parent.marker(), Some(parent.clone()))
    }

    #[must_use]
    pub fn id(&self) -> ClassId {
        self.0.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    #[must_use]
    pub fn marker(&self) -> Marker {
        self.0.marker
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.0.parent.as_ref()
    }

    /// Own declarations, without the inherited ones.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.0.declarations
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(self.parent(), |class| class.parent())
    }

    /// Inclusive: every class is a subclass of itself.
    #[must_use]
    pub fn is_subclass_of(&self, other: &Self) -> bool {
        self == other || self.ancestors().any(|ancestor| ancestor == other)
    }

    #[must_use]
    pub fn is_namespace_root(&self) -> bool {
        self.marker() == Marker::Replaceable && self.parent().is_none()
    }

    /// The namespace this class would be registered in, if it is replaceable.
    #[must_use]
    pub fn namespace_root(&self) -> Option<&Self> {
        let top = self.ancestors().last().unwrap_or(self);
        top.is_namespace_root().then_some(top)
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.0.schema.read().is_some()
    }

    /// The sealed schema, once the class has been expanded.
    #[must_use]
    pub fn schema(&self) -> Option<Arc<Schema>> {
        self.0.schema.read().clone()
    }

    /// Stores the schema unless another expansion sealed the class first, and returns the
    /// schema that ends up sealed.
    pub(crate) fn seal(&self, schema: Schema) -> Arc<Schema> {
        self.0.schema.write().get_or_insert_with(|| Arc::new(schema)).clone()
    }

    /// The custom creation step registered under `step` on this class or its nearest
    /// ancestor declaring one.
    #[must_use]
    pub fn creator(&self, step: &str) -> Option<Hook> {
        std::iter::once(self)
            .chain(self.ancestors())
            .find_map(|class| class.0.creators.get(step).cloned())
    }

    /// The post-construction hook of this class or its nearest ancestor declaring one.
    #[must_use]
    pub fn post_init(&self) -> Option<Hook> {
        std::iter::once(self).chain(self.ancestors()).find_map(|class| class.0.post_init.clone())
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.0.name)
            .field("id", &self.0.id)
            .field("marker", &self.0.marker)
            .field("parent", &self.0.parent.as_ref().map(Self::name))
            .field("sealed", &self.is_sealed())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// Collects the body of a [`Class`]. Redeclaring a name replaces the earlier declaration
/// in place.
#[must_use]
pub struct ClassBuilder {
    name: String,
    marker: Marker,
    parent: Option<Class>,
    declarations: Vec<Declaration>,
    creators: FxHashMap<String, Hook>,
    post_init: Option<Hook>,
}

impl ClassBuilder {
    fn new(name: String, marker: Marker, parent: Option<Class>) -> Self {
        Self {
            name,
            marker,
            parent,
            declarations: Vec::new(),
            creators: FxHashMap::default(),
            post_init: None,
        }
    }

    /// A plain field whose shape is inferred from its default.
    pub fn field(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        let default = default.into();
        let ty = FieldType::of(&default);
        self.declare(Declaration::Field(FieldSpec::new(name, ty, FieldDefault::Value(default))))
    }

    pub fn typed_field(self, name: impl Into<String>, ty: FieldType, default: impl Into<Value>) -> Self {
        self.declare(Declaration::Field(FieldSpec::new(name, ty, FieldDefault::Value(default.into()))))
    }

    /// A plain field without a default.
    pub fn required(self, name: impl Into<String>, ty: FieldType) -> Self {
        self.declare(Declaration::Field(FieldSpec::new(name, ty, FieldDefault::Required)))
    }

    /// A plain field whose default is produced on demand, typically by
    /// [`Registry::default_args_field`].
    pub fn field_factory(self, name: impl Into<String>, factory: DefaultFactory) -> Self {
        self.declare(Declaration::Field(FieldSpec::new(
            name,
            FieldType::Any,
            FieldDefault::Factory(factory),
        )))
    }

    /// A member typed by another class.
    pub fn member(self, name: impl Into<String>, class: &Class) -> Self {
        self.declare(Declaration::Member { name: name.into(), class: class.clone() })
    }

    /// Replaces the generated `create_<member>` step of this class and its subclasses.
    pub fn creator<F>(mut self, member: &str, creator: F) -> Self
    where
        F: Fn(&Registry, &mut Instance) -> Result<(), SchemaError> + Send + Sync + 'static,
    {
        self.creators.insert(creation_step(member), Arc::new(creator));
        self
    }

    /// Replaces the post-construction hook, which runs auto-creation by default. A custom
    /// hook usually calls [`Registry::run_auto_creation`] itself.
    pub fn post_init<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Registry, &mut Instance) -> Result<(), SchemaError> + Send + Sync + 'static,
    {
        self.post_init = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn build(self) -> Class {
        Class(Arc::new(ClassInner {
            id: ClassId::next(),
            name: self.name,
            marker: self.marker,
            parent: self.parent,
            declarations: self.declarations,
            creators: self.creators,
            post_init: self.post_init,
            schema: RwLock::new(None),
        }))
    }

    fn declare(mut self, declaration: Declaration) -> Self {
        match self.declarations.iter_mut().find(|existing| existing.name() == declaration.name()) {
            Some(existing) => *existing = declaration,
            None => self.declarations.push(declaration),
        }
        self
    }
}

impl fmt::Debug for ClassBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassBuilder")
            .field("name", &self.name)
            .field("marker", &self.marker)
            .field("declarations", &self.declarations)
            .field("creators", &self.creators.keys().collect::<Vec<_>>())
            .field("post_init", &self.post_init.is_some())
            .finish_non_exhaustive()
    }
}
