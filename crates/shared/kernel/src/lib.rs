//! # Strata Kernel
//!
//! Turns class declarations into self-describing default-argument trees, and lets a class
//! defer the concrete type of a member to a name resolved when it is constructed.
//!
//! * [`Registry`] stores named implementations per replaceable namespace.
//! * [`Registry::expand`] seals a class into a [`Schema`](schema::Schema): members typed by
//!   other classes become generated `_args` subtrees, selectors and creation steps.
//! * [`Registry::default_args`] extracts a fresh [`ConfigTree`] from a class or a
//!   [`Signature`].
//! * [`Registry::construct`] validates a tree and runs the creation steps, resolving
//!   pluggable members through the registry.
//!
//! The free functions of this crate operate on [`Registry::global`].
//!
//! ## Example
//!
//! ```rust
//! use strata_kernel::prelude::*;
//!
//! # fn main() -> Result<(), SchemaError> {
//! let registry = Registry::new();
//! let a = Class::replaceable("A").build();
//! registry.register(Class::extends(&a, "A1").field("m", 3).build())?;
//! registry.register(Class::extends(&a, "A2").field("n", "2").build())?;
//! let b = Class::configurable("B").field("a_class_type", "A2").member("a", &a).build();
//!
//! let defaults = registry.default_args(&b)?;
//! assert_eq!(defaults.get_path("a_A1_args.m"), Some(&Value::Int(3)));
//!
//! let built = registry.construct(&b, &defaults)?;
//! assert_eq!(built.member("a").map(|a| a.class().name()), Some("A2"));
//! # Ok(())
//! # }
//! ```

pub mod callable;
pub mod class;
pub mod config;
mod defaults;
mod error;
mod expand;
mod instance;
pub mod prelude;
mod registry;
pub mod schema;

pub use crate::callable::Signature;
pub use crate::class::{Class, ClassBuilder, ClassId, FieldType, Hook, Marker};
pub use crate::defaults::{DefaultFactory, Target};
pub use crate::error::{SchemaError, SchemaErrorExt};
pub use crate::instance::Instance;
pub use crate::registry::Registry;
pub use strata_tree::{ConfigTree, Value, remove_unused_components};

/// Registers `class` in the global registry.
///
/// # Errors
/// See [`Registry::register`].
pub fn register(class: Class) -> Result<Class, SchemaError> {
    Registry::global().register(class)
}

/// Expands `class` against the global registry and returns it.
///
/// # Errors
/// See [`Registry::expand`].
pub fn expand_args_fields(class: &Class) -> Result<Class, SchemaError> {
    Registry::global().expand(class)?;
    Ok(class.clone())
}

/// # Errors
/// See [`Registry::default_args`].
pub fn get_default_args(target: impl Into<Target>) -> Result<ConfigTree, SchemaError> {
    Registry::global().default_args(target)
}

#[must_use]
pub fn get_default_args_field(target: impl Into<Target>) -> DefaultFactory {
    Registry::global().default_args_field(target)
}

/// # Errors
/// See [`Registry::construct`].
pub fn construct(class: &Class, args: &ConfigTree) -> Result<Instance, SchemaError> {
    Registry::global().construct(class, args)
}

/// # Errors
/// See [`Registry::run_auto_creation`].
pub fn run_auto_creation(instance: &mut Instance) -> Result<(), SchemaError> {
    Registry::global().run_auto_creation(instance)
}
