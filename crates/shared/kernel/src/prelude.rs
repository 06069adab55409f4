//! Everything needed to declare, register, extract and construct classes.

pub use crate::callable::Signature;
pub use crate::class::{Class, FieldType, Marker};
pub use crate::defaults::{DefaultFactory, Target};
pub use crate::error::{SchemaError, SchemaErrorExt};
pub use crate::instance::Instance;
pub use crate::registry::Registry;
pub use crate::signature;
pub use strata_tree::{ConfigTree, Value, config_tree, remove_unused_components};
