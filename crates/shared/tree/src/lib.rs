//! # Config Trees
//!
//! Pure data crate: ordered, nested key/value trees that describe how to construct a
//! configurable class, plus the naming contract that links a tree to the class schema it
//! was extracted from. No schema knowledge lives here.
//!
//! * [`ConfigTree`] keeps insertion order and round-trips through YAML and JSON without
//!   losing the distinction between integers, floats and strings.
//! * [`remove_unused_components`] prunes the parameter subtrees of every variant that is
//!   not currently selected by a `<member>_class_type` key.
//!
//! ## Example
//!
//! ```rust
//! use strata_tree::{config_tree, remove_unused_components};
//!
//! let mut tree = config_tree! {
//!     "renderer_class_type" => "LSTMRenderer",
//!     "renderer_LSTMRenderer_args" => config_tree! { "num_raymarch_steps" => 10 },
//!     "renderer_SignedDistanceFunctionRenderer_args" => config_tree! { "bg_color" => 0.0 },
//! };
//!
//! remove_unused_components(&mut tree);
//! assert!(tree.contains_key("renderer_LSTMRenderer_args"));
//! assert!(!tree.contains_key("renderer_SignedDistanceFunctionRenderer_args"));
//!
//! let yaml = tree.to_yaml().unwrap();
//! assert_eq!(strata_tree::ConfigTree::from_yaml(&yaml).unwrap(), tree);
//! ```

mod error;
pub mod naming;
mod prune;
mod tree;
mod value;

pub use crate::error::{TreeError, TreeErrorExt};
pub use crate::prune::remove_unused_components;
pub use crate::tree::ConfigTree;
pub use crate::value::Value;

/// Builds a [`ConfigTree`] literal, keeping the written key order.
///
/// ```rust
/// use strata_tree::{Value, config_tree};
///
/// let tree = config_tree! { "m" => 3, "nested" => config_tree! { "n" => "2" } };
/// assert_eq!(tree.get("m"), Some(&Value::Int(3)));
/// assert_eq!(tree.get_path("nested.n").and_then(Value::as_str), Some("2"));
/// ```
#[macro_export]
macro_rules! config_tree {
    () => {
        $crate::ConfigTree::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut tree = $crate::ConfigTree::new();
        $( tree.insert($key, $value); )+
        tree
    }};
}
