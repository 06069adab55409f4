//! Facade crate for the strata libraries.
//! Re-exports the config tree and the kernel (class model, registry, expansion and
//! construction) behind one dependency. Keep this crate thin: it composes other crates.
//!
//! ## Usage
//! - Add `strata`, optionally with the `logger` feature for subscriber setup.
//! - `use strata::prelude::*;` brings the everyday types and free functions into scope.
//!
//! ```rust
//! use strata::prelude::*;
//!
//! let registry = Registry::default();
//! let shader = Class::replaceable("Shader").build();
//! let phong = Class::extends(&shader, "Phong").field("shininess", 32).build();
//! registry.register(phong)?;
//!
//! let renderer = Class::configurable("Renderer").member("shader", &shader).build();
//! registry.expand(&renderer)?;
//!
//! let mut args = registry.default_args(&renderer)?;
//! args.insert("shader_class_type", "Phong");
//! remove_unused_components(&mut args);
//! assert!(args.contains_key("shader_Phong_args"));
//!
//! let built = registry.construct(&renderer, &args)?;
//! assert_eq!(built.member("shader").map(|m| m.class().name()), Some("Phong"));
//! # Ok::<(), strata::kernel::SchemaError>(())
//! ```

pub use strata_kernel as kernel;
pub use strata_tree as tree;

#[cfg(feature = "logger")]
pub use strata_logger as logger;

pub use strata_kernel::{
    construct, expand_args_fields, get_default_args, get_default_args_field, register,
    run_auto_creation,
};

pub mod prelude {
    pub use strata_kernel::prelude::*;
    pub use strata_kernel::{
        construct, expand_args_fields, get_default_args, get_default_args_field, register,
        run_auto_creation,
    };
}

/// Build-time enabled features (by Cargo feature).
pub const ENABLED: &[&str] = &[
    #[cfg(feature = "logger")]
    "logger",
];

#[must_use]
pub fn is_enabled(name: &str) -> bool {
    ENABLED.contains(&name)
}
