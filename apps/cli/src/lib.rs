//! # Strata CLI
//!
//! Library half of the `strata` binary: argument models, settings, the demo renderer
//! catalog and one handler per subcommand. Handlers return the rendered document; the
//! binary owns stdout.

pub mod catalog;
pub mod handlers;
pub mod models;
pub mod settings;

pub use crate::catalog::Catalog;
pub use crate::settings::{CliSettings, OutputFormat};
