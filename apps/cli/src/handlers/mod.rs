pub mod build;
pub mod defaults;
pub mod list;
