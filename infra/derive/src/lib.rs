#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the strata crates.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! strata-derive = { path = "../infra/derive" }
//! thiserror = "2"
//! ```
//!
//! The examples below are `ignore`d because a proc-macro crate cannot use its own macros;
//! the integration tests under `tests/ui` compile them for real.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining the error enum of a crate or module.
///
/// The annotated enum is turned into a `thiserror` error with a few conventions on top.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>` and for
///   `Result<T, SourceError>` of every variant that wraps a source error.
/// * `From<SourceError>` for variants with a `source` (or `#[source]`/`#[from]`) field.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant is present.
/// * `kind(&self) -> &'static str` returning the variant name, for structured logging.
/// * A module-private `format_context` helper used inside `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. A `context` field must have the type `Option<Cow<'static, str>>`.
/// 3. Variants that wrap a source error must also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[strata_derive::strata_error]
/// pub enum TreeError {
///     #[error("YAML error{}: {source}", format_context(.context))]
///     Yaml { source: serde_yaml::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal tree error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn parse(text: &str) -> Result<Value, TreeError> {
///     serde_yaml::from_str(text).context("Parsing override")
/// }
/// ```
#[proc_macro_attribute]
pub fn strata_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
