//! The naming contract shared by schema expansion, pruning and external tooling.
//!
//! For a member `renderer` whose type is pluggable, the expanded schema carries
//! `renderer_class_type` (the selector) and one `renderer_<Implementation>_args` subtree
//! per known implementation. For a member with a fixed type it carries `renderer_args`.

/// Suffix of the key selecting the active implementation of a pluggable member.
pub const TYPE_SUFFIX: &str = "_class_type";

/// Suffix of every generated parameter subtree.
pub const ARGS_SUFFIX: &str = "_args";

/// Default selector value of a pluggable member nobody chose an implementation for.
pub const UNDEFAULTED: &str = "UNDEFAULTED";

/// Placeholder for a required entry that has no default.
pub const MISSING: &str = "???";

/// Prefix of generated creation step names.
pub const CREATE_PREFIX: &str = "create_";

/// `<member>_class_type`
#[must_use]
pub fn class_type_field(member: &str) -> String {
    format!("{member}{TYPE_SUFFIX}")
}

/// `<member>_args`
#[must_use]
pub fn args_field(member: &str) -> String {
    format!("{member}{ARGS_SUFFIX}")
}

/// `<member>_<implementation>_args`
#[must_use]
pub fn implementation_args_field(member: &str, implementation: &str) -> String {
    format!("{member}_{implementation}{ARGS_SUFFIX}")
}

/// `create_<member>`
#[must_use]
pub fn creation_step(member: &str) -> String {
    format!("{CREATE_PREFIX}{member}")
}

/// Returns the member name if `key` is a selector key.
#[must_use]
pub fn selector_member(key: &str) -> Option<&str> {
    key.strip_suffix(TYPE_SUFFIX).filter(|member| !member.is_empty())
}
