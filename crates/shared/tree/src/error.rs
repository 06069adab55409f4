use std::borrow::Cow;

/// Errors raised while reading, writing or editing a config tree.
#[strata_derive::strata_error]
pub enum TreeError {
    /// The text is not valid YAML, or does not describe a tree.
    #[error("YAML error{}: {source}", format_context(.context))]
    Yaml { source: serde_yaml::Error, context: Option<Cow<'static, str>> },

    /// The text is not valid JSON, or does not describe a tree.
    #[error("JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// A dotted path crosses a value that is not a tree.
    #[error("Invalid tree path{}: {message}", format_context(.context))]
    Path { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal tree error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
