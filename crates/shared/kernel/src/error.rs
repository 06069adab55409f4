use std::borrow::Cow;

/// Errors raised while registering, expanding, extracting or constructing classes.
#[strata_derive::strata_error]
pub enum SchemaError {
    /// The class has no replaceable namespace root in its ancestor chain.
    #[error("Unknown namespace{}: {message}", format_context(.context))]
    UnknownNamespace { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A namespace root was passed where an implementation is expected.
    #[error("Cannot register a namespace root{}: {message}", format_context(.context))]
    RootRegistration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// No implementation is registered under the requested name.
    #[error("Not registered{}: {message}", format_context(.context))]
    NotRegistered { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The name resolves to a class outside the requested base.
    #[error("Not a subclass{}: {message}", format_context(.context))]
    NotSubclass { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A generated field would overwrite a declared one.
    #[error("Field collision{}: {message}", format_context(.context))]
    FieldCollision { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A class nests itself, one of its subclasses, or a class it is being expanded for.
    #[error("Cyclic member{}: {message}", format_context(.context))]
    CyclicMember { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A class was requested again through its own dependency chain.
    #[error("Recursive expansion{}: {message}", format_context(.context))]
    RecursiveExpansion { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unexpected argument{}: {message}", format_context(.context))]
    UnexpectedArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Missing argument{}: {message}", format_context(.context))]
    MissingArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A value does not have the shape its field declares.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A creation step could not find the subtree or selector it reads.
    #[error("Missing member configuration{}: {message}", format_context(.context))]
    MissingMember { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal schema error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
