use strata_derive::strata_error;
use std::borrow::Cow;

#[strata_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    Err(std::io::Error::other("disk")).context("reading tree")
}

fn main() {
    let err = read().unwrap_err();
    assert!(err.to_string().contains("(reading tree)"));
    let err: DemoError = "broken".into();
    assert_eq!(err.kind(), "Internal");
}
