use std::borrow::Cow;

#[strata_derive::strata_error]
pub enum LookupError {
    #[error("Not registered{}: {message}", format_context(.context))]
    NotRegistered { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Not a subclass{}: {message}", format_context(.context))]
    NotSubclass { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn lookup() -> Result<u8, LookupError> {
    Err(LookupError::NotRegistered { message: "A3".into(), context: None })
}

fn main() {
    let err = lookup().context("resolving renderer").unwrap_err();
    assert_eq!(err.kind(), "NotRegistered");
    assert_eq!(err.to_string(), "Not registered (resolving renderer): A3");
}
