use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unable to convert value from `{from}` to `{to}`.")]
pub struct ConversionFailure {
    pub from: Cow<'static, str>,
    pub to: Cow<'static, str>,
}

impl ConversionFailure {
    pub fn new<A, B>(from: A, to: B) -> Self
    where
        A: Into<Cow<'static, str>>,
        B: Into<Cow<'static, str>>,
    {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}
