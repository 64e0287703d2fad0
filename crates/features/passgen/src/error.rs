use std::borrow::Cow;

/// Password generation slice error type.
#[derive(Debug, thiserror::Error)]
pub enum PassgenError {
    #[error("Unknown password generator{}: '{name}'", format_context(.context))]
    UnknownGenerator { name: String, context: Option<Cow<'static, str>> },

    #[error("Password too short{}: {length} < {minimum}", format_context(.context))]
    TooShort { length: u32, minimum: u32, context: Option<Cow<'static, str>> },

    #[error("Password too long{}: {length} > {maximum}", format_context(.context))]
    TooLong { length: u32, maximum: u32, context: Option<Cow<'static, str>> },
}

pub trait PassgenErrorExt<T> {
    /// Attaches a human-readable context to the error.
    ///
    /// # Errors
    /// Returns the original error, annotated.
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, PassgenError>;
}

impl<T> PassgenErrorExt<T> for Result<T, PassgenError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                PassgenError::UnknownGenerator { context: c, .. }
                | PassgenError::TooShort { context: c, .. }
                | PassgenError::TooLong { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
