//! Tagged outcome shared by every extractor, inline-suggestion handler and image builder.

/// Outcome of running a handler against one diagnostic.
///
/// Callers must branch on the variant; "inapplicable" is never a success without data.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerResult<T> {
    /// The handler produced its output.
    Success(T),
    /// The diagnostic did not have the shape this handler understands (wording changed, or it is
    /// another variant of the same code). Not an error; the diagnostic is simply not handled.
    Inapplicable {
        /// Optional explanation, for logs only.
        context: Option<String>,
    },
    /// Something unexpected went wrong while producing the output.
    Failed {
        /// What went wrong.
        context: String,
    },
}

impl<T> HandlerResult<T> {
    /// Inapplicable with an explanation.
    pub fn inapplicable(context: impl Into<String>) -> Self {
        Self::Inapplicable {
            context: Some(context.into()),
        }
    }

    /// Inapplicable without an explanation.
    pub fn not_applicable() -> Self {
        Self::Inapplicable { context: None }
    }

    /// A failure.
    pub fn failed(context: impl Into<String>) -> Self {
        Self::Failed {
            context: context.into(),
        }
    }

    /// `true` for [`HandlerResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// `true` for anything but [`HandlerResult::Success`].
    pub fn is_unsuccessful(&self) -> bool {
        !self.is_success()
    }

    /// The success payload, if any.
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// The context string of an unsuccessful result.
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Inapplicable { context } => context.as_deref(),
            Self::Failed { context } => Some(context),
        }
    }

    /// Map the success payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> HandlerResult<U> {
        match self {
            Self::Success(data) => HandlerResult::Success(f(data)),
            Self::Inapplicable { context } => HandlerResult::Inapplicable { context },
            Self::Failed { context } => HandlerResult::Failed { context },
        }
    }

    /// Chain another handler step on success.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> HandlerResult<U>) -> HandlerResult<U> {
        match self {
            Self::Success(data) => f(data),
            Self::Inapplicable { context } => HandlerResult::Inapplicable { context },
            Self::Failed { context } => HandlerResult::Failed { context },
        }
    }
}

impl<T> From<Option<T>> for HandlerResult<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(data) => Self::Success(data),
            None => Self::not_applicable(),
        }
    }
}
