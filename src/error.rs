use odata_syntax::ParseError;
use std::fmt;
use thiserror::Error;

/// Where an unresolved field name was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldContext {
    Filter,
    Select,
}

impl fmt::Display for FieldContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldContext::Filter => f.write_str("filter"),
            FieldContext::Select => f.write_str("select"),
        }
    }
}

/// Coarse error category a host reports to its own callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The filter or select list was wrong. The message is safe to show.
    BadRequest,
    /// Anything else. The message may leak internals and should only be logged.
    InternalServerError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum TransformError {
    #[error(transparent)]
    Syntax(ParseError),

    #[error(
        "Invalid {context} field '{field}'. Please check that it is present in the backend field configuration"
    )]
    UnresolvedField { context: FieldContext, field: String },

    #[error("An unknown error occurred while building the search query")]
    Internal(#[source] anyhow::Error),
}

impl TransformError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::Syntax(_) | TransformError::UnresolvedField { .. } => {
                ErrorKind::BadRequest
            }
            TransformError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn is_user_error(&self) -> bool {
        self.kind() == ErrorKind::BadRequest
    }

    /// Byte offset in the filter string, for syntax errors.
    pub fn position(&self) -> Option<usize> {
        match self {
            TransformError::Syntax(err) => Some(err.position()),
            _ => None,
        }
    }
}

impl From<ParseError> for TransformError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnresolvedField { field, .. } => TransformError::UnresolvedField {
                context: FieldContext::Filter,
                field,
            },
            other => TransformError::Syntax(other),
        }
    }
}

impl From<serde_json::Error> for TransformError {
    fn from(err: serde_json::Error) -> Self {
        TransformError::Internal(anyhow::Error::new(err).context("Serialize query document failed."))
    }
}
