use crate::services::TodoError;

/// Failure surfaced at the HTTP boundary.
///
/// Client-side kinds render as `{"message": ..}`; `Internal` is a 500 carrying
/// the underlying message verbatim as `{"error": ..}`.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    MethodNotAllowed(String),
    Internal(String),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::MethodNotAllowed(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(message) | Self::MethodNotAllowed(message) | Self::Internal(message) => {
                message.as_str()
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        match err {
            // an id that could never have been issued is reported like any unknown id
            TodoError::NotFound | TodoError::InvalidIdentifier(_) => {
                AppError::not_found(TodoError::NotFound.to_string())
            }
            TodoError::Validation(_) | TodoError::Storage(_) => AppError::internal(err.to_string()),
        }
    }
}
