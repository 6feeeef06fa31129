use lang_graphql::http::{Extensions, GraphQLError, PathSegment};

use crate::ExposeInternalErrors;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorVisibility {
    Internal,
    User,
}

/// Errors that know whether their message is meant for API users.
pub trait TraceableError: std::error::Error {
    fn visibility(&self) -> ErrorVisibility;
}

/// Field errors are raised while resolving a single field. They fail that
/// field only; sibling fields of the same operation still resolve.
/// Ref: <https://spec.graphql.org/October2021/#sec-Errors.Field-errors>
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("{message}")]
    Forbidden { message: String },

    #[error("{message}")]
    Policy { message: String },

    #[error("{message}")]
    Validation {
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Pagination { message: String },

    /// Errors of the data-access layer, passed through as they are.
    #[error("{0}")]
    DataAccess(BoxError),

    #[error("internal error: {description}")]
    Internal { description: String },
}

impl FieldError {
    pub fn forbidden() -> Self {
        FieldError::Forbidden {
            message: "Forbidden access".to_string(),
        }
    }

    pub fn policy_failed() -> Self {
        FieldError::Policy {
            message: "Policy Failed".to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        FieldError::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        FieldError::NotFound {
            message: message.into(),
        }
    }

    pub fn pagination(message: impl Into<String>) -> Self {
        FieldError::Pagination {
            message: message.into(),
        }
    }

    pub fn internal(description: impl Into<String>) -> Self {
        FieldError::Internal {
            description: description.into(),
        }
    }

    pub fn data_access(error: impl Into<BoxError>) -> Self {
        FieldError::DataAccess(error.into())
    }

    /// Machine readable code surfaced in the error's `extensions`.
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::Forbidden { .. } => "FORBIDDEN",
            FieldError::Policy { .. } => "POLICY_FAILED",
            FieldError::Validation { .. } | FieldError::Pagination { .. } => "BAD_USER_INPUT",
            FieldError::NotFound { .. } => "NOT_FOUND",
            FieldError::DataAccess(_) | FieldError::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    fn get_details(&self) -> Option<serde_json::Value> {
        match self {
            FieldError::Validation { details, .. } => details.clone(),
            FieldError::Forbidden { .. }
            | FieldError::Policy { .. }
            | FieldError::NotFound { .. }
            | FieldError::Pagination { .. }
            | FieldError::DataAccess(_)
            | FieldError::Internal { .. } => None,
        }
    }

    pub fn to_graphql_error(
        &self,
        expose_internal_errors: ExposeInternalErrors,
        path: Option<Vec<PathSegment>>,
    ) -> GraphQLError {
        let is_internal = self.visibility() == ErrorVisibility::Internal;
        if is_internal && expose_internal_errors == ExposeInternalErrors::Censor {
            return GraphQLError {
                message: "internal error".into(),
                path,
                // Internal errors showing up in the API response is not desirable.
                // Hence, extensions are masked for internal errors.
                extensions: None,
                is_internal,
            };
        }
        GraphQLError {
            message: self.to_string(),
            path,
            extensions: Some(Extensions {
                code: self.code().to_string(),
                details: self.get_details(),
            }),
            is_internal,
        }
    }
}

impl TraceableError for FieldError {
    fn visibility(&self) -> ErrorVisibility {
        match self {
            FieldError::Forbidden { .. }
            | FieldError::Policy { .. }
            | FieldError::Validation { .. }
            | FieldError::NotFound { .. }
            | FieldError::Pagination { .. }
            | FieldError::DataAccess(_) => ErrorVisibility::User,
            FieldError::Internal { .. } => ErrorVisibility::Internal,
        }
    }
}
