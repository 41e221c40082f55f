//! Resource-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | NotSignedIn | 401 |
//! | AlreadyMember | 409 |
//! | AlreadyRequested | 409 |
//! | NoPendingRequest | 422 |
//! | ValidationFailed | 400 |
//! | Infrastructure | unhandled |

use crate::domain::foundation::{DomainError, ErrorCode, ResourceId, UserId, ValidationError};

use super::ResourceKind;

/// Resource-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// No resource of this kind has the id.
    NotFound { kind: ResourceKind, id: ResourceId },

    /// The operation needs a signed-in user.
    NotSignedIn,

    /// User is already a confirmed member.
    AlreadyMember(UserId),

    /// User already has a pending join request.
    AlreadyRequested(UserId),

    /// User has no pending join request to confirm or deny.
    NoPendingRequest(UserId),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Storage or other infrastructure failure.
    Infrastructure(String),
}

impl ResourceError {
    pub fn not_found(kind: ResourceKind, id: ResourceId) -> Self {
        ResourceError::NotFound { kind, id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ResourceError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ResourceError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ResourceError::NotFound { .. } => ErrorCode::ResourceNotFound,
            ResourceError::NotSignedIn => ErrorCode::Unauthorized,
            ResourceError::AlreadyMember(_) => ErrorCode::AlreadyMember,
            ResourceError::AlreadyRequested(_) => ErrorCode::AlreadyRequested,
            ResourceError::NoPendingRequest(_) => ErrorCode::NoPendingRequest,
            ResourceError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ResourceError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing message.
    pub fn message(&self) -> String {
        match self {
            ResourceError::NotFound { kind, .. } => kind.not_found_message(),
            ResourceError::NotSignedIn => "User is not signed in".to_string(),
            ResourceError::AlreadyMember(user_id) => {
                format!("User {} is already a member", user_id)
            }
            ResourceError::AlreadyRequested(user_id) => {
                format!("User {} already has a pending request", user_id)
            }
            ResourceError::NoPendingRequest(user_id) => {
                format!("User {} has no pending request", user_id)
            }
            ResourceError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ResourceError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Infrastructure failures are reported through the unhandled-error path.
    pub fn is_unhandled(&self) -> bool {
        matches!(self, ResourceError::Infrastructure(_))
    }
}

impl std::fmt::Display for ResourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ResourceError {}

impl From<DomainError> for ResourceError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                ResourceError::ValidationFailed {
                    field: err
                        .details
                        .get("field")
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    message: err.message,
                }
            }
            ErrorCode::Unauthorized => ResourceError::NotSignedIn,
            _ => ResourceError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for ResourceError {
    fn from(err: ValidationError) -> Self {
        ResourceError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<ResourceError> for DomainError {
    fn from(err: ResourceError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
