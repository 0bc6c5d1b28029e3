use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

/// Failures reported by the persistence collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<RoleError> for RepositoryError {
    fn from(err: RoleError) -> Self {
        RepositoryError::DatabaseError(err.to_string())
    }
}

/// Every registration problem found in one pass, keyed by wire field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding a single violation.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Violations in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The closed taxonomy surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ValidationError,
    ConflictError,
    NotFoundError,
    AuthError,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::ConflictError => "ConflictError",
            ErrorKind::NotFoundError => "NotFoundError",
            ErrorKind::AuthError => "AuthError",
            ErrorKind::InternalError => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure of an authentication service operation.
///
/// Display text is safe to hand to callers. Infrastructure causes are
/// logged where they are classified and never carried here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Validation failed")]
    Validation(ValidationErrors),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("An unexpected error occurred")]
    Internal,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::ValidationError,
            ServiceError::Conflict(_) => ErrorKind::ConflictError,
            ServiceError::NotFound(_) => ErrorKind::NotFoundError,
            ServiceError::Unauthorized(_) => ErrorKind::AuthError,
            ServiceError::Internal => ErrorKind::InternalError,
        }
    }

    /// Per-field messages, present only for validation failures.
    pub fn details(&self) -> Option<&ValidationErrors> {
        match self {
            ServiceError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn user_already_exists() -> Self {
        ServiceError::Conflict("User already exists".to_string())
    }

    pub fn user_not_found() -> Self {
        ServiceError::NotFound("User not found".to_string())
    }

    pub fn incorrect_password() -> Self {
        ServiceError::Unauthorized("Incorrect password".to_string())
    }

    pub fn invalid_token() -> Self {
        ServiceError::Unauthorized("Invalid token".to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UsernameAlreadyExists(_) | RepositoryError::EmailAlreadyExists(_) => {
                ServiceError::user_already_exists()
            }
            RepositoryError::DatabaseError(cause) => {
                tracing::error!(error = %cause, "Repository operation failed");
                ServiceError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_closed_and_named() {
        let cases = [
            (
                ServiceError::Validation(ValidationErrors::single("email", "Email is required")),
                "ValidationError",
            ),
            (ServiceError::user_already_exists(), "ConflictError"),
            (ServiceError::user_not_found(), "NotFoundError"),
            (ServiceError::invalid_token(), "AuthError"),
            (ServiceError::Internal, "InternalError"),
        ];

        for (error, name) in cases {
            assert_eq!(error.kind().as_str(), name);
        }
    }

    #[test]
    fn test_database_fault_is_generic() {
        let err: ServiceError =
            RepositoryError::DatabaseError("connection refused at 10.0.0.3:5432".into()).into();

        assert_eq!(err, ServiceError::Internal);
        assert_eq!(err.to_string(), "An unexpected error occurred");
        assert!(err.details().is_none());
    }

    #[test]
    fn test_unique_violation_is_conflict() {
        let err: ServiceError = RepositoryError::EmailAlreadyExists("a@example.com".into()).into();
        assert_eq!(err.kind(), ErrorKind::ConflictError);
    }

    #[test]
    fn test_validation_errors_are_ordered() {
        let mut errors = ValidationErrors::new();
        errors.add("phone", "Phone number is required");
        errors.add("city", "City is required");

        let fields: Vec<&str> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec!["city", "phone"]);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("city"), Some("City is required"));
    }
}
