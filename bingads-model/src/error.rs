use thiserror::Error;

/// Result type for model validation.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised when an entity is not acceptable to the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Sitelink descriptions must be set together or not at all.
    #[error("both description1 and description2 must be set, or neither (sitelink {key})")]
    IncompleteDescriptions { key: String },

    /// A required text field is empty.
    #[error("{kind} field `{field}` must not be empty")]
    MissingField { kind: &'static str, field: &'static str },
}
