use crate::schema::ValidationResult;

/// Payloads that carry required fields implement this so the HTTP boundary
/// can reject them before any session is opened.
pub trait Validate {
    fn validate(&self) -> ValidationResult;
}
