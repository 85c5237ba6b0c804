//! Presence validation for incoming payloads.

/// Result of validating a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The payload carries every required field.
    Valid,
    /// One or more required fields are missing or blank.
    Invalid {
        /// Human-readable descriptions of each validation failure.
        errors: Vec<String>,
    },
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Joins all failures into a single message, or `None` when valid.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Valid => None,
            Self::Invalid { errors } => Some(errors.join("; ")),
        }
    }
}

/// Collects presence failures for a single payload.
#[derive(Debug, Default)]
pub struct Presence {
    errors: Vec<String>,
}

impl Presence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure when `value` is empty or whitespace only.
    ///
    /// `message` is reported verbatim, e.g. `"Group name is required"`.
    #[must_use]
    pub fn require(mut self, value: &str, message: &str) -> Self {
        if value.trim().is_empty() {
            self.errors.push(message.to_string());
        }
        self
    }

    #[must_use]
    pub fn finish(self) -> ValidationResult {
        if self.errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid {
                errors: self.errors,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_present_is_valid() {
        let result = Presence::new()
            .require("Ada", "First name is required")
            .require("Lovelace", "Last name is required")
            .finish();
        assert!(result.is_valid());
        assert_eq!(result.message(), None);
    }

    #[test]
    fn blank_fields_are_collected_in_order() {
        let result = Presence::new()
            .require("   ", "First name is required")
            .require("", "Last name is required")
            .finish();
        assert_eq!(
            result,
            ValidationResult::Invalid {
                errors: vec![
                    "First name is required".to_string(),
                    "Last name is required".to_string(),
                ],
            }
        );
        assert_eq!(
            result.message().as_deref(),
            Some("First name is required; Last name is required")
        );
    }
}
