//! Declarative per-field constraints shared by every entity constructor.
//!
//! Each entity declares its rules once as constants and routes every create
//! and update through them, so the API boundary and the persistence layer
//! validate against the same definitions.

use pharmadex_core::{AppError, AppResult, RecordId};

/// Length and presence rule for a text field.
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    label: &'static str,
    max_length: usize,
}

impl TextRule {
    /// Declares a text rule with a display label and maximum length.
    #[must_use]
    pub const fn new(label: &'static str, max_length: usize) -> Self {
        Self { label, max_length }
    }

    /// Validates a required text value, returning the trimmed string.
    pub fn require(&self, value: impl Into<String>) -> AppResult<String> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(format!("{} is required", self.label)));
        }

        self.check_length(trimmed)?;
        Ok(trimmed.to_owned())
    }

    /// Validates an optional text value; empty input coerces to absent.
    pub fn optional(&self, value: Option<String>) -> AppResult<Option<String>> {
        let Some(value) = value else {
            return Ok(None);
        };

        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        self.check_length(trimmed)?;
        Ok(Some(trimmed.to_owned()))
    }

    fn check_length(&self, value: &str) -> AppResult<()> {
        if value.chars().count() > self.max_length {
            return Err(AppError::Validation(format!(
                "{} must be at most {} characters",
                self.label, self.max_length
            )));
        }

        Ok(())
    }
}

/// Inclusive range rule for a decimal field.
#[derive(Debug, Clone, Copy)]
pub struct NumberRule {
    label: &'static str,
    min: f64,
    max: f64,
}

impl NumberRule {
    /// Declares a decimal range rule.
    #[must_use]
    pub const fn new(label: &'static str, min: f64, max: f64) -> Self {
        Self { label, min, max }
    }

    /// Validates an optional decimal value against the range.
    pub fn optional(&self, value: Option<f64>) -> AppResult<Option<f64>> {
        let Some(value) = value else {
            return Ok(None);
        };

        if !value.is_finite() || value < self.min || value > self.max {
            return Err(AppError::Validation(format!(
                "{} must be between {} and {}",
                self.label, self.min, self.max
            )));
        }

        Ok(Some(value))
    }
}

/// Inclusive range rule for an integer field.
#[derive(Debug, Clone, Copy)]
pub struct IntRule {
    label: &'static str,
    min: i64,
    max: i64,
}

impl IntRule {
    /// Declares an integer range rule.
    #[must_use]
    pub const fn new(label: &'static str, min: i64, max: i64) -> Self {
        Self { label, min, max }
    }

    /// Validates an optional integer value against the range.
    pub fn optional(&self, value: Option<i64>) -> AppResult<Option<i64>> {
        let Some(value) = value else {
            return Ok(None);
        };

        if value < self.min || value > self.max {
            return Err(AppError::Validation(format!(
                "{} must be between {} and {}",
                self.label, self.min, self.max
            )));
        }

        Ok(Some(value))
    }
}

/// Validates an optional email address shape.
pub fn validate_email(value: Option<String>) -> AppResult<Option<String>> {
    let value = TextRule::new("email", 254).optional(value)?;
    if let Some(email) = &value {
        let has_shape = email
            .split_once('@')
            .map(|(local, host)| !local.is_empty() && host.contains('.'))
            .unwrap_or(false);
        if !has_shape {
            return Err(AppError::Validation(format!(
                "email '{email}' is not a valid address"
            )));
        }
    }

    Ok(value)
}

/// Validates a parent or foreign reference identifier.
///
/// References are not checked against the target table; only the identifier
/// shape is enforced.
pub fn validate_reference_id(label: &str, value: RecordId) -> AppResult<RecordId> {
    if value <= 0 {
        return Err(AppError::Validation(format!(
            "{label} must be a positive identifier"
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{IntRule, NumberRule, TextRule, validate_email, validate_reference_id};

    #[test]
    fn required_text_rejects_blank_input() {
        let rule = TextRule::new("code", 32);
        assert!(rule.require("   ").is_err());
    }

    #[test]
    fn required_text_trims_surrounding_whitespace() {
        let rule = TextRule::new("code", 32);
        assert_eq!(rule.require("  RM  ").unwrap_or_default(), "RM");
    }

    #[test]
    fn optional_text_coerces_empty_to_absent() {
        let rule = TextRule::new("description", 10);
        let value = rule.optional(Some("   ".to_owned()));
        assert!(value.is_ok());
        assert!(value.unwrap_or(Some("set".to_owned())).is_none());
    }

    #[test]
    fn text_length_is_bounded() {
        let rule = TextRule::new("code", 3);
        assert!(rule.require("ABCD").is_err());
    }

    #[test]
    fn number_rule_rejects_out_of_range() {
        let rule = NumberRule::new("credit limit", 0.0, 100.0);
        assert!(rule.optional(Some(-1.0)).is_err());
        assert!(rule.optional(Some(100.5)).is_err());
        assert!(rule.optional(None).is_ok());
    }

    #[test]
    fn int_rule_accepts_bounds() {
        let rule = IntRule::new("shelf life", 0, 600);
        assert!(rule.optional(Some(0)).is_ok());
        assert!(rule.optional(Some(600)).is_ok());
        assert!(rule.optional(Some(601)).is_err());
    }

    #[test]
    fn email_requires_local_part_and_dotted_host() {
        assert!(validate_email(Some("qa@pharma.example".to_owned())).is_ok());
        assert!(validate_email(Some("@pharma.example".to_owned())).is_err());
        assert!(validate_email(Some("qa@host".to_owned())).is_err());
        assert!(validate_email(None).is_ok());
    }

    #[test]
    fn reference_id_must_be_positive() {
        assert!(validate_reference_id("customer id", 0).is_err());
        assert!(validate_reference_id("customer id", 7).is_ok());
    }
}
