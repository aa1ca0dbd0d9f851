use serde::Serialize;
use serde_json::Value;

use crate::domain::user::value_objects::Email;
use crate::domain::validation::{Rule, RuleSet};

/// A persisted student row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub course: Option<String>,
}

/// Validated attributes for creating or updating a student
///
/// # Invariants
/// - `name` and `email` are non-empty and at most 255 characters
/// - `phone` is at most 15 characters, `course` at most 100
/// - Empty optional fields are stored as `None`
#[derive(Debug, Clone, PartialEq)]
pub struct StudentInput {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub course: Option<String>,
}

impl StudentInput {
    /// Rules applied to both store and update submissions
    ///
    /// Email uniqueness is checked separately against the repository.
    pub fn rules() -> RuleSet {
        RuleSet::new()
            .field("name", [Rule::Required, Rule::String, Rule::Max(255.0)])
            .field("email", [Rule::Required, Rule::Email, Rule::Max(255.0)])
            .field("phone", [Rule::Nullable, Rule::String, Rule::Max(15.0)])
            .field("address", [Rule::Nullable, Rule::String])
            .field("course", [Rule::Nullable, Rule::String, Rule::Max(100.0)])
    }

    /// Builds the input from a payload that already passed [`Self::rules`]
    pub fn from_validated(payload: &Value) -> Result<Self, String> {
        let name = required_text(payload, "name")?;
        let email = Email::new(required_text(payload, "email")?)?;

        Ok(Self {
            name,
            email,
            phone: optional_text(payload, "phone"),
            address: optional_text(payload, "address"),
            course: optional_text(payload, "course"),
        })
    }
}

fn required_text(payload: &Value, field: &str) -> Result<String, String> {
    optional_text(payload, field).ok_or_else(|| format!("Missing field: {}", field))
}

fn optional_text(payload: &Value, field: &str) -> Option<String> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_payload_builds_input() {
        let payload = json!({
            "name": " Asha Rao ",
            "email": "asha@example.com",
            "phone": "",
            "course": "Physics"
        });

        assert!(StudentInput::rules().validate(&payload).is_ok());
        let input = StudentInput::from_validated(&payload).unwrap();
        assert_eq!(input.name, "Asha Rao");
        assert_eq!(input.email.as_str(), "asha@example.com");
        assert_eq!(input.phone, None);
        assert_eq!(input.address, None);
        assert_eq!(input.course.as_deref(), Some("Physics"));
    }

    #[test]
    fn rules_reject_long_phone_and_bad_email() {
        let payload = json!({
            "name": "Asha",
            "email": "not-an-email",
            "phone": "0123456789012345"
        });

        let errors = StudentInput::rules().validate(&payload).unwrap_err();
        assert!(errors.has("email"));
        assert!(errors.has("phone"));
        assert!(!errors.has("name"));
    }

    #[test]
    fn rules_cap_email_length() {
        let payload = json!({
            "name": "Asha",
            "email": format!("{}@example.com", "a".repeat(300)),
        });

        let errors = StudentInput::rules().validate(&payload).unwrap_err();
        assert_eq!(
            errors.get("email").unwrap(),
            ["The email field must not be greater than 255 characters."]
        );
    }

    #[test]
    fn rules_require_name_and_email() {
        let errors = StudentInput::rules().validate(&json!({})).unwrap_err();
        assert_eq!(errors.get("name").unwrap(), ["The name field is required."]);
        assert_eq!(errors.get("email").unwrap(), ["The email field is required."]);
    }

    #[test]
    fn from_validated_fails_without_email() {
        assert!(StudentInput::from_validated(&json!({"name": "Asha"})).is_err());
    }
}
