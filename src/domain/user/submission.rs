use serde_json::Value;

use super::value_objects::Email;
use crate::domain::validation::{Rule, RuleSet};

/// Accepted values for the `gender` field
pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

/// Minimum age accepted by the user form
pub const MINIMUM_AGE: f64 = 18.0;

/// Maximum age accepted by the user form
pub const MAXIMUM_AGE: f64 = 150.0;

/// Longest email the users table stores
pub const EMAIL_MAX_LENGTH: f64 = 255.0;

/// A validated user form submission
#[derive(Debug, Clone, PartialEq)]
pub struct UserSubmission {
    pub name: String,
    pub email: Email,
    pub password: String,
    pub skills: Vec<String>,
    pub gender: String,
    /// Whole years; fractional ages are truncated
    pub age: i32,
    pub role: String,
}

impl UserSubmission {
    /// Rule set with the form's custom messages
    pub fn rules() -> RuleSet {
        RuleSet::new()
            .field(
                "name",
                [Rule::Required, Rule::String, Rule::Min(3.0), Rule::Max(255.0), Rule::Uppercase],
            )
            .field("email", [Rule::Required, Rule::Email, Rule::Max(EMAIL_MAX_LENGTH)])
            .field("password", [Rule::Required, Rule::Min(8.0)])
            .field("skills", [Rule::Required, Rule::Array, Rule::Min(1.0)])
            .field("gender", [Rule::Required, Rule::In(GENDERS.to_vec())])
            .field(
                "age",
                [Rule::Required, Rule::Numeric, Rule::Min(MINIMUM_AGE), Rule::Max(MAXIMUM_AGE)],
            )
            .field("role", [Rule::Required])
            .message("name.required", "Name is required.")
            .message("email.required", "Email is required.")
            .message("password.required", "Password is required.")
            .message("skills.required", "At least one skill is required.")
            .message("gender.required", "Gender is required.")
            .message("age.required", "Age is required.")
            .message("role.required", "Role is required.")
            .message("name.min", "Name must be at least 3 characters.")
            .message("email.email", "Invalid email format.")
            .message("password.min", "Password must be at least 8 characters.")
            .message("skills.min", "At least one skill is required.")
            .message("age.min", "You must be at least 18 years old.")
    }

    /// Builds the submission from a payload that already passed [`Self::rules`]
    pub fn from_validated(payload: &Value) -> Result<Self, String> {
        let email = Email::new(text(payload, "email")?.trim())?;

        let skills = payload
            .get("skills")
            .and_then(Value::as_array)
            .ok_or_else(|| "Missing field: skills".to_string())?
            .iter()
            .map(stringify)
            .collect();

        let age = match payload.get("age") {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| "Missing field: age".to_string())?;
        let age = whole_years(age).ok_or_else(|| format!("Age out of range: {}", age))?;

        let role = payload
            .get("role")
            .map(stringify)
            .ok_or_else(|| "Missing field: role".to_string())?;

        Ok(Self {
            name: text(payload, "name")?.trim().to_string(),
            email,
            password: text(payload, "password")?,
            skills,
            gender: text(payload, "gender")?,
            age,
            role,
        })
    }
}

/// Truncates to whole years, rejecting values outside `i32`
fn whole_years(age: f64) -> Option<i32> {
    let age = age.trunc();
    if age.is_finite() && age >= i32::MIN as f64 && age <= i32::MAX as f64 {
        Some(age as i32)
    } else {
        None
    }
}

fn text(payload: &Value, field: &str) -> Result<String, String> {
    match payload.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(format!("Missing field: {}", field)),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "name": "PRIYA SHAH",
            "email": "priya@example.com",
            "password": "correct-horse",
            "skills": ["rust", "sql"],
            "gender": "Female",
            "age": "21",
            "role": "developer"
        })
    }

    #[test]
    fn valid_submission_passes() {
        let payload = valid_payload();
        assert!(UserSubmission::rules().validate(&payload).is_ok());

        let submission = UserSubmission::from_validated(&payload).unwrap();
        assert_eq!(submission.name, "PRIYA SHAH");
        assert_eq!(submission.age, 21);
        assert_eq!(submission.skills, vec!["rust", "sql"]);
    }

    #[test]
    fn lowercase_name_is_rejected() {
        let mut payload = valid_payload();
        payload["name"] = json!("Priya Shah");

        let errors = UserSubmission::rules().validate(&payload).unwrap_err();
        assert_eq!(errors.get("name").unwrap(), ["The name field must be uppercase."]);
    }

    #[test]
    fn custom_messages_are_used() {
        let payload = json!({
            "name": "AB",
            "email": "bad",
            "password": "short",
            "skills": [],
            "gender": "Robot",
            "age": 15
        });

        let errors = UserSubmission::rules().validate(&payload).unwrap_err();
        assert_eq!(errors.get("name").unwrap(), ["Name must be at least 3 characters."]);
        assert_eq!(errors.get("email").unwrap(), ["Invalid email format."]);
        assert_eq!(errors.get("password").unwrap(), ["Password must be at least 8 characters."]);
        assert_eq!(errors.get("skills").unwrap(), ["At least one skill is required."]);
        assert_eq!(errors.get("gender").unwrap(), ["The selected gender is invalid."]);
        assert_eq!(errors.get("age").unwrap(), ["You must be at least 18 years old."]);
        assert_eq!(errors.get("role").unwrap(), ["Role is required."]);
    }

    #[test]
    fn huge_age_is_rejected() {
        let mut payload = valid_payload();
        payload["age"] = json!(1e10);

        let errors = UserSubmission::rules().validate(&payload).unwrap_err();
        assert_eq!(
            errors.get("age").unwrap(),
            ["The age field must not be greater than 150."]
        );
        assert!(UserSubmission::from_validated(&payload).is_err());
    }

    #[test]
    fn overlong_email_is_rejected() {
        let mut payload = valid_payload();
        payload["email"] = json!(format!("{}@example.com", "a".repeat(300)));

        let errors = UserSubmission::rules().validate(&payload).unwrap_err();
        assert_eq!(
            errors.get("email").unwrap(),
            ["The email field must not be greater than 255 characters."]
        );
    }

    #[test]
    fn fractional_age_is_truncated() {
        let mut payload = valid_payload();
        payload["age"] = json!(30.9);

        let submission = UserSubmission::from_validated(&payload).unwrap();
        assert_eq!(submission.age, 30);
    }
}
