//! Declarative request validation
//!
//! A [`RuleSet`] maps field names to an ordered list of [`Rule`]s and is
//! evaluated against a JSON object. Every failing rule contributes one
//! message, so a field can collect several errors in a single pass.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::domain::user::value_objects::Email;

/// A single validation rule
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Field must be present and non-empty
    Required,
    /// Absent, null or empty values skip the remaining rules
    Nullable,
    String,
    Email,
    Numeric,
    Array,
    Uppercase,
    /// Minimum size: characters for strings, value for numbers, items for arrays
    Min(f64),
    /// Maximum size, same measure as [`Rule::Min`]
    Max(f64),
    /// Value must be one of the listed strings
    In(Vec<&'static str>),
}

impl Rule {
    /// Key used to look up custom messages, e.g. `name.required`
    pub fn key(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Nullable => "nullable",
            Rule::String => "string",
            Rule::Email => "email",
            Rule::Numeric => "numeric",
            Rule::Array => "array",
            Rule::Uppercase => "uppercase",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::In(_) => "in",
        }
    }
}

/// Field-level validation failures, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to a field's error list
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// First message of the first failing field
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().flatten().next().map(String::as_str)
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    /// `Ok(())` when no errors were collected
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_message() {
            Some(message) => write!(f, "{}", message),
            None => write!(f, "no validation errors"),
        }
    }
}

impl std::error::Error for ValidationErrors {}

/// Ordered rules for a set of fields, plus custom messages
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<(&'static str, Vec<Rule>)>,
    messages: HashMap<String, String>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the rules for one field
    pub fn field(mut self, name: &'static str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push((name, rules.into_iter().collect()));
        self
    }

    /// Overrides the default message for `field.rule`
    pub fn message(mut self, key: &str, message: &str) -> Self {
        self.messages.insert(key.to_string(), message.to_string());
        self
    }

    /// Validates `input`, which is expected to be a JSON object
    ///
    /// Non-object input is treated as an object with no fields.
    pub fn validate(&self, input: &Value) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for (field, rules) in &self.fields {
            let value = input.get(field).unwrap_or(&Value::Null);
            for message in self.check_field(field, rules, value) {
                errors.add(*field, message);
            }
        }

        errors.into_result()
    }

    fn check_field(&self, field: &str, rules: &[Rule], value: &Value) -> Vec<String> {
        if is_empty(value) {
            return if rules.contains(&Rule::Required) {
                vec![self.message_for(field, &Rule::Required, value, rules)]
            } else {
                Vec::new()
            };
        }

        rules
            .iter()
            .filter(|rule| !passes(rule, value, rules))
            .map(|rule| self.message_for(field, rule, value, rules))
            .collect()
    }

    fn message_for(&self, field: &str, rule: &Rule, value: &Value, rules: &[Rule]) -> String {
        let key = format!("{}.{}", field, rule.key());
        if let Some(custom) = self.messages.get(&key) {
            return custom.clone();
        }
        default_message(&attribute_name(field), rule, measure_kind(value, rules))
    }
}

/// What "size" means for a value under its rule list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measure {
    Characters,
    Number,
    Items,
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn measure_kind(value: &Value, rules: &[Rule]) -> Measure {
    if value.is_array() {
        Measure::Items
    } else if value.is_number() || rules.contains(&Rule::Numeric) {
        Measure::Number
    } else {
        Measure::Characters
    }
}

fn size(value: &Value, rules: &[Rule]) -> Option<f64> {
    match measure_kind(value, rules) {
        Measure::Items => value.as_array().map(|items| items.len() as f64),
        Measure::Number => numeric_value(value),
        Measure::Characters => value.as_str().map(|s| s.chars().count() as f64),
    }
}

fn passes(rule: &Rule, value: &Value, rules: &[Rule]) -> bool {
    match rule {
        Rule::Required | Rule::Nullable => true,
        Rule::String => value.is_string(),
        Rule::Email => value.as_str().is_some_and(Email::is_valid),
        Rule::Numeric => numeric_value(value).is_some(),
        Rule::Array => value.is_array(),
        Rule::Uppercase => value
            .as_str()
            .is_some_and(|s| s == s.to_uppercase()),
        Rule::Min(min) => size(value, rules).is_some_and(|size| size >= *min),
        Rule::Max(max) => size(value, rules).is_some_and(|size| size <= *max),
        Rule::In(allowed) => value.as_str().is_some_and(|s| allowed.contains(&s)),
    }
}

fn attribute_name(field: &str) -> String {
    field.replace('_', " ")
}

fn format_limit(limit: f64) -> String {
    if limit.fract() == 0.0 {
        format!("{}", limit as i64)
    } else {
        format!("{}", limit)
    }
}

fn default_message(attribute: &str, rule: &Rule, measure: Measure) -> String {
    match (rule, measure) {
        (Rule::Required, _) | (Rule::Nullable, _) => {
            format!("The {} field is required.", attribute)
        }
        (Rule::String, _) => format!("The {} field must be a string.", attribute),
        (Rule::Email, _) => format!("The {} field must be a valid email address.", attribute),
        (Rule::Numeric, _) => format!("The {} field must be a number.", attribute),
        (Rule::Array, _) => format!("The {} field must be an array.", attribute),
        (Rule::Uppercase, _) => format!("The {} field must be uppercase.", attribute),
        (Rule::In(_), _) => format!("The selected {} is invalid.", attribute),
        (Rule::Min(n), Measure::Characters) => format!(
            "The {} field must be at least {} characters.",
            attribute,
            format_limit(*n)
        ),
        (Rule::Min(n), Measure::Number) => {
            format!("The {} field must be at least {}.", attribute, format_limit(*n))
        }
        (Rule::Min(n), Measure::Items) => format!(
            "The {} field must have at least {} items.",
            attribute,
            format_limit(*n)
        ),
        (Rule::Max(n), Measure::Characters) => format!(
            "The {} field must not be greater than {} characters.",
            attribute,
            format_limit(*n)
        ),
        (Rule::Max(n), Measure::Number) => format!(
            "The {} field must not be greater than {}.",
            attribute,
            format_limit(*n)
        ),
        (Rule::Max(n), Measure::Items) => format!(
            "The {} field must not have more than {} items.",
            attribute,
            format_limit(*n)
        ),
    }
}

/// Fields whose values are never trimmed
const UNTRIMMED_FIELDS: [&str; 2] = ["password", "password_confirmation"];

/// Trims every string in a submitted payload, nested values included
///
/// Top-level password fields keep their exact value.
pub fn trim_strings(payload: &Value) -> Value {
    match payload {
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, value)| {
                    let value = if UNTRIMMED_FIELDS.contains(&key.as_str()) {
                        value.clone()
                    } else {
                        trim_value(value)
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        other => trim_value(other),
    }
}

fn trim_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        Value::Array(items) => Value::Array(items.iter().map(trim_value).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), trim_value(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Message used when a `unique` constraint fails for `field`
pub fn unique_message(field: &str) -> String {
    format!("The {} has already been taken.", attribute_name(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name_rules() -> RuleSet {
        RuleSet::new().field("name", [Rule::Required, Rule::String, Rule::Max(5.0)])
    }

    #[test]
    fn required_field_missing() {
        let errors = name_rules().validate(&json!({})).unwrap_err();
        assert_eq!(errors.get("name").unwrap(), ["The name field is required."]);
    }

    #[test]
    fn required_rejects_blank_string() {
        let errors = name_rules().validate(&json!({"name": "   "})).unwrap_err();
        assert_eq!(errors.get("name").unwrap().len(), 1);
    }

    #[test]
    fn max_characters_counts_chars_not_bytes() {
        assert!(name_rules().validate(&json!({"name": "ééééé"})).is_ok());
        let errors = name_rules().validate(&json!({"name": "abcdef"})).unwrap_err();
        assert_eq!(
            errors.get("name").unwrap(),
            ["The name field must not be greater than 5 characters."]
        );
    }

    #[test]
    fn collects_every_failing_rule() {
        let rules = RuleSet::new().field("code", [Rule::String, Rule::Uppercase, Rule::Min(4.0)]);
        let errors = rules.validate(&json!({"code": "ab"})).unwrap_err();
        assert_eq!(errors.get("code").unwrap().len(), 2);
    }

    #[test]
    fn nullable_field_skips_rules_when_absent() {
        let rules = RuleSet::new().field("phone", [Rule::Nullable, Rule::String, Rule::Max(15.0)]);
        assert!(rules.validate(&json!({})).is_ok());
        assert!(rules.validate(&json!({"phone": null})).is_ok());
        assert!(rules.validate(&json!({"phone": ""})).is_ok());
        assert!(rules.validate(&json!({"phone": "1234567890123456"})).is_err());
    }

    #[test]
    fn numeric_min_compares_value() {
        let rules = RuleSet::new().field("age", [Rule::Required, Rule::Numeric, Rule::Min(18.0)]);
        assert!(rules.validate(&json!({"age": 18})).is_ok());
        assert!(rules.validate(&json!({"age": "21"})).is_ok());

        let errors = rules.validate(&json!({"age": "17"})).unwrap_err();
        assert_eq!(errors.get("age").unwrap(), ["The age field must be at least 18."]);

        let errors = rules.validate(&json!({"age": "old"})).unwrap_err();
        assert!(errors.get("age").unwrap().contains(&"The age field must be a number.".to_string()));
    }

    #[test]
    fn array_min_counts_items() {
        let rules = RuleSet::new().field("skills", [Rule::Required, Rule::Array, Rule::Min(2.0)]);
        let errors = rules.validate(&json!({"skills": ["rust"]})).unwrap_err();
        assert_eq!(
            errors.get("skills").unwrap(),
            ["The skills field must have at least 2 items."]
        );
    }

    #[test]
    fn in_rule_matches_exactly() {
        let rules = RuleSet::new().field("gender", [Rule::Required, Rule::In(vec!["Male", "Female"])]);
        assert!(rules.validate(&json!({"gender": "Female"})).is_ok());
        let errors = rules.validate(&json!({"gender": "female"})).unwrap_err();
        assert_eq!(errors.get("gender").unwrap(), ["The selected gender is invalid."]);
    }

    #[test]
    fn email_rule() {
        let rules = RuleSet::new().field("email", [Rule::Required, Rule::Email]);
        assert!(rules.validate(&json!({"email": "a@b.com"})).is_ok());
        let errors = rules.validate(&json!({"email": "nope"})).unwrap_err();
        assert_eq!(
            errors.get("email").unwrap(),
            ["The email field must be a valid email address."]
        );
    }

    #[test]
    fn custom_message_overrides_default() {
        let rules = name_rules().message("name.required", "Name is required.");
        let errors = rules.validate(&json!({})).unwrap_err();
        assert_eq!(errors.first_message(), Some("Name is required."));
    }

    #[test]
    fn attribute_names_replace_underscores() {
        let rules = RuleSet::new().field("first_name", [Rule::Required]);
        let errors = rules.validate(&json!({})).unwrap_err();
        assert_eq!(errors.first_message(), Some("The first name field is required."));
    }

    #[test]
    fn trim_strings_keeps_passwords_verbatim() {
        let trimmed = trim_strings(&json!({
            "email": "  asha@example.com ",
            "skills": [" rust "],
            "password": " secret ",
            "age": 20
        }));

        assert_eq!(
            trimmed,
            json!({
                "email": "asha@example.com",
                "skills": ["rust"],
                "password": " secret ",
                "age": 20
            })
        );
    }

    #[test]
    fn unique_message_format() {
        assert_eq!(unique_message("email"), "The email has already been taken.");
    }
}
