use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Enum,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Enum => "enum",
        }
    }
}

/// A value in a field's native type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Enum(String),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::String(value) | FieldValue::Enum(value) => value.fmt(f),
            FieldValue::Number(value) => value.fmt(f),
            FieldValue::Boolean(value) => value.fmt(f),
        }
    }
}

pub type Validator = Arc<dyn Fn(&FieldValue) -> Option<String> + Send + Sync>;

#[derive(Clone)]
pub struct FieldSpec {
    pub key: String,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<FieldValue>,
    pub description: Option<String>,
    pub secret: bool,
    pub values: Vec<String>,
    validator: Option<Validator>,
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("description", &self.description)
            .field("secret", &self.secret)
            .field("values", &self.values)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            kind,
            required: true,
            default: None,
            description: None,
            secret: false,
            values: Vec::new(),
            validator: None,
        }
    }

    pub fn with_default(mut self, default: FieldValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Only string fields carry secrets; the flag is dropped for other kinds.
    pub fn with_secret(mut self, secret: bool) -> Self {
        self.secret = secret && self.kind == FieldKind::String;
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&FieldValue) -> Option<String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub(crate) fn set_validator(&mut self, validator: Option<Validator>) {
        self.validator = validator;
    }

    pub fn validate(&self, value: &FieldValue) -> Option<String> {
        self.validator.as_ref().and_then(|validator| validator(value))
    }

    /// Intrinsic format check shared by stored raw values and typed input.
    pub fn parse_value(&self, raw: &str) -> Result<FieldValue, String> {
        match self.kind {
            FieldKind::String => Ok(FieldValue::String(raw.to_string())),
            FieldKind::Number => parse_number(raw).map(FieldValue::Number),
            FieldKind::Boolean => parse_boolean(raw).map(FieldValue::Boolean),
            FieldKind::Enum => {
                let trimmed = raw.trim();
                if self.values.iter().any(|value| value == trimmed) {
                    Ok(FieldValue::Enum(trimmed.to_string()))
                } else {
                    Err(format!("Expected one of: {}", self.values.join(", ")))
                }
            }
        }
    }

    pub fn empty_input_message(&self) -> &'static str {
        match self.kind {
            FieldKind::Number => "Please enter a number",
            _ => "Please enter a value",
        }
    }

    pub fn accepts_empty(&self) -> bool {
        self.kind == FieldKind::String && !self.required
    }
}

fn parse_number(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(format!("Expected a number, got `{trimmed}`")),
    }
}

fn parse_boolean(raw: &str) -> Result<bool, String> {
    let trimmed = raw.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(format!("Expected true or false, got `{trimmed}`")),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue {
    Ok(FieldValue),
    ParseError(String),
    Absent,
}

/// The value a field already holds in the store, before any prompting.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingValue {
    pub raw: Option<String>,
    pub parsed: ParsedValue,
}

impl ExistingValue {
    pub fn absent() -> Self {
        Self {
            raw: None,
            parsed: ParsedValue::Absent,
        }
    }

    /// An empty stored string counts as absent.
    pub fn from_raw(spec: &FieldSpec, raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
            return Self::absent();
        };
        let parsed = match spec.parse_value(raw) {
            Ok(value) => ParsedValue::Ok(value),
            Err(message) => ParsedValue::ParseError(message),
        };
        Self {
            raw: Some(raw.to_string()),
            parsed,
        }
    }

    pub fn current(&self) -> Option<&FieldValue> {
        match &self.parsed {
            ParsedValue::Ok(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_values_stringify_without_trailing_fraction() {
        assert_eq!(FieldValue::Number(3000.0).to_string(), "3000");
        assert_eq!(FieldValue::Number(0.25).to_string(), "0.25");
        assert_eq!(FieldValue::Boolean(true).to_string(), "true");
    }

    #[test]
    fn parse_value_applies_intrinsic_format_checks() {
        let number = FieldSpec::new("PORT", FieldKind::Number);
        assert_eq!(number.parse_value(" 42 "), Ok(FieldValue::Number(42.0)));
        assert_eq!(
            number.parse_value("inf"),
            Err("Expected a number, got `inf`".to_string())
        );

        let flag = FieldSpec::new("DEBUG", FieldKind::Boolean);
        assert_eq!(flag.parse_value("Yes"), Ok(FieldValue::Boolean(true)));
        assert!(flag.parse_value("maybe").is_err());

        let mode = FieldSpec::new("MODE", FieldKind::Enum).with_values(["dev", "prod"]);
        assert_eq!(mode.parse_value("prod"), Ok(FieldValue::Enum("prod".to_string())));
        assert_eq!(
            mode.parse_value("test"),
            Err("Expected one of: dev, prod".to_string())
        );
    }

    #[test]
    fn existing_value_treats_empty_raw_as_absent() {
        let spec = FieldSpec::new("NAME", FieldKind::String);
        assert_eq!(ExistingValue::from_raw(&spec, Some("")), ExistingValue::absent());
        assert_eq!(ExistingValue::from_raw(&spec, None), ExistingValue::absent());
    }

    #[test]
    fn existing_value_keeps_raw_text_when_parse_fails() {
        let spec = FieldSpec::new("PORT", FieldKind::Number);
        let existing = ExistingValue::from_raw(&spec, Some("not-a-number"));
        assert_eq!(existing.raw.as_deref(), Some("not-a-number"));
        assert!(matches!(existing.parsed, ParsedValue::ParseError(_)));
        assert_eq!(existing.current(), None);
    }

    #[test]
    fn secret_flag_is_dropped_for_non_string_fields() {
        let spec = FieldSpec::new("PORT", FieldKind::Number).with_secret(true);
        assert!(!spec.secret);
        let spec = FieldSpec::new("TOKEN", FieldKind::String).with_secret(true);
        assert!(spec.secret);
    }

    #[test]
    fn validate_is_a_no_op_without_a_validator() {
        let spec = FieldSpec::new("NAME", FieldKind::String);
        assert_eq!(spec.validate(&FieldValue::String("x".to_string())), None);
        let spec = spec.with_validator(|_| Some("nope".to_string()));
        assert_eq!(
            spec.validate(&FieldValue::String("x".to_string())),
            Some("nope".to_string())
        );
    }
}
