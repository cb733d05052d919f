use super::ConfigError;
use crate::prompt::{FieldKind, FieldSpec, FieldValue, Validator};
use crate::shared::ids::validate_env_key;
use glob_match::glob_match;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;

/// One entry under `fields:` in the settings file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub kind: Option<FieldKind>,
    pub required: Option<bool>,
    pub default: Option<serde_yaml::Value>,
    pub description: Option<String>,
    pub secret: Option<bool>,
    #[serde(default)]
    pub values: Vec<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub message: Option<String>,
}

impl FieldSchema {
    /// `KEY: some text` in the settings file is shorthand for a described string field.
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    fn infer_kind(&self) -> FieldKind {
        if !self.values.is_empty() {
            return FieldKind::Enum;
        }
        match &self.default {
            Some(serde_yaml::Value::Bool(_)) => FieldKind::Boolean,
            Some(serde_yaml::Value::Number(_)) => FieldKind::Number,
            _ => FieldKind::String,
        }
    }
}

/// Case-insensitive glob match of `key` against any of `patterns`.
pub fn matches_secret_pattern(key: &str, patterns: &[String]) -> bool {
    let key = key.to_ascii_uppercase();
    patterns
        .iter()
        .any(|pattern| glob_match(&pattern.to_ascii_uppercase(), &key))
}

pub fn resolve_field(
    key: &str,
    schema: &FieldSchema,
    secret_patterns: &[String],
) -> Result<FieldSpec, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidField {
        key: key.to_string(),
        reason,
    };
    validate_env_key(key).map_err(invalid)?;

    let kind = schema.kind.unwrap_or_else(|| schema.infer_kind());
    match kind {
        FieldKind::Enum if schema.values.is_empty() => {
            return Err(invalid(
                "enum fields need at least one entry in `values`".to_string(),
            ));
        }
        FieldKind::Enum => {}
        _ if !schema.values.is_empty() => {
            return Err(invalid(format!(
                "`values` only applies to enum fields, not {}",
                kind.as_str()
            )));
        }
        _ => {}
    }
    check_rule_kinds(kind, schema).map_err(invalid)?;

    let pattern = match schema.pattern.as_deref() {
        Some(raw) => Some(Regex::new(raw).map_err(|source| ConfigError::InvalidPattern {
            key: key.to_string(),
            source,
        })?),
        None => None,
    };

    let secret = schema.secret.unwrap_or(false) || matches_secret_pattern(key, secret_patterns);
    let mut spec = FieldSpec::new(key, kind)
        .with_required(schema.required.unwrap_or(true))
        .with_values(schema.values.iter().cloned())
        .with_secret(secret);
    if let Some(description) = schema.description.as_deref() {
        spec = spec.with_description(description);
    }
    spec.set_validator(build_validator(schema, pattern));

    if let Some(raw) = schema.default.as_ref() {
        if let Some(default) = convert_default(&spec, raw).map_err(invalid)? {
            if let Some(err) = spec.validate(&default) {
                return Err(invalid(format!("default `{default}` fails its rules: {err}")));
            }
            spec = spec.with_default(default);
        }
    }
    Ok(spec)
}

fn check_rule_kinds(kind: FieldKind, schema: &FieldSchema) -> Result<(), String> {
    let numeric = schema.min.is_some() || schema.max.is_some();
    let textual =
        schema.min_length.is_some() || schema.max_length.is_some() || schema.pattern.is_some();
    if numeric && kind != FieldKind::Number {
        return Err(format!(
            "`min`/`max` only apply to number fields, not {}",
            kind.as_str()
        ));
    }
    if textual && kind != FieldKind::String {
        return Err(format!(
            "`min_length`/`max_length`/`pattern` only apply to string fields, not {}",
            kind.as_str()
        ));
    }
    if let (Some(min), Some(max)) = (schema.min, schema.max) {
        if min > max {
            return Err(format!("`min` ({min}) is greater than `max` ({max})"));
        }
    }
    if let (Some(min), Some(max)) = (schema.min_length, schema.max_length) {
        if min > max {
            return Err(format!(
                "`min_length` ({min}) is greater than `max_length` ({max})"
            ));
        }
    }
    Ok(())
}

fn convert_default(
    spec: &FieldSpec,
    raw: &serde_yaml::Value,
) -> Result<Option<FieldValue>, String> {
    use serde_yaml::Value;

    let value = match (spec.kind, raw) {
        (_, Value::Null) => return Ok(None),
        (FieldKind::String, Value::String(value)) => FieldValue::String(value.clone()),
        (FieldKind::Number, Value::Number(number)) => match number.as_f64() {
            Some(value) if value.is_finite() => FieldValue::Number(value),
            _ => return Err(format!("default `{number}` is not a finite number")),
        },
        (FieldKind::Boolean, Value::Bool(value)) => FieldValue::Boolean(*value),
        (FieldKind::Enum, Value::String(value)) => {
            if !spec.values.contains(value) {
                return Err(format!(
                    "default `{value}` is not one of: {}",
                    spec.values.join(", ")
                ));
            }
            FieldValue::Enum(value.clone())
        }
        (kind, other) => {
            return Err(format!(
                "default must be a {} value, got {}",
                kind.as_str(),
                yaml_type_name(other)
            ));
        }
    };
    Ok(Some(value))
}

fn yaml_type_name(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a list",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

struct Rules {
    min: Option<f64>,
    max: Option<f64>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
    message: Option<String>,
}

impl Rules {
    fn is_empty(&self) -> bool {
        self.min.is_none()
            && self.max.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
    }

    fn check(&self, value: &FieldValue) -> Option<String> {
        let failure = match value {
            FieldValue::Number(number) => self.check_number(*number),
            FieldValue::String(text) => self.check_text(text),
            FieldValue::Boolean(_) | FieldValue::Enum(_) => None,
        }?;
        Some(self.message.clone().unwrap_or(failure))
    }

    fn check_number(&self, number: f64) -> Option<String> {
        if let Some(min) = self.min.filter(|min| number < *min) {
            return Some(format!("Must be at least {min}"));
        }
        if let Some(max) = self.max.filter(|max| number > *max) {
            return Some(format!("Must be at most {max}"));
        }
        None
    }

    fn check_text(&self, text: &str) -> Option<String> {
        let length = text.chars().count();
        if let Some(min) = self.min_length.filter(|min| length < *min) {
            return Some(format!("Must be at least {min} characters"));
        }
        if let Some(max) = self.max_length.filter(|max| length > *max) {
            return Some(format!("Must be at most {max} characters"));
        }
        match &self.pattern {
            Some(pattern) if !pattern.is_match(text) => {
                Some(format!("Must match pattern `{}`", pattern.as_str()))
            }
            _ => None,
        }
    }
}

fn build_validator(schema: &FieldSchema, pattern: Option<Regex>) -> Option<Validator> {
    let rules = Rules {
        min: schema.min,
        max: schema.max,
        min_length: schema.min_length,
        max_length: schema.max_length,
        pattern,
        message: schema.message.clone(),
    };
    if rules.is_empty() {
        return None;
    }
    Some(Arc::new(move |value: &FieldValue| rules.check(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(yaml: &str) -> FieldSchema {
        serde_yaml::from_str(yaml).expect("parse schema")
    }

    #[test]
    fn kind_is_inferred_from_values_and_default() {
        let patterns = Vec::new();
        let port = resolve_field("PORT", &schema("default: 3000"), &patterns).expect("port");
        assert_eq!(port.kind, FieldKind::Number);
        assert_eq!(port.default, Some(FieldValue::Number(3000.0)));

        let debug = resolve_field("DEBUG", &schema("default: false"), &patterns).expect("debug");
        assert_eq!(debug.kind, FieldKind::Boolean);

        let level =
            resolve_field("LEVEL", &schema("values: [info, warn]"), &patterns).expect("level");
        assert_eq!(level.kind, FieldKind::Enum);

        let name = resolve_field("NAME", &FieldSchema::default(), &patterns).expect("name");
        assert_eq!(name.kind, FieldKind::String);
        assert!(name.required);
    }

    #[test]
    fn defaults_must_match_the_declared_kind() {
        let err = resolve_field("PORT", &schema("{type: number, default: abc}"), &[])
            .expect_err("wrong type");
        assert!(err.to_string().contains("default must be a number value"));

        let err = resolve_field("LEVEL", &schema("{values: [info], default: debug}"), &[])
            .expect_err("outside values");
        assert!(err.to_string().contains("not one of: info"));
    }

    #[test]
    fn rules_produce_validation_messages() {
        let port = resolve_field("PORT", &schema("{type: number, min: 1, max: 65535}"), &[])
            .expect("port");
        assert_eq!(
            port.validate(&FieldValue::Number(0.0)).as_deref(),
            Some("Must be at least 1")
        );
        assert_eq!(port.validate(&FieldValue::Number(80.0)), None);

        let slug = resolve_field(
            "SLUG",
            &schema("{pattern: '^[a-z-]+$', message: lowercase words only}"),
            &[],
        )
        .expect("slug");
        assert_eq!(
            slug.validate(&FieldValue::String("Hello".to_string()))
                .as_deref(),
            Some("lowercase words only")
        );
    }

    #[test]
    fn secret_patterns_only_mark_string_fields() {
        let patterns = vec!["*_key".to_string(), "*TOKEN*".to_string()];
        let api = resolve_field("API_KEY", &FieldSchema::default(), &patterns).expect("api");
        assert!(api.secret);
        let ttl = resolve_field("TOKEN_TTL", &schema("default: 60"), &patterns).expect("ttl");
        assert!(!ttl.secret);
    }

    #[test]
    fn misplaced_rules_and_bad_patterns_are_rejected() {
        assert!(resolve_field("FLAG", &schema("{default: true, min: 1}"), &[]).is_err());
        let err = resolve_field("NAME", &schema("pattern: '('"), &[]).expect_err("regex");
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
        assert!(resolve_field("bad-key", &FieldSchema::default(), &[]).is_err());
    }
}
