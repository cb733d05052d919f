use crate::app::cli::CliOptions;
use crate::channel::{open_channel, Channel};
use crate::config::{load_settings, ConfigError, Settings};
use crate::prompt::slots::effective_default;
use crate::prompt::{ExistingValue, FieldSpec, FieldValue, ParsedValue};
use crate::shared::display::{mask_secret, truncate_for_display};
use crate::shared::logging::SessionLog;
use std::path::PathBuf;

pub fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

/// Settings plus the resolved inputs a command works on.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub settings: Settings,
    pub fields: Vec<FieldSpec>,
    pub env_file: PathBuf,
}

impl Workspace {
    pub fn load(options: &CliOptions) -> Result<Self, String> {
        let settings = load_settings(options.config.as_deref()).map_err(map_config_err)?;
        let fields = select_fields(settings.field_specs().map_err(map_config_err)?, &options.only)?;
        let env_file = options
            .env_file
            .clone()
            .unwrap_or_else(|| settings.resolve_env_file());
        Ok(Self {
            settings,
            fields,
            env_file,
        })
    }

    pub fn open_store(&self) -> Box<dyn Channel> {
        open_channel(&self.settings.channel, &self.env_file)
    }

    /// Falls back to a disabled log when no home directory is known.
    pub fn session_log(&self) -> SessionLog {
        match self.settings.resolve_log_path() {
            Ok(path) => SessionLog::to_file(path),
            Err(_) => SessionLog::disabled(),
        }
    }
}

/// What the store currently holds for one field, judged against its rules.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredStatus {
    Set(FieldValue),
    Unset { default: Option<FieldValue> },
    Invalid { raw: String, reason: String },
}

pub fn stored_status(spec: &FieldSpec, raw: Option<&str>) -> StoredStatus {
    let existing = ExistingValue::from_raw(spec, raw);
    match &existing.parsed {
        ParsedValue::Ok(value) => match spec.validate(value) {
            Some(reason) => StoredStatus::Invalid {
                raw: existing.raw.clone().unwrap_or_default(),
                reason,
            },
            None => StoredStatus::Set(value.clone()),
        },
        ParsedValue::ParseError(reason) => StoredStatus::Invalid {
            raw: existing.raw.clone().unwrap_or_default(),
            reason: reason.clone(),
        },
        ParsedValue::Absent => StoredStatus::Unset {
            default: effective_default(spec.kind, &existing, spec.default.as_ref()),
        },
    }
}

/// Masks secrets and truncates long values for one-line output.
pub fn display_value(spec: &FieldSpec, raw: &str, max_chars: usize) -> String {
    if spec.secret {
        truncate_for_display(&mask_secret(raw), max_chars)
    } else {
        truncate_for_display(raw, max_chars)
    }
}

fn select_fields(fields: Vec<FieldSpec>, only: &[String]) -> Result<Vec<FieldSpec>, String> {
    if only.is_empty() {
        return Ok(fields);
    }
    if let Some(unknown) = only
        .iter()
        .find(|key| !fields.iter().any(|field| &field.key == *key))
    {
        return Err(format!("`--only` names unknown field `{unknown}`"));
    }
    Ok(fields
        .into_iter()
        .filter(|field| only.contains(&field.key))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::FieldKind;

    #[test]
    fn stored_status_flags_rule_failures_and_unset_defaults() {
        let port = FieldSpec::new("PORT", FieldKind::Number)
            .with_default(FieldValue::Number(3000.0))
            .with_validator(|value| match value {
                FieldValue::Number(port) if *port < 1.0 => Some("Must be at least 1".to_string()),
                _ => None,
            });
        assert_eq!(
            stored_status(&port, Some("0")),
            StoredStatus::Invalid {
                raw: "0".to_string(),
                reason: "Must be at least 1".to_string()
            }
        );
        assert_eq!(
            stored_status(&port, None),
            StoredStatus::Unset {
                default: Some(FieldValue::Number(3000.0))
            }
        );
        assert_eq!(
            stored_status(&port, Some("80")),
            StoredStatus::Set(FieldValue::Number(80.0))
        );
    }

    #[test]
    fn display_value_masks_secrets() {
        let token = FieldSpec::new("TOKEN", FieldKind::String).with_secret(true);
        assert_eq!(display_value(&token, "abc", 48), "***");
        let name = FieldSpec::new("NAME", FieldKind::String);
        assert_eq!(display_value(&name, "abcdefghij", 5), "abcd…");
    }

    #[test]
    fn select_fields_keeps_declaration_order() {
        let fields = vec![
            FieldSpec::new("A", FieldKind::String),
            FieldSpec::new("B", FieldKind::String),
            FieldSpec::new("C", FieldKind::String),
        ];
        let selected =
            select_fields(fields, &["C".to_string(), "A".to_string()]).expect("select");
        let keys: Vec<&str> = selected.iter().map(|field| field.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "C"]);
    }

    #[test]
    fn select_fields_rejects_unknown_keys() {
        let fields = vec![FieldSpec::new("A", FieldKind::String)];
        let err = select_fields(fields, &["Z".to_string()]).expect_err("unknown");
        assert!(err.contains("`Z`"));
    }
}
