use crate::app::cli::parse_cli_options;
use crate::app::command_support::{display_value, stored_status, StoredStatus, Workspace};

#[derive(Debug, Clone)]
struct CheckFinding {
    key: String,
    ok: bool,
    detail: String,
}

/// Non-interactive: every field must hold a valid value or have a default to fall back on.
pub fn cmd_check(args: &[String]) -> Result<String, String> {
    let options = parse_cli_options(args)?;
    if options.dry_run {
        return Err("`--dry-run` only applies to `envprompt prompt`".to_string());
    }
    let workspace = Workspace::load(&options)?;
    let store = workspace.open_store();
    let snapshot = store
        .get()
        .map_err(|err| format!("failed to read values from {}: {err}", store.describe()))?;
    let max_chars = workspace.settings.max_display_length;

    let findings: Vec<CheckFinding> = workspace
        .fields
        .iter()
        .map(|spec| {
            let raw = snapshot.get(&spec.key).map(String::as_str);
            let (ok, detail) = match stored_status(spec, raw) {
                StoredStatus::Set(value) => (
                    true,
                    format!("set={}", display_value(spec, &value.to_string(), max_chars)),
                ),
                StoredStatus::Unset {
                    default: Some(default),
                } => (
                    true,
                    format!(
                        "unset; default={} applies",
                        display_value(spec, &default.to_string(), max_chars)
                    ),
                ),
                StoredStatus::Unset { default: None } if !spec.required => {
                    (true, "unset; optional".to_string())
                }
                StoredStatus::Unset { default: None } => {
                    (false, "missing required value".to_string())
                }
                StoredStatus::Invalid { raw, reason } => (
                    false,
                    format!(
                        "invalid value `{}`: {reason}",
                        display_value(spec, &raw, max_chars)
                    ),
                ),
            };
            CheckFinding {
                key: spec.key.clone(),
                ok,
                detail,
            }
        })
        .collect();

    let failed = findings.iter().filter(|finding| !finding.ok).count();
    let summary = if failed == 0 { "ok" } else { "failed" };
    let mut lines = vec![
        format!("summary={summary}"),
        format!("store={}", store.describe()),
        format!("checks_total={}", findings.len()),
        format!("checks_failed={failed}"),
    ];
    for finding in findings {
        lines.push(format!(
            "check:{}={}",
            finding.key,
            if finding.ok { "ok" } else { "fail" }
        ));
        lines.push(format!("check:{}.detail={}", finding.key, finding.detail));
    }
    let output = lines.join("\n");
    if failed == 0 {
        Ok(output)
    } else {
        Err(output)
    }
}
