use crate::app::cli::parse_cli_options;
use crate::app::command_support::{display_value, stored_status, StoredStatus, Workspace};

pub fn cmd_show(args: &[String]) -> Result<String, String> {
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

    let mut lines = vec![
        format!("store={}", store.describe()),
        format!("fields_total={}", workspace.fields.len()),
    ];
    for spec in &workspace.fields {
        let raw = snapshot.get(&spec.key).map(String::as_str);
        let (status, value, detail) = match stored_status(spec, raw) {
            StoredStatus::Set(value) => ("set", value.to_string(), None),
            StoredStatus::Unset {
                default: Some(default),
            } => ("default", default.to_string(), None),
            StoredStatus::Unset { default: None } => ("unset", String::new(), None),
            StoredStatus::Invalid { raw, reason } => ("invalid", raw, Some(reason)),
        };
        lines.push(format!(
            "field:{}={}",
            spec.key,
            display_value(spec, &value, max_chars)
        ));
        lines.push(format!("field:{}.type={}", spec.key, spec.kind.as_str()));
        lines.push(format!("field:{}.status={status}", spec.key));
        if let Some(detail) = detail {
            lines.push(format!("field:{}.detail={detail}", spec.key));
        }
    }
    Ok(lines.join("\n"))
}
