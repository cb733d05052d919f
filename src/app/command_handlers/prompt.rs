use crate::app::cli::parse_cli_options;
use crate::app::command_support::{display_value, Workspace};
use crate::channel::{Channel, MemoryChannel};
use crate::prompt::{parse_scripted_keys, InputEvent, SCRIPT_KEYS_ENV};
use crate::session::{ScriptedTerminal, Session, SessionOptions, SessionOutcome, SessionReport};
use crate::tui::run_session_tui;
use std::io::{self, IsTerminal};

fn is_interactive_prompt() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

fn load_scripted_keys() -> Result<Option<Vec<InputEvent>>, String> {
    let Ok(raw) = std::env::var(SCRIPT_KEYS_ENV) else {
        return Ok(None);
    };
    parse_scripted_keys(&raw).map(Some)
}

pub fn cmd_prompt(args: &[String]) -> Result<String, String> {
    let options = parse_cli_options(args)?;
    let workspace = Workspace::load(&options)?;
    let scripted = load_scripted_keys()?;
    if scripted.is_none() && !is_interactive_prompt() {
        return Err(format!(
            "`envprompt prompt` needs an interactive terminal; set {SCRIPT_KEYS_ENV} to script input"
        ));
    }

    let mut store = workspace.open_store();
    let store_label = store.describe();
    let mut dry_run_store;
    let channel: &mut dyn Channel = if options.dry_run {
        let seed = store
            .get()
            .map_err(|err| format!("failed to read values from {store_label}: {err}"))?;
        dry_run_store = MemoryChannel::new(seed);
        &mut dry_run_store
    } else {
        &mut *store
    };

    let session_options = SessionOptions {
        render: workspace.settings.render_options(),
        log: workspace.session_log(),
    };
    let mut session = Session::new(&workspace.fields, session_options);
    let outcome = match scripted {
        Some(events) => session.run(channel, &mut ScriptedTerminal::new(events)),
        None => run_session_tui(&mut session, channel),
    }
    .map_err(|err| err.to_string())?;

    Ok(format_outcome(
        &workspace,
        &outcome,
        &store_label,
        options.dry_run,
    ))
}

fn format_outcome(
    workspace: &Workspace,
    outcome: &SessionOutcome,
    store_label: &str,
    dry_run: bool,
) -> String {
    let (status, report): (&str, &SessionReport) = match outcome {
        SessionOutcome::Completed(report) => ("completed", report),
        SessionOutcome::Cancelled(report) => ("cancelled", report),
    };
    let mut lines = vec![format!("status={status}"), format!("store={store_label}")];
    if dry_run {
        lines.push("dry_run=true".to_string());
    }
    lines.push(format!("committed_total={}", report.committed.len()));
    lines.push(format!("skipped_total={}", report.skipped.len()));
    let max_chars = workspace.settings.max_display_length;
    for spec in &workspace.fields {
        if let Some(value) = report.committed.get(&spec.key) {
            lines.push(format!(
                "committed:{}={}",
                spec.key,
                display_value(spec, value, max_chars)
            ));
        } else if report.skipped.contains(&spec.key) {
            lines.push(format!("skipped:{}", spec.key));
        }
    }
    lines.join("\n")
}
