use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Prompt,
    Show,
    Check,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "prompt" => CliVerb::Prompt,
        "show" => CliVerb::Show,
        "check" => CliVerb::Check,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

/// Flags shared by every command that reads a settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub only: Vec<String>,
    pub dry_run: bool,
}

pub fn parse_cli_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut index = 0;
    while index < args.len() {
        let flag = args[index].as_str();
        let (name, inline) = match flag.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value.to_string())),
            _ => (flag, None),
        };
        match name {
            "--dry-run" => {
                if inline.is_some() {
                    return Err("`--dry-run` does not take a value".to_string());
                }
                options.dry_run = true;
            }
            "--config" | "--env-file" | "--only" => {
                let value = match inline {
                    Some(value) => value,
                    None => {
                        index += 1;
                        args.get(index)
                            .cloned()
                            .ok_or_else(|| format!("`{name}` requires a value"))?
                    }
                };
                if value.trim().is_empty() {
                    return Err(format!("`{name}` requires a non-empty value"));
                }
                match name {
                    "--config" => options.config = Some(PathBuf::from(value)),
                    "--env-file" => options.env_file = Some(PathBuf::from(value)),
                    _ => options.only.extend(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|key| !key.is_empty())
                            .map(str::to_string),
                    ),
                }
            }
            other => return Err(format!("unknown option `{other}`")),
        }
        index += 1;
    }
    Ok(options)
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Usage: envprompt <command> [options]".to_string(),
        String::new(),
        "Commands:".to_string(),
        "  prompt                               Walk through each field and write answers"
            .to_string(),
        "  show                                 List fields with their stored values".to_string(),
        "  check                                Fail when required values are missing or invalid"
            .to_string(),
        "  help                                 Show this help".to_string(),
        String::new(),
        "Options:".to_string(),
        "  --config <path>                      Settings file (default ./envprompt.yaml)"
            .to_string(),
        "  --env-file <path>                    Override `env_file` from the settings".to_string(),
        "  --only <KEY,KEY>                     Limit the command to these fields".to_string(),
        "  --dry-run                            Prompt without writing to the store (prompt only)"
            .to_string(),
        String::new(),
        "Keys: up/down choose, type for a custom value, enter confirm, tab options, ctrl-r reveal, ctrl-c cancel"
            .to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}
