use crate::app::cli::{help_text, parse_cli_verb, CliVerb};

pub mod check;
pub mod prompt;
pub mod show;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }
    if args[0].starts_with("--") && parse_cli_verb(&args[0]) != CliVerb::Help {
        return prompt::cmd_prompt(&args);
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Prompt => prompt::cmd_prompt(&args[1..]),
        CliVerb::Show => show::cmd_show(&args[1..]),
        CliVerb::Check => check::cmd_check(&args[1..]),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!(
            "unknown command `{}`; run `envprompt help` for usage",
            args[0]
        )),
    }
}
