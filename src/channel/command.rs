use super::{Channel, ChannelError, Snapshot};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Store backed by an external config-sync tool.
///
/// `<program> <args..> get` must print a JSON object on stdout. `<program> <args..> set`
/// receives a JSON object of the changed keys on stdin.
#[derive(Debug, Clone)]
pub struct CommandChannel {
    program: String,
    args: Vec<String>,
}

impl CommandChannel {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command(&self, action: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(action);
        command
    }

    fn check_status(&self, action: &str, output: &Output) -> Result<(), ChannelError> {
        if output.status.success() {
            return Ok(());
        }
        Err(ChannelError::CommandFailed {
            program: self.program.clone(),
            action: action.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    fn spawn_err(&self, source: std::io::Error) -> ChannelError {
        ChannelError::Spawn {
            program: self.program.clone(),
            source,
        }
    }
}

impl Channel for CommandChannel {
    fn get(&self) -> Result<Snapshot, ChannelError> {
        let output = self
            .command("get")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| self.spawn_err(source))?;
        self.check_status("get", &output)?;
        let decoded: BTreeMap<String, Value> =
            serde_json::from_slice(&output.stdout).map_err(|source| ChannelError::Decode {
                program: self.program.clone(),
                source,
            })?;
        Ok(decoded
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(text) => Some((key, text)),
                other => Some((key, other.to_string())),
            })
            .collect())
    }

    fn set(&mut self, values: &Snapshot) -> Result<(), ChannelError> {
        let payload = serde_json::to_vec(values).map_err(|source| ChannelError::Encode {
            program: self.program.clone(),
            source,
        })?;
        let mut child = self
            .command("set")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| self.spawn_err(source))?;
        // The child is always reaped, even when it stops reading stdin early.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&payload),
            None => Ok(()),
        };
        let output = child
            .wait_with_output()
            .map_err(|source| self.spawn_err(source))?;
        self.check_status("set", &output)?;
        written.map_err(|source| self.spawn_err(source))
    }

    fn describe(&self) -> String {
        if self.args.is_empty() {
            format!("command {}", self.program)
        } else {
            format!("command {} {}", self.program, self.args.join(" "))
        }
    }
}
