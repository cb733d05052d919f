use crate::channel::{Channel, ChannelError, Snapshot};
use crate::prompt::{
    render_commit, render_outcome, ExistingValue, FieldPrompt, FieldSpec, InputEvent, Outcome,
    RenderOptions,
};
use crate::shared::display::line_count;
use crate::shared::logging::SessionLog;
use std::collections::BTreeMap;

pub mod terminal;

pub use terminal::{PromptTerminal, ScriptedTerminal};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to read values from {store}: {source}")]
    StoreRead {
        store: String,
        #[source]
        source: ChannelError,
    },
    #[error("failed to write `{key}` to {store}: {source}")]
    StoreWrite {
        key: String,
        store: String,
        #[source]
        source: ChannelError,
    },
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("scripted input ended before the session finished; end the script with enter or ctrl-c")]
    ScriptExhausted,
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub render: RenderOptions,
    pub log: SessionLog,
}

/// Mutable bookkeeping for one run. Only the orchestrator writes to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub committed: BTreeMap<String, String>,
    /// Lines left on screen by each field advanced past, most recent last.
    pub history: Vec<usize>,
    pub index: usize,
    snapshot: Snapshot,
}

impl SessionState {
    /// Values accepted during this run win over the last store snapshot.
    pub fn latest_value(&self, key: &str) -> Option<&str> {
        self.committed
            .get(key)
            .or_else(|| self.snapshot.get(key))
            .map(String::as_str)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
    }

    pub fn record_advance(&mut self, rendered_lines: usize) {
        self.history.push(rendered_lines);
        self.index += 1;
    }

    /// Moves back one field and returns how many lines the previous field left on screen.
    pub fn step_back(&mut self) -> usize {
        if self.index == 0 {
            return 0;
        }
        self.index -= 1;
        self.history.pop().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub committed: BTreeMap<String, String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed(SessionReport),
    Cancelled(SessionReport),
}

pub struct Session<'a> {
    fields: &'a [FieldSpec],
    state: SessionState,
    skipped: Vec<String>,
    options: SessionOptions,
}

impl<'a> Session<'a> {
    pub fn new(fields: &'a [FieldSpec], options: SessionOptions) -> Self {
        Self {
            fields,
            state: SessionState::default(),
            skipped: Vec::new(),
            options,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn run(
        &mut self,
        channel: &mut dyn Channel,
        terminal: &mut dyn PromptTerminal,
    ) -> Result<SessionOutcome, SessionError> {
        let fields = self.fields;
        let store = channel.describe();
        let snapshot = channel
            .get()
            .map_err(|source| SessionError::StoreRead {
                store: store.clone(),
                source,
            })?;
        self.state.replace_snapshot(snapshot);
        self.options.log.info(
            "session_started",
            &format!("fields={} store={store}", fields.len()),
        );

        while let Some(spec) = fields.get(self.state.index) {
            let existing = ExistingValue::from_raw(spec, self.state.latest_value(&spec.key));
            let mut prompt =
                FieldPrompt::new(spec, existing, spec.default.clone(), self.state.index > 0);
            let (outcome, live_lines) = self.drive(&mut prompt, terminal)?;
            match outcome {
                Outcome::Cancel => {
                    self.finalize(spec, &outcome, live_lines, terminal)?;
                    self.options
                        .log
                        .warn("session_cancelled", &format!("key={}", spec.key));
                    return Ok(SessionOutcome::Cancelled(self.report()));
                }
                Outcome::Previous => {
                    let previous_lines = self.state.step_back();
                    terminal.erase_lines(live_lines + previous_lines)?;
                    self.options
                        .log
                        .info("field_previous", &format!("key={}", spec.key));
                }
                Outcome::Skip => {
                    let lines = self.finalize(spec, &outcome, live_lines, terminal)?;
                    if !self.skipped.contains(&spec.key) {
                        self.skipped.push(spec.key.clone());
                    }
                    self.state.record_advance(lines);
                    self.options
                        .log
                        .info("field_skipped", &format!("key={}", spec.key));
                }
                Outcome::Commit(ref value) => {
                    let text = prompt.store_text(value);
                    self.persist(spec, &text, channel, &store)?;
                    let summary = render_commit(spec, &text, &self.options.render);
                    let lines = self.show_summary(&summary, live_lines, terminal)?;
                    self.state.record_advance(lines);
                    self.options
                        .log
                        .info("field_committed", &format!("key={}", spec.key));
                }
            }
        }

        self.options.log.info(
            "session_completed",
            &format!(
                "committed={} skipped={}",
                self.state.committed.len(),
                self.skipped.len()
            ),
        );
        Ok(SessionOutcome::Completed(self.report()))
    }

    fn drive(
        &self,
        prompt: &mut FieldPrompt<'_>,
        terminal: &mut dyn PromptTerminal,
    ) -> Result<(Outcome, usize), SessionError> {
        let mut live_lines = 0;
        loop {
            let frame = prompt.render(&self.options.render);
            terminal.erase_lines(live_lines)?;
            terminal.write_block(&frame)?;
            live_lines = line_count(&frame);
            let outcome = match terminal.read_event()? {
                InputEvent::Interrupt => prompt.cancel(),
                InputEvent::Key(key) => match prompt.handle_key(key) {
                    Some(outcome) => outcome,
                    None => continue,
                },
            };
            return Ok((outcome, live_lines));
        }
    }

    /// Writes one value, then re-reads the store so normalized values are what we keep.
    fn persist(
        &mut self,
        spec: &FieldSpec,
        raw: &str,
        channel: &mut dyn Channel,
        store: &str,
    ) -> Result<(), SessionError> {
        let partial = Snapshot::from_iter([(spec.key.clone(), raw.to_string())]);
        if let Err(source) = channel.set(&partial) {
            self.options.log.error(
                "store_write_failed",
                &format!("key={} error={source}", spec.key),
            );
            return Err(SessionError::StoreWrite {
                key: spec.key.clone(),
                store: store.to_string(),
                source,
            });
        }
        let snapshot = channel
            .get()
            .map_err(|source| SessionError::StoreRead {
                store: store.to_string(),
                source,
            })?;
        let stored = snapshot.get(&spec.key).cloned().unwrap_or_else(|| raw.to_string());
        self.state.replace_snapshot(snapshot);
        self.state.committed.insert(spec.key.clone(), stored);
        self.skipped.retain(|key| key != &spec.key);
        Ok(())
    }

    /// Replaces the live prompt with its summary and returns the summary's line count.
    fn finalize(
        &self,
        spec: &FieldSpec,
        outcome: &Outcome,
        live_lines: usize,
        terminal: &mut dyn PromptTerminal,
    ) -> Result<usize, SessionError> {
        let summary = render_outcome(spec, outcome, &self.options.render);
        self.show_summary(&summary, live_lines, terminal)
    }

    fn show_summary(
        &self,
        summary: &str,
        live_lines: usize,
        terminal: &mut dyn PromptTerminal,
    ) -> Result<usize, SessionError> {
        terminal.erase_lines(live_lines)?;
        terminal.write_block(summary)?;
        terminal.line_break()?;
        Ok(line_count(summary))
    }

    fn report(&self) -> SessionReport {
        SessionReport {
            committed: self.state.committed.clone(),
            skipped: self.skipped.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_value_prefers_committed_over_snapshot() {
        let mut state = SessionState::default();
        state.replace_snapshot(Snapshot::from_iter([(
            "PORT".to_string(),
            "80".to_string(),
        )]));
        assert_eq!(state.latest_value("PORT"), Some("80"));
        state
            .committed
            .insert("PORT".to_string(), "3000".to_string());
        assert_eq!(state.latest_value("PORT"), Some("3000"));
        assert_eq!(state.latest_value("MISSING"), None);
    }

    #[test]
    fn step_back_pops_history_and_clamps_at_zero() {
        let mut state = SessionState::default();
        state.record_advance(1);
        state.record_advance(2);
        assert_eq!(state.index, 2);
        assert_eq!(state.step_back(), 2);
        assert_eq!(state.index, 1);
        assert_eq!(state.step_back(), 1);
        assert_eq!(state.step_back(), 0);
        assert_eq!(state.index, 0);
        assert!(state.history.is_empty());
    }
}
