use super::SessionError;
use crate::prompt::InputEvent;
use std::collections::VecDeque;
use std::io;

/// Line-oriented output surface plus the operator's input events.
///
/// Blocks are written without a trailing newline; `erase_lines(n)` clears the last `n`
/// lines and leaves the cursor at the start of the first cleared line.
pub trait PromptTerminal {
    fn read_event(&mut self) -> Result<InputEvent, SessionError>;
    fn write_block(&mut self, block: &str) -> io::Result<()>;
    fn line_break(&mut self) -> io::Result<()>;
    fn erase_lines(&mut self, count: usize) -> io::Result<()>;
}

/// Replays a fixed list of events and keeps a model of the visible lines.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTerminal {
    events: VecDeque<InputEvent>,
    screen: Vec<String>,
    erasures: Vec<usize>,
    blocks: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Lines currently visible, oldest first.
    pub fn screen(&self) -> &[String] {
        &self.screen
    }

    /// The argument of every non-empty `erase_lines` call, in order.
    pub fn erasures(&self) -> &[usize] {
        &self.erasures
    }

    /// Every block written, in order.
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    pub fn remaining_events(&self) -> usize {
        self.events.len()
    }
}

impl PromptTerminal for ScriptedTerminal {
    fn read_event(&mut self) -> Result<InputEvent, SessionError> {
        self.events.pop_front().ok_or(SessionError::ScriptExhausted)
    }

    fn write_block(&mut self, block: &str) -> io::Result<()> {
        self.blocks.push(block.to_string());
        self.screen.extend(block.lines().map(str::to_string));
        Ok(())
    }

    fn line_break(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn erase_lines(&mut self, count: usize) -> io::Result<()> {
        if count == 0 {
            return Ok(());
        }
        if count > self.screen.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "cannot erase {count} lines; only {} are on screen",
                    self.screen.len()
                ),
            ));
        }
        self.erasures.push(count);
        self.screen.truncate(self.screen.len() - count);
        Ok(())
    }
}
