use crate::channel::Channel;
use crate::prompt::{input_event_from_key, InputEvent};
use crate::session::{PromptTerminal, Session, SessionError, SessionOutcome};
use crate::shared::display::display_width;
use crossterm::cursor::{Hide, MoveToColumn, MoveUp, Show};
use crossterm::event::{self, Event};
use crossterm::style::Print;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, size, Clear, ClearType};
use crossterm::{execute, queue};
use std::io::{self, Write};

const FALLBACK_COLUMNS: u16 = 80;

/// Screen rows a line occupies once the terminal soft-wraps it at `columns`.
pub fn rows_for_line(line: &str, columns: u16) -> usize {
    let columns = usize::from(columns.max(1));
    display_width(line).div_ceil(columns).max(1)
}

/// Rows taken by each logical line still on screen, oldest first.
///
/// Callers erase by logical line; this turns that into the number of physical rows to clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowLedger {
    rows: Vec<usize>,
}

impl RowLedger {
    pub fn record_block(&mut self, block: &str, columns: u16) {
        self.rows
            .extend(block.lines().map(|line| rows_for_line(line, columns)));
    }

    /// Forgets the last `lines` logical lines and returns how many rows they covered.
    pub fn take_rows(&mut self, lines: usize) -> usize {
        let keep = self.rows.len().saturating_sub(lines);
        self.rows.drain(keep..).sum()
    }
}

/// Inline terminal in raw mode. Prompts render below the cursor instead of taking over
/// the screen, so finished fields stay visible in the scrollback.
pub struct CrosstermTerminal {
    out: io::Stdout,
    ledger: RowLedger,
    restored: bool,
}

impl CrosstermTerminal {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(err) = execute!(out, Hide) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        Ok(Self {
            out,
            ledger: RowLedger::default(),
            restored: false,
        })
    }

    pub fn restore(mut self) -> io::Result<()> {
        self.restored = true;
        execute!(self.out, Show)?;
        disable_raw_mode()
    }

    fn columns() -> u16 {
        match size() {
            Ok((columns, _)) if columns > 0 => columns,
            _ => FALLBACK_COLUMNS,
        }
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        if !self.restored {
            let _ = execute!(self.out, Show);
            let _ = disable_raw_mode();
        }
    }
}

impl PromptTerminal for CrosstermTerminal {
    fn read_event(&mut self) -> Result<InputEvent, SessionError> {
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if let Some(event) = input_event_from_key(key) {
                return Ok(event);
            }
        }
    }

    fn write_block(&mut self, block: &str) -> io::Result<()> {
        self.ledger.record_block(block, Self::columns());
        for (idx, line) in block.lines().enumerate() {
            if idx > 0 {
                queue!(self.out, Print("\r\n"))?;
            }
            queue!(self.out, Print(line))?;
        }
        self.out.flush()
    }

    fn line_break(&mut self) -> io::Result<()> {
        queue!(self.out, Print("\r\n"))?;
        self.out.flush()
    }

    fn erase_lines(&mut self, count: usize) -> io::Result<()> {
        let rows = self.ledger.take_rows(count);
        if rows == 0 {
            return Ok(());
        }
        queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        for _ in 1..rows {
            queue!(self.out, MoveUp(1), Clear(ClearType::CurrentLine))?;
        }
        self.out.flush()
    }
}

/// Runs `session` in raw mode. A failed restore never hides the session's own error.
pub fn run_session_tui(
    session: &mut Session<'_>,
    channel: &mut dyn Channel,
) -> Result<SessionOutcome, SessionError> {
    let mut terminal = CrosstermTerminal::enter()?;
    let result = session.run(channel, &mut terminal);
    finish_with_restore(result, terminal.restore())
}

fn finish_with_restore(
    result: Result<SessionOutcome, SessionError>,
    restored: io::Result<()>,
) -> Result<SessionOutcome, SessionError> {
    let outcome = result?;
    restored?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionReport;

    #[test]
    fn rows_for_line_counts_soft_wraps_and_ignores_styling() {
        assert_eq!(rows_for_line("", 80), 1);
        assert_eq!(rows_for_line(&"x".repeat(80), 80), 1);
        assert_eq!(rows_for_line(&"x".repeat(81), 80), 2);
        assert_eq!(rows_for_line(&"x".repeat(111), 80), 2);
        assert_eq!(rows_for_line("\u{1b}[1mPORT\u{1b}[0m", 4), 1);
        assert_eq!(rows_for_line("界界界", 4), 2);
    }

    #[test]
    fn ledger_erases_every_row_of_wrapped_lines() {
        let mut ledger = RowLedger::default();
        ledger.record_block("✔ A = a", 40);
        let header = format!("? DATABASE_URL (string) {}", "d".repeat(60));
        ledger.record_block(&format!("{header}\n  ❯ custom value\n  hint"), 40);

        assert_eq!(ledger.take_rows(3), 2 + 1 + 1);
        assert_eq!(ledger.take_rows(1), 1);
        assert_eq!(ledger.take_rows(5), 0);
    }

    #[test]
    fn failed_restore_never_masks_the_session_error() {
        let restore_err = || Err(io::Error::new(io::ErrorKind::Other, "restore failed"));

        let err = finish_with_restore(Err(SessionError::ScriptExhausted), restore_err())
            .expect_err("session error");
        assert!(matches!(err, SessionError::ScriptExhausted));

        let err = finish_with_restore(
            Ok(SessionOutcome::Completed(SessionReport::default())),
            restore_err(),
        )
        .expect_err("restore error");
        assert!(matches!(err, SessionError::Terminal(_)));
    }
}
