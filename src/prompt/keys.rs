use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub const SCRIPT_KEYS_ENV: &str = "ENVPROMPT_SCRIPT_KEYS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKey {
    Up,
    Down,
    Left,
    Right,
    Tab,
    Enter,
    Escape,
    Backspace,
    ToggleReveal,
    Char(char),
}

impl PromptKey {
    fn as_str(self) -> &'static str {
        match self {
            PromptKey::Up => "up",
            PromptKey::Down => "down",
            PromptKey::Left => "left",
            PromptKey::Right => "right",
            PromptKey::Tab => "tab",
            PromptKey::Enter => "enter",
            PromptKey::Escape => "esc",
            PromptKey::Backspace => "backspace",
            PromptKey::ToggleReveal => "ctrl-r",
            PromptKey::Char(_) => "char",
        }
    }
}

impl std::fmt::Display for PromptKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptKey::Char(ch) => write!(f, "char({ch})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Everything a prompt can observe while it waits for the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(PromptKey),
    Interrupt,
}

pub fn input_event_from_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => Some(InputEvent::Interrupt),
            KeyCode::Char('r') => Some(InputEvent::Key(PromptKey::ToggleReveal)),
            _ => None,
        };
    }
    let key = match key.code {
        KeyCode::Up => PromptKey::Up,
        KeyCode::Down => PromptKey::Down,
        KeyCode::Left | KeyCode::BackTab => PromptKey::Left,
        KeyCode::Right => PromptKey::Right,
        KeyCode::Tab => PromptKey::Tab,
        KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') => PromptKey::Enter,
        KeyCode::Esc => PromptKey::Escape,
        KeyCode::Backspace => PromptKey::Backspace,
        KeyCode::Char(ch) if !ch.is_control() => PromptKey::Char(ch),
        _ => return None,
    };
    Some(InputEvent::Key(key))
}

/// Parses a comma-separated key script such as `down,text=3000,enter,ctrl-c`.
///
/// Single-character tokens type that character; `text=...` types every character
/// after the `=`.
pub fn parse_scripted_keys(raw: &str) -> Result<Vec<InputEvent>, String> {
    let mut events = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if let Some(text) = token.strip_prefix("text=") {
            events.extend(text.chars().map(|ch| InputEvent::Key(PromptKey::Char(ch))));
            continue;
        }
        let mut chars = token.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            events.push(InputEvent::Key(PromptKey::Char(ch)));
            continue;
        }
        let event = match token.to_ascii_lowercase().as_str() {
            "up" => InputEvent::Key(PromptKey::Up),
            "down" => InputEvent::Key(PromptKey::Down),
            "left" => InputEvent::Key(PromptKey::Left),
            "right" => InputEvent::Key(PromptKey::Right),
            "tab" => InputEvent::Key(PromptKey::Tab),
            "enter" => InputEvent::Key(PromptKey::Enter),
            "esc" => InputEvent::Key(PromptKey::Escape),
            "backspace" => InputEvent::Key(PromptKey::Backspace),
            "ctrl-r" => InputEvent::Key(PromptKey::ToggleReveal),
            "ctrl-c" => InputEvent::Interrupt,
            other => {
                return Err(format!(
                    "invalid {SCRIPT_KEYS_ENV} token `{other}`; valid tokens: up,down,left,right,tab,enter,esc,backspace,ctrl-r,ctrl-c,text=<chars>,<single char>"
                ));
            }
        };
        events.push(event);
    }
    Ok(events)
}
