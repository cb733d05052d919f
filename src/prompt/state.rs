use super::field::{ExistingValue, FieldSpec, FieldValue};
use super::keys::PromptKey;
use super::slots::{compute_slots, custom_index, initial_cursor, wrap_cursor, Slot};
use super::toolbar::{Toolbar, ToolbarAvailability, ToolbarEffect, ToolbarOption};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Selecting,
    Typing,
}

/// Terminal result of one field prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Commit(FieldValue),
    Skip,
    Previous,
    Cancel,
}

/// Interaction state for exactly one field. Built fresh on every visit.
#[derive(Debug, Clone)]
pub struct FieldPrompt<'a> {
    spec: &'a FieldSpec,
    existing: ExistingValue,
    default: Option<FieldValue>,
    cursor: usize,
    mode: Mode,
    input: String,
    selected: Option<FieldValue>,
    kept_raw: Option<String>,
    secret_revealed: bool,
    validation_error: Option<String>,
    toolbar: Toolbar,
}

impl<'a> FieldPrompt<'a> {
    pub fn new(
        spec: &'a FieldSpec,
        existing: ExistingValue,
        default: Option<FieldValue>,
        has_previous: bool,
    ) -> Self {
        let mut prompt = Self {
            spec,
            existing,
            default,
            cursor: 0,
            mode: Mode::Selecting,
            input: String::new(),
            selected: None,
            kept_raw: None,
            secret_revealed: false,
            validation_error: None,
            toolbar: Toolbar::new(ToolbarAvailability {
                previous: has_previous,
                toggle_secret: spec.secret,
            }),
        };
        let slots = prompt.slots();
        prompt.cursor = initial_cursor(&slots);
        let only_custom = slots
            .iter()
            .all(|slot| matches!(slot, Slot::Custom | Slot::InvalidExisting { .. }));
        if only_custom && custom_index(&slots).is_some() {
            prompt.mode = Mode::Typing;
        }
        prompt.sync_selected(&slots);
        prompt
    }

    pub fn spec(&self) -> &FieldSpec {
        self.spec
    }

    pub fn existing(&self) -> &ExistingValue {
        &self.existing
    }

    pub fn default_value(&self) -> Option<&FieldValue> {
        self.default.as_ref()
    }

    /// Stored text of the current value when the last commit accepted it unchanged.
    pub fn kept_raw(&self) -> Option<&str> {
        self.kept_raw.as_deref()
    }

    /// Text to write for a committed `value`: the stored text when the current value was
    /// kept, so numbers beyond `f64` precision are not rewritten.
    pub fn store_text(&self, value: &FieldValue) -> String {
        match &self.kept_raw {
            Some(raw) => raw.clone(),
            None => value.to_string(),
        }
    }

    pub fn slots(&self) -> Vec<Slot> {
        compute_slots(self.spec.kind, &self.existing, self.default.as_ref())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The value the cursor currently selects, if it rests on a slot that holds one.
    pub fn selected_value(&self) -> Option<&FieldValue> {
        self.selected.as_ref()
    }

    pub fn secret_revealed(&self) -> bool {
        self.secret_revealed
    }

    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    pub fn handle_key(&mut self, key: PromptKey) -> Option<Outcome> {
        self.validation_error = None;
        if self.toolbar.is_open() || key == PromptKey::Tab {
            return self.handle_toolbar_key(key);
        }
        if key == PromptKey::ToggleReveal {
            self.toggle_reveal();
            return None;
        }
        match self.mode {
            Mode::Selecting => self.handle_selecting_key(key),
            Mode::Typing => self.handle_typing_key(key),
        }
    }

    /// Finalizes the prompt after an interrupt from the hosting runtime.
    pub fn cancel(&mut self) -> Outcome {
        self.finish(Outcome::Cancel)
    }

    fn handle_toolbar_key(&mut self, key: PromptKey) -> Option<Outcome> {
        match self.toolbar.handle_key(key) {
            ToolbarEffect::Activated(ToolbarOption::Skip) => Some(self.finish(Outcome::Skip)),
            ToolbarEffect::Activated(ToolbarOption::Previous) => {
                Some(self.finish(Outcome::Previous))
            }
            ToolbarEffect::Activated(ToolbarOption::ToggleSecret) => {
                self.toggle_reveal();
                None
            }
            ToolbarEffect::Activated(ToolbarOption::Close)
            | ToolbarEffect::Ignored
            | ToolbarEffect::Opened
            | ToolbarEffect::Moved
            | ToolbarEffect::Closed => None,
        }
    }

    fn handle_selecting_key(&mut self, key: PromptKey) -> Option<Outcome> {
        match key {
            PromptKey::Up => self.move_cursor(false),
            PromptKey::Down => self.move_cursor(true),
            PromptKey::Char(ch) => self.start_typing(Some(ch)),
            PromptKey::Enter => return self.commit(),
            PromptKey::Left
            | PromptKey::Right
            | PromptKey::Tab
            | PromptKey::Escape
            | PromptKey::Backspace
            | PromptKey::ToggleReveal => {}
        }
        None
    }

    fn handle_typing_key(&mut self, key: PromptKey) -> Option<Outcome> {
        match key {
            PromptKey::Char(ch) => self.input.push(ch),
            PromptKey::Backspace => {
                self.input.pop();
            }
            PromptKey::Escape => {
                self.input.clear();
                self.mode = Mode::Selecting;
                let slots = self.slots();
                self.sync_selected(&slots);
            }
            PromptKey::Up => self.move_cursor(false),
            PromptKey::Down => self.move_cursor(true),
            PromptKey::Enter => return self.commit(),
            PromptKey::Left | PromptKey::Right | PromptKey::Tab | PromptKey::ToggleReveal => {}
        }
        None
    }

    fn move_cursor(&mut self, forward: bool) {
        let slots = self.slots();
        if slots.len() <= 1 {
            return;
        }
        if self.mode == Mode::Typing {
            self.input.clear();
            self.mode = Mode::Selecting;
        }
        self.cursor = wrap_cursor(self.cursor.min(slots.len() - 1), slots.len(), forward);
        self.sync_selected(&slots);
    }

    fn start_typing(&mut self, seed: Option<char>) {
        let slots = self.slots();
        let Some(custom) = custom_index(&slots) else {
            return;
        };
        self.cursor = custom;
        self.mode = Mode::Typing;
        self.input.clear();
        if let Some(ch) = seed {
            self.input.push(ch);
        }
        self.sync_selected(&slots);
    }

    fn sync_selected(&mut self, slots: &[Slot]) {
        self.selected = slots.get(self.cursor).and_then(Slot::value).cloned();
    }

    fn toggle_reveal(&mut self) {
        if self.spec.secret {
            self.secret_revealed = !self.secret_revealed;
        }
    }

    fn commit(&mut self) -> Option<Outcome> {
        self.kept_raw = None;
        let slots = self.slots();
        let Some(slot) = slots.get(self.cursor) else {
            return None;
        };
        if let Slot::InvalidExisting { error, .. } = slot {
            return self.reject(error.clone());
        }
        let value = match self.mode {
            Mode::Typing => {
                if self.input.trim().is_empty() {
                    if self.spec.accepts_empty() {
                        return Some(self.finish(Outcome::Commit(FieldValue::String(String::new()))));
                    }
                    return self.reject(self.spec.empty_input_message().to_string());
                }
                match self.spec.parse_value(&self.input) {
                    Ok(value) => value,
                    Err(message) => return self.reject(message),
                }
            }
            Mode::Selecting => match slot.value() {
                Some(value) => value.clone(),
                None => {
                    self.start_typing(None);
                    return self.reject(self.spec.empty_input_message().to_string());
                }
            },
        };
        if let Some(message) = self.spec.validate(&value) {
            return self.reject(message);
        }
        if self.mode == Mode::Selecting && matches!(slot, Slot::Current(_)) {
            self.kept_raw = self.existing.raw.clone();
        }
        Some(self.finish(Outcome::Commit(value)))
    }

    fn reject(&mut self, message: String) -> Option<Outcome> {
        self.validation_error = Some(message);
        None
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        self.secret_revealed = false;
        self.toolbar.close();
        outcome
    }
}
