use super::keys::PromptKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarOption {
    Skip,
    Previous,
    ToggleSecret,
    Close,
}

pub const TOOLBAR_OPTIONS: [ToolbarOption; 4] = [
    ToolbarOption::Skip,
    ToolbarOption::Previous,
    ToolbarOption::ToggleSecret,
    ToolbarOption::Close,
];

impl ToolbarOption {
    pub fn label(self, secret_revealed: bool) -> &'static str {
        match self {
            ToolbarOption::Skip => "Skip",
            ToolbarOption::Previous => "Previous",
            ToolbarOption::ToggleSecret if secret_revealed => "Hide secret",
            ToolbarOption::ToggleSecret => "Show secret",
            ToolbarOption::Close => "Close",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarAvailability {
    pub previous: bool,
    pub toggle_secret: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarEffect {
    /// The toolbar was closed and the key is not for it.
    Ignored,
    Opened,
    Moved,
    Closed,
    Activated(ToolbarOption),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolbar {
    open: bool,
    cursor: usize,
    availability: ToolbarAvailability,
}

impl Toolbar {
    pub fn new(availability: ToolbarAvailability) -> Self {
        let mut toolbar = Self {
            open: false,
            cursor: 0,
            availability,
        };
        toolbar.cursor = toolbar.first_enabled();
        toolbar
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn highlighted(&self) -> ToolbarOption {
        TOOLBAR_OPTIONS[self.cursor]
    }

    pub fn is_enabled(&self, option: ToolbarOption) -> bool {
        match option {
            ToolbarOption::Skip | ToolbarOption::Close => true,
            ToolbarOption::Previous => self.availability.previous,
            ToolbarOption::ToggleSecret => self.availability.toggle_secret,
        }
    }

    /// Snaps the cursor back to the first enabled option when the current one is disabled.
    pub fn set_availability(&mut self, availability: ToolbarAvailability) {
        self.availability = availability;
        if self.cursor >= TOOLBAR_OPTIONS.len() || !self.is_enabled(TOOLBAR_OPTIONS[self.cursor]) {
            self.cursor = self.first_enabled();
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn handle_key(&mut self, key: PromptKey) -> ToolbarEffect {
        if !self.open {
            if key == PromptKey::Tab {
                self.open = true;
                self.cursor = self.first_enabled();
                return ToolbarEffect::Opened;
            }
            return ToolbarEffect::Ignored;
        }
        match key {
            PromptKey::Tab | PromptKey::Right | PromptKey::Down => {
                self.step(true);
                ToolbarEffect::Moved
            }
            PromptKey::Left | PromptKey::Up => {
                self.step(false);
                ToolbarEffect::Moved
            }
            PromptKey::Enter => {
                self.open = false;
                match self.highlighted() {
                    ToolbarOption::Close => ToolbarEffect::Closed,
                    option => ToolbarEffect::Activated(option),
                }
            }
            _ => {
                self.open = false;
                ToolbarEffect::Closed
            }
        }
    }

    fn first_enabled(&self) -> usize {
        TOOLBAR_OPTIONS
            .iter()
            .position(|option| self.is_enabled(*option))
            .unwrap_or(0)
    }

    fn step(&mut self, forward: bool) {
        let len = TOOLBAR_OPTIONS.len();
        let mut next = self.cursor;
        for _ in 0..len {
            next = if forward {
                (next + 1) % len
            } else {
                (next + len - 1) % len
            };
            if self.is_enabled(TOOLBAR_OPTIONS[next]) {
                self.cursor = next;
                return;
            }
        }
    }
}
