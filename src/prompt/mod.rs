pub mod field;
pub mod keys;
pub mod render;
pub mod slots;
pub mod state;
pub mod theme;
pub mod toolbar;

pub use field::{ExistingValue, FieldKind, FieldSpec, FieldValue, ParsedValue, Validator};
pub use keys::{
    input_event_from_key, parse_scripted_keys, InputEvent, PromptKey, SCRIPT_KEYS_ENV,
};
pub use render::{render_commit, render_outcome, RenderOptions};
pub use slots::{compute_slots, Slot, SlotKind};
pub use state::{FieldPrompt, Mode, Outcome};
pub use theme::{Theme, ThemeName};
pub use toolbar::{Toolbar, ToolbarAvailability, ToolbarEffect, ToolbarOption};
