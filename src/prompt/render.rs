use super::field::{FieldKind, FieldSpec, FieldValue};
use super::slots::{effective_default, Slot};
use super::state::{FieldPrompt, Mode, Outcome};
use super::theme::Theme;
use super::toolbar::TOOLBAR_OPTIONS;
use crate::shared::display::{mask_secret, tail_for_display, truncate_for_display};

pub const DEFAULT_MAX_DISPLAY_LENGTH: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub theme: Theme,
    pub max_display_length: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            max_display_length: DEFAULT_MAX_DISPLAY_LENGTH,
        }
    }
}

impl RenderOptions {
    pub fn plain() -> Self {
        Self {
            theme: Theme::mono(),
            ..Self::default()
        }
    }
}

impl FieldPrompt<'_> {
    /// Renders the live prompt block. Pure: the same state always yields the same text.
    pub fn render(&self, options: &RenderOptions) -> String {
        let theme = &options.theme;
        let spec = self.spec();
        let slots = self.slots();
        let merged_default = effective_default(spec.kind, self.existing(), self.default_value());
        let mut lines = vec![header_line(spec, options)];

        for (idx, slot) in slots.iter().enumerate() {
            let pointer = if idx == self.cursor() {
                theme.accent("❯")
            } else {
                " ".to_string()
            };
            let body = match slot {
                Slot::InvalidExisting { raw, error } => format!(
                    "{}  {}",
                    theme.struck(&self.display_text(raw, options)),
                    theme.muted(&format!(
                        "invalid: {}",
                        truncate_for_display(error, options.max_display_length)
                    ))
                ),
                Slot::Current(value) => {
                    let label = if merged_default.as_ref() == Some(value) {
                        "current, default"
                    } else {
                        "current"
                    };
                    format!(
                        "{}  {}",
                        self.display_value(value, options),
                        theme.muted(label)
                    )
                }
                Slot::Default(value) => format!(
                    "{}  {}",
                    self.display_value(value, options),
                    theme.muted("default")
                ),
                Slot::Custom => self.custom_line(options),
            };
            lines.push(format!("  {pointer} {body}"));
        }

        if let Some(error) = self.validation_error() {
            lines.push(format!(
                "  {}",
                theme.error(&format!(
                    "✖ {}",
                    truncate_for_display(error, options.max_display_length)
                ))
            ));
        }

        if self.toolbar().is_open() {
            lines.push(self.toolbar_line(theme));
        } else {
            let mut hint = "↑/↓ choose · type for custom · enter confirm · tab options".to_string();
            if spec.secret {
                hint.push_str(" · ctrl-r reveal");
            }
            lines.push(format!("  {}", theme.muted(&hint)));
        }
        lines.join("\n")
    }

    fn custom_line(&self, options: &RenderOptions) -> String {
        let theme = &options.theme;
        if self.mode() == Mode::Typing {
            let shown = if self.masks_secrets() {
                mask_secret(&tail_for_display(self.input(), options.max_display_length))
            } else {
                tail_for_display(self.input(), options.max_display_length)
            };
            return format!("{shown}{}", theme.accent("▏"));
        }
        let placeholder = match self.spec().kind {
            FieldKind::Enum => format!(
                "custom ({})",
                truncate_for_display(&self.spec().values.join(" | "), options.max_display_length)
            ),
            FieldKind::Boolean => "custom (true | false)".to_string(),
            FieldKind::Number => "custom number".to_string(),
            FieldKind::String => "custom value".to_string(),
        };
        theme.muted(&placeholder)
    }

    fn toolbar_line(&self, theme: &Theme) -> String {
        let toolbar = self.toolbar();
        let labels: Vec<String> = TOOLBAR_OPTIONS
            .iter()
            .enumerate()
            .map(|(idx, option)| {
                let label = option.label(self.secret_revealed());
                if idx == toolbar.cursor() {
                    theme.accent(&format!("[{label}]"))
                } else if toolbar.is_enabled(*option) {
                    format!(" {label} ")
                } else {
                    theme.muted(&format!(" {label} "))
                }
            })
            .collect();
        format!("  {}", labels.join(" "))
    }

    fn masks_secrets(&self) -> bool {
        self.spec().secret && !self.secret_revealed()
    }

    fn display_value(&self, value: &FieldValue, options: &RenderOptions) -> String {
        self.display_text(&value.to_string(), options)
    }

    fn display_text(&self, text: &str, options: &RenderOptions) -> String {
        if text.is_empty() {
            return options.theme.muted("(empty)");
        }
        let shown = truncate_for_display(text, options.max_display_length);
        if self.masks_secrets() {
            mask_secret(&shown)
        } else {
            shown
        }
    }
}

fn header_line(spec: &FieldSpec, options: &RenderOptions) -> String {
    let theme = &options.theme;
    let mut meta = format!("({}", spec.kind.as_str());
    if !spec.required {
        meta.push_str(", optional");
    }
    if spec.secret {
        meta.push_str(", secret");
    }
    meta.push(')');
    let mut line = format!(
        "{} {} {}",
        theme.accent("?"),
        theme.accent(&spec.key),
        theme.muted(&meta)
    );
    if let Some(description) = spec.description.as_deref() {
        line.push_str(&format!(
            " {}",
            theme.muted(&truncate_for_display(description, options.max_display_length))
        ));
    }
    line
}

/// The block left on screen once a field is finalized. Empty for `Previous`, whose
/// output is erased instead.
pub fn render_outcome(spec: &FieldSpec, outcome: &Outcome, options: &RenderOptions) -> String {
    let theme = &options.theme;
    match outcome {
        Outcome::Commit(value) => render_commit(spec, &value.to_string(), options),
        Outcome::Skip => format!("{} {} {}", theme.muted("↷"), spec.key, theme.muted("skipped")),
        Outcome::Cancel => format!("{} {} {}", theme.error("✖"), spec.key, theme.muted("cancelled")),
        Outcome::Previous => String::new(),
    }
}

/// Summary for a committed field, showing `text` exactly as it was written to the store.
pub fn render_commit(spec: &FieldSpec, text: &str, options: &RenderOptions) -> String {
    let theme = &options.theme;
    let shown = if text.is_empty() {
        theme.muted("(empty)")
    } else {
        let truncated = truncate_for_display(text, options.max_display_length);
        if spec.secret {
            mask_secret(&truncated)
        } else {
            truncated
        }
    };
    format!(
        "{} {} {} {shown}",
        theme.success("✔"),
        spec.key,
        theme.muted("=")
    )
}
