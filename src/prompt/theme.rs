use crossterm::style::{Attribute, Color, Stylize};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Default,
    Mono,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    accent: Option<Color>,
    muted: Option<Color>,
    error: Option<Color>,
    success: Option<Color>,
    decorate: bool,
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self {
                accent: Some(Color::Cyan),
                muted: Some(Color::DarkGrey),
                error: Some(Color::Red),
                success: Some(Color::Green),
                decorate: true,
            },
            ThemeName::Mono => Self {
                accent: None,
                muted: None,
                error: None,
                success: None,
                decorate: false,
            },
        }
    }

    pub fn mono() -> Self {
        Self::from_name(ThemeName::Mono)
    }

    pub fn accent(&self, text: &str) -> String {
        self.paint(text, self.accent, self.decorate.then_some(Attribute::Bold))
    }

    pub fn muted(&self, text: &str) -> String {
        self.paint(text, self.muted, None)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, self.error, None)
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, self.success, None)
    }

    pub fn struck(&self, text: &str) -> String {
        self.paint(text, self.error, self.decorate.then_some(Attribute::CrossedOut))
    }

    fn paint(&self, text: &str, color: Option<Color>, attribute: Option<Attribute>) -> String {
        let mut styled = text.stylize();
        if let Some(color) = color {
            styled = styled.with(color);
        }
        if let Some(attribute) = attribute {
            styled = styled.attribute(attribute);
        }
        if color.is_none() && attribute.is_none() {
            return text.to_string();
        }
        styled.to_string()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_name(ThemeName::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_theme_emits_plain_text() {
        let theme = Theme::mono();
        assert_eq!(theme.accent("PORT"), "PORT");
        assert_eq!(theme.struck("bad"), "bad");
    }

    #[test]
    fn default_theme_wraps_text_in_escape_codes() {
        let theme = Theme::default();
        let painted = theme.error("bad");
        assert!(painted.contains("bad"));
        assert_ne!(painted, "bad");
    }
}
