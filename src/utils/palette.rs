use ratatui::style::Color;

use crate::internal::theme::Theme;

/// Colors used by the terminal renderer for one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuiTheme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub link: Color,
    pub accent: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub category: Color,
}

impl TuiTheme {
    /// Flexoki-inspired light palette.
    pub fn light() -> Self {
        Self {
            background: parse_color("#fffcf0"),
            foreground: parse_color("#100f0f"),
            muted: parse_color("#6f6e69"),
            border: parse_color("#b7b5ac"),
            link: parse_color("#205ea6"),
            accent: parse_color("#ad8301"),
            selection_bg: parse_color("#dad8ce"),
            selection_fg: parse_color("#100f0f"),
            category: parse_color("#66800b"),
        }
    }

    /// Flexoki-inspired dark palette.
    pub fn dark() -> Self {
        Self {
            background: parse_color("#100f0f"),
            foreground: parse_color("#cecdc3"),
            muted: parse_color("#878580"),
            border: parse_color("#403e3c"),
            link: parse_color("#4385be"),
            accent: parse_color("#d0a215"),
            selection_bg: parse_color("#343331"),
            selection_fg: parse_color("#fffcf0"),
            category: parse_color("#879a39"),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }
}

impl Default for TuiTheme {
    fn default() -> Self {
        Self::light()
    }
}

fn parse_color(hex: &str) -> Color {
    if let Ok(c) = hex.parse::<Color>() {
        return c;
    }

    let hex = hex.trim_start_matches('#');
    match hex.len() {
        6 => {
            let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
            match (channel(0..2), channel(2..4), channel(4..6)) {
                (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
                _ => Color::Reset,
            }
        }
        _ => Color::Reset,
    }
}
