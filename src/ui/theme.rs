use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(ThemeMode::Dark),
            "light" => Some(ThemeMode::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    /// Glyph shown for the toggle: the mode you would switch to.
    pub fn toggle_glyph(self) -> &'static str {
        match self {
            ThemeMode::Dark => "☀",
            ThemeMode::Light => "🌙",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub mode: ThemeMode,
    pub background_color: Color,
    pub title_style: Style,
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub model_text_style: Style,
    pub typing_indicator_style: Style,
    pub attachment_style: Style,
    pub status_style: Style,
    pub input_border_style: Style,
    pub input_text_style: Style,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Theme {
            mode: ThemeMode::Dark,
            background_color: Color::Black,
            title_style: Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            model_text_style: Style::default().fg(Color::White),
            typing_indicator_style: Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::ITALIC),
            attachment_style: Style::default().fg(Color::Gray),
            status_style: Style::default().fg(Color::Yellow),
            input_border_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
        }
    }

    pub fn light() -> Self {
        Theme {
            mode: ThemeMode::Light,
            background_color: Color::White,
            title_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            model_text_style: Style::default().fg(Color::Black),
            typing_indicator_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::ITALIC),
            attachment_style: Style::default().fg(Color::DarkGray),
            status_style: Style::default().fg(Color::Red),
            input_border_style: Style::default().fg(Color::Black),
            input_text_style: Style::default().fg(Color::Black),
        }
    }
}
