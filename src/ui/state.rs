use ratatui::widgets::{Block, Borders};
use tui_textarea::TextArea;

use crate::ui::theme::{Theme, ThemeMode};

const INPUT_TITLE: &str =
    "Enter to send • Alt+Enter newline • /attach <path> • /detach • Ctrl+T theme • Ctrl+C quit";
const INPUT_PLACEHOLDER: &str = "Type your message here...";

/// View-only state: what is typed, how it looks, where it is scrolled.
pub struct UiState {
    pub theme: Theme,
    pub status: Option<String>,
    /// Lines scrolled up from the bottom of the transcript.
    pub scroll_from_bottom: u16,
    textarea: TextArea<'static>,
}

impl UiState {
    pub fn new(mode: ThemeMode) -> Self {
        let theme = Theme::for_mode(mode);
        let textarea = styled_textarea(&theme, Vec::new());
        Self {
            theme,
            status: None,
            scroll_from_bottom: 0,
            textarea,
        }
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.textarea
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn input_line_count(&self) -> u16 {
        self.textarea.lines().len().max(1) as u16
    }

    pub fn clear_input(&mut self) {
        self.textarea = styled_textarea(&self.theme, Vec::new());
    }

    pub fn toggle_theme(&mut self) {
        self.theme = Theme::for_mode(self.theme.mode.toggled());
        let lines = self.textarea.lines().to_vec();
        self.textarea = styled_textarea(&self.theme, lines);
        self.textarea.move_cursor(tui_textarea::CursorMove::Bottom);
        self.textarea.move_cursor(tui_textarea::CursorMove::End);
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_from_bottom = 0;
    }
}

fn styled_textarea(theme: &Theme, lines: Vec<String>) -> TextArea<'static> {
    let mut textarea = if lines.is_empty() {
        TextArea::default()
    } else {
        TextArea::new(lines)
    };
    textarea.set_style(theme.input_text_style);
    textarea.set_cursor_line_style(ratatui::style::Style::default());
    textarea.set_placeholder_text(INPUT_PLACEHOLDER);
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.input_border_style)
            .title(INPUT_TITLE),
    );
    textarea
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_theme_keeps_typed_text() {
        let mut state = UiState::new(ThemeMode::Dark);
        state.textarea_mut().insert_str("draft");
        state.toggle_theme();
        assert_eq!(state.theme.mode, ThemeMode::Light);
        assert_eq!(state.input_text(), "draft");
    }

    #[test]
    fn scrolling_saturates_at_bottom() {
        let mut state = UiState::new(ThemeMode::Dark);
        state.scroll_up(5);
        state.scroll_down(2);
        assert_eq!(state.scroll_from_bottom, 3);
        state.scroll_down(10);
        assert_eq!(state.scroll_from_bottom, 0);
    }

    #[test]
    fn clear_input_empties_textarea() {
        let mut state = UiState::new(ThemeMode::Light);
        state.textarea_mut().insert_str("hello");
        state.clear_input();
        assert_eq!(state.input_text(), "");
        assert_eq!(state.input_line_count(), 1);
    }
}
