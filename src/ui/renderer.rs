use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::core::message::{Message, Role};
use crate::core::session::ChatSession;
use crate::ui::state::UiState;
use crate::ui::theme::Theme;

pub const APP_TITLE: &str = "My ChatBot AI";
pub const TYPING_INDICATOR: &str = "Typing...";
const MAX_INPUT_LINES: u16 = 6;

pub fn ui(f: &mut Frame, session: &ChatSession, state: &UiState, model: &str) {
    let theme = &state.theme;
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        f.area(),
    );

    let notice_height = u16::from(state.status.is_some() || session.pending_file().is_some());
    let input_height = state.input_line_count().min(MAX_INPUT_LINES) + 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(notice_height),
            Constraint::Length(input_height),
        ])
        .split(f.area());

    let title = Line::from(vec![
        Span::styled(APP_TITLE, theme.title_style),
        Span::raw(format!(
            "  •  {model}  •  Ctrl+T {}",
            theme.mode.toggle_glyph()
        )),
    ]);
    f.render_widget(Paragraph::new(title), chunks[0]);

    render_transcript(f, chunks[1], session, state);

    if notice_height > 0 {
        let notice = match (&state.status, session.pending_file()) {
            (Some(status), _) => Line::from(Span::styled(status.clone(), theme.status_style)),
            (None, Some(file)) => {
                Line::from(Span::styled(format!("📎 {}", file.name), theme.attachment_style))
            }
            (None, None) => Line::default(),
        };
        f.render_widget(Paragraph::new(notice), chunks[2]);
    }

    f.render_widget(state.textarea(), chunks[3]);
}

fn render_transcript(f: &mut Frame, area: Rect, session: &ChatSession, state: &UiState) {
    let lines = build_transcript_lines(session.messages(), session.is_busy(), &state.theme);
    let rows = prewrap_lines(&lines, area.width);
    let total = u16::try_from(rows.len()).unwrap_or(u16::MAX);
    let max_offset = total.saturating_sub(area.height);
    let offset = max_offset.saturating_sub(state.scroll_from_bottom);

    f.render_widget(Paragraph::new(rows).scroll((offset, 0)), area);
}

pub fn build_transcript_lines<'a>(
    messages: &'a [Message],
    busy: bool,
    theme: &Theme,
) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    for msg in messages {
        match msg.role {
            Role::User => {
                let mut content_lines = msg.content.split('\n');
                let first = content_lines.next().unwrap_or_default();
                lines.push(Line::from(vec![
                    Span::styled("You: ", theme.user_prefix_style),
                    Span::styled(first, theme.user_text_style),
                ]));
                for rest in content_lines {
                    lines.push(Line::from(Span::styled(rest, theme.user_text_style)));
                }
            }
            Role::Model => {
                for content_line in msg.content.split('\n') {
                    lines.push(Line::from(Span::styled(
                        content_line,
                        theme.model_text_style,
                    )));
                }
            }
        }
        lines.push(Line::default());
    }

    if busy {
        lines.push(Line::from(Span::styled(
            TYPING_INDICATOR,
            theme.typing_indicator_style,
        )));
    }

    lines
}

/// Wrap `lines` to `width` columns at word boundaries, splitting words that
/// are wider than a row. Rendering the result without ratatui's own wrapping
/// keeps the row count used for scrolling equal to what is drawn.
pub fn prewrap_lines(lines: &[Line], width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let mut wrapper = RowWrapper::new(width);
        for span in &line.spans {
            for ch in span.content.chars() {
                wrapper.push(ch, span.style);
            }
        }
        out.extend(wrapper.finish());
    }
    out
}

struct RowWrapper {
    width: usize,
    rows: Vec<Line<'static>>,
    row: Vec<Span<'static>>,
    row_width: usize,
    word: Vec<(char, Style)>,
    word_width: usize,
}

impl RowWrapper {
    fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
            row: Vec::new(),
            row_width: 0,
            word: Vec::new(),
            word_width: 0,
        }
    }

    fn push(&mut self, ch: char, style: Style) {
        if ch == ' ' {
            self.flush_word();
            // A space that would overflow ends the row and is dropped.
            if self.row_width + 1 > self.width {
                self.break_row();
            } else {
                self.append(ch, style, 1);
            }
        } else {
            self.word_width += ch.width().unwrap_or(0);
            self.word.push((ch, style));
        }
    }

    fn flush_word(&mut self) {
        if self.word.is_empty() {
            return;
        }
        if self.row_width > 0 && self.row_width + self.word_width > self.width {
            self.break_row();
        }
        for (ch, style) in std::mem::take(&mut self.word) {
            let ch_width = ch.width().unwrap_or(0);
            if self.row_width > 0 && self.row_width + ch_width > self.width {
                self.break_row();
            }
            self.append(ch, style, ch_width);
        }
        self.word_width = 0;
    }

    fn append(&mut self, ch: char, style: Style, ch_width: usize) {
        match self.row.last_mut() {
            Some(last) if last.style == style => last.content.to_mut().push(ch),
            _ => self.row.push(Span::styled(ch.to_string(), style)),
        }
        self.row_width += ch_width;
    }

    fn break_row(&mut self) {
        self.rows.push(Line::from(std::mem::take(&mut self.row)));
        self.row_width = 0;
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_word();
        if !self.row.is_empty() || self.rows.is_empty() {
            self.break_row();
        }
        self.rows
    }
}
