//! Form screen - video URL input and word count selector

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::blog::{
    next_word_count, previous_word_count, snap_word_count, BlogRequest, MAX_WORD_COUNT,
    MIN_WORD_COUNT,
};
use crate::tui::app::Status;

/// Which form field receives key input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Url,
    WordCount,
}

/// Form screen state
pub struct FormScreen {
    url: String,
    word_count: u32,
    focus: Field,
}

impl FormScreen {
    pub fn new(default_word_count: u32) -> Self {
        Self {
            url: String::new(),
            word_count: snap_word_count(default_word_count),
            focus: Field::Url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn word_count(&self) -> u32 {
        self.word_count
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn request(&self) -> BlogRequest {
        BlogRequest::new(self.url.trim(), self.word_count)
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Url => Field::WordCount,
            Field::WordCount => Field::Url,
        };
    }

    pub fn push_char(&mut self, c: char) {
        self.url.push(c);
    }

    pub fn backspace(&mut self) {
        self.url.pop();
    }

    pub fn clear_url(&mut self) {
        self.url.clear();
    }

    pub fn increase(&mut self) {
        self.word_count = next_word_count(self.word_count);
    }

    pub fn decrease(&mut self) {
        self.word_count = previous_word_count(self.word_count);
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, status: &Status, spinner: &str) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // URL
                Constraint::Length(3), // Word count
                Constraint::Min(4),    // Status
                Constraint::Length(3), // Help
            ])
            .split(area);

        let title = Paragraph::new("vid2blog - YouTube video to blog post")
            .style(Style::default().fg(Color::Cyan).bold())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(title, chunks[0]);

        // URL input
        let url_style = focus_style(self.focus == Field::Url);
        let url_text = if self.url.is_empty() {
            Line::from(Span::styled(
                "https://www.youtube.com/watch?v=...",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(self.url.as_str())
        };
        let url_input = Paragraph::new(url_text).block(
            Block::default()
                .title(" YouTube video URL ")
                .borders(Borders::ALL)
                .border_style(url_style),
        );
        frame.render_widget(url_input, chunks[1]);

        if self.focus == Field::Url {
            let max_x = chunks[1].x + chunks[1].width.saturating_sub(2);
            let cursor_x = (chunks[1].x + 1 + self.url.chars().count() as u16).min(max_x);
            frame.set_cursor(cursor_x, chunks[1].y + 1);
        }

        // Word count selector
        let selector = Paragraph::new(Line::from(vec![
            Span::styled(
                if self.word_count > MIN_WORD_COUNT { "◀ " } else { "  " },
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("{} words", self.word_count),
                Style::default().fg(Color::White).bold(),
            ),
            Span::styled(
                if self.word_count < MAX_WORD_COUNT { " ▶" } else { "  " },
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("   ({}-{})", MIN_WORD_COUNT, MAX_WORD_COUNT),
                Style::default().fg(Color::DarkGray),
            ),
        ]))
        .block(
            Block::default()
                .title(" Approximate length ")
                .borders(Borders::ALL)
                .border_style(focus_style(self.focus == Field::WordCount)),
        );
        frame.render_widget(selector, chunks[2]);

        // Status
        let status_widget = Paragraph::new(status_line(status, spinner))
            .wrap(Wrap { trim: true })
            .block(Block::default().title(" Status ").borders(Borders::ALL));
        frame.render_widget(status_widget, chunks[3]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Generate  "),
            Span::styled(" Tab ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Switch field  "),
            Span::styled(" ←/→ ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Words  "),
            Span::styled(" F1 ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Help  "),
            Span::styled(" Esc ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Quit"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(help, chunks[4]);
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Blue)
    }
}

/// Render a status as a single styled line
pub fn status_line<'a>(status: &'a Status, spinner: &'a str) -> Line<'a> {
    match status {
        Status::Idle => Line::from(Span::styled(
            "Paste a video link and press Enter",
            Style::default().fg(Color::DarkGray),
        )),
        Status::Working(stage) => Line::from(vec![
            Span::styled(format!("{} ", spinner), Style::default().fg(Color::Cyan)),
            Span::raw(stage.message()),
        ]),
        Status::Success(msg) => Line::from(Span::styled(
            msg.as_str(),
            Style::default().fg(Color::Green),
        )),
        Status::Warning(msg) => Line::from(Span::styled(
            msg.as_str(),
            Style::default().fg(Color::Yellow),
        )),
        Status::Error(msg) => Line::from(Span::styled(
            msg.as_str(),
            Style::default().fg(Color::Red),
        )),
    }
}
