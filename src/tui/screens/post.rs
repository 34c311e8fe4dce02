//! Post screen - display the generated post and, on demand, its transcript

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
};

use crate::blog::{Artifact, BlogOutcome};
use crate::tui::app::Status;
use crate::tui::screens::form::status_line;

/// Post screen state
pub struct PostScreen {
    outcome: Option<BlogOutcome>,
    show_transcript: bool,
    scroll_offset: usize,
    /// Rows of the body after wrapping at the last drawn width
    content_height: usize,
    visible_height: usize,
}

impl Default for PostScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl PostScreen {
    pub fn new() -> Self {
        Self {
            outcome: None,
            show_transcript: false,
            scroll_offset: 0,
            content_height: 0,
            visible_height: 0,
        }
    }

    pub fn set_outcome(&mut self, outcome: BlogOutcome) {
        self.outcome = Some(outcome);
        self.show_transcript = false;
        self.scroll_offset = 0;
    }

    pub fn has_post(&self) -> bool {
        self.outcome.is_some()
    }

    /// The saved artifact, if the last export succeeded
    pub fn artifact(&self) -> Option<&Artifact> {
        self.outcome.as_ref().and_then(|o| o.export.as_ref().ok())
    }

    pub fn showing_transcript(&self) -> bool {
        self.show_transcript
    }

    pub fn toggle_transcript(&mut self) {
        self.show_transcript = !self.show_transcript;
        self.scroll_offset = 0;
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect, status: &Status, spinner: &str) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Header
                Constraint::Min(5),    // Post or transcript
                Constraint::Length(3), // Status
                Constraint::Length(3), // Help
            ])
            .split(area);

        let header_text = if let Some(ref outcome) = self.outcome {
            let saved = match &outcome.export {
                Ok(artifact) => Span::styled(
                    artifact.path.display().to_string(),
                    Style::default().fg(Color::Green),
                ),
                Err(_) => Span::styled("not saved", Style::default().fg(Color::Red)),
            };
            vec![
                Line::from(Span::styled(
                    outcome.video.watch_url(),
                    Style::default().fg(Color::White).bold(),
                )),
                Line::from(vec![
                    Span::styled(
                        format!("{} words", outcome.post.word_count()),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(" • "),
                    Span::styled(
                        format!("transcript {} words", outcome.transcript.word_count()),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(" • "),
                    saved,
                ]),
            ]
        } else {
            vec![Line::from("No post generated yet")]
        };

        let header = Paragraph::new(header_text).block(
            Block::default()
                .title(" Blog post ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        );
        frame.render_widget(header, chunks[0]);

        let (title, body) = match &self.outcome {
            Some(outcome) if self.show_transcript => (" Transcript ", outcome.transcript.as_str()),
            Some(outcome) => (" Post ", outcome.post.as_str()),
            None => (" Post ", ""),
        };
        let body_lines: Vec<Line> = body.lines().map(Line::from).collect();

        let body_area = chunks[1];
        let visible_height = body_area.height.saturating_sub(2) as usize;
        let inner_width = body_area.width.saturating_sub(2);

        let content = Paragraph::new(body_lines).wrap(Wrap { trim: false });
        self.content_height = content.line_count(inner_width);
        self.visible_height = visible_height;
        self.scroll_offset = self.scroll_offset.min(self.max_offset());

        let content = content
            .scroll((self.scroll_offset as u16, 0))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            );
        frame.render_widget(content, body_area);

        // Scrollbar
        if self.content_height > visible_height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            let mut scrollbar_state = ScrollbarState::new(self.content_height)
                .position(self.scroll_offset)
                .viewport_content_length(visible_height);

            frame.render_stateful_widget(
                scrollbar,
                body_area.inner(Margin {
                    horizontal: 0,
                    vertical: 1,
                }),
                &mut scrollbar_state,
            );
        }

        let status_widget = Paragraph::new(status_line(status, spinner))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(status_widget, chunks[2]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" ↑/↓ ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Scroll  "),
            Span::styled(" t ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(if self.showing_transcript() {
                " Post  "
            } else {
                " Transcript  "
            }),
            Span::styled(" d ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Download  "),
            Span::styled(" Esc ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Back"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(help, chunks[3]);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if self.scroll_offset < self.max_offset() {
            self.scroll_offset += 1;
        }
    }

    pub fn page_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(10);
    }

    pub fn page_down(&mut self) {
        self.scroll_offset = (self.scroll_offset + 10).min(self.max_offset());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_offset();
    }

    /// Offset at which the last wrapped row sits at the bottom of the pane
    fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.visible_height)
    }
}
