//! Help popup widget

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::tui::AppScreen;

/// Help popup that shows keyboard shortcuts
pub struct HelpPopup;

impl HelpPopup {
    pub fn draw(frame: &mut Frame, area: Rect, screen: AppScreen) {
        // Calculate popup area (centered, 60% width, 70% height)
        let popup_width = (area.width as f32 * 0.6) as u16;
        let popup_height = (area.height as f32 * 0.7) as u16;
        let popup_x = area.x + (area.width - popup_width) / 2;
        let popup_y = area.y + (area.height - popup_height) / 2;

        let popup_area = Rect {
            x: popup_x,
            y: popup_y,
            width: popup_width,
            height: popup_height,
        };

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let (heading, keys): (&str, &[(&str, &str)]) = match screen {
            AppScreen::Form => (
                "Form Shortcuts",
                &[
                    ("Enter", "Generate the blog post"),
                    ("Tab", "Switch between URL and length"),
                    ("←/→", "Change length by 50 words"),
                    ("Ctrl+U", "Clear the URL"),
                    ("F2", "Show the last post"),
                    ("F1", "Show this help"),
                    ("Esc", "Quit application"),
                ],
            ),
            AppScreen::Post => (
                "Post Shortcuts",
                &[
                    ("↑/k", "Scroll up"),
                    ("↓/j", "Scroll down"),
                    ("PgUp", "Page up"),
                    ("PgDn", "Page down"),
                    ("g/G", "Go to top/bottom"),
                    ("t", "Toggle transcript"),
                    ("d", "Download the Markdown file"),
                    ("Esc", "Back to the form"),
                ],
            ),
        };

        let mut full_text = vec![
            Line::from(Span::styled(
                heading,
                Style::default().fg(Color::Cyan).bold(),
            )),
            Line::from(""),
        ];
        full_text.extend(keys.iter().map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{:<8}", key), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        }));
        full_text.push(Line::from(""));
        full_text.push(Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )));

        let help = Paragraph::new(full_text).wrap(Wrap { trim: true }).block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .style(Style::default().bg(Color::Black)),
        );

        frame.render_widget(help, popup_area);
    }
}
