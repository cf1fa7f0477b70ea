//! Status line
//!
//! Single-line status bar: transient messages, otherwise a key hint.

use harbor_app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
};

/// Render the status line.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match app.status_message() {
        Some(message) => (message.to_owned(), Style::default().fg(Color::Yellow)),
        None => (
            "Enter to send | Esc to quit".to_owned(),
            Style::default().fg(Color::DarkGray),
        ),
    };

    frame.render_widget(Paragraph::new(text).style(style), area);
}
