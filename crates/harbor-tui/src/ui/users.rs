//! Users sidebar
//!
//! Lists the members of the joined channel, own name highlighted.

use harbor_app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

/// Render the users sidebar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let users = app.channel().map(|c| c.users.as_slice()).unwrap_or_default();

    let title = format!(" Users ({}) ", users.len());
    let block = Block::default().borders(Borders::ALL).title(title);

    let items: Vec<ListItem> = users
        .iter()
        .map(|name| {
            let style = if name == app.user_name() {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(name.clone(), style)))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
