//! Chat area
//!
//! Displays the event history of the joined channel. Consecutive lines from
//! the same author collapse their headers, mirroring how the history is
//! grouped by [`harbor_core::view`].

use harbor_app::App;
use harbor_core::view::{self, EventLine};
use harbor_proto::{EventData, SystemKind};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(channel) = app.channel() else {
        let block = Block::default().borders(Borders::ALL).title(" No Channel ");
        frame.render_widget(block, area);
        return;
    };

    let title = format!(" #{} ", channel.name);
    let block = Block::default().borders(Borders::ALL).title(title);

    let items: Vec<ListItem> = view::lines(channel)
        .iter()
        .map(|line| render_line(line, app.user_name()))
        .collect();

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    let list = List::new(visible_items).block(block);

    frame.render_widget(list, area);
}

fn render_line(line: &EventLine<'_>, own_name: &str) -> ListItem<'static> {
    match &line.event.data {
        EventData::Message { message } => {
            let author_style = if line.event.user == own_name {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            };

            // Grouped lines repeat the author, so only the first shows it.
            let prefix = if line.prev_is_same {
                Span::raw(" ".repeat(line.event.user.len() + 2))
            } else {
                Span::styled(format!("<{}>", line.event.user), author_style)
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", view::format_time(line.date)),
                    Style::default().fg(Color::DarkGray),
                ),
                prefix,
                Span::raw(" "),
                Span::raw(message.clone()),
            ]))
        },
        EventData::System { system } => {
            let verb = match system {
                SystemKind::Login => "joined",
                SystemKind::Logout => "left",
            };
            ListItem::new(Line::from(Span::styled(
                format!("-- {} {} ({})", line.event.user, verb, view::format_date(line.date)),
                Style::default().fg(Color::DarkGray),
            )))
        },
    }
}
