//! Login form
//!
//! User name and channel name fields, the channel directory, and any server
//! rejection from the last attempt.

use harbor_app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::{InputState, input::LoginFocus};

const FIELD_HEIGHT: u16 = 3;
const HINT_HEIGHT: u16 = 2;

/// Render the login route.
pub fn render(frame: &mut Frame, app: &App, input: &InputState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(HINT_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let [user_area, channel_area, hint_area, directory_area, status_area] = chunks.as_ref()
    else {
        return;
    };

    render_field(
        frame,
        " User name ",
        input.user_name().buffer(),
        input.user_name().cursor(),
        input.focus() == LoginFocus::UserName,
        *user_area,
    );
    render_field(
        frame,
        " Channel ",
        input.channel_name().buffer(),
        input.channel_name().cursor(),
        input.focus() == LoginFocus::ChannelName,
        *channel_area,
    );
    render_hints(frame, app, *hint_area);
    render_directory(frame, app, *directory_area);
    render_status(frame, app, *status_area);
}

fn render_field(
    frame: &mut Frame,
    title: &str,
    buffer: &str,
    cursor: usize,
    focused: bool,
    area: Rect,
) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default().borders(Borders::ALL).title(title).border_style(border_style);
    frame.render_widget(Paragraph::new(buffer).block(block), area);

    if focused {
        let cursor_x = area.x + 1 + buffer[..cursor].chars().count() as u16;
        frame.set_cursor_position(Position::new(
            cursor_x.min(area.right().saturating_sub(2)),
            area.y + 1,
        ));
    }
}

fn render_hints(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        "Tab: switch field | Enter: join | Up: suggest channel | Down: use suggestion",
        Style::default().fg(Color::DarkGray),
    ))];

    if let Some(suggestion) = app.suggested_channel() {
        lines.push(Line::from(vec![
            Span::styled("Suggested channel: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                suggestion.to_owned(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_directory(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Channels ");

    let items: Vec<ListItem> = if app.directory().is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No channels yet. Pick any name to create one.",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        app.directory()
            .iter()
            .map(|status| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("#{}", status.name),
                        Style::default().fg(Color::Green),
                    ),
                    Span::raw(format!(" ({} users)", status.users_count)),
                ]))
            })
            .collect()
    };

    frame.render_widget(List::new(items).block(block), area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if let Some(error) = app.error() {
        (error.message().to_owned(), Style::default().fg(Color::Red))
    } else if let Some(message) = app.status_message() {
        (message.to_owned(), Style::default().fg(Color::Yellow))
    } else {
        (String::new(), Style::default())
    };

    frame.render_widget(Paragraph::new(text).style(style), area);
}
