//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees. The top-level dispatch follows the active route.

mod chat;
mod input;
mod login;
mod status;
mod users;

use harbor_app::App;
use harbor_client::SessionRoute;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::InputState;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App, input: &InputState) {
    match app.route() {
        SessionRoute::Connecting => render_connecting(frame),
        SessionRoute::Login => login::render(frame, app, input),
        SessionRoute::Channel => render_channel(frame, app, input),
        SessionRoute::ServerOffline => render_offline(frame, app),
    }
}

/// Render the channel route (users sidebar + chat + input + status).
fn render_channel(frame: &mut Frame, app: &App, input_state: &InputState) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, app, *main_area);
    input::render(frame, input_state, *input_area);
    status::render(frame, app, *status_area);
}

/// Render the main area (users sidebar + chat).
fn render_main_area(frame: &mut Frame, app: &App, area: Rect) {
    const USERS_SIDEBAR_WIDTH: u16 = 16;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(CHAT_AREA_MIN_WIDTH), Constraint::Length(USERS_SIDEBAR_WIDTH)])
        .split(area);

    let [chat_area, users_area] = chunks.as_ref() else {
        return;
    };

    chat::render(frame, app, *chat_area);
    users::render(frame, app, *users_area);
}

/// Full-screen connecting notice.
fn render_connecting(frame: &mut Frame) {
    let paragraph = Paragraph::new("Connecting to server...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(" Harbor "));
    frame.render_widget(paragraph, centered(frame.area(), 40, 3));
}

/// Full-screen server-offline notice with the reload countdown.
fn render_offline(frame: &mut Frame, app: &App) {
    let countdown = app
        .offline_seconds()
        .map_or_else(String::new, |s| format!("Reconnecting in {s}s"));

    let lines = vec![
        Line::from("Server appears to be offline."),
        Line::from(countdown),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red))
        .block(Block::default().borders(Borders::ALL).title(" Harbor "));
    frame.render_widget(paragraph, centered(frame.area(), 44, 4));
}

/// Center a fixed-size box in the given area, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
