//! Message input box
//!
//! Single-line editor at the bottom of the channel view.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    widgets::{Block, Borders, Paragraph},
};

use crate::InputState;

/// Render the message input box and place the terminal cursor.
pub fn render(frame: &mut Frame, input: &InputState, area: Rect) {
    let editor = input.message();
    let block = Block::default().borders(Borders::ALL).title(" Message (/logout, /quit) ");
    let paragraph = Paragraph::new(editor.buffer()).block(block);
    frame.render_widget(paragraph, area);

    let cursor_x = area.x + 1 + editor.buffer()[..editor.cursor()].chars().count() as u16;
    frame.set_cursor_position(Position::new(cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
}
