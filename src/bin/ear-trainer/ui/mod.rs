//! Widgets for the trainer screen.

pub mod staff;
pub mod status;
pub mod waveform;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub use staff::render_staff;
pub use status::{render_keys, render_status};
pub use waveform::render_waveform;

/// Screen areas, top to bottom.
pub struct Areas {
    pub status: Rect,
    pub staff: Rect,
    pub waveform: Rect,
    pub keys: Rect,
    pub help: Rect,
}

pub fn layout(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Score bar
            Constraint::Min(10),   // Staff
            Constraint::Length(8), // Waveform
            Constraint::Length(4), // Key legend
            Constraint::Length(1), // Help bar
        ])
        .split(area);

    Areas {
        status: chunks[0],
        staff: chunks[1],
        waveform: chunks[2],
        keys: chunks[3],
        help: chunks[4],
    }
}

pub fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(" [Esc] Quit  [Tab] Practice/Free  [F1] Note names  [F2] Mute")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
