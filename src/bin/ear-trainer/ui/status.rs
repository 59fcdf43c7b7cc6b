//! Score bar and keyboard legend

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use ear_trainer::catalog::NOTES;

use crate::{
    keys,
    trainer::{FeedbackKind, Mode, Trainer},
};

pub fn render_status(frame: &mut Frame, area: Rect, trainer: &Trainer, muted: bool, audio: bool) {
    let block = Block::default()
        .title(" ear-trainer ")
        .borders(Borders::ALL);

    let mode = match trainer.mode() {
        Mode::Practice => Span::styled("Practice  ", Style::default().fg(Color::Green)),
        Mode::Free => Span::styled("Free Play  ", Style::default().fg(Color::Yellow)),
    };

    let sound = match (audio, muted) {
        (false, _) => Span::styled("audio off  ", Style::default().fg(Color::DarkGray)),
        (true, true) => Span::styled("muted  ", Style::default().fg(Color::Red)),
        (true, false) => Span::styled("sound on  ", Style::default().fg(Color::DarkGray)),
    };

    let mut spans = vec![
        Span::raw(" "),
        mode,
        Span::styled(
            format!("Score: {}  ", trainer.score()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Streak: {}  ", trainer.streak()),
            Style::default().fg(Color::Magenta),
        ),
        sound,
    ];

    if let Some(feedback) = trainer.feedback() {
        let color = match feedback.kind {
            FeedbackKind::Correct => Color::Green,
            FeedbackKind::Incorrect => Color::Red,
            FeedbackKind::Info => Color::White,
        };
        spans.push(Span::styled(
            feedback.text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

/// Key legend, C4..B4 on the first row and C5..C6 on the second.
pub fn render_keys(frame: &mut Frame, area: Rect, show_names: bool, held: &[bool]) {
    let block = Block::default().title(" Keys ").borders(Borders::ALL);

    let label = |index: usize| {
        let key = keys::key_for(index).unwrap_or('?');
        let text = if show_names {
            format!("{}:{:<4}", key, NOTES[index].to_string())
        } else {
            format!("{} ", key)
        };
        let mut style = if NOTES[index].is_black_key() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        if held.get(index).copied().unwrap_or(false) {
            style = style.fg(Color::Blue).add_modifier(Modifier::BOLD);
        }
        Span::styled(text, style)
    };

    let lines = vec![
        Line::from((0..12).map(&label).collect::<Vec<_>>()),
        Line::from((12..NOTES.len()).map(&label).collect::<Vec<_>>()),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
