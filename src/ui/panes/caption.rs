//! Caption pane: one sentence explaining the current frame

use super::utils::pane_block;
use crate::scene::frame::Phase;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub fn render_caption_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    phase: Phase,
    caption: &str,
) {
    let block = pane_block(format!(" {} ", title), false);

    let phase_color = match phase {
        Phase::OutOfMemory => DEFAULT_THEME.error,
        Phase::Delete | Phase::Done => DEFAULT_THEME.secondary,
        _ => DEFAULT_THEME.primary,
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", phase.label()),
            Style::default()
                .bg(phase_color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(caption.to_string(), Style::default().fg(DEFAULT_THEME.fg)),
    ]);

    let paragraph = Paragraph::new(line).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
