//! Helpers shared by the panes

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    widgets::{block::Title, Block, Borders, ListItem},
};

/// Bordered block with the focus-dependent border style every pane uses
pub fn pane_block<'a, T: Into<Title<'a>>>(title: T, is_focused: bool) -> Block<'a> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp `offset` so the window stays inside the content, then cut the window
pub fn visible_window<'a>(
    items: Vec<ListItem<'a>>,
    offset: &mut usize,
    height: u16,
) -> Vec<ListItem<'a>> {
    let visible_height = height.saturating_sub(2).max(1) as usize; // Account for borders, min 1
    let total = items.len();

    if total > visible_height {
        *offset = (*offset).min(total - visible_height);
    } else {
        *offset = 0;
    }

    items
        .into_iter()
        .skip(*offset)
        .take(visible_height)
        .collect()
}

/// Offset that keeps `row` on screen, moving as little as possible
pub fn follow_row(offset: usize, row: usize, height: u16) -> usize {
    let visible_height = height.saturating_sub(2).max(1) as usize;
    if row < offset {
        row
    } else if row >= offset + visible_height {
        row + 1 - visible_height
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_window_clamps_offset() {
        let items: Vec<ListItem> = (0..10).map(|i| ListItem::new(i.to_string())).collect();
        let mut offset = 50;
        let window = visible_window(items, &mut offset, 6);
        assert_eq!(window.len(), 4);
        assert_eq!(offset, 6);
    }

    #[test]
    fn test_follow_row() {
        assert_eq!(follow_row(0, 2, 6), 0);
        assert_eq!(follow_row(0, 7, 6), 4);
        assert_eq!(follow_row(5, 1, 6), 1);
    }
}
