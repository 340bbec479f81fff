//! Stack pane rendering
//!
//! One row per slot of `main()`'s frame, highest address first. The slot
//! changed by the current frame is drawn in the highlight color; a slot
//! holding a pointer shows `name=address`.

use super::utils::{pane_block, visible_window};
use crate::memory::format_address;
use crate::memory::stack::{SlotValue, Stack};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Render the stack pane
pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    stack: &Stack,
    changed_slot: Option<usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Stack ", is_focused);
    let mut items = Vec::new();

    if stack.slots().is_empty() {
        items.push(ListItem::new("(empty)").style(Style::default().fg(DEFAULT_THEME.comment)));
    }

    for (i, slot) in stack.slots().iter().enumerate() {
        let value_style = if changed_slot == Some(i) {
            Style::default()
                .fg(DEFAULT_THEME.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            match slot.value {
                SlotValue::Pointer(_) => Style::default().fg(DEFAULT_THEME.secondary),
                SlotValue::Literal(_) => Style::default().fg(DEFAULT_THEME.comment),
            }
        };

        let mut spans = vec![
            Span::styled(
                format_address(slot.address),
                Style::default().fg(DEFAULT_THEME.primary),
            ),
            Span::styled(" │ ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(slot.display_value(), value_style),
        ];

        // Name the variable while it still holds its placeholder
        if let (Some(label), SlotValue::Literal(_)) = (&slot.label, &slot.value) {
            spans.push(Span::styled(
                format!("  ({})", label),
                Style::default().fg(DEFAULT_THEME.type_name),
            ));
        }

        items.push(ListItem::new(Line::from(spans)));
    }

    let visible = visible_window(items, scroll_offset, area.height);
    frame.render_widget(List::new(visible).block(block), area);
}
