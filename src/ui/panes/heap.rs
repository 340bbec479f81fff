//! Heap pane rendering with block occupancy and the search cursor
//!
//! This module renders the heap table, one row per page-sized block.
//!
//! # Features
//!
//! - Occupancy bar and byte count per block (live reservations included)
//! - `▶` search cursor on the block the allocator is examining
//! - Red rejection / green reservation highlight with its note
//! - Value stored in a reserved block, and released blocks dimmed

use super::utils::{follow_row, pane_block, visible_window};
use crate::memory::format_address;
use crate::memory::heap::{Heap, ReservationState};
use crate::scene::frame::{BlockHighlight, HighlightKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

const BAR_WIDTH: usize = 12;

/// Fixed-width occupancy bar, rounded up so a non-empty block never looks empty
pub fn occupancy_bar(occupied: usize, capacity: usize, width: usize) -> String {
    let filled = if capacity == 0 || occupied == 0 {
        0
    } else {
        let filled = (occupied as u128 * width as u128).div_ceil(capacity as u128);
        filled.min(width as u128) as usize
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Data needed to render the heap pane
pub struct HeapRenderData<'a> {
    pub heap: &'a Heap,
    pub cursor: Option<usize>,
    pub highlight: Option<&'a BlockHighlight>,
    pub changed_block: Option<usize>,
}

/// Render the heap pane
pub fn render_heap_pane(
    frame: &mut Frame,
    area: Rect,
    data: HeapRenderData,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Heap ", is_focused);
    let heap = data.heap;

    let mut items = vec![ListItem::new(Span::styled(
        format!("Page size: {} bytes", heap.page_size()),
        Style::default().fg(DEFAULT_THEME.comment),
    ))];
    let mut cursor_row = None;

    for (i, heap_block) in heap.blocks().iter().enumerate() {
        let addr = heap_block.address;
        let occupied = heap.occupied_bytes(addr).unwrap_or(heap_block.occupied_bytes);
        let reservation = heap.reservation(addr);
        let highlight = data.highlight.filter(|h| h.index == i);

        let marker = if data.cursor == Some(i) { "▶ " } else { "  " };

        let frame_color = match highlight.map(|h| h.kind) {
            Some(HighlightKind::Rejected) => Some(DEFAULT_THEME.error),
            Some(HighlightKind::Reserved) => Some(DEFAULT_THEME.success),
            Some(HighlightKind::Released) => Some(DEFAULT_THEME.comment),
            None if heap.is_reserved(addr) => Some(DEFAULT_THEME.success),
            None => None,
        };
        let addr_style = match frame_color {
            Some(color) => Style::default().fg(color).add_modifier(Modifier::BOLD),
            None => Style::default().fg(DEFAULT_THEME.primary),
        };

        let mut spans = vec![
            Span::styled(marker, Style::default().fg(DEFAULT_THEME.highlight)),
            Span::styled(format_address(addr), addr_style),
            Span::raw(" "),
            Span::styled(
                occupancy_bar(occupied, heap_block.capacity_bytes, BAR_WIDTH),
                Style::default().fg(frame_color.unwrap_or(DEFAULT_THEME.comment)),
            ),
            Span::styled(
                format!(" [occupied {} bytes]", occupied),
                Style::default().fg(DEFAULT_THEME.fg),
            ),
        ];

        if let Some(r) = reservation {
            let value_style = if data.changed_block == Some(i) {
                Style::default()
                    .fg(DEFAULT_THEME.highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.number)
            };
            match (r.state, r.value) {
                (ReservationState::Reserved, Some(v)) => {
                    spans.push(Span::styled(format!(" = {}", v), value_style))
                }
                (ReservationState::Reserved, None) => spans.push(Span::styled(
                    " = ??",
                    Style::default().fg(DEFAULT_THEME.comment),
                )),
                (ReservationState::Released, _) => spans.push(Span::styled(
                    " (freed)",
                    Style::default()
                        .fg(DEFAULT_THEME.comment)
                        .add_modifier(Modifier::ITALIC),
                )),
            }
        }

        if data.cursor == Some(i) {
            cursor_row = Some(items.len());
        }
        items.push(ListItem::new(Line::from(spans)));

        if let Some(h) = highlight {
            let color = frame_color.unwrap_or(DEFAULT_THEME.fg);
            items.push(ListItem::new(Line::from(vec![
                Span::raw("    └ "),
                Span::styled(
                    h.note.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ])));
        }
    }

    // Follow the search cursor unless the user is scrolling this pane
    if !is_focused {
        if let Some(row) = cursor_row {
            *scroll_offset = follow_row(*scroll_offset, row, area.height);
        }
    }

    let visible = visible_window(items, scroll_offset, area.height);
    frame.render_widget(List::new(visible).block(block), area);
}
