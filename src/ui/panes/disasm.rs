//! Disassembly pane rendering

use super::utils::pane_block;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

const REGISTERS: &[&str] = &[
    "rax", "rbx", "rcx", "rdx", "rsi", "rdi", "rsp", "rbp", "eax", "ebx", "ecx", "edx",
];

/// Highlight one x86 instruction: mnemonic, registers, immediates
fn highlight_instruction(line: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let (mnemonic, operands) = line.split_once(' ').unwrap_or((line, ""));

    spans.push(Span::styled(
        mnemonic.to_string(),
        Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
    ));
    if operands.is_empty() {
        return spans;
    }
    spans.push(Span::raw(" "));

    let mut word = String::new();
    let flush = |word: &mut String, spans: &mut Vec<Span<'static>>| {
        if word.is_empty() {
            return;
        }
        let style = if REGISTERS.contains(&word.as_str()) {
            Style::default().fg(DEFAULT_THEME.type_name)
        } else if word.chars().all(|c| c.is_ascii_digit()) || word.starts_with("0x") {
            Style::default().fg(DEFAULT_THEME.number)
        } else {
            Style::default().fg(DEFAULT_THEME.fg)
        };
        spans.push(Span::styled(std::mem::take(word), style));
    };

    for c in operands.chars() {
        if c.is_alphanumeric() || c == '_' {
            word.push(c);
            continue;
        }
        flush(&mut word, &mut spans);
        let style = match c {
            '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
    }
    flush(&mut word, &mut spans);

    spans
}

/// Render the disassembly pane
pub fn render_disasm_pane(
    frame: &mut Frame,
    area: Rect,
    lines: &[String],
    current_line: Option<usize>,
    is_focused: bool,
) {
    let block = pane_block(" Disassembly ", is_focused);

    let items: Vec<ListItem> = lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let is_current = current_line == Some(i);
            let mut spans = vec![Span::styled(
                if is_current { "▶ " } else { "  " },
                Style::default().fg(DEFAULT_THEME.highlight),
            )];
            spans.extend(highlight_instruction(text));

            let item = ListItem::new(Line::from(spans));
            if is_current {
                item.style(Style::default().bg(DEFAULT_THEME.current_line_bg))
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
