//! Source code pane rendering with syntax highlighting
//!
//! Shows the C++ program with line numbers. The line the narrative is on is
//! marked with an arrow and drawn on a lighter background.
//!
//! # Rendering
//!
//! The pane uses a simple character-by-character tokenizer to apply syntax
//! highlighting styles without requiring a full lexer.

use super::utils::{follow_row, pane_block, visible_window};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Simple syntax highlighting for C++ source
fn highlight_source_code(line: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut current_word = String::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Line comments run to the end
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            if !current_word.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_word)));
            }
            spans.push(Span::styled(
                chars[i..].iter().collect::<String>(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            return spans;
        }

        if !c.is_alphanumeric() && c != '_' {
            if !current_word.is_empty() {
                let style = get_keyword_style(&current_word, c == '(');
                spans.push(Span::styled(std::mem::take(&mut current_word), style));
            }

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                '*' | '&' => Style::default().fg(DEFAULT_THEME.secondary), // Pointer syntax
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        let style = get_keyword_style(&current_word, false);
        spans.push(Span::styled(current_word, style));
    }

    spans
}

fn get_keyword_style(word: &str, is_function: bool) -> Style {
    match word {
        "int" | "char" | "void" | "bool" | "long" | "short" | "unsigned" | "auto" => {
            Style::default().fg(DEFAULT_THEME.type_name)
        }
        "new" | "delete" | "return" | "if" | "else" | "while" | "for" | "sizeof" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "nullptr" | "NULL" => Style::default().fg(DEFAULT_THEME.number),
        _ if word.chars().all(|c| c.is_ascii_digit()) => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        _ if is_function => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    lines: &[String],
    current_line: Option<usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Program ", is_focused);
    let gutter_width = lines.len().to_string().len();

    let items: Vec<ListItem> = lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let is_current = current_line == Some(i);
            let marker = if is_current { "▶ " } else { "  " };

            let mut spans = vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.highlight)),
                Span::styled(
                    format!("{:>width$} ", i + 1, width = gutter_width),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
            ];
            spans.extend(highlight_source_code(text));

            let item = ListItem::new(Line::from(spans));
            if is_current {
                item.style(Style::default().bg(DEFAULT_THEME.current_line_bg))
            } else {
                item
            }
        })
        .collect();

    // Keep the current line in view when the narrative moves
    if !is_focused {
        if let Some(row) = current_line {
            *scroll_offset = follow_row(*scroll_offset, row, area.height);
        }
    }

    let visible = visible_window(items, scroll_offset, area.height);
    frame.render_widget(List::new(visible).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(spans: &[Span]) -> Vec<String> {
        spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_new_expression_tokens() {
        let spans = highlight_source_code("int* ptr = new int;");
        let words = texts(&spans);
        assert_eq!(words[0], "int");
        assert!(words.contains(&"new".to_string()));

        let new_span = spans.iter().find(|s| s.content == "new").unwrap();
        assert_eq!(new_span.style.fg, Some(DEFAULT_THEME.keyword));
    }

    #[test]
    fn test_comment_takes_rest_of_line() {
        let spans = highlight_source_code("x = 1; // set x");
        assert_eq!(spans.last().unwrap().content, "// set x");
    }
}
