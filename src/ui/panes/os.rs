//! Operating system pane rendering
//!
//! Shows the C runtime function currently running (`malloc()`/`free()`), the
//! OS allocation API with the active entry highlighted, a clock that ticks
//! once per unit of OS work, and the arrows currently on screen.

use super::utils::pane_block;
use crate::scene::frame::{Flow, Frame as SceneFrame, Panel, RuntimeCall};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const CLOCK_FACES: [char; 4] = ['◴', '◷', '◶', '◵'];

/// Name shown for one end of an arrow
fn panel_name(panel: Panel, scene: &SceneFrame, api: &[String]) -> String {
    match panel {
        Panel::Code => "code".to_string(),
        Panel::Disasm => "disassembly".to_string(),
        Panel::Call => scene
            .call
            .map(|c| c.name().to_string())
            .unwrap_or_else(|| "C runtime".to_string()),
        Panel::Os => scene
            .active_api
            .and_then(|i| api.get(i))
            .cloned()
            .unwrap_or_else(|| "OS".to_string()),
        Panel::Heap => "heap".to_string(),
    }
}

/// Text for one arrow, e.g. `code → malloc()`
pub fn describe_flow(flow: &Flow, scene: &SceneFrame, api: &[String]) -> String {
    format!(
        "{} → {}",
        panel_name(flow.from, scene, api),
        panel_name(flow.to, scene, api)
    )
}

/// Render the OS pane
pub fn render_os_pane(
    frame: &mut Frame,
    area: Rect,
    api: &[String],
    scene: &SceneFrame,
    is_focused: bool,
) {
    let block = pane_block(" Operating System ", is_focused)
        .border_style(Style::default().fg(if is_focused {
            DEFAULT_THEME.border_focused
        } else {
            DEFAULT_THEME.os
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner);

    // Left: API table
    let api_lines: Vec<Line> = api
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if scene.active_api == Some(i) {
                Line::from(Span::styled(
                    format!("[{}]", name),
                    Style::default()
                        .fg(DEFAULT_THEME.highlight)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(
                    format!(" {} ", name),
                    Style::default().fg(DEFAULT_THEME.fg),
                ))
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(api_lines), columns[0]);

    // Right: runtime call and clock
    let face = CLOCK_FACES[scene.clock_ticks as usize % CLOCK_FACES.len()];
    let mut right = vec![Line::from(vec![
        Span::styled(format!("{} ", face), Style::default().fg(DEFAULT_THEME.fg)),
        Span::styled(
            format!("tick {}", scene.clock_ticks),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ])];
    right.push(match scene.call {
        Some(call) => Line::from(vec![
            Span::styled("C: ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(
                call.name(),
                Style::default()
                    .fg(match call {
                        RuntimeCall::Malloc => DEFAULT_THEME.success,
                        RuntimeCall::Free => DEFAULT_THEME.error,
                    })
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from(Span::styled("C: idle", Style::default().fg(DEFAULT_THEME.comment))),
    });
    for flow in &scene.flows {
        right.push(Line::from(Span::styled(
            describe_flow(flow, scene, api),
            Style::default().fg(DEFAULT_THEME.highlight),
        )));
    }
    frame.render_widget(Paragraph::new(right), columns[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::build_timeline;
    use crate::scene::ScenarioConfig;

    #[test]
    fn test_describe_flow_names_active_endpoints() {
        let config = ScenarioConfig::default();
        let timeline = build_timeline(config.clone()).unwrap();
        let scene = timeline
            .frames()
            .iter()
            .find(|f| f.call == Some(RuntimeCall::Malloc) && f.flows.len() == 2)
            .unwrap();

        let text: Vec<String> = scene
            .flows
            .iter()
            .map(|f| describe_flow(f, scene, &config.os_api))
            .collect();
        assert_eq!(text, vec!["code → malloc()", "malloc() → VirtualAlloc()"]);
    }
}
