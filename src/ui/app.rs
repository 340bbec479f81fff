//! Main TUI application state and logic

use crate::scene::errors::TimelineError;
use crate::scene::frame::Frame as SceneFrame;
use crate::scene::{ScenarioConfig, Timeline};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Time between frames in play mode
const PLAY_INTERVAL: Duration = Duration::from_secs(1);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Disasm,
    Os,
    Stack,
    Heap,
}

impl FocusedPane {
    /// Move focus to the next pane (left column top to bottom, then right column)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Disasm,
            FocusedPane::Disasm => FocusedPane::Os,
            FocusedPane::Os => FocusedPane::Stack,
            FocusedPane::Stack => FocusedPane::Heap,
            FocusedPane::Heap => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    /// Prebuilt frames of the scene
    pub timeline: Timeline,

    /// Scenario tables the frames refer to by index
    pub config: ScenarioConfig,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub stack_scroll: usize,
    pub heap_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(timeline: Timeline, config: ScenarioConfig) -> Self {
        App {
            timeline,
            config,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            stack_scroll: 0,
            heap_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= PLAY_INTERVAL {
                if self.timeline.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let Some(scene) = self.timeline.current() else {
            return;
        };
        // Frames are cloned out so the panes can borrow scroll state mutably
        let scene: SceneFrame = scene.clone();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(4),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(main_chunks[0]);

        // Left column: Program (top) | Disassembly (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[0]);

        // Right column: OS | Stack | Heap
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Percentage(40),
                Constraint::Min(0),
            ])
            .split(columns[1]);

        super::panes::render_source_pane(
            frame,
            left_rows[0],
            &self.config.source,
            scene.code_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_disasm_pane(
            frame,
            left_rows[1],
            &self.config.disasm,
            scene.disasm_line,
            self.focused_pane == FocusedPane::Disasm,
        );

        super::panes::render_os_pane(
            frame,
            right_rows[0],
            &self.config.os_api,
            &scene,
            self.focused_pane == FocusedPane::Os,
        );

        super::panes::render_stack_pane(
            frame,
            right_rows[1],
            &scene.stack,
            scene.changed_slot,
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );

        super::panes::render_heap_pane(
            frame,
            right_rows[2],
            super::panes::HeapRenderData {
                heap: &scene.heap,
                cursor: scene.cursor,
                highlight: scene.highlight.as_ref(),
                changed_block: scene.changed_block,
            },
            self.focused_pane == FocusedPane::Heap,
            &mut self.heap_scroll,
        );

        super::panes::render_caption_pane(
            frame,
            main_chunks[1],
            &self.config.title,
            scene.phase,
            &scene.caption,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[2],
            &self.status_message,
            self.timeline.position(),
            self.timeline.len(),
            self.is_playing,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N frames directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let mut stepped = 0;
                for _ in 0..n {
                    if self.timeline.step_forward().is_err() {
                        break;
                    }
                    stepped += 1;
                }
                self.status_message = format!("Stepped forward {} frame(s)", stepped);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                let result = self.timeline.step_backward();
                self.report_step(result, "Stepped backward");
            }
            KeyCode::Right => {
                self.is_playing = false;
                let result = self.timeline.step_forward();
                self.report_step(result, "Stepped forward");
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => self.source_scroll = self.source_scroll.saturating_sub(1),
                FocusedPane::Stack => self.stack_scroll = self.stack_scroll.saturating_sub(1),
                FocusedPane::Heap => self.heap_scroll = self.heap_scroll.saturating_sub(1),
                FocusedPane::Disasm | FocusedPane::Os => {}
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => self.source_scroll = self.source_scroll.saturating_add(1),
                FocusedPane::Stack => self.stack_scroll = self.stack_scroll.saturating_add(1),
                FocusedPane::Heap => self.heap_scroll = self.heap_scroll.saturating_add(1),
                FocusedPane::Disasm | FocusedPane::Os => {}
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(PLAY_INTERVAL)
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.timeline.jump_to_end();
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.timeline.rewind_to_start();
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }

    fn report_step(&mut self, result: Result<(), TimelineError>, done: &str) {
        self.status_message = match result {
            Ok(()) => done.to_string(),
            Err(e) => format!("Cannot step: {}", e),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::build_timeline;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        let config = ScenarioConfig::default();
        let timeline = build_timeline(config.clone()).unwrap();
        App::new(timeline, config)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_arrow_keys_move_through_frames() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.timeline.position(), 2);

        press(&mut app, KeyCode::Left);
        assert_eq!(app.timeline.position(), 1);
        assert_eq!(app.status_message, "Stepped backward");
    }

    #[test]
    fn test_stepping_past_start_reports_error() {
        let mut app = app();
        press(&mut app, KeyCode::Left);
        assert_eq!(app.timeline.position(), 0);
        assert!(app.status_message.contains("first frame"));
    }

    #[test]
    fn test_digit_steps_and_jumps() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.timeline.position(), 3);

        press(&mut app, KeyCode::Enter);
        assert!(app.timeline.is_at_end());

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.timeline.position(), 0);
    }

    #[test]
    fn test_focus_cycles_and_quit() {
        let mut app = app();
        for _ in 0..5 {
            press(&mut app, KeyCode::Tab);
        }
        assert_eq!(app.focused_pane, FocusedPane::Source);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
