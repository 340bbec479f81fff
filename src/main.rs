// heapwalk: step-through animation of C++ new/delete

mod memory;
mod scene;
mod ui;
mod walk;

use std::fs;
use std::io;
use std::path::Path;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use scene::parse::parse_scenario;
use scene::{Director, ScenarioConfig};
use ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("heapwalk");

    if args.len() > 2 {
        eprintln!("Error: Too many arguments");
        eprintln!();
        eprintln!("Usage: {} [scenario-file]", program_name);
        eprintln!();
        eprintln!("Without a scenario file the built-in new/delete walkthrough is shown.");
        std::process::exit(1);
    }

    let config = match args.get(1) {
        Some(path) => {
            if !Path::new(path).exists() {
                eprintln!("Error: File '{}' not found", path);
                eprintln!("Usage: {} [scenario-file]", program_name);
                std::process::exit(1);
            }

            eprintln!("Reading scenario {}...", path);
            let text = fs::read_to_string(path)?;
            match parse_scenario(&text) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            eprintln!("Using the built-in scenario.");
            ScenarioConfig::default()
        }
    };

    eprintln!(
        "Heap has {} block(s); looking for {} bytes.",
        config.heap.len(),
        config.request.requested_bytes
    );

    let director = match Director::new(config.clone()) {
        Ok(director) => director,
        Err(e) => {
            eprintln!("Scene error: {}", e);
            std::process::exit(1);
        }
    };

    eprintln!("Building timeline...");
    let timeline = match director.build() {
        Ok(timeline) => timeline,
        Err(e) => {
            eprintln!("Scene error: {}", e);
            std::process::exit(1);
        }
    };
    eprintln!("Built {} frames.", timeline.len());

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(timeline, config);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
