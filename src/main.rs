use print_queue::cli::{AppConfig, Args, Command};
use print_queue::config::{ConfigFile, ConfigStore};
use print_queue::domain::{
    completed_names, list_directory, mark_complete, mark_if_tracked, ListOptions, Listing, Session,
};
use print_queue::logging::{self, LogConfig};
use print_queue::tui::{render, App, Status, ViewState};
use print_queue::{Result, ShellLauncher};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tracing::{info, warn};

fn main() {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Convert to config
    let config: AppConfig = args.into();

    if let Err(e) = logging::init(LogConfig::new(config.config_dir.join("logs"))) {
        eprintln!("Warning: Failed to set up logging: {}", e);
    }

    let result = match config.command.clone() {
        Some(command) => run_command(&config, command),
        None => run_app_with_config(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Runs a non-interactive subcommand
fn run_command(config: &AppConfig, command: Command) -> Result<()> {
    let store = ConfigStore::open(&config.config_dir);

    match command {
        Command::List { directory, json } => {
            let dir = directory
                .or_else(|| config.directory.clone())
                .unwrap_or_else(|| store.home_path());
            let options = ListOptions {
                show_hidden: config.show_hidden,
                fallback_dir: store.fallback_dir(),
            };
            let listing = list_directory(&dir, &store.classifier(), &options)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                print_listing(&listing);
            }
        }
        Command::Classify { files } => {
            let classifier = store.classifier();
            for file in files {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let kind = classifier
                    .classify(&name)
                    .map(|k| k.tag())
                    .unwrap_or("unrecognized");
                println!("{}\t{}", kind, file.display());
            }
        }
        Command::Complete { file, tracked_only } => {
            if tracked_only {
                if mark_if_tracked(&file, &store.classifier())? {
                    println!("Marked complete: {}", file.display());
                } else {
                    println!(
                        "Not a tracked format ({}): {}",
                        store.tracked_formats(),
                        file.display()
                    );
                }
            } else {
                let marker = mark_complete(&file)?;
                println!("Marked complete: {}", marker.display());
            }
        }
        Command::Init => {
            let created = store.init_defaults()?;
            if created.is_empty() {
                println!("Configuration already present in {}", store.dir().display());
            }
            for file in created {
                println!("Created {}", store.path_of(file).display());
            }
        }
        Command::Edit { setting } => {
            let file = ConfigFile::from(setting);
            if store.edit_file(file)? {
                println!("Saved {}", store.path_of(file).display());
            } else {
                println!("No changes saved to {}", store.path_of(file).display());
            }
        }
    }

    Ok(())
}

fn print_listing(listing: &Listing) {
    if listing.fell_back {
        println!("(directory not found, showing {})", listing.directory.display());
    }

    for entry in &listing.entries {
        let kind = if entry.is_dir {
            "dir"
        } else {
            entry.kind.map(|k| k.tag()).unwrap_or("-")
        };
        let done = if entry.completed { "  [complete]" } else { "" };
        let suffix = if entry.is_dir { "/" } else { "" };
        println!("{:<11} {}{}{}", kind, entry.name, suffix, done);
    }

    if let Ok(done) = completed_names(&listing.directory) {
        if !done.is_empty() {
            println!("{} file(s) already complete", done.len());
        }
    }
}

/// Runs the TUI browser with configuration
fn run_app_with_config(config: &AppConfig) -> Result<()> {
    let store = ConfigStore::open(&config.config_dir);
    let classifier = store.classifier();
    if classifier.part_formats().is_empty() && classifier.laser_formats().is_empty() {
        println!(
            "No part or laser formats configured in {}. Run `print-queue init` to create defaults.",
            store.dir().display()
        );
        println!("(Only folders will be listed; press . to show everything.)");
        warn!(config_dir = %store.dir().display(), "no part or laser formats configured");
    }

    let start = config
        .directory
        .clone()
        .unwrap_or_else(|| store.home_path());
    let mut session = Session::new(start, classifier, store.fallback_dir());
    session.show_hidden = config.show_hidden;
    session.refresh()?;
    info!(path = %session.current_path.display(), "starting browser");

    let mut app = App::new(session, store, ShellLauncher::new());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(result?)
}

/// Suspends the TUI terminal to allow external programs to run
fn suspend_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Resumes the TUI terminal after external program exits
fn resume_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(())
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
    app: &mut App<ShellLauncher>,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render(frame, &*app))?;

        if app.should_quit {
            break;
        }

        // Settings entries are edited in $EDITOR with the TUI suspended
        if let Some(file) = app.pending_edit.take() {
            suspend_terminal(terminal)?;
            let edit_result = app.store.edit_file(file);
            resume_terminal(terminal)?;

            app.view = ViewState::Browsing;
            match edit_result {
                Ok(true) => app.reload_config(),
                Ok(false) => app.status = Some(Status::Info("No changes saved".to_string())),
                Err(e) => app.status = Some(Status::Error(e.to_string())),
            }
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Ignore release/repeat events reported by some terminals
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}
