use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::process;
use std::time::Duration;
use topic_quiz::{App, AppPaths, GenerationConfig, TopicCatalog, draw, logger};

const TICK: Duration = Duration::from_millis(100);

fn fail(message: &str) -> ! {
    logger::log(message);
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn main() -> io::Result<()> {
    let paths = AppPaths::discover().unwrap_or_else(|e| fail(&e.to_string()));
    logger::init(&paths.log_file);
    logger::log("Starting topic-quiz");

    let config =
        GenerationConfig::load(&paths.config_file).unwrap_or_else(|e| fail(&e.to_string()));
    let catalog = TopicCatalog::load(&paths.content_dir).unwrap_or_else(|e| fail(&e.to_string()));
    if catalog.is_empty() {
        logger::log("Content directory holds no sections");
    }

    let mut app = App::new(paths, config, catalog);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    app.save_settings();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        logger::log(&format!("Terminal error: {}", e));
    }
    logger::log("Exiting topic-quiz");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        app.poll_generation();

        if app.should_quit {
            return Ok(());
        }
    }
}
