use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use promo_tracker::config::AppConfig;
use promo_tracker::core::collaborators::{SystemClock, UuidGenerator};
use promo_tracker::core::print::SpoolPrinter;
use promo_tracker::core::storage::{compose, FileStore};
use promo_tracker::tui::app::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load();

    // Initialize logging (file only; stdout belongs to the terminal UI)
    let _log_guard = promo_tracker::core::logging::init_tui(&config.log_dir());
    log::info!("Promo Tracker v{} starting", promo_tracker::VERSION);

    let store = FileStore::open(config.data_dir())?;
    let workspace = compose(
        config.chains(),
        store,
        Box::new(UuidGenerator),
        Box::new(SystemClock),
    );
    let printer = SpoolPrinter::new(config.print_output_dir(), config.print.command.clone());

    let tick_rate = Duration::from_millis(config.tui.tick_rate_ms.max(1));
    let print_delay = Duration::from_millis(config.print.delay_ms);
    let mut app = AppState::new(workspace, Box::new(printer), tick_rate, print_delay);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = app.run(&mut terminal, tick_rate).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        log::error!("Terminal loop failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    log::info!("Promo Tracker exiting");
    Ok(())
}
