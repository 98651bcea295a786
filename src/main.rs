use std::{io, path::PathBuf, time::Duration};
use tui::{
    backend::CrosstermBackend,
    Terminal,
};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{error, info};

mod app;
mod models;
mod services;
mod utils;

use app::chart::{build_chart, Viewport};
use app::state::App;
use app::{input, ui};
use models::category::Category;
use models::config::Config;
use services::logger;

#[derive(Parser)]
#[command(name = "price-targets", version, about = "Crypto price targets dashboard")]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Category to show first
    #[arg(long, value_enum)]
    category: Option<Category>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the chart data and options as JSON instead of opening the dashboard
    Export {
        #[arg(long, value_enum, default_value_t = Category::Top10)]
        category: Category,

        /// Use the expanded layout hints
        #[arg(long)]
        expanded: bool,

        /// Viewport width in pixels
        #[arg(long, default_value_t = 1280)]
        width: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if let Some(category) = cli.category {
        config.initial_category = category;
    }

    // Export writes to stdout only; the log file belongs to the dashboard.
    if let Some(Commands::Export { category, expanded, width }) = cli.command {
        println!("{}", export(&config, category, expanded, width)?);
        return Ok(());
    }

    logger::init(&config.log_file, config.log_level_filter())?;

    let dataset = match config.load_dataset() {
        Ok(dataset) => dataset,
        Err(err) => {
            error!(target: "Dataset", "{:#}", err);
            return Err(err);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run it
    let app = App::new(&config, dataset);
    info!(target: "Dashboard", "Started on {}", app.view.selected_category);
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(target: "Application Error", "{:?}", err);
        println!("{:?}", err)
    }

    Ok(())
}

fn export(config: &Config, category: Category, expanded: bool, width: u32) -> Result<String> {
    let dataset = config.load_dataset()?;
    let chart = build_chart(category, &dataset, expanded, Viewport::new(width));
    Ok(serde_json::to_string_pretty(&chart)?)
}

fn run_app<B: tui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            let running = match event::read()? {
                Event::Key(key) => input::handle_key(&mut app, key),
                Event::Mouse(mouse) => input::handle_mouse(&mut app, terminal.size()?, mouse),
                _ => true,
            };
            if !running {
                info!(target: "Dashboard", "Quit");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_leaves_log_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("price_targets.log");
        let config = Config {
            log_file: log_file.to_string_lossy().into_owned(),
            ..Config::default()
        };

        let json = export(&config, Category::Meme, true, 640).unwrap();
        let chart: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(chart["options"]["scales"]["y"]["type"], "logarithmic");
        assert_eq!(chart["layout"]["maxWidth"], "95%");
        assert_eq!(chart["data"]["labels"][0], "DOGE");
        assert!(!log_file.exists());
    }
}
