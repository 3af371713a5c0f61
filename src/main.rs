// src/main.rs

mod chart;
mod cli;
mod data_loader;
mod display_table;
mod error;
mod fields;
mod logging;
mod metrics;
mod parser;
mod sorter;
mod tui_app;

use std::io;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use cli::Cli;
use data_loader::FsReader;
use logging::{init_logging, LogConfig};
use tui_app::TuiApp;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level: cli.verbosity.tracing_level_filter(),
        log_file: cli.log_file.clone(),
    };
    init_logging(&log_config).context("failed to initialize logging")?;

    let mut app = TuiApp::new(Box::new(FsReader), cli.bar_width);
    if let Some(path) = &cli.file {
        app.open(path);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.hide_cursor()?;
    info!("terminal ready");

    let result = app.main_loop(&mut terminal);

    terminal.show_cursor()?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result.context("event loop failed")
}
