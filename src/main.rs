use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use hvac_invoice::config::{self, Config};
use hvac_invoice::invoice_gen::InvoiceGenerator;
use hvac_invoice::ledger::Ledger;
use hvac_invoice::ui::invoice_form::{
    self, add_item, generate_invoice, render_invoice_form, FormAction, InvoiceFormState,
};

/// Collect HVAC ducting line items and print them as a PDF invoice
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Write the invoice here instead of the configured path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Logo image to draw next to the title
    #[arg(long)]
    logo: Option<PathBuf>,
    /// Do not send the invoice to the printer after saving it
    #[arg(long)]
    no_print: bool,
    /// Log file (the terminal is taken over by the form)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply(self, mut config: Config) -> Config {
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(logo) = self.logo {
            config.logo_path = logo;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = log_file;
        }
        if self.no_print {
            config.print_after_render = false;
        }
        config
    }
}

// Main application state. The ledger lives for the whole session only.
struct AppState {
    ledger: Ledger,
    form: InvoiceFormState,
    generator: InvoiceGenerator,
}

impl AppState {
    fn new(config: &Config) -> Self {
        Self {
            ledger: Ledger::new(),
            form: InvoiceFormState::new(),
            generator: InvoiceGenerator::new(config),
        }
    }
}

fn init_tracing(config: &Config) -> Result<()> {
    let level: LevelFilter = config
        .log_level
        .parse()
        .with_context(|| format!("invalid log level {:?}", config.log_level))?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("could not open log file {}", config.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_max_level(level)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = cli.apply(config::init()?);
    init_tracing(&config)?;
    info!(
        output = %config.output_path.display(),
        logo = %config.logo_path.display(),
        "starting invoice form"
    );

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(&config);

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state);

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!(items = app_state.ledger.len(), "session closed");

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| render_invoice_form(f, &mut app_state.form, &app_state.ledger))?;

        match invoice_form::handle_input(&mut app_state.form)? {
            Some(FormAction::Quit) => break,
            Some(FormAction::AddItem) => add_item(&mut app_state.form, &mut app_state.ledger),
            Some(FormAction::GenerateInvoice) => {
                generate_invoice(&mut app_state.form, &app_state.ledger, &app_state.generator)
            }
            None => {}
        }
    }

    Ok(())
}
