use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use ratatui::DefaultTerminal;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod controller;
mod domain;
mod exporter;
mod filter;
mod form;
mod inputter;
mod model;
mod record;
mod session;
mod store;
mod table;
mod ui;

use controller::Controller;
use domain::{
    DEFAULT_DATA_FILE, DEFAULT_EXPORT_PREFIX, DEFAULT_LOG_FILE, DEFAULT_SHEET_NAME, ExportFormat,
    TrackerConfig, TrackerError,
};
use model::{Model, Status};
use session::Session;
use store::Store;
use ui::TableUI;

/// Track target companies in a spreadsheet.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Spreadsheet holding the companies (.xlsx or .csv)
    #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
    file: String,

    /// Sheet name inside the xlsx file
    #[arg(long, default_value = DEFAULT_SHEET_NAME)]
    sheet: String,

    /// Directory exports are written to
    #[arg(long, default_value = ".")]
    export_dir: String,

    #[arg(long, default_value = DEFAULT_EXPORT_PREFIX)]
    export_prefix: String,

    #[arg(long, value_enum, default_value_t = ExportFormat::Xlsx)]
    export_format: ExportFormat,

    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: String,

    /// Used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Milliseconds to wait for a terminal event
    #[arg(long, default_value_t = 100)]
    event_poll_time: u64,
}

fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(path),
    }
}

fn init_logging(args: &Args) -> Result<(), TrackerError> {
    let log_file = File::create(expand_path(&args.log_file))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false),
        )
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(args: Args) -> Result<(), TrackerError> {
    init_logging(&args)?;

    let config = TrackerConfig {
        data_file: expand_path(&args.file),
        sheet_name: args.sheet.clone(),
        export_dir: expand_path(&args.export_dir),
        export_prefix: args.export_prefix.clone(),
        export_format: args.export_format,
        event_poll_time: args.event_poll_time,
        use_clipboard: true,
    };
    info!("Starting with {config:?}");

    let session = Session::new(Store::new(config.data_file.clone(), config.sheet_name.clone()));

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &config, session);
    ratatui::restore();

    info!("Bye!");
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    config: &TrackerConfig,
    session: Session,
) -> Result<(), TrackerError> {
    let size = terminal.size()?;
    let mut model = Model::init(config, session, size.height as usize);
    let mut ui = TableUI::new();
    let controller = Controller::new(config);

    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(&model, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(&model)?;
        model.update(message)?;
    }
    Ok(())
}
