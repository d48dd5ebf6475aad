//! sqldiff CLI - compare two ordered MySQL tables row by row.

use clap::{Parser, ValueEnum};
use sqldiff::{
    diff_tables, AlignMode, DiffError, DiffOptions, DiffResult, Dsn, JsonReport, TextReport,
};
use std::io;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, Level};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

/// Exit status when both tables hold the same rows.
const EXIT_MATCH: u8 = 0;
/// Exit status when at least one row differs.
const EXIT_DIFFER: u8 = 1;

#[derive(Parser)]
#[command(name = "sqldiff")]
#[command(about = "Compare two ordered MySQL tables row by row")]
#[command(version)]
struct Cli {
    /// Data source name user:pass@tcp(host:port)/db, or a dbinfo.json file
    #[arg(long, env = "SQLDIFF_DSN")]
    dsn: String,

    /// Database driver name
    #[arg(long, default_value = "mysql")]
    driver: String,

    /// Left table, optionally with a WHERE clause
    #[arg(long)]
    table1: String,

    /// Right table, optionally with a WHERE clause
    #[arg(long)]
    table2: String,

    /// Column projection
    #[arg(long, default_value = "*")]
    column: String,

    /// Ordering/identity column
    #[arg(long, default_value = "id")]
    key: String,

    /// Skip created, created_user, modified and modified_user
    #[arg(long)]
    modified: bool,

    /// Skip an additional column (repeatable)
    #[arg(long, value_name = "COLUMN")]
    ignore: Vec<String>,

    /// Row pairing: by position, or by identity key
    #[arg(long, value_enum, default_value_t = Align::Positional)]
    align: Align,

    /// Print ---/+++ table names before the first difference
    #[arg(short = 'p', long)]
    print_header: bool,

    /// Also report rows that compare equal
    #[arg(long)]
    report_unchanged: bool,

    /// Output events and result as JSON lines to stdout
    #[arg(long)]
    output_json: bool,

    /// Connection timeout in seconds
    #[arg(long, default_value = "30")]
    connect_timeout: u64,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "warn")]
    verbosity: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Align {
    Positional,
    Key,
}

impl From<Align> for AlignMode {
    fn from(align: Align) -> Self {
        match align {
            Align::Positional => AlignMode::Positional,
            Align::Key => AlignMode::Keyed,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(result) if result.matched => ExitCode::from(EXIT_MATCH),
        Ok(_) => ExitCode::from(EXIT_DIFFER),
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<DiffResult, DiffError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    if cli.driver != "mysql" {
        return Err(DiffError::Config(format!(
            "Unknown driver: '{}'. Supported drivers: mysql",
            cli.driver
        )));
    }

    let dsn = Dsn::from_option(&cli.dsn)?;
    debug!("Using {}", dsn);

    let mut options = DiffOptions::new(&cli.table1, &cli.table2)
        .with_columns(&cli.column)
        .with_key_column(&cli.key)
        .with_align(cli.align.into())
        .with_report_unchanged(cli.report_unchanged);
    if cli.modified {
        options = options.ignore_audit_columns();
    }
    for column in &cli.ignore {
        options = options.ignore_column(column);
    }

    let timeout = Duration::from_secs(cli.connect_timeout);
    let stdout = io::stdout().lock();

    if cli.output_json {
        let mut report = JsonReport::new(stdout);
        let result = until_signal(diff_tables(&dsn, &options, timeout, &mut report)).await?;
        report.finish(&result)?;
        Ok(result)
    } else {
        let mut report = TextReport::new(stdout);
        if cli.print_header {
            report = report.with_header(&cli.table1, &cli.table2);
        }
        let result = until_signal(diff_tables(&dsn, &options, timeout, &mut report)).await?;
        report.finish(&result)?;
        Ok(result)
    }
}

/// Drive `work` to completion unless SIGINT/SIGTERM arrives first.
///
/// Dropping the unfinished future drops both row sources and the pool.
async fn until_signal<F, T>(work: F) -> Result<T, DiffError>
where
    F: std::future::Future<Output = Result<T, DiffError>>,
{
    tokio::select! {
        result = work => result,
        signal = shutdown_signal() => {
            signal?;
            eprintln!("\nReceived interrupt, cancelling comparison");
            Err(DiffError::Cancelled)
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> Result<(), DiffError> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = sigint.recv() => {}
        _ = sigterm.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<(), DiffError> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // Reports own stdout
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
