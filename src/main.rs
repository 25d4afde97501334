//! superstore CLI
//!
//! Console and data tooling for the superstore sales dashboard

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use superstore_dash::components::{
    analytics::{compute_table, TableFilters},
    config::{DashboardConfig, SourceKind},
    export::export_xlsx,
    source::{spreadsheet::SpreadsheetSource, sqlite::SqliteSource},
};
use superstore_dash::{OutputFormat, RecordStore, REPL};

#[derive(Parser)]
#[command(name = "superstore")]
#[command(version, about = "Superstore sales dashboard console", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Dashboard config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Load records from this spreadsheet instead of the configured source
    #[arg(long, global = true, conflicts_with = "sqlite")]
    spreadsheet: Option<PathBuf>,

    /// Load records from this SQLite database instead of the configured source
    #[arg(long, global = true)]
    sqlite: Option<PathBuf>,

    /// Append journal for a spreadsheet source
    #[arg(long, global = true)]
    journal: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run dashboard commands interactively or once
    Repl {
        /// Execute a single command line and exit
        #[arg(short, long)]
        execute: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "standard")]
        format: FormatArg,
    },

    /// Build the SQLite orders table from a spreadsheet
    Import {
        /// Source spreadsheet (xlsx, xls or ods)
        #[arg(value_name = "SPREADSHEET")]
        input: PathBuf,

        /// Target SQLite database, created when missing
        #[arg(value_name = "DATABASE")]
        output: PathBuf,
    },

    /// Write the filtered data table to an xlsx workbook
    Export {
        /// Output workbook
        #[arg(short, long)]
        output: PathBuf,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        state: Option<String>,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        sub_category: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Standard,
    Json,
    Table,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Standard => OutputFormat::Standard,
            FormatArg::Json => OutputFormat::JSON,
            FormatArg::Table => OutputFormat::Table,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(path) = &cli.spreadsheet {
        config.source.kind = SourceKind::Spreadsheet;
        config.source.path = path.clone();
    }
    if let Some(path) = &cli.sqlite {
        config.source.kind = SourceKind::Sqlite;
        config.source.path = path.clone();
    }
    if let Some(path) = &cli.journal {
        config.source.journal = Some(path.clone());
    }

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::from_str(&config.log_level).unwrap_or(Level::INFO)
    };
    let json = matches!(
        cli.command,
        Commands::Repl {
            format: FormatArg::Json,
            ..
        }
    );
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(!json) // Disable colors if JSON output
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Repl { execute, format } => run_repl(&config, execute, format.into()),
        Commands::Import { input, output } => run_import(input, output),
        Commands::Export {
            output,
            country,
            state,
            city,
            category,
            sub_category,
        } => run_export(
            &config,
            output,
            TableFilters {
                country,
                state,
                city,
                category,
                sub_category,
            },
        ),
    }
}

fn open_store(config: &DashboardConfig) -> Result<RecordStore> {
    let source = config
        .source
        .open()
        .with_context(|| format!("Failed to open source: {}", config.source.path.display()))?;
    RecordStore::open_boxed(source)
        .with_context(|| format!("Failed to load records from {}", config.source.path.display()))
}

fn run_repl(config: &DashboardConfig, execute: Option<String>, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let repl = REPL::new(&store, config.dashboard.clone());

    if let Some(line) = execute {
        let output = repl.execute(&line, Some(format)).map_err(anyhow::Error::msg)?;
        println!("{}", output);
        return Ok(());
    }

    println!("superstore console ({} records). Type HELP for commands, EXIT to quit.", store.len());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("superstore> ");
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }

        match repl.execute(trimmed, Some(format)) {
            Ok(output) => println!("{}", output),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}

fn run_import(input: PathBuf, output: PathBuf) -> Result<()> {
    let sheet = SpreadsheetSource::new(&input);
    let mut db = SqliteSource::create(&output)
        .with_context(|| format!("Failed to open database: {}", output.display()))?;

    let summary = db
        .import_spreadsheet(&sheet)
        .with_context(|| format!("Failed to import {}", input.display()))?;

    info!(
        "Imported {} rows into {} ({} skipped)",
        summary.inserted,
        output.display(),
        summary.skipped
    );
    Ok(())
}

fn run_export(config: &DashboardConfig, output: PathBuf, filters: TableFilters) -> Result<()> {
    let store = open_store(config)?;
    let rows = compute_table(&store.load(), &filters);

    export_xlsx(&rows, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}
