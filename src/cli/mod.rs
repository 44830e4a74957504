//! Command-line surface for the `saldo` binary.

pub mod output;
pub mod table_renderer;

use std::{
    fs,
    io::{self, IsTerminal, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use uuid::Uuid;

use saldo_config::{Config, ConfigManager};
use saldo_core::{export::format_money, table::table_rows};
use saldo_domain::{EntryDraft, EntryKind};
use saldo_storage_json::{JsonLedgerStorage, StoragePaths};

use crate::{utils::SystemClock, Book, SaldoError};

const EXPORT_TITLE: &str = "Saldo statement";

#[derive(Debug, Parser)]
#[command(
    name = "saldo",
    version,
    about = "Running-balance ledger with forward-looking report windows"
)]
pub struct Cli {
    /// Directory holding config.json (and the ledger unless data_dir is set)
    #[arg(long, global = true, env = "SALDO_HOME")]
    pub home: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the starting balance and current total, optionally setting the former
    Balance {
        #[arg(long, allow_negative_numbers = true)]
        set: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Record a new entry
    Add(EntryArgs),
    /// Replace every field of an existing entry
    Edit {
        id: Uuid,
        #[command(flatten)]
        entry: EntryArgs,
    },
    /// Delete an entry
    Remove { id: Uuid },
    /// Print the running ledger
    List {
        #[arg(long)]
        json: bool,
    },
    /// List, add or remove categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoryCommand>,
    },
    /// Show a report window
    Report {
        /// First day of the window (defaults to today)
        start: Option<NaiveDate>,
        /// Number of 30-day blocks
        #[arg(long)]
        months: Option<u32>,
        /// Append the balance step chart
        #[arg(long)]
        chart: bool,
        #[arg(long)]
        json: bool,
    },
    /// Render a report window as a fixed-width document
    Export {
        start: Option<NaiveDate>,
        #[arg(long)]
        months: Option<u32>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Snapshot the ledger into the backups directory
    Backup {
        #[arg(long)]
        note: Option<String>,
    },
    /// List backups, newest first
    Backups,
    /// Replace the ledger with a backup or a dumped image
    Restore {
        id: Option<String>,
        #[arg(long, conflicts_with = "id")]
        file: Option<PathBuf>,
    },
    /// Write the raw ledger image to a file
    Dump {
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    Add { label: String },
    Remove { label: String },
}

#[derive(Debug, Clone, Args)]
pub struct EntryArgs {
    /// Entry date (YYYY-MM-DD)
    pub date: NaiveDate,
    #[arg(value_enum)]
    pub kind: KindArg,
    /// Unsigned amount; the sign follows the kind
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
}

impl EntryArgs {
    fn into_draft(self) -> EntryDraft {
        let draft = EntryDraft::new(self.date, self.kind.into(), self.amount, self.category);
        match self.description {
            Some(description) => draft.with_description(description),
            None => draft,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Income,
    Expense,
}

impl From<KindArg> for EntryKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Income => EntryKind::Income,
            KindArg::Expense => EntryKind::Expense,
        }
    }
}

#[derive(Debug, Serialize)]
struct BalanceSummary {
    starting_balance: f64,
    current_total: f64,
}

/// Book plus the preferences it was opened with.
pub struct CliContext {
    pub book: Book,
    pub config: Config,
}

/// Resolves config and data locations and opens the ledger.
///
/// With a home directory the config lives at `<home>/config.json` and the
/// ledger defaults to `<home>`; otherwise the platform directories are used.
/// A missing config file is created with the defaults.
pub fn open_context(home: Option<&Path>) -> Result<CliContext, SaldoError> {
    let manager = match home {
        Some(home) => ConfigManager::with_base_dir(home)?,
        None => ConfigManager::from_platform_dirs()?,
    };
    let config = manager.load()?;
    if !manager.config_path().exists() {
        manager.save(&config)?;
        tracing::info!(path = %manager.config_path().display(), "wrote default config");
    }
    let data_dir = match (&config.data_dir, home) {
        (Some(dir), _) => dir.clone(),
        (None, Some(home)) => home.to_path_buf(),
        (None, None) => config.resolve_data_dir(),
    };
    tracing::debug!(data_dir = %data_dir.display(), "opening ledger");

    let storage =
        JsonLedgerStorage::with_retention(StoragePaths::in_dir(&data_dir), config.backup_retention)?;
    let book = Book::open(Box::new(storage), Box::new(SystemClock))?;
    Ok(CliContext { book, config })
}

/// Parses process arguments and runs the command against stdout.
pub fn run_cli() -> Result<(), SaldoError> {
    let cli = Cli::parse();
    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(cli, &mut out)
}

pub fn execute(cli: Cli, out: &mut dyn Write) -> Result<(), SaldoError> {
    let context = open_context(cli.home.as_deref())?;
    if cli.no_color || !context.config.color_enabled {
        colored::control::set_override(false);
    }
    dispatch(&context, cli.command, out)
}

fn dispatch(context: &CliContext, command: Command, out: &mut dyn Write) -> Result<(), SaldoError> {
    let book = &context.book;
    let currency = context.config.currency_symbol.as_str();
    let default_months = context.config.default_window_months;

    match command {
        Command::Balance { set, json } => {
            if let Some(value) = set {
                book.set_starting_balance(value)?;
            }
            let summary = BalanceSummary {
                starting_balance: book.starting_balance()?,
                current_total: book.current_total()?,
            };
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
            } else {
                writeln!(
                    out,
                    "Starting balance: {}",
                    format_money(summary.starting_balance, currency)
                )?;
                writeln!(
                    out,
                    "Current total: {}",
                    output::tone_money(summary.current_total, currency)
                )?;
            }
        }
        Command::Add(args) => {
            let id = book.add_entry(args.into_draft())?;
            writeln!(out, "Added entry {id}")?;
        }
        Command::Edit { id, entry } => {
            book.update_entry(id, entry.into_draft())?;
            writeln!(out, "Updated entry {id}")?;
        }
        Command::Remove { id } => {
            let removed = book.remove_entry(id)?;
            writeln!(
                out,
                "Removed entry {id} ({} {} {})",
                removed.date(),
                removed.kind(),
                format_money(removed.magnitude(), currency)
            )?;
        }
        Command::List { json } => {
            let rows = table_rows(&book.running_ledger()?);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
            } else if rows.is_empty() {
                writeln!(out, "No entries recorded.")?;
            } else {
                writeln!(out, "{}", output::ledger_table(&rows, currency))?;
                writeln!(
                    out,
                    "Current total: {}",
                    output::tone_money(book.current_total()?, currency)
                )?;
            }
        }
        Command::Categories { action } => match action {
            None => {
                for label in book.categories()? {
                    let usage = book.category_usage(&label)?;
                    writeln!(out, "{label} ({usage})")?;
                }
            }
            Some(CategoryCommand::Add { label }) => {
                book.add_category(&label)?;
                writeln!(out, "Added category {label}")?;
            }
            Some(CategoryCommand::Remove { label }) => {
                book.remove_category(&label)?;
                writeln!(out, "Removed category {label}")?;
            }
        },
        Command::Report {
            start,
            months,
            chart,
            json,
        } => {
            let start = start.unwrap_or_else(|| book.today());
            let months = months.unwrap_or(default_months);
            let report = book.report(start, months)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
                return Ok(());
            }
            if !report.is_empty() {
                writeln!(
                    out,
                    "{}",
                    output::ledger_table(&table_rows(&report.rows), currency)
                )?;
            }
            writeln!(out, "{}", output::report_summary(&report, currency))?;
            if chart {
                writeln!(out)?;
                writeln!(out, "{}", output::render_chart(&book.chart(start, months)?, currency))?;
            }
        }
        Command::Export { start, months, out: target } => {
            let start = start.unwrap_or_else(|| book.today());
            let months = months.unwrap_or(default_months);
            let document = book.export_document(EXPORT_TITLE, start, months)?;
            let text = document.render_text(currency);
            match target {
                Some(path) => {
                    fs::write(&path, text)?;
                    writeln!(
                        out,
                        "Exported {} rows to {}",
                        document.rows.len(),
                        path.display()
                    )?;
                }
                None => write!(out, "{text}")?,
            }
        }
        Command::Backup { note } => {
            let info = book.backup(note.as_deref())?;
            writeln!(out, "Created backup {}", info.id)?;
        }
        Command::Backups => {
            let backups = book.list_backups()?;
            if backups.is_empty() {
                writeln!(out, "No backups found.")?;
            } else {
                writeln!(out, "{}", output::backup_lines(&backups))?;
            }
        }
        Command::Restore { id, file } => match (id, file) {
            (Some(id), None) => {
                book.restore_backup(&id)?;
                writeln!(out, "Restored backup {id}")?;
            }
            (None, Some(path)) => {
                let image = fs::read(&path)?;
                book.restore_image(&image)?;
                writeln!(out, "Restored ledger from {}", path.display())?;
            }
            _ => {
                return Err(SaldoError::Input(
                    "restore needs a backup id or --file".into(),
                ))
            }
        },
        Command::Dump { out: target } => {
            let image = book.export_image()?;
            fs::write(&target, &image)?;
            writeln!(out, "Wrote {} bytes to {}", image.len(), target.display())?;
        }
    }
    Ok(())
}
