use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use contract_table_unifier::{
    DEFAULT_HEADER_TOKEN, DEFAULT_SHEET_NAME, ExtractionReport, PageSelection, UnifyOptions,
    extract_pdf_to_file,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pdf2xlsx",
    version,
    about = "Merge CÓDIGO/DESCRIÇÃO/VALOR tables from a PDF contract into one spreadsheet"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract matching tables and write the unified spreadsheet.
    Extract(ExtractArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input PDF path.
    #[arg(short, long)]
    input: PathBuf,

    /// Output path (.xlsx, or .csv with --csv).
    #[arg(short, long)]
    output: PathBuf,

    /// Page selection like 1-3,5.
    #[arg(long)]
    pages: Option<String>,

    /// Minimum cells required per candidate table row.
    #[arg(long, default_value_t = 2)]
    min_cols: usize,

    /// Token that marks a table's header row (case-insensitive).
    #[arg(long, default_value = DEFAULT_HEADER_TOKEN)]
    header_token: String,

    /// Worksheet name in the output workbook.
    #[arg(long, default_value = DEFAULT_SHEET_NAME)]
    sheet_name: String,

    /// Write CSV instead of xlsx.
    #[arg(long)]
    csv: bool,

    /// CSV delimiter character.
    #[arg(long, default_value = ",", requires = "csv")]
    delimiter: char,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(args: &ExtractArgs) -> Result<UnifyOptions> {
    let pages = args
        .pages
        .as_deref()
        .map(PageSelection::from_str)
        .transpose()
        .map_err(|error| anyhow!("invalid page selection: {error}"))
        .context("failed to parse --pages")?;

    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    Ok(UnifyOptions {
        pages,
        min_cols: args.min_cols,
        header_token: args.header_token.clone(),
        sheet_name: args.sheet_name.clone(),
        delimiter: args.delimiter as u8,
        ..UnifyOptions::default()
    })
}

fn log_report(report: &ExtractionReport, verbose: bool) {
    if report.row_count > 0 {
        eprintln!(
            "extracted {} row(s) from {} table(s)",
            report.row_count, report.table_count
        );
    }

    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} page={:?} grid={:?}: {}",
                warning.code, warning.page, warning.grid_index, warning.message
            );
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<ExtractionReport> {
    let options = parse_options(args)?;
    extract_pdf_to_file(&args.input, &args.output, args.csv, &options)
        .with_context(|| format!("failed to process '{}'", args.input.display()))
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("contract_table_unifier=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(report) => {
                log_report(&report, args.verbose);
                if report.table_count > 0 {
                    ExitCode::SUCCESS
                } else {
                    eprintln!("no table containing '{}' was found", args.header_token);
                    ExitCode::from(2)
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
