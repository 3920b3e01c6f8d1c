//! tablewash - Progressive cleaning of tabular data

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::EnvFilter;

use tablewash::config::{ReportFormat, RowRange};
use tablewash::export::prepare_download;
use tablewash::output::{render_to_stdout, TerminalOutput};
use tablewash::parser::{load_remote, ParserFactory};
use tablewash::stats::summarize;
use tablewash::{CleaningParameters, CleaningPipeline, DataType, ExportFormat, ImputationMethod};

/// Progressive cleaning, statistics and export for tabular data
#[derive(clap::Parser, Debug)]
#[command(name = "tablewash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File to clean (xlsx, xls, csv or txt)
    #[arg(required_unless_present = "remote")]
    input: Option<PathBuf>,

    /// Load a `;`-delimited dataset over HTTP instead of a local file
    #[arg(long, conflicts_with = "input")]
    remote: Option<String>,

    /// Show the first and last N rows of the loaded table
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "5")]
    preview: Option<usize>,

    /// Print statistics of the loaded table, before cleaning
    #[arg(long)]
    initial_stats: bool,

    /// Column(s) to remove (comma-separated)
    #[arg(long, value_delimiter = ',')]
    drop_column: Vec<String>,

    /// Row position(s) to remove, 0-based (comma-separated)
    #[arg(long, value_delimiter = ',')]
    drop_row: Vec<usize>,

    /// Remove a block of rows: start:N, end:N or middle:N
    #[arg(long, value_name = "MODE:COUNT")]
    drop_range: Option<RowRange>,

    /// Rename columns: old=new (comma-separated)
    #[arg(long, value_delimiter = ',')]
    rename: Vec<String>,

    /// Convert columns: name=float|integer|double|string|date|boolean (comma-separated)
    #[arg(long, value_delimiter = ',')]
    coerce: Vec<String>,

    /// Remove rows holding IQR outliers in any numeric column
    #[arg(long)]
    remove_outliers: bool,

    /// Missing-value handling: drop, median or mean
    #[arg(long)]
    impute: Option<ImputationMethod>,

    /// Print statistics of the cleaned table
    #[arg(long)]
    stats: bool,

    /// Statistics format: terminal or json
    #[arg(long, default_value = "terminal")]
    report: ReportFormat,

    /// Export the cleaned table: csv, xlsx, xls or txt
    #[arg(long)]
    export: Option<ExportFormat>,

    /// Where to write the export (defaults to resultat.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the export as a base64 data URI instead of writing a file
    #[arg(long, requires = "export")]
    base64: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(2)
        }
    }
}

fn print_error(e: &anyhow::Error) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stderr, "Error:");
    let _ = stderr.reset();
    let _ = writeln!(stderr, " {:#}", e);
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let table = match (&cli.remote, &cli.input) {
        (Some(url), _) => load_remote(url)
            .with_context(|| format!("Failed to load remote dataset: {}", url))?,
        (None, Some(path)) => ParserFactory::new()
            .load_path(path)
            .with_context(|| format!("Failed to load file: {}", path.display()))?,
        (None, None) => bail!("an input file or --remote URL is required"),
    };

    // Reports go to stdout only when stdout is not carrying a payload
    let chatty = cli.report == ReportFormat::Terminal && !cli.base64;
    let terminal = TerminalOutput::new();
    let mut stdout = std::io::stdout();

    if let Some(n) = cli.preview {
        terminal.write_rows(&table.head(n), &mut stdout)?;
        terminal.write_rows(&table.tail(n), &mut stdout)?;
    }

    if cli.initial_stats {
        render_to_stdout(&summarize(&table), cli.report)?;
    }

    let params = build_parameters(&cli)?;
    let outcome = CleaningPipeline::new(params).run(&table)?;

    if chatty {
        if !outcome.removed_range.is_empty() {
            let positions: Vec<String> =
                outcome.removed_range.iter().map(|i| i.to_string()).collect();
            println!("Rows removed by range: {}\n", positions.join(", "));
        }
        if let Some(report) = &outcome.outliers {
            terminal.write_outliers(report, &mut stdout)?;
        }
        if let Some(report) = &outcome.imputation {
            terminal.write_imputation(report, &mut stdout)?;
        }
    }

    if cli.stats {
        render_to_stdout(&summarize(&outcome.table), cli.report)?;
    }

    if let Some(format) = cli.export {
        let download = prepare_download(&outcome.table, format)?;

        if cli.base64 {
            println!("{}", download.data_uri());
        } else {
            let path = cli
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(&download.file_name));
            std::fs::write(&path, &download.bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if chatty {
                println!("Wrote {} ({} bytes)", path.display(), download.bytes.len());
            }
        }
    }

    Ok(())
}

fn build_parameters(cli: &Cli) -> Result<CleaningParameters> {
    let mut params = CleaningParameters::new()
        .with_drop_columns(cli.drop_column.clone())
        .with_drop_rows(cli.drop_row.clone())
        .with_outlier_removal(cli.remove_outliers);

    params.drop_range = cli.drop_range;
    params.imputation_method = cli.impute;

    for pair in &cli.rename {
        let (old, new) = split_pair(pair)?;
        params = params.with_rename(old, new);
    }

    for pair in &cli.coerce {
        let (column, target) = split_pair(pair)?;
        let target: DataType = target
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Invalid coercion: {}", pair))?;
        params = params.with_coercion(column, target);
    }

    Ok(params)
}

fn split_pair(pair: &str) -> Result<(&str, &str)> {
    pair.split_once('=')
        .map(|(a, b)| (a.trim(), b.trim()))
        .with_context(|| format!("Expected NAME=VALUE, got: {}", pair))
}
