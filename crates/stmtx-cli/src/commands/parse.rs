//! Parse command - extract transactions from a single statement.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::{debug, info};

use stmtx_core::pdf::PdfProcessor;
use stmtx_core::report::{format_usd, write_transactions};
use stmtx_core::{PdfExtractor, StatementFile, StatementParser, TransactionParser, TransactionRecord};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Statement PDF, or a .txt file holding already-extracted text
    #[arg(required = true)]
    input: PathBuf,

    /// Statement date (YYYY-MM-DD), when the file name does not carry one
    #[arg(short, long)]
    statement_date: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text listing
    Text,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::config::load(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let mut statement = StatementFile::from_path(&args.input);
    if let Some(date) = &args.statement_date {
        statement.statement_date = date.clone();
    }
    if !statement.is_dated() {
        anyhow::bail!(
            "Cannot read a statement date from {}; pass --statement-date YYYY-MM-DD",
            statement.filename
        );
    }
    info!(
        "Parsing {} (Statement Date: {})",
        statement.filename, statement.statement_date
    );

    let text = read_statement_text(&args.input)?;
    let parser = TransactionParser::with_config(config.parser);
    let records: Vec<TransactionRecord> = parser
        .parse(&text, &statement)
        .into_iter()
        .zip(1u32..)
        .map(|(record, sequence)| record.with_sequence(sequence))
        .collect();

    debug!("Parsed {} transactions", records.len());

    let output = format_records(&records, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} transactions written to {}",
            style("✓").green(),
            records.len(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn read_statement_text(path: &Path) -> anyhow::Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => {
            let extractor = PdfExtractor::open(path)?;
            debug!("PDF has {} pages", extractor.page_count());
            Ok(extractor.extract_text()?)
        }
        "txt" => Ok(fs::read_to_string(path)?),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

fn format_records(records: &[TransactionRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)? + "\n"),
        OutputFormat::Csv => {
            let mut out = Vec::new();
            write_transactions(records, &mut out)?;
            Ok(String::from_utf8(out)?)
        }
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_text(records: &[TransactionRecord]) -> String {
    let mut output = String::new();

    for record in records {
        output.push_str(&format!(
            "{:>3}  {}  {:<50}  {:>14}  {:>14}\n",
            record.statement_sequence.unwrap_or_default(),
            record.date,
            record.description,
            format_usd(record.amount),
            format_usd(record.balance)
        ));
    }

    output.push_str(&format!("\n{} transactions\n", records.len()));
    output
}
