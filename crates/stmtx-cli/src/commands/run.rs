//! Run command - process a folder of statements into a sorted report.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error};

use stmtx_core::batch::BatchOutcome;
use stmtx_core::report::format_usd;
use stmtx_core::{
    BatchContext, Notifier, PdfPageSource, ReportWriter, StatementFile, StmtxError, Summary,
    TransactionParser,
};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Folder containing the statement PDFs
    #[arg(required = true)]
    input: PathBuf,

    /// Output directory (default: the statement folder)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also export all transactions as JSON
    #[arg(long)]
    json: bool,
}

/// Reports batch progress on a progress bar.
struct ProgressNotifier {
    pb: ProgressBar,
}

impl ProgressNotifier {
    fn new(total: usize) -> anyhow::Result<Self> {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} statements")?
                .progress_chars("=>-"),
        );
        Ok(Self { pb })
    }
}

impl Notifier for ProgressNotifier {
    fn statement_started(&self, _index: usize, _total: usize, statement: &StatementFile) {
        self.pb.suspend(|| {
            println!(
                "Processing: {} (Statement Date: {})",
                statement.filename, statement.statement_date
            )
        });
    }

    fn statement_finished(&self, _statement: &StatementFile, transactions: usize) {
        self.pb.suspend(|| println!("  Found {} transactions", transactions));
        self.pb.inc(1);
    }

    fn statement_failed(&self, statement: &StatementFile, error: &StmtxError) {
        self.pb.suspend(|| {
            println!(
                "  {} Error processing {}: {}",
                style("✗").red(),
                statement.filename,
                error
            )
        });
        self.pb.inc(1);
    }
}

pub fn run(args: RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::config::load(config_path)?;

    if !args.input.is_dir() {
        anyhow::bail!("Input folder not found: {}", args.input.display());
    }

    let mut context = match BatchContext::discover(&args.input, &config.discovery) {
        Ok(context) => context,
        Err(StmtxError::NoStatements(dir)) => anyhow::bail!(
            "No PDF files were found in the selected folder or immediate subfolders: {}",
            dir.display()
        ),
        Err(e) => return Err(e.into()),
    };

    println!("Selected folder: {}", args.input.display());
    if context.directory() != args.input.as_path() {
        println!("Using folder: {}", context.directory().display());
    }

    println!();
    println!("{}", style("1. PROCESSING STATEMENTS").bold());
    println!("{}", "-".repeat(30));

    let notifier = ProgressNotifier::new(context.statements().len())?;
    let parser = TransactionParser::with_config(config.parser.clone());
    context.process(&PdfPageSource::new(), &parser, &notifier);
    notifier.pb.finish_and_clear();

    let outcome = match context.finish() {
        Ok(outcome) => outcome,
        Err(StmtxError::NoTransactions { .. }) => {
            anyhow::bail!("No transactions found in the PDF files.")
        }
        Err(e) => return Err(e.into()),
    };

    let mut writer = ReportWriter::new(&outcome.directory, &config.report, chrono::Local::now().naive_local());
    if let Some(dir) = args.output_dir {
        writer = writer.with_output_dir(dir);
    }
    if args.json {
        writer = writer.with_json(true);
    }

    let paths = match writer.write(&outcome.records) {
        Ok(paths) => paths,
        Err(e) => {
            error!("Report writing failed: {:?}", e);
            anyhow::bail!("An error occurred while writing the report: {}. Run with -v for details.", e);
        }
    };

    print_summary(&outcome, &outcome.summary());

    println!();
    println!(
        "{} Results saved to: {}",
        style("✓").green(),
        paths.transactions.display()
    );
    if let Some(path) = &paths.verification {
        println!("   Verification: {}", path.display());
    }
    if let Some(path) = &paths.json {
        println!("   JSON: {}", path.display());
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn print_summary(outcome: &BatchOutcome, summary: &Summary) {
    println!();
    println!("{}", style("2. VERIFICATION SUMMARY").bold());
    println!("{}", "-".repeat(30));
    println!("Total statements processed: {}", summary.statements);
    println!("Total transactions found: {}", summary.transactions);

    if !outcome.failures.is_empty() {
        println!("{}", style("Skipped statements:").red());
        for failure in &outcome.failures {
            println!("  - {}: {}", failure.statement.filename, failure.error);
        }
    }

    println!();
    println!("{}", style("3. FINANCIAL SUMMARY").bold());
    println!("{}", "-".repeat(30));
    println!("Total Credits: {}", style(format_usd(summary.credits)).green());
    println!("Total Debits: {}", style(format_usd(summary.debits)).red());
    println!("Net Change: {}", format_usd(summary.net_change));

    println!();
    println!("{}", style("4. MONTHLY SUMMARY").bold());
    println!("{}", "-".repeat(30));
    println!("{:<8} {:>6} {:>14}", "Month", "Count", "Sum");
    for month in &summary.monthly {
        println!("{:<8} {:>6} {:>14}", month.month, month.count, format_usd(month.sum));
    }
}
