use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::{info, warn};

use frailty_score::utils::io::{self, FileFormat};
use frailty_score::utils::logging::{
    create_main_progress_bar, finish_progress_bar, print_batch_summary, print_scored_rows,
};
use frailty_score::{FrailtyConfig, FrailtyReport, FrailtyScorer, RecordBatch, ReferenceTable};

#[derive(Parser, Debug)]
#[command(name = "frailty")]
#[command(about = "Hospital Frailty Risk Score calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a Parquet, CSV or JSON lines table
    Score {
        /// Input file, or a directory of Parquet files
        #[arg(short, long)]
        input: PathBuf,

        /// Column holding the diagnosis codes
        #[arg(short, long, env = "FRAILTY_DIAGNOSIS_FIELD", default_value = "diagnoses")]
        field: String,

        /// Output file (.parquet, .csv, .json, .jsonl or .ndjson)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Prefix for the per-fragment indicator columns
        #[arg(long, default_value = "icd_")]
        prefix: String,

        /// Score batches one after another instead of in parallel
        #[arg(long)]
        sequential: bool,

        /// Worker threads for parallel scoring (defaults to the CPU count)
        #[arg(long)]
        threads: Option<usize>,

        /// Rows to preview on the console
        #[arg(long, default_value = "5")]
        preview: usize,

        /// Print a group distribution report
        #[arg(long)]
        report: bool,

        /// Write the report as JSON to this file
        #[arg(long)]
        report_json: Option<PathBuf>,
    },

    /// Score the built-in demonstration patients
    Demo {
        /// Optional output file for the scored demo table
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the reference table of fragments and weights
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Score {
            input,
            field,
            output,
            prefix,
            sequential,
            threads,
            preview,
            report,
            report_json,
        } => {
            let mut config = FrailtyConfig::default()
                .with_diagnosis_field(field)
                .with_indicator_prefix(prefix)
                .with_parallel(!sequential);
            if let Some(threads) = threads {
                config.num_threads = threads;
            }
            let options = ReportOptions {
                preview,
                print: report,
                json: report_json,
            };
            score_command(&input, output.as_deref(), &config, &options)
        }
        Commands::Demo { output } => demo_command(output.as_deref()),
        Commands::Table => {
            table_command();
            Ok(())
        }
    }
}

struct ReportOptions {
    preview: usize,
    print: bool,
    json: Option<PathBuf>,
}

fn score_command(
    input: &Path,
    output: Option<&Path>,
    config: &FrailtyConfig,
    options: &ReportOptions,
) -> Result<()> {
    if config.parallel {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .build_global()
        {
            warn!("Could not configure thread pool: {e}");
        }
    }

    let scorer = FrailtyScorer::from_config(config);

    if !input.is_dir() && FileFormat::from_path(input)? == FileFormat::JsonLines {
        return score_rows(&scorer, input, output, config, options);
    }

    let start = Instant::now();
    let batches = io::read_table(input, config.batch_size)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let pb = create_main_progress_bar(batches.len() as u64, Some("scoring"));
    let scored = scorer
        .score_batches_with_progress(&batches, &config.diagnosis_field, &pb)
        .with_context(|| format!("Failed to score {}", input.display()))?;
    finish_progress_bar(&pb, Some("done"));
    print_batch_summary(&scored, start.elapsed());

    if let Some(first) = scored.first() {
        print_scored_rows(first, scorer.layout(), options.preview)?;
    }

    if let Some(output) = output {
        io::write_table(output, &scored)
            .with_context(|| format!("Failed to write {}", output.display()))?;
    }

    let report = FrailtyReport::from_batches(&scored, scorer.layout(), scorer.table())?;
    emit_report(&report, options)
}

fn score_rows(
    scorer: &FrailtyScorer<'_>,
    input: &Path,
    output: Option<&Path>,
    config: &FrailtyConfig,
    options: &ReportOptions,
) -> Result<()> {
    if let Some(output) = output {
        if FileFormat::from_path(output)? != FileFormat::JsonLines {
            bail!(
                "JSON lines input can only be written as JSON lines, not {}",
                output.display()
            );
        }
    }

    let rows = io::read_json_rows(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let scored = scorer
        .score(&rows, &config.diagnosis_field)
        .with_context(|| format!("Failed to score {}", input.display()))?;
    info!("Scored {} rows", scored.len());

    if let Some(output) = output {
        io::write_json_rows(output, &scored)
            .with_context(|| format!("Failed to write {}", output.display()))?;
    }

    let report = FrailtyReport::from_rows(&scored, scorer.layout(), scorer.table());
    emit_report(&report, options)
}

fn emit_report(report: &FrailtyReport, options: &ReportOptions) -> Result<()> {
    if options.print {
        print!("{report}");
    }
    if let Some(path) = &options.json {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, report)?;
        info!("Wrote report to {}", path.display());
    }
    Ok(())
}

fn demo_command(output: Option<&Path>) -> Result<()> {
    let config = FrailtyConfig::default();
    let scorer = FrailtyScorer::from_config(&config);

    let batch = frailty_score::demo::demo_batch()?;
    let scored: RecordBatch = scorer.score(&batch, &config.diagnosis_field)?;
    print_scored_rows(&scored, scorer.layout(), scored.num_rows())?;

    let report = FrailtyReport::from_batches(
        std::slice::from_ref(&scored),
        scorer.layout(),
        scorer.table(),
    )?;
    print!("{report}");

    if let Some(output) = output {
        io::write_table(output, std::slice::from_ref(&scored))?;
    }
    Ok(())
}

fn table_command() {
    let table = ReferenceTable::hfrs();
    println!("{} reference fragments", table.len());
    for (idx, entry) in table.entries().iter().enumerate() {
        println!("{:>4}  {}  {:>4.1}", idx + 1, entry.fragment, entry.weight);
    }
    for shadowed in table.shadowed() {
        println!(
            "shadowed: {} weight {:.1} (replaced by a later entry)",
            shadowed.fragment, shadowed.weight
        );
    }
}
