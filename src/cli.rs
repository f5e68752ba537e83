use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use crate::{
    GenotypeSerializer, GenotypeTable, RunReport, SerializeOptions, SerializeSummary, Separators,
    output,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Serialize genotype tables (JSON) into VCF records", long_about = None)]
struct Cli {
    /// Genotype table in JSON form (optionally gzip-compressed)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output VCF path; `.gz` output is gzip-compressed
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Separator between FORMAT fields
    #[arg(long, default_value = ":")]
    field_sep: String,

    /// Separator between multiple values of one field
    #[arg(long, default_value = ",")]
    multi_sep: String,

    /// Worker threads; 1 serializes sequentially, 0 uses all cores
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Write record lines only, without a VCF header
    #[arg(long)]
    no_header: bool,

    /// Write a JSON run report next to the output
    #[arg(long)]
    report: bool,

    /// Logging verbosity (e.g. error, warn, info, debug)
    #[arg(long, default_value = "info")]
    log_level: String,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let summary = execute(&cli)?;
    print_summary(&summary, &cli.output);
    Ok(())
}

fn execute(cli: &Cli) -> Result<SerializeSummary> {
    let table = GenotypeTable::load(&cli.input)?;
    let separators = Separators::new(cli.field_sep.clone(), cli.multi_sep.clone());
    let serializer = GenotypeSerializer::new(SerializeOptions {
        separators: separators.clone(),
        parallel: cli.threads != 1,
    });

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build()
        .context("failed to build worker pool")?;
    let serialized = pool
        .install(|| serializer.serialize(&table))
        .with_context(|| format!("failed to serialize {}", cli.input.display()))?;

    if cli.no_header {
        write_lines(&cli.output, &serialized.lines)?;
    } else {
        let header = output::build_header(&table)?;
        output::write_vcf(&cli.output, &header, &serialized.lines)?;
    }

    if cli.report {
        RunReport::new(
            &cli.input,
            &cli.output,
            separators,
            pool.current_num_threads(),
            serialized.summary.clone(),
        )
        .write(&cli.output)
        .context("failed to write run report")?;
    }

    Ok(serialized.summary)
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut text = lines.join("\n");
    if !lines.is_empty() {
        text.push('\n');
    }
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
    Ok(())
}

fn print_summary(summary: &SerializeSummary, output: &Path) {
    println!(
        "Wrote {variants} records for {samples} samples and {fields} fields to {path}.",
        variants = summary.variants,
        samples = summary.samples,
        fields = summary.fields,
        path = output.display(),
    );

    if summary.empty_format_variants > 0 {
        println!(
            "{count} records had no genotype values (empty FORMAT column).",
            count = summary.empty_format_variants
        );
    }

    for warning in &summary.warnings {
        println!("Warning: {warning}");
    }
}
