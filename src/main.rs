//! CLI tool for copying tagged paragraphs of a PDF into its metadata.
//!
//! This binary drives the pdftagmeta crate end to end: read the document,
//! optionally keep only bold tags, extract each tag's paragraph and write a new
//! PDF with the paragraphs stored as metadata entries.

use clap::Parser;
use pdftagmeta::{
    default_output_path, metadata_key, PdfTagger, Result, RunOutcome, TaggerConfig, DEFAULT_TAGS,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "pdftagmeta",
    version,
    about = "Extract tagged paragraphs from a PDF and store them as document metadata"
)]
struct Cli {
    /// Path to the PDF file to read
    input: PathBuf,

    /// Where to write the tagged PDF (default: <input>_with_metadata.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Tag to look for; repeat for several tags
    #[arg(short, long = "tag", value_name = "TAG", default_values_t = DEFAULT_TAGS.iter().map(|t| t.to_string()).collect::<Vec<_>>())]
    tags: Vec<String>,

    /// Only use tags that appear as bold lines in the document
    #[arg(long)]
    bold_only: bool,

    /// Print every metadata entry of the written file
    #[arg(long)]
    show_metadata: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("\n❌ Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    println!("🔍 Reading PDF: {}", cli.input.display());
    println!("📁 Output file: {}", output.display());
    println!("{}", "─".repeat(60));

    let config = TaggerConfig {
        input_path: cli.input.clone(),
        output_path: output.clone(),
        tags: cli.tags.clone(),
        bold_only: cli.bold_only,
    };
    let mut tagger = PdfTagger::with_config(config)?;

    let report = match tagger.run()? {
        RunOutcome::Written(report) => report,
        RunOutcome::NoBoldTags => {
            println!("ℹ️  No bold tags found in the document; nothing written.");
            return Ok(());
        }
    };

    if cli.bold_only {
        println!("🅱️  Bold tags: {}", report.tags.join(", "));
    }
    for m in &report.matches {
        println!("✅ '{}': {}...", m.tag, m.preview());
    }
    for tag in report.missing() {
        println!("⚠️  '{}' not found in the document", tag);
    }

    println!("{}", "─".repeat(60));
    println!("📊 {} tag(s) stored", report.tag_data.len());
    println!("💾 Metadata added to {}", report.output_path.display());

    if cli.show_metadata {
        print_metadata(&output)?;
    }

    Ok(())
}

fn print_metadata(path: &Path) -> Result<()> {
    let written = PdfTagger::from_path(path)?;
    let entries = written.metadata();

    println!("\n📝 Metadata for {}:", path.display());
    if entries.is_empty() {
        println!("   (none)");
    }
    for (key, value) in &entries {
        println!("   {}: {}", metadata_key(key), value);
    }
    Ok(())
}
