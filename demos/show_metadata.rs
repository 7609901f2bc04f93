//! Minimal viewer that prints the document-information entries of a PDF,
//! including any tag entries written by pdftagmeta.
//!
//! Usage:
//!   cargo run --example show_metadata -- study_with_metadata.pdf

use pdftagmeta::{metadata_key, PdfTagger};
use std::{env, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <pdf_file>", args[0]);
        process::exit(1);
    }

    let pdf_path = &args[1];
    let tagger = PdfTagger::from_path(pdf_path).unwrap_or_else(|e| {
        eprintln!("Error loading PDF: {e}");
        process::exit(1);
    });

    let entries = tagger.metadata();
    if entries.is_empty() {
        println!("No metadata found for {pdf_path}.");
        return;
    }

    println!("Metadata for {pdf_path}:");
    for (key, value) in &entries {
        println!("{}: {value}", metadata_key(key));
    }
}
