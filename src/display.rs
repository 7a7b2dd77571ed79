//! Colored terminal output for effective sets and answers.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::advisor::AdvisorAnswer;
use crate::knowledge::{Document, EffectiveSet, VERSION_DATE_FORMAT};

/// Maximum title length in listings.
const TITLE_MAX_LEN: usize = 40;

/// Truncate to `max_len` characters, adding an ellipsis if truncated.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return "...".to_string();
    }
    let kept: String = s.chars().take(max_len - 3).collect();
    format!("{kept}...")
}

/// One-line summary of a document: label, title, effective date.
#[must_use]
pub fn format_document_line(doc: &Document) -> String {
    format!(
        "{} - {} (in force from {})",
        doc.label(),
        truncate(&doc.title, TITLE_MAX_LEN),
        doc.version_date.format(VERSION_DATE_FORMAT)
    )
}

/// Print the documents in force, with their content when `verbose`.
pub fn print_effective_set(effective: &EffectiveSet<'_>, total: usize, verbose: bool) {
    println!(
        "{} {} of {} documents in force on {}",
        "[CORPUS]".blue().bold(),
        effective.len().to_string().bold(),
        total,
        effective.reference_date().format(VERSION_DATE_FORMAT).cyan()
    );
    for doc in effective.documents() {
        let tag = if doc.is_sheet() {
            "[SHEET]".green().bold().to_string()
        } else {
            "[DOC]".yellow().bold().to_string()
        };
        println!("{tag} {}", format_document_line(doc));
        if verbose {
            println!("        {}", doc.content.dimmed());
            println!("        {}", doc.url.as_str().dimmed());
        }
    }
    let _ = io::stdout().flush();
}

/// Print an answer and its sources.
pub fn print_answer(answer: &AdvisorAnswer) {
    println!(
        "{} regulation at {} ({} local documents)",
        "[ADVISOR]".magenta().bold(),
        answer.reference_date.format(VERSION_DATE_FORMAT).cyan(),
        answer.context_documents.len()
    );
    println!("{}", answer.text);
    if !answer.sources.is_empty() {
        println!("{}", "---".dimmed());
        for source in &answer.sources {
            println!("{} {} {}", "[SOURCE]".cyan().bold(), source.title, source.url.dimmed());
        }
    }
    let _ = io::stdout().flush();
}

/// Print an error.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message.red());
}
