//! Terminal output for the command-line tool.
//!
//! Colored record listings and the relation progress bar.

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::models::{Direction, Paper};
use crate::relations::LookupFailure;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Print the header above a relation listing.
pub fn print_relations_header(seed_doi: &str, direction: Direction, count: usize, duration: Duration) {
    let relation = match direction {
        Direction::Citing => "cited by",
        Direction::CitedBy => "citing",
    };
    println!();
    println!(
        "{} Works {} {}",
        "🔗".yellow().bold(),
        relation,
        seed_doi.cyan().bold()
    );
    println!(
        "{} Resolved {} records in {:.2}s",
        "─".repeat(30).dimmed(),
        count.to_string().green().bold(),
        duration.as_secs_f64()
    );
    println!();
}

/// Print one record as a short colored block.
pub fn print_paper(index: usize, paper: &Paper) {
    let year = paper
        .published_date
        .as_ref()
        .map(|d| d.chars().take(4).collect::<String>())
        .unwrap_or_else(|| "????".to_string());

    println!(
        "{:>3}. {} ({})",
        index,
        truncate_with_ellipsis(&paper.title, 90).blue().bold(),
        year.yellow()
    );
    if !paper.authors.is_empty() {
        println!("     {}", truncate_with_ellipsis(&paper.authors, 90));
    }
    if let Some(venue) = &paper.venue {
        println!("     {}", venue.dimmed());
    }
    println!("     DOI: {}", paper.primary_id().green());
}

/// Print one record as a tab-separated line.
pub fn print_paper_plain(paper: &Paper) {
    println!(
        "{}\t{}\t{}\t{}",
        paper.primary_id(),
        paper.published_date.as_deref().unwrap_or(""),
        paper.title,
        paper.authors
    );
}

/// Report lookups that were dropped from the result.
pub fn print_failures(failures: &[LookupFailure]) {
    if failures.is_empty() {
        return;
    }
    eprintln!();
    eprintln!(
        "{} {} related DOIs could not be resolved:",
        "⚠".yellow().bold(),
        failures.len()
    );
    for failure in failures {
        eprintln!("  {} {}", failure.doi.yellow(), failure.reason.dimmed());
    }
}

/// Print a user-facing error.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

/// Create the progress bar fed by relation progress updates.
pub fn create_progress_bar(msg: &str) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new(0);
    let style = indicatif::ProgressStyle::with_template(
        "{msg}: {bar:40.cyan/blue} {pos}/{len} ({percent}%)",
    )
    .map(|s| s.progress_chars("█▓▒░ "))
    .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb
}

/// Truncate a string to `max` characters, ending in "..." when cut.
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= 3 {
        return "...".to_string();
    }
    let head: String = s.chars().take(max - 3).collect();
    format!("{}...", head)
}
