use std::fmt::Display;

use excerpta_core::{Match, Strategy};
use owo_colors::OwoColorize;

use crate::VERSION;

/// Banner shown in verbose mode
pub fn print_banner() {
    eprintln!("\n{} {}", "excerpta".bold().bright_magenta(), format!("v{VERSION}").dimmed());
    eprintln!("{}\n", "highlights in reading order".dimmed());
}

/// `[step/total] message`
pub fn print_step(step: usize, total: usize, message: &str) {
    status(format!("[{step}/{total}]").dimmed(), message.bright_cyan());
}

pub fn print_success(message: &str) {
    status("✓".green(), message.bright_green());
}

pub fn print_info(message: &str) {
    status("·".blue(), message);
}

pub fn print_warning(message: &str) {
    status("!".yellow().bold(), message.yellow());
}

fn status(marker: impl Display, message: impl Display) {
    eprintln!("{marker} {message}");
}

/// One line on how the highlights were ordered; the fallback reason itself
/// is already logged by the core.
pub fn print_strategy(strategy: &Strategy, quotes: usize) {
    match strategy {
        Strategy::Positional => print_info(&format!("{quotes} highlights ordered by position in the article")),
        Strategy::Chronological { .. } => print_info(&format!("{quotes} highlights ordered by creation time")),
    }
}

/// Print ranked search hits, one per line, to stdout
pub fn print_matches(matches: &[Match<'_>]) {
    for (rank, m) in matches.iter().enumerate() {
        let title = m.record.title().unwrap_or("(untitled)");
        println!(
            "{} {} {} {}",
            format!("{:>2}.", rank + 1).dimmed(),
            format!("{:>5.1}", m.score).bright_white(),
            format!("[{}]", m.item_id).dimmed(),
            title
        );
        if m.record.has_url() {
            println!("    {}", m.record.source_url().underline());
        }
    }
}

/// Print timing information
pub fn print_timing(label: &str, duration: std::time::Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let indicator = if ms < 1000.0 {
        "fast".dimmed().to_string()
    } else if ms < 5000.0 {
        "moderate".bright_yellow().to_string()
    } else {
        "slow".bright_red().to_string()
    };

    eprintln!("  {} {:>8.2}ms ({})", format!("{}:", label).dimmed(), ms, indicator);
}
