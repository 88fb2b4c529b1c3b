//! Console output for create_tbl. Everything goes to stderr.

use std::fmt::Display;
use std::time::Instant;

use colored::Colorize;

use crate::perf::{self, ResourceUsage};

/// Number of stages reported by `stage`.
pub const STAGES: usize = 3;

pub fn header(tool: &str) {
    eprintln!();
    eprintln!(
        "{} {} {}",
        tool.bold().cyan(),
        concat!("v", env!("CARGO_PKG_VERSION")).dimmed(),
        "· feature table conversion".dimmed()
    );
    eprintln!();
}

/// Prints `[n/STAGES] title`, preceded by a blank line after the first stage.
pub fn stage(n: usize, title: &str) {
    if n > 1 {
        eprintln!();
    }
    eprintln!("{} {}", format!("[{n}/{STAGES}]").dimmed(), title.bold().blue());
}

pub fn field(key: &str, value: impl Display) {
    eprintln!("    {:<22}{}", format!("{key}:").dimmed(), value);
}

pub fn done(msg: &str) {
    eprintln!("    {} {}", "ok".green().bold(), msg);
}

pub fn caution(msg: &str) {
    eprintln!("    {} {}", "!!".yellow().bold(), msg.yellow());
}

pub fn print_summary(start: Instant) {
    let usage = ResourceUsage::since(start);
    let memory = usage
        .peak_memory
        .map_or_else(|| "N/A".to_string(), perf::format_bytes);
    eprintln!();
    eprintln!(
        "{} in {}, peak memory {}",
        "Finished".green().bold(),
        perf::format_elapsed(usage.elapsed).bold(),
        memory.bold(),
    );
    eprintln!();
}
