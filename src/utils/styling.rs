//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");

/// Settings shown on the configuration card
pub struct ConfigCard<'a> {
    pub input: &'a Path,
    pub target: &'a str,
    pub correlation_threshold: f64,
    pub significance_level: f64,
    pub test_fraction: f64,
    pub seed: u64,
    pub classifier: String,
}

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("featsel").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!(
        "    {}",
        style("Correlation and p-value feature selection").dim()
    );
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(card: &ConfigCard<'_>) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("Configuration").cyan().bold(),
        " ".repeat(box_width - 16)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Input:  {:<39}│",
        FOLDER,
        truncate_path(card.input, 38)
    );
    println!(
        "    │  {} Target: {:<39}│",
        TARGET,
        truncate_string(card.target, 38)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Correlation threshold: {:<24}│",
        LINK,
        style(format!("{:.2}", card.correlation_threshold)).yellow()
    );
    println!(
        "    │  {} Significance level:    {:<24}│",
        CHART,
        style(format!("{:.3}", card.significance_level)).yellow()
    );
    println!(
        "    │  {} Test fraction / seed:  {:<24}│",
        GEAR,
        style(format!("{:.2} / {}", card.test_fraction, card.seed)).yellow()
    );
    println!(
        "    │  {} Classifier:            {:<24}│",
        GEAR,
        style(truncate_string(&card.classifier, 24)).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "      {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("featsel run complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, threshold_info: Option<&str>) {
    if let Some(info) = threshold_info {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

/// Print one bullet line, optionally with a dimmed note
pub fn print_bullet(text: &str, note: Option<&str>) {
    match note {
        Some(note) => println!("        {} {} {}", style("•").dim(), text, style(note).dim()),
        None => println!("        {} {}", style("•").dim(), text),
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
