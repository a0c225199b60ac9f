//! Selection summary report generation

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Summary of the feature selection and the two evaluations
#[derive(Debug, Default)]
pub struct SelectionSummary {
    pub initial_features: usize,
    pub final_features: usize,
    pub dropped_correlation: Vec<String>,
    pub dropped_pvalue: Vec<String>,
    pub accuracy_selected: Option<f64>,
    pub accuracy_full: Option<f64>,
}

impl SelectionSummary {
    pub fn new(initial_features: usize) -> Self {
        Self {
            initial_features,
            final_features: initial_features,
            ..Default::default()
        }
    }

    pub fn add_correlation_drops(&mut self, features: Vec<String>) {
        self.final_features -= features.len();
        self.dropped_correlation = features;
    }

    pub fn add_pvalue_drops(&mut self, features: Vec<String>) {
        self.final_features -= features.len();
        self.dropped_pvalue = features;
    }

    pub fn set_accuracies(&mut self, selected: f64, full: f64) {
        self.accuracy_selected = Some(selected);
        self.accuracy_full = Some(full);
    }

    /// Share of the initial features removed, in percent
    pub fn reduction_pct(&self) -> f64 {
        if self.initial_features > 0 {
            ((self.initial_features - self.final_features) as f64 / self.initial_features as f64)
                * 100.0
        } else {
            0.0
        }
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("SELECTION SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Initial Features"),
            Cell::new(self.initial_features),
        ]);

        table.add_row(vec![
            Cell::new("🔗 Dropped (Correlation)"),
            Cell::new(self.dropped_correlation.len()).fg(drop_color(&self.dropped_correlation)),
        ]);

        table.add_row(vec![
            Cell::new("📉 Dropped (p-value)"),
            Cell::new(self.dropped_pvalue.len()).fg(drop_color(&self.dropped_pvalue)),
        ]);

        table.add_row(vec![
            Cell::new("✅ Final Features"),
            Cell::new(self.final_features)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("✂️  Reduction"),
            Cell::new(format!("{:.1}%", self.reduction_pct()))
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
        ]);

        if let (Some(selected), Some(full)) = (self.accuracy_selected, self.accuracy_full) {
            let (selected_color, full_color) = if selected >= full {
                (Color::Green, Color::White)
            } else {
                (Color::Yellow, Color::Green)
            };

            table.add_row(vec![
                Cell::new("🎯 Accuracy (selected)"),
                Cell::new(format!("{:.4}", selected)).fg(selected_color),
            ]);
            table.add_row(vec![
                Cell::new("🎯 Accuracy (all features)"),
                Cell::new(format!("{:.4}", full)).fg(full_color),
            ]);
        }

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.dropped_correlation.is_empty() || !self.dropped_pvalue.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("DROPPED FEATURES").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());

            print_dropped("High Correlation", &self.dropped_correlation);
            print_dropped("Not Significant", &self.dropped_pvalue);
        }
    }
}

fn drop_color(features: &[String]) -> Color {
    if features.is_empty() {
        Color::White
    } else {
        Color::Red
    }
}

fn print_dropped(title: &str, features: &[String]) {
    if features.is_empty() {
        return;
    }
    println!();
    println!(
        "      {} {}:",
        style(title).yellow(),
        style(format!("({})", features.len())).dim()
    );
    for feature in features {
        println!("        {} {}", style("•").dim(), feature);
    }
}
