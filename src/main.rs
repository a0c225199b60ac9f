//! featsel: Feature Selection CLI Tool
//!
//! Drops correlated features, prunes the rest by regression p-value, and
//! compares SVM accuracy with and without the selection.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use featsel::cli::Cli;
use featsel::pipeline::{
    backward_eliminate, filter_correlated, frame_to_matrix, load_dataset, prepare_dataset,
    save_dataset, train_and_evaluate, with_labels, OlsTTest,
};
use featsel::report::{
    export_selection_report, ClassifierSettings, ReportBuilderParams, SelectionReportBuilder,
    SelectionSummary, TimingInfo,
};
use featsel::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_bullet,
    print_completion, print_config, print_count, print_info, print_step_header, print_step_time,
    print_success, ConfigCard,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let run_start = Instant::now();
    let mut timing = TimingInfo::default();

    print_banner(env!("CARGO_PKG_VERSION"));

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");

    let step_start = Instant::now();
    let spinner = create_spinner("Reading dataset...");
    let raw = load_dataset(&cli.input, cli.infer_schema_length)?;
    let dataset = prepare_dataset(&raw, &cli.layout())?;
    finish_with_success(&spinner, "Dataset loaded");

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", dataset.n_rows());
    println!("      Columns: {}", raw.width());
    println!("      Features: {}", dataset.n_features());
    println!(
        "      Estimated memory: {:.2} MB",
        raw.estimated_size() as f64 / (1024.0 * 1024.0)
    );
    if let Some(id) = &dataset.id_column {
        println!("      Identifier column: {}", id);
    }
    if !dataset.empty_columns.is_empty() {
        println!(
            "      Empty columns dropped: {}",
            dataset.empty_columns.join(", ")
        );
    }

    let counts = dataset.labels.class_counts();
    let classes: Vec<String> = dataset
        .labels
        .classes
        .iter()
        .zip(&counts)
        .enumerate()
        .map(|(code, (class, count))| format!("{}={} ({})", class, code, count))
        .collect();
    println!("      Classes: {}", classes.join(", "));

    let load_elapsed = step_start.elapsed();
    TimingInfo::record(&mut timing.load_ms, load_elapsed);
    print_step_time(load_elapsed);

    let config = cli.evaluation_config();
    print_config(&ConfigCard {
        input: &cli.input,
        target: &dataset.target,
        correlation_threshold: cli.correlation_threshold,
        significance_level: cli.significance_level,
        test_fraction: config.test_fraction,
        seed: config.seed,
        classifier: format!(
            "{} (C={}, gamma={})",
            config.svm.kernel, config.svm.regularization, config.svm.gamma
        ),
    });

    let mut summary = SelectionSummary::new(dataset.n_features());
    let mut report = SelectionReportBuilder::new(ReportBuilderParams {
        input_file: cli.input.display().to_string(),
        output_file: cli.output.as_ref().map(|p| p.display().to_string()),
        target_column: dataset.target.clone(),
        id_column: dataset.id_column.clone(),
        classes: dataset.labels.classes.clone(),
        correlation_threshold: cli.correlation_threshold,
        significance_level: cli.significance_level,
        classifier: ClassifierSettings {
            kernel: config.svm.kernel.to_string(),
            gamma: config.svm.gamma.to_string(),
            regularization: config.svm.regularization,
            test_fraction: config.test_fraction,
            seed: config.seed,
        },
    });

    // Step 2: Correlation filter
    print_step_header(2, "Correlation Filter");

    let step_start = Instant::now();
    let spinner = create_spinner("Calculating correlations...");
    let correlation = filter_correlated(&dataset.features, cli.correlation_threshold)?;
    finish_with_success(&spinner, "Correlation analysis complete");

    let dropped_corr = correlation.mask.dropped_names();
    if correlation.pairs.is_empty() {
        print_info("No highly correlated feature pairs found");
    } else {
        print_count(
            "correlated pair(s)",
            correlation.pairs.len(),
            Some(&format!("(>={:.2})", cli.correlation_threshold)),
        );
        println!(
            "      Dropping {} feature(s)",
            style(dropped_corr.len()).yellow().bold()
        );
        for feature in &dropped_corr {
            let note = correlation
                .dropped_by(feature)
                .map(|pair| format!("(r={:.3} with {})", pair.correlation, pair.feature1));
            print_bullet(feature, note.as_deref());
        }
        print_success("Dropped highly correlated features");
    }
    report.set_correlation_results(&correlation);
    summary.add_correlation_drops(dropped_corr);

    let correlation_elapsed = step_start.elapsed();
    TimingInfo::record(&mut timing.correlation_ms, correlation_elapsed);
    print_step_time(correlation_elapsed);

    // Step 3: Backward elimination
    print_step_header(3, "Backward Elimination");

    let step_start = Instant::now();
    let spinner = create_spinner("Fitting least squares models...");
    let filtered = frame_to_matrix(&correlation.table)?;
    let response = dataset.labels.as_response();
    let elimination = backward_eliminate(
        &filtered,
        &response,
        &correlation.mask.retained_names(),
        cli.significance_level,
        &OlsTTest,
    )
    .context("Backward elimination failed")?;

    if elimination.converged {
        finish_with_success(&spinner, "Backward elimination converged");
    } else {
        finish_with_warning(
            &spinner,
            "Stopped before every p-value met the significance level",
        );
    }

    if elimination.removed.is_empty() {
        print_info("Every remaining feature is significant");
    } else {
        print_count(
            "feature(s) not significant",
            elimination.removed.len(),
            Some(&format!("(p>{:.3})", cli.significance_level)),
        );
        for step in &elimination.removed {
            print_bullet(&step.feature, Some(&format!("(p={:.4})", step.p_value)));
        }
        print_success("Dropped features without significant coefficients");
    }
    report.set_elimination_results(&elimination);
    summary.add_pvalue_drops(
        elimination
            .removed
            .iter()
            .map(|step| step.feature.clone())
            .collect(),
    );

    let elimination_elapsed = step_start.elapsed();
    TimingInfo::record(&mut timing.elimination_ms, elimination_elapsed);
    print_step_time(elimination_elapsed);

    let n_classes = dataset.labels.n_classes();

    // Step 4: Evaluate on selected features
    print_step_header(4, "Evaluate Selected Features");

    let step_start = Instant::now();
    let spinner = create_spinner("Training SVM on selected features...");
    let selected = train_and_evaluate(
        &elimination.matrix,
        &dataset.labels.codes,
        n_classes,
        &config,
    )
    .context("Evaluation on selected features failed")?;
    finish_with_success(
        &spinner,
        &format!(
            "Trained on {} feature(s), {} support vector(s)",
            selected.features, selected.support_vectors
        ),
    );

    let selected_elapsed = step_start.elapsed();
    TimingInfo::record(&mut timing.evaluation_selected_ms, selected_elapsed);
    print_step_time(selected_elapsed);

    // Step 5: Evaluate on all features
    print_step_header(5, "Evaluate All Features");

    let step_start = Instant::now();
    let spinner = create_spinner("Training SVM on all features...");
    let full_matrix = frame_to_matrix(&dataset.features)?;
    let full = train_and_evaluate(&full_matrix, &dataset.labels.codes, n_classes, &config)
        .context("Evaluation on all features failed")?;
    finish_with_success(
        &spinner,
        &format!(
            "Trained on {} feature(s), {} support vector(s)",
            full.features, full.support_vectors
        ),
    );

    let full_elapsed = step_start.elapsed();
    TimingInfo::record(&mut timing.evaluation_full_ms, full_elapsed);
    print_step_time(full_elapsed);

    summary.set_accuracies(selected.accuracy, full.accuracy);
    report.set_evaluations(&selected, &full);

    // Step 6: Save results
    if cli.output.is_some() || cli.report.is_some() {
        print_step_header(6, "Save Results");
    }

    if let Some(output_path) = &cli.output {
        let spinner = create_spinner("Writing output file...");
        let kept = correlation
            .table
            .select(elimination.names.iter().map(String::as_str))?;
        let mut out = with_labels(&kept, &dataset.labels, &dataset.target)?;
        save_dataset(&mut out, output_path)?;
        finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));
    }

    if let Some(report_path) = &cli.report {
        TimingInfo::record(&mut timing.total_ms, run_start.elapsed());
        report.set_timing(timing);
        export_selection_report(&report.build(), report_path)?;
        print_success(&format!("Report written to {}", report_path.display()));
    }

    summary.display();

    println!();
    println!("Accuracy with feature selection: {:.4}", selected.accuracy);
    println!("Accuracy without feature selection: {:.4}", full.accuracy);

    print_completion();

    Ok(())
}
