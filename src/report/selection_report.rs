//! Feature selection report generation
//!
//! Generates a JSON report documenting every feature, the stage that dropped
//! it (if any) and why, plus both classifier evaluations.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{CorrelatedPair, CorrelationOutcome, Elimination, Evaluation};

/// Drop stage enum for tracking where feature was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DropStage {
    Correlation,
    Significance,
}

/// Single correlation entry
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationEntry {
    pub feature: String,
    pub correlation: f64,
}

/// Correlation analysis result for a feature
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationAnalysisEntry {
    pub threshold: f64,
    pub passed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub correlated_with: Vec<CorrelationEntry>,
}

/// Regression significance result for a feature
#[derive(Debug, Clone, Serialize)]
pub struct SignificanceEntry {
    pub p_value: f64,
    pub threshold: f64,
    pub passed: bool,
}

/// Complete analysis for a feature
#[derive(Debug, Clone, Serialize)]
pub struct FeatureAnalysis {
    pub correlation: CorrelationAnalysisEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significance: Option<SignificanceEntry>,
}

/// Single feature entry in the report
#[derive(Debug, Clone, Serialize)]
pub struct FeatureReportEntry {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped_at_stage: Option<DropStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub analysis: FeatureAnalysis,
}

/// Thresholds used in the analysis
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdsConfig {
    pub correlation: f64,
    pub significance_level: f64,
}

/// Classifier settings used for both evaluations
#[derive(Debug, Clone, Serialize)]
pub struct ClassifierSettings {
    pub kernel: String,
    pub gamma: String,
    pub regularization: f64,
    pub test_fraction: f64,
    pub seed: u64,
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub timestamp: String,
    pub featsel_version: String,
    pub input_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    pub target_column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_column: Option<String>,
    pub classes: Vec<String>,
    pub thresholds: ThresholdsConfig,
    pub classifier: ClassifierSettings,
}

/// Stage-level summary
#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub dropped: usize,
    pub threshold_used: f64,
}

/// By-stage breakdown
#[derive(Debug, Clone, Serialize)]
pub struct ByStage {
    pub correlation: StageSummary,
    pub significance: StageSummary,
}

/// Timing information in milliseconds
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimingInfo {
    pub load_ms: u64,
    pub correlation_ms: u64,
    pub elimination_ms: u64,
    pub evaluation_selected_ms: u64,
    pub evaluation_full_ms: u64,
    pub total_ms: u64,
}

impl TimingInfo {
    pub fn record(slot: &mut u64, elapsed: Duration) {
        *slot = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    }
}

/// Report summary
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub initial_features: usize,
    pub final_features: usize,
    pub dropped_count: usize,
    pub by_stage: ByStage,
    pub eliminator_converged: bool,
    pub timing: TimingInfo,
}

/// Both classifier runs
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationsSection {
    pub selected_features: Evaluation,
    pub all_features: Evaluation,
}

/// Complete selection report
#[derive(Debug, Clone, Serialize)]
pub struct SelectionReport {
    pub metadata: ReportMetadata,
    pub summary: ReportSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluations: Option<EvaluationsSection>,
    pub features: Vec<FeatureReportEntry>,
}

/// Parameters for creating a SelectionReportBuilder
pub struct ReportBuilderParams {
    pub input_file: String,
    pub output_file: Option<String>,
    pub target_column: String,
    pub id_column: Option<String>,
    pub classes: Vec<String>,
    pub correlation_threshold: f64,
    pub significance_level: f64,
    pub classifier: ClassifierSettings,
}

/// Builder for constructing the selection report during pipeline execution
pub struct SelectionReportBuilder {
    params: ReportBuilderParams,

    // All features seen at the correlation stage, original order
    all_features: Vec<String>,
    correlation_pairs: Vec<CorrelatedPair>,

    // feature -> (correlated_with, coefficient)
    dropped_correlation: HashMap<String, (String, f64)>,
    // feature -> p-value at removal
    dropped_significance: HashMap<String, f64>,
    // p-values of the final regression fit
    final_p_values: HashMap<String, f64>,
    eliminator_converged: bool,

    evaluations: Option<EvaluationsSection>,
    timing: TimingInfo,
}

impl SelectionReportBuilder {
    /// Create a new report builder with the given parameters
    pub fn new(params: ReportBuilderParams) -> Self {
        Self {
            params,
            all_features: Vec::new(),
            correlation_pairs: Vec::new(),
            dropped_correlation: HashMap::new(),
            dropped_significance: HashMap::new(),
            final_p_values: HashMap::new(),
            eliminator_converged: false,
            evaluations: None,
            timing: TimingInfo::default(),
        }
    }

    /// Record correlation filter results
    pub fn set_correlation_results(&mut self, outcome: &CorrelationOutcome) {
        self.all_features = outcome.mask.names().to_vec();
        self.correlation_pairs = outcome.pairs.clone();

        for feature in outcome.mask.dropped_names() {
            let reason = outcome
                .dropped_by(&feature)
                .map(|pair| (pair.feature1.clone(), pair.correlation))
                .unwrap_or_default();
            self.dropped_correlation.insert(feature, reason);
        }
    }

    /// Record backward elimination results
    pub fn set_elimination_results(&mut self, elimination: &Elimination) {
        for step in &elimination.removed {
            self.dropped_significance
                .insert(step.feature.clone(), step.p_value);
        }
        for (name, p) in elimination.names.iter().zip(&elimination.p_values) {
            self.final_p_values.insert(name.clone(), *p);
        }
        self.eliminator_converged = elimination.converged;
    }

    /// Record both classifier runs
    pub fn set_evaluations(&mut self, selected: &Evaluation, full: &Evaluation) {
        self.evaluations = Some(EvaluationsSection {
            selected_features: selected.clone(),
            all_features: full.clone(),
        });
    }

    pub fn set_timing(&mut self, timing: TimingInfo) {
        self.timing = timing;
    }

    /// Build the final report
    pub fn build(self) -> SelectionReport {
        let mut features: Vec<FeatureReportEntry> = self
            .all_features
            .iter()
            .map(|name| self.build_feature_entry(name))
            .collect();

        // Kept first, then by drop stage; original order within each group
        features.sort_by_key(|entry| match entry.dropped_at_stage {
            None => 0,
            Some(DropStage::Correlation) => 1,
            Some(DropStage::Significance) => 2,
        });

        let dropped_count = self.dropped_correlation.len() + self.dropped_significance.len();

        SelectionReport {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                featsel_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: self.params.input_file,
                output_file: self.params.output_file,
                target_column: self.params.target_column,
                id_column: self.params.id_column,
                classes: self.params.classes,
                thresholds: ThresholdsConfig {
                    correlation: self.params.correlation_threshold,
                    significance_level: self.params.significance_level,
                },
                classifier: self.params.classifier,
            },
            summary: ReportSummary {
                initial_features: self.all_features.len(),
                final_features: self.all_features.len() - dropped_count,
                dropped_count,
                by_stage: ByStage {
                    correlation: StageSummary {
                        dropped: self.dropped_correlation.len(),
                        threshold_used: self.params.correlation_threshold,
                    },
                    significance: StageSummary {
                        dropped: self.dropped_significance.len(),
                        threshold_used: self.params.significance_level,
                    },
                },
                eliminator_converged: self.eliminator_converged,
                timing: self.timing,
            },
            evaluations: self.evaluations,
            features,
        }
    }

    /// Build a single feature entry
    fn build_feature_entry(&self, feature_name: &str) -> FeatureReportEntry {
        let (status, dropped_at_stage, reason) =
            if let Some((other, corr)) = self.dropped_correlation.get(feature_name) {
                (
                    "dropped".to_string(),
                    Some(DropStage::Correlation),
                    Some(format!(
                        "Correlated with earlier column {} (r={:.4})",
                        other, corr
                    )),
                )
            } else if let Some(p) = self.dropped_significance.get(feature_name) {
                (
                    "dropped".to_string(),
                    Some(DropStage::Significance),
                    Some(format!(
                        "p-value {:.4} above significance level {:.4}",
                        p, self.params.significance_level
                    )),
                )
            } else {
                ("kept".to_string(), None, None)
            };

        let correlated_with: Vec<CorrelationEntry> = self
            .correlation_pairs
            .iter()
            .filter_map(|pair| {
                if pair.feature1 == feature_name {
                    Some(CorrelationEntry {
                        feature: pair.feature2.clone(),
                        correlation: pair.correlation,
                    })
                } else if pair.feature2 == feature_name {
                    Some(CorrelationEntry {
                        feature: pair.feature1.clone(),
                        correlation: pair.correlation,
                    })
                } else {
                    None
                }
            })
            .collect();

        let significance = self
            .dropped_significance
            .get(feature_name)
            .map(|&p| (p, false))
            .or_else(|| {
                self.final_p_values
                    .get(feature_name)
                    .map(|&p| (p, p <= self.params.significance_level))
            })
            .map(|(p_value, passed)| SignificanceEntry {
                p_value,
                threshold: self.params.significance_level,
                passed,
            });

        FeatureReportEntry {
            name: feature_name.to_string(),
            status,
            dropped_at_stage,
            reason,
            analysis: FeatureAnalysis {
                correlation: CorrelationAnalysisEntry {
                    threshold: self.params.correlation_threshold,
                    passed: !self.dropped_correlation.contains_key(feature_name),
                    correlated_with,
                },
                significance,
            },
        }
    }
}

/// Export the selection report to a JSON file
pub fn export_selection_report(report: &SelectionReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize selection report to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!(
            "Failed to write selection report to {}",
            output_path.display()
        )
    })?;

    Ok(())
}
