//! CLI presentation: text and json formatters for run and validate results.

use crate::catalog::Catalog;
use crate::error::{PipelineError, StorageError};
use crate::pipeline::{RunReport, SampleOutcome, StyleDisposition};
use crate::types::Sample;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Counts printed by `validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateReport {
    pub models: usize,
    pub styles: usize,
    pub categories: usize,
}

impl From<&Catalog> for ValidateReport {
    fn from(catalog: &Catalog) -> Self {
        Self {
            models: catalog.models.len(),
            styles: catalog.styles.len(),
            categories: catalog.categories.len(),
        }
    }
}

/// Format a section heading with bold/underline.
fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, PipelineError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        PipelineError::StorageError(StorageError::CorruptRecord {
            key: "report".to_string(),
            message: e.to_string(),
        })
    })
}

pub fn format_validate_report(report: &ValidateReport) -> String {
    format!(
        "Catalog is valid:\n  Models: {}\n  Styles: {}\n  Categories: {}",
        report.models, report.styles, report.categories
    )
}

fn disposition_label(disposition: StyleDisposition) -> &'static str {
    match disposition {
        StyleDisposition::Skipped => "skipped",
        StyleDisposition::Unchanged => "unchanged",
        StyleDisposition::Regenerated => "regenerated",
    }
}

/// Run summary: totals, then a row per style that was not simply up to date.
pub fn format_run_report(report: &RunReport, format: &str) -> Result<String, PipelineError> {
    if format == "json" {
        return to_json(report);
    }

    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Run Summary")));
    let mut totals = Table::new();
    totals.load_preset(UTF8_BORDERS_ONLY);
    totals.set_header(vec!["Styles", "Unchanged", "Regenerated", "Skipped", "Removed"]);
    totals.add_row(vec![
        report.table.len().to_string(),
        report.unchanged_styles().to_string(),
        report.regenerated_styles().to_string(),
        report.skipped_styles().to_string(),
        report.removed_styles.len().to_string(),
    ]);
    out.push_str(&format!("{}\n\n", totals));
    out.push_str(&format!(
        "  Samples: {} ok, {} failed\n  Submissions: {}\n",
        report.successful_samples(),
        report.failed_samples(),
        report.submissions
    ));

    let mut details = Table::new();
    details.load_preset(UTF8_BORDERS_ONLY);
    let mut header = vec!["Style".to_string(), "Status".to_string()];
    header.extend(Sample::ALL.iter().map(|s| s.to_string()));
    details.set_header(header);
    let mut rows = 0usize;
    for (name, outcome) in report.table.iter() {
        if outcome.disposition == StyleDisposition::Unchanged {
            continue;
        }
        let mut row = vec![
            name.clone(),
            disposition_label(outcome.disposition).to_string(),
        ];
        for sample in Sample::ALL {
            let cell = match outcome.samples.get(&sample) {
                Some(SampleOutcome::Success { .. }) => format!("{}", "ok".green()),
                Some(SampleOutcome::Failed { reason }) => format!("{}", reason.red()),
                None => "-".to_string(),
            };
            row.push(cell);
        }
        details.add_row(row);
        rows += 1;
    }
    if rows > 0 {
        out.push_str(&format!("\n{}\n\n", format_section_heading("Changes")));
        out.push_str(&format!("{}\n", details));
    }
    if !report.removed_styles.is_empty() {
        out.push_str(&format!("\n{}\n", format_section_heading("Removed")));
        for name in &report.removed_styles {
            out.push_str(&format!("  - {}\n", name));
        }
    }
    Ok(out)
}
