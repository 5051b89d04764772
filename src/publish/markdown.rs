//! Markdown preview tables.

use crate::pipeline::{StatusTable, StyleOutcome};
use crate::types::{artifact_key, Sample};

const FAILURE_CELL: &str = "❌";

/// `# Style Previews` followed by one table per style in table order.
pub fn render_previews(table: &StatusTable) -> String {
    let mut out = String::from("# Style Previews\n\n");
    for (name, outcome) in table.iter() {
        out.push_str(&render_style_table(name, outcome));
    }
    out
}

/// `## {style}` heading plus a one-row table with a column per sample.
pub fn render_style_table(style_name: &str, outcome: &StyleOutcome) -> String {
    let mut out = format!("## {}\n", style_name);
    for sample in Sample::ALL {
        out.push_str(&format!("| {} ", sample));
    }
    out.push_str("|\n");
    for _ in Sample::ALL {
        out.push_str("| --- ");
    }
    out.push_str("|\n");
    for sample in Sample::ALL {
        if outcome.is_success(sample) {
            out.push_str(&format!(
                "| ![{} {} preview](/images/{}?raw=true) ",
                style_name,
                sample,
                artifact_key(style_name, sample)
            ));
        } else {
            out.push_str(&format!("| {} ", FAILURE_CELL));
        }
    }
    out.push_str("|\n\n");
    out
}
