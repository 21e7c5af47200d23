//! Plain-text rendering of an analysis for the terminal.

use thinklens_core::ThinkingMethod;
use thinklens_core::normalize::{AnalysisView, MethodPanel};
use thinklens_core::render::{NO_COMPLEXITY, NOT_AVAILABLE, UNKNOWN_CONTEXT, format_one_decimal};

/// Prefix an alert for stderr.
pub fn format_alert(message: &str) -> String {
    format!("! {message}")
}

/// Render every region as plain text sections.
pub fn render_text(analysis: &AnalysisView, processing_time_ms: Option<u128>) -> String {
    let mut out = String::new();

    out.push_str("Key Concepts\n");
    if analysis.concepts.is_empty() {
        out.push_str("  No key concepts identified\n");
    } else {
        out.push_str(&format!("  {}\n", analysis.concepts.join(", ")));
    }

    out.push_str("\nContext\n");
    out.push_str(&format!(
        "  {}\n",
        analysis.context.as_deref().unwrap_or(UNKNOWN_CONTEXT)
    ));

    out.push_str("\nComplexity\n");
    match &analysis.complexity {
        Some(c) => {
            let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.into());
            out.push_str(&format!("  Total words: {}\n", or_na(&c.total_words)));
            out.push_str(&format!("  Unique words: {}\n", or_na(&c.unique_words)));
            let avg = c
                .avg_sentence_length
                .map(format_one_decimal)
                .unwrap_or_else(|| NOT_AVAILABLE.into());
            out.push_str(&format!("  Average sentence length: {avg} words\n"));
        }
        // Strip the paragraph markup from the shared placeholder.
        None => out.push_str(&format!(
            "  {}\n",
            NO_COMPLEXITY.trim_start_matches("<p>").trim_end_matches("</p>")
        )),
    }

    for method in ThinkingMethod::ALL {
        out.push_str(&format!("\n{}\n", method.label()));
        render_panel(&mut out, method, analysis.panel(method));
    }

    if let Some(ms) = processing_time_ms {
        out.push_str(&format!("\nProcessing time: {ms} ms\n"));
    }
    out
}

fn render_panel(out: &mut String, method: ThinkingMethod, panel: &MethodPanel) {
    match panel {
        MethodPanel::Missing | MethodPanel::Empty => {
            out.push_str(&format!("  No {} available\n", method.placeholder_noun()));
        }
        MethodPanel::Failed { message, details } => {
            out.push_str(&format!("  Error: {message}\n"));
            if let Some(details) = details {
                out.push_str(&format!("  {details}\n"));
            }
        }
        MethodPanel::Unsupported => out.push_str(&format!(
            "  Unable to display {} (unsupported data structure)\n",
            method.placeholder_noun()
        )),
        MethodPanel::Categories(categories) => {
            for category in categories {
                out.push_str(&format!("  {}\n", category.heading));
                for item in &category.items {
                    out.push_str(&format!("    - {item}\n"));
                }
            }
        }
    }
}
