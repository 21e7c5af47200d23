//! Pure region renderers.
//!
//! Every function takes canonical data from [`crate::normalize`] and returns
//! an HTML fragment for one display region. Nothing here touches the view
//! model; [`render_regions`] bundles the fragments for the controller to apply.

use serde::Serialize;

use crate::highlight;
use crate::normalize::{AnalysisView, CategoryItems, Complexity, MethodPanel};
use crate::types::ThinkingMethod;

pub const NO_CONCEPTS: &str = "<p>No key concepts identified</p>";
pub const UNKNOWN_CONTEXT: &str = "Unknown context";
pub const NO_COMPLEXITY: &str = "<p>No complexity data available</p>";
pub const JSON_ERROR: &str = "<p>Error displaying JSON data</p>";
pub const NOT_AVAILABLE: &str = "N/A";

/// Display regions fed by an analysis response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Concepts,
    Context,
    Complexity,
    Json,
    Method(ThinkingMethod),
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Concepts,
        Region::Context,
        Region::Complexity,
        Region::Json,
        Region::Method(ThinkingMethod::Socratic),
        Region::Method(ThinkingMethod::MultiLevel),
        Region::Method(ThinkingMethod::Practice),
    ];

    pub fn title(self) -> &'static str {
        match self {
            Region::Concepts => "Key Concepts",
            Region::Context => "Context",
            Region::Complexity => "Complexity",
            Region::Json => "JSON Data",
            Region::Method(method) => method.label(),
        }
    }
}

/// HTML for each region after one successful response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RenderedRegions {
    pub concepts: String,
    pub context: String,
    pub complexity: String,
    pub json: String,
    pub socratic: String,
    pub multi_level: String,
    pub practice: String,
}

impl RenderedRegions {
    pub fn get(&self, region: Region) -> &str {
        match region {
            Region::Concepts => &self.concepts,
            Region::Context => &self.context,
            Region::Complexity => &self.complexity,
            Region::Json => &self.json,
            Region::Method(ThinkingMethod::Socratic) => &self.socratic,
            Region::Method(ThinkingMethod::MultiLevel) => &self.multi_level,
            Region::Method(ThinkingMethod::Practice) => &self.practice,
        }
    }
}

/// Render every region of a normalized response.
pub fn render_regions(view: &AnalysisView) -> RenderedRegions {
    RenderedRegions {
        concepts: render_concepts(&view.concepts),
        context: render_context(view.context.as_deref()),
        complexity: render_complexity(view.complexity.as_ref()),
        json: render_json(&view.raw),
        socratic: render_method_panel(ThinkingMethod::Socratic, &view.socratic),
        multi_level: render_method_panel(ThinkingMethod::MultiLevel, &view.multi_level),
        practice: render_method_panel(ThinkingMethod::Practice, &view.practice),
    }
}

/// One badge per concept.
pub fn render_concepts(concepts: &[String]) -> String {
    if concepts.is_empty() {
        return NO_CONCEPTS.to_string();
    }
    concepts
        .iter()
        .map(|c| format!("<div class=\"concept-badge\">{}</div>", escape_html(c)))
        .collect()
}

/// Context is text content, escaped.
pub fn render_context(context: Option<&str>) -> String {
    escape_html(context.unwrap_or(UNKNOWN_CONTEXT))
}

pub fn render_complexity(complexity: Option<&Complexity>) -> String {
    let Some(c) = complexity else {
        return NO_COMPLEXITY.to_string();
    };
    let or_na = |v: &Option<String>| {
        v.as_deref()
            .map(escape_html)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    let avg = c
        .avg_sentence_length
        .map(format_one_decimal)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    format!(
        "<p><strong>Total words:</strong> {}</p>\n\
         <p><strong>Unique words:</strong> {}</p>\n\
         <p><strong>Average sentence length:</strong> {} words</p>",
        or_na(&c.total_words),
        or_na(&c.unique_words),
        avg
    )
}

/// One fractional digit, with exact ties rounded away from zero.
///
/// `{:.1}` rounds an exactly representable tie (`0.25`, `2.75`) to even; the
/// page's number formatting rounds it up in magnitude. A value is an exact tie
/// at one digit only when four times it is an odd integer.
pub fn format_one_decimal(value: f64) -> String {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        format!("{:.1}", (value * 10.0).round() / 10.0)
    } else {
        format!("{value:.1}")
    }
}

/// Highlighted pretty JSON of the whole body.
pub fn render_json(raw: &serde_json::Value) -> String {
    match highlight::highlight_value(raw) {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize response for display");
            JSON_ERROR.to_string()
        }
    }
}

pub fn render_method_panel(method: ThinkingMethod, panel: &MethodPanel) -> String {
    match panel {
        MethodPanel::Missing | MethodPanel::Empty => {
            format!("<p>No {} available</p>", method.placeholder_noun())
        }
        MethodPanel::Failed { message, details } => {
            let mut html = format!("<p class=\"text-danger\">Error: {}</p>", escape_html(message));
            if let Some(details) = details {
                html.push_str(&format!(
                    "<p><small class=\"text-muted\">{}</small></p>",
                    escape_html(details)
                ));
            }
            html
        }
        MethodPanel::Unsupported => format!(
            "<p>Unable to display {} (unsupported data structure)</p>",
            method.placeholder_noun()
        ),
        MethodPanel::Categories(categories) => categories.iter().map(render_category).collect(),
    }
}

fn render_category(category: &CategoryItems) -> String {
    let mut html = format!("<h5>{}</h5>", escape_html(&category.heading));
    html.push_str("<ul class=\"list-group mb-3\">");
    for item in &category.items {
        html.push_str(&format!(
            "<li class=\"list-group-item\">{}</li>",
            escape_html(item)
        ));
    }
    html.push_str("</ul>");
    html
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_concepts_placeholder() {
        let view = normalize(&json!({"concepts": []}));
        assert_eq!(render_regions(&view).concepts, NO_CONCEPTS);
    }

    #[test]
    fn test_two_concept_badges() {
        let view = normalize(&json!({"concepts": ["a", "b"]}));
        let html = render_regions(&view).concepts;
        assert_eq!(
            html,
            "<div class=\"concept-badge\">a</div><div class=\"concept-badge\">b</div>"
        );
        assert_eq!(html.matches("concept-badge").count(), 2);
    }

    #[test]
    fn test_concept_text_escaped() {
        let html = render_concepts(&["<script>".to_string()]);
        assert_eq!(html, "<div class=\"concept-badge\">&lt;script&gt;</div>");
    }

    #[test]
    fn test_context_fallback() {
        assert_eq!(render_context(None), "Unknown context");
        assert_eq!(render_context(Some("a & b")), "a &amp; b");
    }

    #[test]
    fn test_complexity_lines() {
        let view = normalize(&json!({"complexity": {
            "total_words": 120, "unique_words": 80, "avg_sentence_length": 14.26
        }}));
        assert_eq!(
            render_complexity(view.complexity.as_ref()),
            "<p><strong>Total words:</strong> 120</p>\n\
             <p><strong>Unique words:</strong> 80</p>\n\
             <p><strong>Average sentence length:</strong> 14.3 words</p>"
        );
    }

    #[test]
    fn test_one_decimal_ties_round_away_from_zero() {
        assert_eq!(format_one_decimal(0.25), "0.3");
        assert_eq!(format_one_decimal(0.75), "0.8");
        assert_eq!(format_one_decimal(2.25), "2.3");
        assert_eq!(format_one_decimal(-0.25), "-0.3");
        assert_eq!(format_one_decimal(14.26), "14.3");
        // 0.15 is stored just below the tie.
        assert_eq!(format_one_decimal(0.15), "0.1");
        assert_eq!(format_one_decimal(6.0), "6.0");
        assert_eq!(format_one_decimal(0.0), "0.0");
    }

    #[test]
    fn test_complexity_missing_fields() {
        let html = render_complexity(Some(&Complexity::default()));
        assert_eq!(html.matches("N/A").count(), 3);
        assert_eq!(render_complexity(None), NO_COMPLEXITY);
    }

    #[test]
    fn test_socratic_single_question() {
        let view = normalize(&json!({"socratic_questions": {"conceptual": ["Why?"]}}));
        assert_eq!(
            render_regions(&view).socratic,
            "<h5>Conceptual Questions</h5><ul class=\"list-group mb-3\">\
             <li class=\"list-group-item\">Why?</li></ul>"
        );
    }

    #[test]
    fn test_socratic_empty_payload_placeholder() {
        let view = normalize(&json!({"socratic_questions": {}}));
        assert_eq!(
            render_regions(&view).socratic,
            "<p>No Socratic questions available</p>"
        );
    }

    #[test]
    fn test_missing_panels_placeholders() {
        let regions = render_regions(&normalize(&json!({})));
        assert_eq!(regions.socratic, "<p>No Socratic questions available</p>");
        assert_eq!(
            regions.multi_level,
            "<p>No multi-level explanations available</p>"
        );
        assert_eq!(regions.practice, "<p>No practice questions available</p>");
    }

    #[test]
    fn test_failed_panel_with_details() {
        let panel = MethodPanel::Failed {
            message: "boom".into(),
            details: Some("upstream 502".into()),
        };
        assert_eq!(
            render_method_panel(ThinkingMethod::Practice, &panel),
            "<p class=\"text-danger\">Error: boom</p>\
             <p><small class=\"text-muted\">upstream 502</small></p>"
        );
    }

    #[test]
    fn test_unsupported_panel() {
        assert_eq!(
            render_method_panel(ThinkingMethod::MultiLevel, &MethodPanel::Unsupported),
            "<p>Unable to display multi-level explanations (unsupported data structure)</p>"
        );
    }

    #[test]
    fn test_json_region_highlighted() {
        let view = normalize(&json!({"context": "x"}));
        let html = render_regions(&view).json;
        assert!(html.contains("<span class=\"key\">\"context\":</span>"));
        assert!(html.contains("<span class=\"string\">\"x\"</span>"));
    }

    #[test]
    fn test_region_lookup() {
        let regions = RenderedRegions {
            practice: "p".into(),
            ..Default::default()
        };
        assert_eq!(regions.get(Region::Method(ThinkingMethod::Practice)), "p");
        assert_eq!(regions.get(Region::Concepts), "");
    }
}
