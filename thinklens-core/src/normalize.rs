//! Response normalization.
//!
//! The analysis service returns a loosely-shaped JSON body: each thinking
//! method's output may sit in a top-level field, under the `methods` map, or
//! inline as category keys on the body itself. [`normalize`] resolves every
//! region once, in a fixed priority order, into an [`AnalysisView`] so that
//! rendering never has to inspect raw JSON.

use serde::Serialize;
use serde_json::Value;

use crate::types::ThinkingMethod;

/// Canonical form of an analysis response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisView {
    pub concepts: Vec<String>,
    pub context: Option<String>,
    pub complexity: Option<Complexity>,
    pub socratic: MethodPanel,
    pub multi_level: MethodPanel,
    pub practice: MethodPanel,
    /// Top-level `error` of a success-status body.
    pub error: Option<String>,
    /// The body as received, for the raw JSON region.
    pub raw: Value,
}

impl AnalysisView {
    pub fn panel(&self, method: ThinkingMethod) -> &MethodPanel {
        match method {
            ThinkingMethod::Socratic => &self.socratic,
            ThinkingMethod::MultiLevel => &self.multi_level,
            ThinkingMethod::Practice => &self.practice,
        }
    }
}

/// Text statistics reported by the service.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Complexity {
    pub total_words: Option<String>,
    pub unique_words: Option<String>,
    pub avg_sentence_length: Option<f64>,
}

/// One category with its items, already reduced to display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryItems {
    pub category: String,
    pub heading: String,
    pub items: Vec<String>,
}

/// Resolved state of one thinking-method panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum MethodPanel {
    /// No location carried a payload.
    Missing,
    /// The payload was an error object.
    Failed {
        message: String,
        details: Option<String>,
    },
    /// The payload was present but empty.
    Empty,
    /// The payload had no non-empty known category.
    Unsupported,
    Categories(Vec<CategoryItems>),
}

/// Normalize a response body into its canonical view.
pub fn normalize(body: &Value) -> AnalysisView {
    AnalysisView {
        concepts: concepts(body),
        context: body.get("context").filter(|v| truthy(v)).map(display_text),
        complexity: complexity(body),
        socratic: method_panel(body, ThinkingMethod::Socratic),
        multi_level: method_panel(body, ThinkingMethod::MultiLevel),
        practice: method_panel(body, ThinkingMethod::Practice),
        error: body.get("error").filter(|v| truthy(v)).map(display_text),
        raw: body.clone(),
    }
}

/// JavaScript truthiness: `null`, `false`, `0`, and `""` are falsy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Locate a method's payload: top-level field, then `methods.<value>`, then
/// the body itself when any inline category key is truthy.
pub fn locate_method_payload(body: &Value, method: ThinkingMethod) -> Option<&Value> {
    if let Some(v) = body.get(method.top_level_field()).filter(|v| truthy(v)) {
        return Some(v);
    }
    if let Some(v) = body
        .get("methods")
        .and_then(|m| m.get(method.value()))
        .filter(|v| truthy(v))
    {
        return Some(v);
    }
    let inline = method
        .inline_keys()
        .iter()
        .any(|key| body.get(*key).is_some_and(truthy));
    inline.then_some(body)
}

/// Classify a located payload.
pub fn classify_payload(payload: &Value, method: ThinkingMethod) -> MethodPanel {
    if !truthy(payload) {
        return MethodPanel::Empty;
    }
    if let Some(error) = payload.get("error").filter(|v| truthy(v)) {
        return MethodPanel::Failed {
            message: display_text(error),
            details: payload
                .get("details")
                .filter(|v| truthy(v))
                .map(display_text),
        };
    }
    let Some(map) = payload.as_object() else {
        return match payload {
            Value::Array(items) if items.is_empty() => MethodPanel::Empty,
            _ => MethodPanel::Unsupported,
        };
    };
    if map.is_empty() {
        return MethodPanel::Empty;
    }

    let categories: Vec<CategoryItems> = method
        .categories()
        .iter()
        .filter_map(|category| {
            let items = map.get(*category)?.as_array()?;
            if items.is_empty() {
                return None;
            }
            Some(CategoryItems {
                category: (*category).to_string(),
                heading: method.category_heading(category),
                items: items.iter().map(item_text).collect(),
            })
        })
        .collect();

    if categories.is_empty() {
        MethodPanel::Unsupported
    } else {
        MethodPanel::Categories(categories)
    }
}

fn method_panel(body: &Value, method: ThinkingMethod) -> MethodPanel {
    match locate_method_payload(body, method) {
        Some(payload) => classify_payload(payload, method),
        None => MethodPanel::Missing,
    }
}

fn concepts(body: &Value) -> Vec<String> {
    body.get("concepts")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(display_text).collect())
        .unwrap_or_default()
}

fn complexity(body: &Value) -> Option<Complexity> {
    let stats = body.get("complexity").filter(|v| truthy(v))?;
    let count = |key: &str| {
        stats
            .get(key)
            .filter(|v| !v.is_null())
            .map(display_text)
            .filter(|s| !s.is_empty())
    };
    Some(Complexity {
        total_words: count("total_words"),
        unique_words: count("unique_words"),
        avg_sentence_length: stats.get("avg_sentence_length").and_then(Value::as_f64),
    })
}

/// Display text of a list item: a string, an object's `question` or
/// `explanation`, or compact JSON.
pub fn item_text(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        Value::Object(map) => ["question", "explanation"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| item.to_string()),
        other => other.to_string(),
    }
}

/// Strings verbatim, everything else as compact JSON.
fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
