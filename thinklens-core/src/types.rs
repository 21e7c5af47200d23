//! Wire types and the thinking-method catalogue.

use serde::{Deserialize, Serialize};

/// Sentinel method value sent when "all methods" is selected.
pub const ALL_METHODS: &str = "all";

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
    /// One or more method values, or exactly `["all"]`.
    pub methods: Vec<String>,
    #[serde(default)]
    pub use_ai: bool,
}

impl AnalysisRequest {
    /// Whether the request asks for every thinking method.
    pub fn wants_all(&self) -> bool {
        self.methods.iter().any(|m| m == ALL_METHODS)
    }

    /// Whether the given method was requested, directly or through "all".
    pub fn wants(&self, method: ThinkingMethod) -> bool {
        self.wants_all() || self.methods.iter().any(|m| m == method.value())
    }
}

/// The thinking methods that have a result panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThinkingMethod {
    Socratic,
    MultiLevel,
    Practice,
}

impl ThinkingMethod {
    pub const ALL: [ThinkingMethod; 3] = [
        ThinkingMethod::Socratic,
        ThinkingMethod::MultiLevel,
        ThinkingMethod::Practice,
    ];

    /// Checkbox value and key under the response `methods` map.
    pub fn value(self) -> &'static str {
        match self {
            ThinkingMethod::Socratic => "socratic",
            ThinkingMethod::MultiLevel => "multi_level",
            ThinkingMethod::Practice => "practice",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.value() == value)
    }

    /// Human label for checkboxes and panel titles.
    pub fn label(self) -> &'static str {
        match self {
            ThinkingMethod::Socratic => "Socratic Questions",
            ThinkingMethod::MultiLevel => "Multi-level Explanations",
            ThinkingMethod::Practice => "Practice Questions",
        }
    }

    /// Top-level response field checked first.
    pub fn top_level_field(self) -> &'static str {
        match self {
            ThinkingMethod::Socratic => "socratic_questions",
            ThinkingMethod::MultiLevel => "multi_level_explanations",
            ThinkingMethod::Practice => "practice_questions",
        }
    }

    /// Categories in render order.
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            ThinkingMethod::Socratic => &[
                "conceptual",
                "exploratory",
                "analytical",
                "evaluative",
                "hypothetical",
                "reflective",
            ],
            ThinkingMethod::MultiLevel => &["child", "high_school", "academic"],
            ThinkingMethod::Practice => &["beginner", "intermediate", "advanced"],
        }
    }

    /// Keys that, when present at the top level, mark the whole body as this
    /// method's payload.
    pub fn inline_keys(self) -> &'static [&'static str] {
        match self {
            ThinkingMethod::Socratic => &["conceptual", "exploratory", "analytical"],
            ThinkingMethod::MultiLevel => &["child", "high_school", "academic"],
            ThinkingMethod::Practice => &["beginner", "intermediate", "advanced"],
        }
    }

    /// Heading shown above a category's list.
    pub fn category_heading(self, category: &str) -> String {
        match self {
            ThinkingMethod::Socratic => format!("{} Questions", capitalize(category)),
            ThinkingMethod::MultiLevel => {
                let level = match category {
                    "child" => "Child".to_string(),
                    "high_school" => "High School".to_string(),
                    "academic" => "Academic".to_string(),
                    other => capitalize(other),
                };
                format!("{level} Level Explanations")
            }
            ThinkingMethod::Practice => format!("{} Level Questions", capitalize(category)),
        }
    }

    /// Placeholder noun used in "No ... available" / "Unable to display ...".
    pub fn placeholder_noun(self) -> &'static str {
        match self {
            ThinkingMethod::Socratic => "Socratic questions",
            ThinkingMethod::MultiLevel => "multi-level explanations",
            ThinkingMethod::Practice => "practice questions",
        }
    }
}

impl std::fmt::Display for ThinkingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value())
    }
}

/// Uppercase the first character, leave the rest untouched.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
