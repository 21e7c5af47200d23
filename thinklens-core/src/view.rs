//! View model: every element the page contract names, in one object.
//!
//! The controller owns a single [`ViewModel`] and is the only writer. Region
//! content arrives as rendered HTML from [`crate::render`]; control state
//! (submit button, loading indicator, results visibility) and user-visible
//! alerts are tracked alongside.

use serde::{Deserialize, Serialize};

use crate::form::FormState;
use crate::render::{Region, RenderedRegions};
use crate::types::ThinkingMethod;

/// Element identifiers shared with the page template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub input_text: String,
    pub method_all: String,
    pub use_ai: String,
    pub analyze_button: String,
    pub clear_button: String,
    pub loading: String,
    pub results_container: String,
    pub processing_time: String,
    pub time_value: String,
    pub concepts: String,
    pub context: String,
    pub complexity: String,
    pub json: String,
    pub socratic: String,
    pub multi_level: String,
    pub practice: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            input_text: "input-text".into(),
            method_all: "method-all".into(),
            use_ai: "use-ai".into(),
            analyze_button: "analyze-btn".into(),
            clear_button: "clear-btn".into(),
            loading: "loading".into(),
            results_container: "results-container".into(),
            processing_time: "processing-time".into(),
            time_value: "time-value".into(),
            concepts: "concepts-display".into(),
            context: "context-display".into(),
            complexity: "complexity-display".into(),
            json: "json-display".into(),
            socratic: "socratic-display".into(),
            multi_level: "multilevel-display".into(),
            practice: "practice-display".into(),
        }
    }
}

impl ElementIds {
    pub fn region(&self, region: Region) -> &str {
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

    /// Checkbox id for an individual method value.
    pub fn method_checkbox(&self, value: &str) -> String {
        format!("method-{}", value.replace('_', "-"))
    }
}

/// State of the submit button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitControl {
    pub enabled: bool,
    pub label: String,
    /// Whether the inline spinner is shown inside the button.
    pub busy: bool,
}

/// Everything the page shows, owned in one place.
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub ids: ElementIds,
    pub form: FormState,
    pub submit: SubmitControl,
    pub loading_visible: bool,
    pub results_visible: bool,
    pub processing_time_ms: Option<u128>,
    pub regions: RenderedRegions,
    pub alerts: Vec<String>,
}

impl ViewModel {
    pub fn new(ids: ElementIds, form: FormState, submit_label: impl Into<String>) -> Self {
        Self {
            ids,
            form,
            submit: SubmitControl {
                enabled: true,
                label: submit_label.into(),
                busy: false,
            },
            loading_visible: false,
            results_visible: false,
            processing_time_ms: None,
            regions: RenderedRegions::default(),
            alerts: Vec::new(),
        }
    }

    /// Enter the busy state.
    pub fn begin_busy(&mut self, busy_label: &str) {
        self.submit.label = busy_label.to_string();
        self.submit.enabled = false;
        self.submit.busy = true;
        self.loading_visible = true;
        self.results_visible = false;
    }

    /// Leave the busy state with the given submit label.
    pub fn end_busy(&mut self, submit_label: &str) {
        self.submit.enabled = true;
        self.submit.busy = false;
        self.submit.label = submit_label.to_string();
        self.loading_visible = false;
    }

    pub fn apply(&mut self, regions: RenderedRegions) {
        self.regions = regions;
        self.results_visible = true;
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(alert = %message, "Alert shown");
        self.alerts.push(message);
    }

    pub fn last_alert(&self) -> Option<&str> {
        self.alerts.last().map(String::as_str)
    }

    /// Clear button: empty the input and hide the results container.
    pub fn clear(&mut self) {
        self.form.clear();
        self.results_visible = false;
    }

    /// Content of a region by its element id.
    pub fn region_by_id(&self, id: &str) -> Option<&str> {
        Region::ALL
            .into_iter()
            .find(|r| self.ids.region(*r) == id)
            .map(|r| self.regions.get(r))
    }
}
