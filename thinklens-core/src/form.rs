//! Option collector: the state of the analysis form's controls.
//!
//! Mirrors the page's text area, per-method checkboxes, the "all methods"
//! checkbox, and the AI-enhancement toggle. Checking "all" clears and disables
//! every individual checkbox; unchecking it re-enables them without re-checking
//! any. [`FormState::collect`] turns the current state into an
//! [`AnalysisRequest`] or a [`ValidationError`].

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{ALL_METHODS, AnalysisRequest, ThinkingMethod};

/// Maximum accepted text length in characters.
pub const DEFAULT_MAX_TEXT_CHARS: usize = 50_000;

/// One individual method checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCheckbox {
    pub value: String,
    pub label: String,
    pub checked: bool,
    pub disabled: bool,
}

impl MethodCheckbox {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            checked: false,
            disabled: false,
        }
    }
}

/// Form controls feeding a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub text: String,
    pub methods: Vec<MethodCheckbox>,
    pub all_methods: bool,
    pub use_ai: bool,
    pub max_text_chars: usize,
}

impl Default for FormState {
    fn default() -> Self {
        Self::with_methods(
            ThinkingMethod::ALL
                .iter()
                .map(|m| MethodCheckbox::new(m.value(), m.label())),
        )
    }
}

impl FormState {
    /// Build a form with the given checkboxes, all unchecked.
    pub fn with_methods(methods: impl IntoIterator<Item = MethodCheckbox>) -> Self {
        Self {
            text: String::new(),
            methods: methods.into_iter().collect(),
            all_methods: false,
            use_ai: false,
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_use_ai(&mut self, use_ai: bool) {
        self.use_ai = use_ai;
    }

    /// Toggle the "all methods" checkbox.
    pub fn set_all(&mut self, checked: bool) {
        self.all_methods = checked;
        for checkbox in &mut self.methods {
            checkbox.checked = false;
            checkbox.disabled = checked;
        }
    }

    /// Toggle an individual checkbox by value.
    ///
    /// Returns `false` when no enabled checkbox has that value. Checking an
    /// individual method unchecks "all".
    pub fn set_method(&mut self, value: &str, checked: bool) -> bool {
        let Some(checkbox) = self
            .methods
            .iter_mut()
            .find(|c| c.value == value && !c.disabled)
        else {
            return false;
        };
        checkbox.checked = checked;
        if self.methods.iter().any(|c| c.checked) {
            self.all_methods = false;
        }
        true
    }

    /// Values of the checked individual methods, in checkbox order.
    pub fn checked_methods(&self) -> Vec<String> {
        self.methods
            .iter()
            .filter(|c| c.checked)
            .map(|c| c.value.clone())
            .collect()
    }

    /// Clear button: empty the text area.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Validate the form and build the request body.
    pub fn collect(&self) -> Result<AnalysisRequest, ValidationError> {
        if self.text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        let actual = self.text.chars().count();
        if actual > self.max_text_chars {
            return Err(ValidationError::TextTooLong {
                limit: self.max_text_chars,
                actual,
            });
        }

        let methods = if self.all_methods {
            vec![ALL_METHODS.to_string()]
        } else {
            let checked = self.checked_methods();
            if checked.is_empty() {
                return Err(ValidationError::NoMethodSelected);
            }
            checked
        };

        Ok(AnalysisRequest {
            text: self.text.clone(),
            methods,
            use_ai: self.use_ai,
        })
    }
}
