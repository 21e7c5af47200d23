//! # Thinklens Core
//!
//! Client library for a text-analysis service.
//! Collects form options into a request, dispatches it over HTTP, normalizes
//! the loosely shaped response once, and renders every display region into a
//! single view model. Also hosts the layered configuration and a development
//! mock of the service.

pub mod client;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod form;
pub mod highlight;
pub mod mock_server;
pub mod normalize;
pub mod render;
pub mod types;
pub mod view;

// Re-export commonly used types at the crate root.
pub use client::{AnalysisTransport, HttpTransport};
pub use config::{ThinklensConfig, load_config};
pub use controller::{SubmissionController, SubmissionState, SubmitOutcome};
pub use document::render_page;
pub use error::{ConfigError, Result, ThinklensError, TransportError, ValidationError};
pub use form::{FormState, MethodCheckbox};
pub use highlight::syntax_highlight;
pub use normalize::{AnalysisView, MethodPanel, normalize};
pub use render::{Region, RenderedRegions, render_regions};
pub use types::{AnalysisRequest, ThinkingMethod};
pub use view::{ElementIds, ViewModel};
