//! Submission controller: the one writer of the view model.
//!
//! Drives a submission through `Idle → Submitting → Rendered | ErrorShown`.
//! An in-flight flag rejects a second submission while one is outstanding;
//! the view model is never locked across the network call, so a plain
//! `std::sync::Mutex` guards it.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::client::AnalysisTransport;
use crate::config::ThinklensConfig;
use crate::error::{TransportError, ValidationError};
use crate::form::FormState;
use crate::normalize::{AnalysisView, normalize};
use crate::render::render_regions;
use crate::view::ViewModel;

/// Prefix of the alert shown when a request fails.
pub const FAILURE_ALERT_PREFIX: &str = "An error occurred while analyzing text: ";

/// Where the controller is in its submission cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Submitting,
    Rendered,
    ErrorShown,
}

impl SubmissionState {
    /// Whether a new submission may start.
    pub fn is_ready(self) -> bool {
        self != SubmissionState::Submitting
    }
}

/// Result of one call to [`SubmissionController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Response rendered into every region.
    Rendered,
    /// Success status, but the body carried an `error` field.
    ServerReported { message: String },
    /// Server error status, network failure, or malformed body.
    Failed { message: String, status: Option<u16> },
    /// Blocked by form validation; no request was made.
    Invalid(ValidationError),
    /// Another submission was still outstanding.
    Rejected,
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Rendered)
    }
}

struct Inner {
    view: ViewModel,
    state: SubmissionState,
    last_analysis: Option<AnalysisView>,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ends a submission however it ends.
///
/// A submission dropped while still `Submitting` (timeout, `select!`, aborted
/// task) gets its submit control restored and returns to `Idle`. The in-flight
/// flag is released last.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    inner: &'a Mutex<Inner>,
    submit_label: &'a str,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        {
            let mut inner = lock(self.inner);
            if inner.state == SubmissionState::Submitting {
                warn!("Submission dropped before completion; restoring submit control");
                inner.view.end_busy(self.submit_label);
                inner.state = SubmissionState::Idle;
            }
        }
        self.flag.store(false, Ordering::Release);
    }
}

/// Owns the view model and dispatches submissions through a transport.
pub struct SubmissionController<T> {
    transport: T,
    submit_label: String,
    busy_label: String,
    inner: Mutex<Inner>,
    in_flight: AtomicBool,
}

impl<T: AnalysisTransport> SubmissionController<T> {
    /// The view's current submit label becomes the label restored after
    /// every submission.
    pub fn new(transport: T, view: ViewModel, busy_label: impl Into<String>) -> Self {
        Self {
            transport,
            submit_label: view.submit.label.clone(),
            busy_label: busy_label.into(),
            inner: Mutex::new(Inner {
                view,
                state: SubmissionState::Idle,
                last_analysis: None,
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Build the view model from configuration with the default method set.
    pub fn from_config(transport: T, config: &ThinklensConfig) -> Self {
        let mut form = FormState::default();
        form.max_text_chars = config.limits.max_text_chars;
        let view = ViewModel::new(config.page.ids.clone(), form, config.page.submit_label.clone());
        Self::new(transport, view, config.page.busy_label.clone())
    }

    /// Mutate the form controls.
    pub fn with_form<R>(&self, f: impl FnOnce(&mut FormState) -> R) -> R {
        f(&mut lock(&self.inner).view.form)
    }

    /// A copy of the current view model.
    pub fn snapshot(&self) -> ViewModel {
        lock(&self.inner).view.clone()
    }

    pub fn state(&self) -> SubmissionState {
        lock(&self.inner).state
    }

    /// Normalized form of the most recent response body.
    pub fn last_analysis(&self) -> Option<AnalysisView> {
        lock(&self.inner).last_analysis.clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Clear button.
    pub fn clear(&self) {
        lock(&self.inner).view.clear();
    }

    /// Run one submission to completion.
    pub async fn submit(&self) -> SubmitOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Submission rejected: a request is already in flight");
            return SubmitOutcome::Rejected;
        }
        let _in_flight = InFlight {
            flag: &self.in_flight,
            inner: &self.inner,
            submit_label: &self.submit_label,
        };

        let request = {
            let mut inner = lock(&self.inner);
            let request = match inner.view.form.collect() {
                Ok(request) => request,
                Err(e) => {
                    debug!(error = %e, "Form validation failed");
                    inner.view.alert(e.to_string());
                    return SubmitOutcome::Invalid(e);
                }
            };
            inner.view.begin_busy(&self.busy_label);
            inner.state = SubmissionState::Submitting;
            request
        };

        let token = Uuid::new_v4();
        let span = info_span!("submission", %token, methods = ?request.methods);
        let started = Instant::now();
        let result = self.transport.analyze(&request).instrument(span).await;
        let elapsed_ms = started.elapsed().as_millis();

        let mut inner = lock(&self.inner);
        inner.view.end_busy(&self.submit_label);

        let outcome = match result {
            Ok(body) => {
                inner.view.processing_time_ms = Some(elapsed_ms);
                let analysis = normalize(&body);
                let outcome = match &analysis.error {
                    Some(message) => {
                        inner.view.alert(message.clone());
                        SubmitOutcome::ServerReported {
                            message: message.clone(),
                        }
                    }
                    None => {
                        inner.view.apply(render_regions(&analysis));
                        SubmitOutcome::Rendered
                    }
                };
                inner.last_analysis = Some(analysis);
                outcome
            }
            Err(e) => {
                inner.view.alert(failure_alert(&e));
                SubmitOutcome::Failed {
                    message: e.to_string(),
                    status: e.status(),
                }
            }
        };

        inner.state = if outcome.is_success() {
            SubmissionState::Rendered
        } else {
            SubmissionState::ErrorShown
        };
        info!(%token, elapsed_ms, state = ?inner.state, "Submission finished");
        outcome
    }
}

fn failure_alert(error: &TransportError) -> String {
    match error {
        TransportError::Server {
            message,
            details: Some(details),
            ..
        } => format!("{FAILURE_ALERT_PREFIX}{message} ({details})"),
        other => format!("{FAILURE_ALERT_PREFIX}{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::GENERIC_FAILURE;
    use crate::types::AnalysisRequest;
    use crate::view::ElementIds;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Replays queued results and records every request.
    #[derive(Default)]
    struct MockTransport {
        responses: Mutex<Vec<Result<Value, TransportError>>>,
        requests: Mutex<Vec<AnalysisRequest>>,
    }

    impl MockTransport {
        fn with(response: Result<Value, TransportError>) -> Self {
            let mock = Self::default();
            mock.responses.lock().unwrap().push(response);
            mock
        }
    }

    #[async_trait]
    impl AnalysisTransport for MockTransport {
        async fn analyze(&self, request: &AnalysisRequest) -> Result<Value, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(json!({}))
            } else {
                responses.remove(0)
            }
        }
    }

    #[async_trait]
    impl AnalysisTransport for Arc<MockTransport> {
        async fn analyze(&self, request: &AnalysisRequest) -> Result<Value, TransportError> {
            self.as_ref().analyze(request).await
        }
    }

    /// Holds the request open until released.
    struct GatedTransport {
        entered: Arc<Notify>,
        release: Arc<Notify>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AnalysisTransport for GatedTransport {
        async fn analyze(&self, _request: &AnalysisRequest) -> Result<Value, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            self.release.notified().await;
            Ok(json!({"concepts": ["a"]}))
        }
    }

    /// Stalls the first request long enough for a caller timeout to fire.
    #[derive(Default)]
    struct StallOnceTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AnalysisTransport for StallOnceTransport {
        async fn analyze(&self, _request: &AnalysisRequest) -> Result<Value, TransportError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            Ok(json!({"concepts": ["late"]}))
        }
    }

    fn controller<T: AnalysisTransport>(transport: T) -> SubmissionController<T> {
        let view = ViewModel::new(ElementIds::default(), FormState::default(), "Analyze");
        SubmissionController::new(transport, view, "Analyzing...")
    }

    #[tokio::test]
    async fn test_validation_blocks_request() {
        let mock = Arc::new(MockTransport::default());
        let c = controller(mock.clone());
        c.with_form(|f| f.set_all(true));

        let outcome = c.submit().await;
        assert_eq!(outcome, SubmitOutcome::Invalid(ValidationError::EmptyText));
        assert!(mock.requests.lock().unwrap().is_empty());
        let view = c.snapshot();
        assert_eq!(view.last_alert(), Some("Please enter text to analyze"));
        assert!(view.submit.enabled);
        assert_eq!(c.state(), SubmissionState::Idle);
        assert!(!c.is_in_flight());
    }

    #[tokio::test]
    async fn test_no_method_blocks_request() {
        let mock = Arc::new(MockTransport::default());
        let c = controller(mock.clone());
        c.with_form(|f| f.set_text("some text"));

        assert_eq!(
            c.submit().await,
            SubmitOutcome::Invalid(ValidationError::NoMethodSelected)
        );
        assert!(mock.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_success_renders_regions_and_sends_body() {
        let mock = Arc::new(MockTransport::with(Ok(json!({
            "concepts": ["energy", "light"],
            "context": "science",
            "methods": {"socratic": {"conceptual": ["Why?"]}}
        }))));
        let c = controller(mock.clone());
        c.with_form(|f| {
            f.set_text("Plants use light.");
            f.set_method("socratic", true);
            f.set_use_ai(true);
        });

        assert_eq!(c.submit().await, SubmitOutcome::Rendered);

        let sent = mock.requests.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0],
            AnalysisRequest {
                text: "Plants use light.".into(),
                methods: vec!["socratic".into()],
                use_ai: true,
            }
        );

        let view = c.snapshot();
        assert!(view.results_visible);
        assert!(!view.loading_visible);
        assert!(view.submit.enabled);
        assert_eq!(view.submit.label, "Analyze");
        assert!(view.processing_time_ms.is_some());
        assert_eq!(view.regions.concepts.matches("concept-badge").count(), 2);
        assert_eq!(view.regions.context, "science");
        assert!(view.regions.socratic.contains("<h5>Conceptual Questions</h5>"));
        assert!(view.alerts.is_empty());
        assert_eq!(c.state(), SubmissionState::Rendered);
        let analysis = c.last_analysis().unwrap();
        assert_eq!(analysis.concepts, vec!["energy", "light"]);
    }

    #[tokio::test]
    async fn test_server_error_surfaces_message_and_restores_submit() {
        let mock = MockTransport::with(Err(TransportError::Server {
            status: 400,
            message: "bad input".into(),
            details: None,
        }));
        let c = controller(mock);
        c.with_form(|f| {
            f.set_text("x");
            f.set_all(true);
        });

        let outcome = c.submit().await;
        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                message: "bad input".into(),
                status: Some(400)
            }
        );
        let view = c.snapshot();
        assert_eq!(
            view.last_alert(),
            Some("An error occurred while analyzing text: bad input")
        );
        assert!(view.submit.enabled);
        assert_eq!(view.submit.label, "Analyze");
        assert!(!view.results_visible);
        assert_eq!(c.state(), SubmissionState::ErrorShown);
    }

    #[tokio::test]
    async fn test_error_field_in_success_body() {
        let mock = MockTransport::with(Ok(json!({"error": "quota exceeded"})));
        let c = controller(mock);
        c.with_form(|f| {
            f.set_text("x");
            f.set_all(true);
        });

        assert_eq!(
            c.submit().await,
            SubmitOutcome::ServerReported {
                message: "quota exceeded".into()
            }
        );
        let view = c.snapshot();
        assert_eq!(view.last_alert(), Some("quota exceeded"));
        assert!(!view.results_visible);
        assert!(view.regions.concepts.is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_generic_alert() {
        let mock = MockTransport::with(Err(TransportError::Network {
            message: "connection refused".into(),
        }));
        let c = controller(mock);
        c.with_form(|f| {
            f.set_text("x");
            f.set_all(true);
        });

        let outcome = c.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Failed { status: None, .. }));
        let view = c.snapshot();
        let alert = view.last_alert().unwrap();
        assert!(alert.starts_with(FAILURE_ALERT_PREFIX));
        assert!(alert.contains("connection refused"));
        assert!(view.submit.enabled);
    }

    #[tokio::test]
    async fn test_details_appended_to_alert() {
        let mock = MockTransport::with(Err(TransportError::Server {
            status: 503,
            message: GENERIC_FAILURE.into(),
            details: Some("check the API key".into()),
        }));
        let c = controller(mock);
        c.with_form(|f| {
            f.set_text("x");
            f.set_all(true);
        });
        c.submit().await;
        assert_eq!(
            c.snapshot().last_alert(),
            Some("An error occurred while analyzing text: Analysis failed (check the API key)")
        );
    }

    #[tokio::test]
    async fn test_submit_disabled_while_outstanding_and_second_rejected() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let c = Arc::new(controller(GatedTransport {
            entered: entered.clone(),
            release: release.clone(),
            calls: AtomicUsize::new(0),
        }));
        c.with_form(|f| {
            f.set_text("x");
            f.set_all(true);
        });

        let first = {
            let c = c.clone();
            tokio::spawn(async move { c.submit().await })
        };
        entered.notified().await;

        let during = c.snapshot();
        assert!(!during.submit.enabled);
        assert!(during.submit.busy);
        assert_eq!(during.submit.label, "Analyzing...");
        assert!(during.loading_visible);
        assert_eq!(c.state(), SubmissionState::Submitting);
        assert!(c.is_in_flight());

        assert_eq!(c.submit().await, SubmitOutcome::Rejected);

        release.notify_one();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Rendered);

        let after = c.snapshot();
        assert!(after.submit.enabled);
        assert_eq!(after.submit.label, "Analyze");
        assert!(!c.is_in_flight());
        assert_eq!(c.transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dropped_submission_restores_submit_control() {
        let c = controller(StallOnceTransport::default());
        c.with_form(|f| {
            f.set_text("x");
            f.set_all(true);
        });

        let timed_out = tokio::time::timeout(Duration::from_millis(20), c.submit()).await;
        assert!(timed_out.is_err());

        let view = c.snapshot();
        assert!(view.submit.enabled);
        assert!(!view.submit.busy);
        assert_eq!(view.submit.label, "Analyze");
        assert!(!view.loading_visible);
        assert_eq!(c.state(), SubmissionState::Idle);
        assert!(!c.is_in_flight());

        assert_eq!(c.submit().await, SubmitOutcome::Rendered);
        let view = c.snapshot();
        assert_eq!(view.submit.label, "Analyze");
        assert!(view.results_visible);
        assert_eq!(c.transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_resubmit_after_error() {
        let mock = Arc::new(MockTransport::default());
        mock.responses.lock().unwrap().push(Err(TransportError::Parse {
            message: "expected value".into(),
        }));
        mock.responses
            .lock()
            .unwrap()
            .push(Ok(json!({"concepts": ["again"]})));
        let c = controller(mock.clone());
        c.with_form(|f| {
            f.set_text("x");
            f.set_all(true);
        });

        assert!(matches!(c.submit().await, SubmitOutcome::Failed { .. }));
        assert!(c.state().is_ready());
        assert_eq!(c.submit().await, SubmitOutcome::Rendered);
        assert_eq!(mock.requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_hides_results() {
        let c = controller(MockTransport::with(Ok(json!({"concepts": ["a"]}))));
        c.with_form(|f| {
            f.set_text("x");
            f.set_all(true);
        });
        c.submit().await;
        c.clear();
        let view = c.snapshot();
        assert!(view.form.text.is_empty());
        assert!(!view.results_visible);
    }

    #[test]
    fn test_from_config_applies_limits_and_labels() {
        let mut config = ThinklensConfig::default();
        config.limits.max_text_chars = 7;
        config.page.submit_label = "Go".into();
        let c = SubmissionController::from_config(MockTransport::default(), &config);
        let view = c.snapshot();
        assert_eq!(view.form.max_text_chars, 7);
        assert_eq!(view.submit.label, "Go");
        assert_eq!(c.busy_label, "Analyzing...");
    }
}
