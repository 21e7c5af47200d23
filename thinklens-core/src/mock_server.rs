//! Development mock of the analysis service.
//!
//! Serves `POST /api/analyze` and `GET /health` with canned content so the
//! client can be exercised without a real analysis engine. Responses carry
//! word statistics computed from the submitted text and a `methods` map with
//! one entry per requested thinking method.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::LazyLock;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::config::MockServerConfig;
use crate::form::DEFAULT_MAX_TEXT_CHARS;
use crate::types::{ALL_METHODS, ThinkingMethod};

const QUESTIONS: [&str; 5] = [
    "What are the key principles discussed in this text?",
    "How do these concepts relate to each other?",
    "What evidence supports the main argument?",
    "What are potential counterarguments to these ideas?",
    "How could these concepts be applied in a different context?",
];

const EXPLANATIONS: [&str; 3] = [
    "Basic explanation: This text explores fundamental concepts in the field.",
    "Intermediate explanation: The ideas presented connect theory with practice.",
    "Advanced explanation: The nuanced relationships between concepts reveal deeper patterns.",
];

const MAX_CONCEPTS: usize = 5;

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "about",
        "actually",
        "after",
        "again",
        "basically",
        "because",
        "before",
        "being",
        "between",
        "could",
        "during",
        "every",
        "generally",
        "literally",
        "other",
        "really",
        "should",
        "their",
        "there",
        "these",
        "those",
        "through",
        "under",
        "where",
        "which",
        "while",
        "would",
    ]
    .into_iter()
    .collect()
});

/// Shared state of the mock service.
#[derive(Debug, Clone)]
pub struct MockState {
    pub max_text_chars: usize,
    started: Instant,
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TEXT_CHARS)
    }
}

impl MockState {
    pub fn new(max_text_chars: usize) -> Self {
        Self {
            max_text_chars,
            started: Instant::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeBody {
    #[serde(default)]
    text: String,
    #[serde(default = "default_methods")]
    methods: Vec<String>,
    #[serde(default)]
    use_ai: bool,
}

fn default_methods() -> Vec<String> {
    vec![ALL_METHODS.to_string()]
}

/// Build the router with `/api/analyze` and `/health`.
pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

fn error_response(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}

async fn analyze_handler(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("application/json"));
    if !is_json {
        return error_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Content-Type must be application/json",
        );
    }

    let request: AnalyzeBody = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            debug!(error = %e, "Rejected malformed analyze body");
            return error_response(StatusCode::BAD_REQUEST, "Invalid JSON body");
        }
    };

    let text = request.text.trim();
    if text.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Text content is required");
    }
    if text.chars().count() > state.max_text_chars {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!(
                "Text exceeds maximum size of {} characters",
                state.max_text_chars
            ),
        );
    }

    info!(
        text_len = text.len(),
        methods = ?request.methods,
        use_ai = request.use_ai,
        "Mock analysis"
    );
    (StatusCode::OK, Json(analyze_text(text, &request.methods)))
}

async fn health_handler(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.started.elapsed().as_secs(),
    }))
}

/// Build a canned analysis for `text` covering the requested methods.
pub fn analyze_text(text: &str, methods: &[String]) -> Value {
    let words = tokenize(text);
    let unique: HashSet<&str> = words.iter().map(String::as_str).collect();
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count()
        .max(1);
    let concepts = key_concepts(&words);

    let mut method_map = Map::new();
    for method in ThinkingMethod::ALL {
        if methods.iter().any(|m| m == ALL_METHODS || m == method.value()) {
            method_map.insert(method.value().to_string(), method_payload(method, &concepts));
        }
    }

    json!({
        "concepts": concepts,
        "context": context_for(sentences, words.len()),
        "complexity": {
            "total_words": words.len(),
            "unique_words": unique.len(),
            "avg_sentence_length": words.len() as f64 / sentences as f64,
        },
        "methods": method_map,
    })
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Longer non-stopwords in first-seen order.
fn key_concepts(words: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .iter()
        .filter(|w| w.chars().count() >= 5 && !STOPWORDS.contains(w.as_str()))
        .filter(|w| seen.insert(w.as_str()))
        .take(MAX_CONCEPTS)
        .cloned()
        .collect()
}

fn context_for(sentences: usize, words: usize) -> String {
    match words {
        0..=20 => "Short passage".to_string(),
        _ if sentences == 1 => "Single-sentence passage".to_string(),
        _ => format!("Passage of {sentences} sentences"),
    }
}

fn method_payload(method: ThinkingMethod, concepts: &[String]) -> Value {
    let topic = concepts.first().map(String::as_str).unwrap_or("this topic");
    match method {
        ThinkingMethod::Socratic => json!({
            "conceptual": [QUESTIONS[0], QUESTIONS[1]],
            "exploratory": [QUESTIONS[4]],
            "analytical": [QUESTIONS[2], QUESTIONS[3]],
        }),
        ThinkingMethod::MultiLevel => json!({
            "child": [EXPLANATIONS[0]],
            "high_school": [EXPLANATIONS[1]],
            "academic": [EXPLANATIONS[2]],
        }),
        ThinkingMethod::Practice => json!({
            "beginner": [{ "question": format!("What does the text say about {topic}?") }],
            "intermediate": [{ "question": format!("How would you explain {topic} to a classmate?") }],
            "advanced": [{ "question": format!("Where might the argument about {topic} break down?") }],
        }),
    }
}

/// Serve the router on an already bound listener until it is closed.
pub async fn serve(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state)).await
}

/// Bind to the configured address and serve until Ctrl+C.
pub async fn run(config: &MockServerConfig, state: MockState) -> Result<(), std::io::Error> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "Mock analysis service listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down mock analysis service");
        })
        .await
}
