// src/api.rs
//! HTTP shell around the inference context.
//!
//! Empty input is rejected here (400) before the core is called.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

use crate::engine::{Analysis, InferenceContext};
use crate::error::AnalyzerError;
use crate::feedback::{save_feedback, DynFeedbackSink, FeedbackRecord};
use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<InferenceContext>,
    pub feedback: DynFeedbackSink,
}

impl AppState {
    pub fn new(ctx: Arc<InferenceContext>, feedback: DynFeedbackSink) -> Self {
        Self { ctx, feedback }
    }
}

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/analyze", post(analyze))
        .route("/feedback", post(feedback))
        .route("/labels", get(labels));

    match Metrics::install() {
        Ok(m) => app = app.merge(m.router::<AppState>()),
        Err(e) => warn!(error = %e, "metrics disabled"),
    }

    app.layer(CorsLayer::very_permissive()).with_state(state)
}

pub struct ApiError(AnalyzerError);

impl From<AnalyzerError> for ApiError {
    fn from(e: AnalyzerError) -> Self {
        Self(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AnalyzerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AnalyzerError::FeedbackSink(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

#[derive(Deserialize)]
struct AnalyzeReq {
    text: String,
}

async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeReq>,
) -> Result<Json<Analysis>, ApiError> {
    if body.text.trim().is_empty() {
        counter!("analyze_rejected_total").increment(1);
        return Err(AnalyzerError::InvalidInput("text must not be empty".to_string()).into());
    }
    counter!("analyze_requests_total").increment(1);
    let out = state.ctx.analyze(&body.text)?;
    Ok(Json(out))
}

#[derive(Deserialize)]
struct FeedbackReq {
    text: String,
    predicted: String,
    #[serde(default)]
    actual: Option<String>,
    correct: bool,
}

#[derive(Serialize)]
struct FeedbackResp {
    stored: bool,
    message: &'static str,
}

/// Confirmations are acknowledged without being stored. Corrections are
/// saved before answering; a sink failure still answers 202 with
/// `stored: false` and a warning.
async fn feedback(
    State(state): State<AppState>,
    Json(body): Json<FeedbackReq>,
) -> Result<(StatusCode, Json<FeedbackResp>), ApiError> {
    if body.text.trim().is_empty() || body.predicted.trim().is_empty() {
        return Err(AnalyzerError::InvalidInput("text and predicted are required".to_string()).into());
    }
    if body.correct {
        return Ok((
            StatusCode::ACCEPTED,
            Json(FeedbackResp {
                stored: false,
                message: "Thanks for confirming the prediction.",
            }),
        ));
    }

    let actual = body
        .actual
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| AnalyzerError::InvalidInput("actual is required for a correction".to_string()))?;

    let record = FeedbackRecord::new(&body.text, &body.predicted, actual);
    let resp = match save_feedback(state.feedback.as_ref(), &record).await {
        Ok(()) => FeedbackResp {
            stored: true,
            message: "Thanks for the feedback!",
        },
        Err(e) => {
            warn!(error = %e, "feedback not saved");
            FeedbackResp {
                stored: false,
                message: "Feedback could not be saved right now; your result is unaffected.",
            }
        }
    };
    Ok((StatusCode::ACCEPTED, Json(resp)))
}

#[derive(Serialize)]
struct LabelsResp {
    labels: Vec<String>,
    choices: Vec<String>,
}

async fn labels(State(state): State<AppState>) -> Json<LabelsResp> {
    Json(LabelsResp {
        labels: state.ctx.labels().iter().map(str::to_string).collect(),
        choices: state.ctx.correction_choices(),
    })
}
