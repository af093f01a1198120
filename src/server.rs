//! HTTP surface: status, liveness, and recommend routes over a shared model.

use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::artifacts::{ArtifactBundle, ArtifactError};
use crate::recommend::{CandidateProfile, Recommendation, Recommender};

/// Status label reported by `GET /`.
pub const STATUS_LABEL: &str = "jobmatch recommend api";
/// Payload returned by `POST /recommend` while no model is loaded.
pub const MODEL_NOT_READY: &str = "Model not prepared. Run model_builder.";

/// Immutable per-process context handed to every handler.
#[derive(Clone)]
pub struct AppState {
    model: Option<Arc<Recommender>>,
    top_k: usize,
}

impl AppState {
    /// State backed by an already-loaded bundle. `top_k` is raised to at least one.
    pub fn ready(bundle: ArtifactBundle, top_k: usize) -> Self {
        Self {
            model: Some(Arc::new(Recommender::new(bundle))),
            top_k: top_k.max(1),
        }
    }

    /// State with no model; every recommend call reports the not-ready payload.
    pub fn unready(top_k: usize) -> Self {
        Self {
            model: None,
            top_k: top_k.max(1),
        }
    }

    /// Attempts the one-time load from `dir`; failures leave the state unready.
    pub fn load(dir: &Path, top_k: usize) -> Self {
        match ArtifactBundle::load(dir) {
            Ok(bundle) => {
                info!(
                    dir = %dir.display(),
                    jobs = bundle.jobs().len(),
                    vocabulary = bundle.vectorizer().vocabulary_len(),
                    "model loaded"
                );
                Self::ready(bundle, top_k)
            }
            Err(err @ ArtifactError::Missing(_)) => {
                warn!("{err}; serving without a model");
                Self::unready(top_k)
            }
            Err(err) => {
                warn!("model load failed ({err}); serving without a model");
                Self::unready(top_k)
            }
        }
    }

    /// Whether a model is loaded.
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }
}

/// Response for `GET /`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusBody {
    /// Service label.
    pub status: String,
    /// Whether a model is loaded.
    pub has_model: bool,
}

/// Response for `POST /recommend`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecommendBody {
    /// Ranked matches.
    Ranked {
        /// Top matches, best first.
        recommendations: Vec<Recommendation>,
    },
    /// No model is loaded.
    NotReady {
        /// Explanation for the caller.
        error: String,
    },
}

/// Body of 4xx responses raised by request validation.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub message: String,
}

/// Builds the router for `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/healthz", get(healthz))
        .route("/recommend", post(recommend))
        .with_state(state)
}

async fn status(State(state): State<AppState>) -> Json<StatusBody> {
    Json(StatusBody {
        status: STATUS_LABEL.to_string(),
        has_model: state.has_model(),
    })
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn recommend(
    State(state): State<AppState>,
    Json(profile): Json<CandidateProfile>,
) -> Result<Json<RecommendBody>, (StatusCode, Json<ErrorBody>)> {
    if profile.experience_years < 0 {
        return Err(bad_request("experience_years must not be negative"));
    }
    let Some(model) = &state.model else {
        return Ok(Json(RecommendBody::NotReady {
            error: MODEL_NOT_READY.to_string(),
        }));
    };
    let recommendations = model.recommend(&profile, state.top_k);
    debug!(
        returned = recommendations.len(),
        top_score = recommendations.first().map(|r| r.score).unwrap_or(0.0),
        "recommend request served"
    );
    Ok(Json(RecommendBody::Ranked { recommendations }))
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            message: message.into(),
        }),
    )
}
