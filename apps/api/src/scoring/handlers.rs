use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::scoring::diagnostics::Warning;
use crate::scoring::engine::{evaluate_raw, AssessmentResult, EvaluationOptions};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / response
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub skills: Value,
    /// Missing and blank stages are both rejected with 400.
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub capabilities: Option<Value>,
    /// Overrides `ALLOW_DEFAULT_PROFILE` for this request.
    #[serde(default)]
    pub allow_defaults: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    pub evaluation_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    pub result: AssessmentResult,
    pub warnings: Vec<Warning>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/assessments/evaluate
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    if req.stage.trim().is_empty() {
        return Err(AppError::Validation("stage must not be empty".to_string()));
    }

    let options = EvaluationOptions {
        allow_defaults: req
            .allow_defaults
            .unwrap_or(state.config.allow_default_profile),
        depth_adjusted_gaps: state.config.depth_adjusted_gaps,
    };

    let evaluation = evaluate_raw(
        &state.benchmarks,
        &req.skills,
        &req.stage,
        req.capabilities.as_ref(),
        options,
    )?;

    let evaluation_id = Uuid::new_v4();
    info!(
        "Evaluation {evaluation_id}: stage {}, score {}, {} warnings",
        evaluation.result.stage,
        evaluation.result.score,
        evaluation.warnings.len()
    );

    Ok(Json(EvaluateResponse {
        evaluation_id,
        evaluated_at: Utc::now(),
        result: evaluation.result,
        warnings: evaluation.warnings,
    }))
}
