//! Axum route handlers for the Analysis API.

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::extract::{extract_text, DocumentType};
use crate::analysis::roles::RoleDefinition;
use crate::analysis::scoring::{
    score_resume, ScoreResult, ScoreTier, ScoreWarning, IMPROVEMENT_TIPS,
};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScoreTextRequest {
    pub resume_text: Option<String>,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub role: &'static str,
    pub role_description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    #[serde(flatten)]
    pub result: ScoreResult,
    pub tier: ScoreTier,
    pub interpretation: &'static str,
    pub warnings: Vec<ScoreWarning>,
    pub tips: &'static [&'static str],
}

/// An uploaded resume as pulled out of the multipart body.
struct Upload {
    bytes: Bytes,
    content_type: String,
    file_name: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/roles
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<&'static [RoleDefinition]> {
    Json(state.catalog.roles())
}

/// GET /api/v1/roles/:id
pub async fn handle_get_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<&'static RoleDefinition>, AppError> {
    Ok(Json(state.catalog.find(&id)?))
}

/// POST /api/v1/analyze
///
/// Multipart body: a `file` part carrying its declared content type, and a
/// `role` text part. Extraction failures abort the request; no score is produced.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut upload = None;
    let mut role_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::from_multipart("Malformed multipart body", e))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let file_name = field.file_name().map(String::from);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::from_multipart("Failed to read upload", e))?;
                upload = Some(Upload {
                    bytes,
                    content_type,
                    file_name,
                });
            }
            Some("role") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::from_multipart("Failed to read role", e))?;
                role_id = Some(text.trim().to_string());
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| AppError::Validation("file part is required".to_string()))?;
    let role_id = role_id.ok_or_else(|| AppError::Validation("role part is required".to_string()))?;
    let role = state.catalog.find(&role_id)?;

    info!(
        file = upload.file_name.as_deref().unwrap_or("<unnamed>"),
        content_type = %upload.content_type,
        size = upload.bytes.len(),
        "Extracting resume text"
    );

    let Upload {
        bytes,
        content_type,
        ..
    } = upload;
    let document = tokio::task::spawn_blocking(move || extract_text(&bytes, &content_type))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    Ok(Json(build_response(
        role,
        Some(document.document_type),
        Some(&document.text),
    )))
}

/// POST /api/v1/score
///
/// Scores already-extracted text. A missing or blank `resume_text` yields the
/// zero score with every keyword missing.
pub async fn handle_score_text(
    State(state): State<AppState>,
    payload: Result<Json<ScoreTextRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let Json(request) = payload?;
    let role = state.catalog.find(&request.role)?;
    Ok(Json(build_response(
        role,
        None,
        request.resume_text.as_deref(),
    )))
}

fn build_response(
    role: &'static RoleDefinition,
    document_type: Option<DocumentType>,
    resume_text: Option<&str>,
) -> AnalysisResponse {
    let analysis_id = Uuid::new_v4();
    let report = score_resume(resume_text, role);
    let tier = ScoreTier::classify(report.result.final_score);

    info!(
        %analysis_id,
        role = role.id,
        final_score = report.result.final_score,
        found = report.result.found_keywords.len(),
        missing = report.result.missing_keywords.len(),
        degraded = !report.warnings.is_empty(),
        "Resume scored"
    );

    AnalysisResponse {
        analysis_id,
        analyzed_at: Utc::now(),
        role: role.id,
        role_description: role.description,
        document_type,
        result: report.result,
        tier,
        interpretation: tier.interpretation(),
        warnings: report.warnings,
        tips: IMPROVEMENT_TIPS,
    }
}
