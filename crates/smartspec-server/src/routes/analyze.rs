//! CAD analysis endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use smartspec_geometry::AnalysisReport;
use tracing::error;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for `POST /analyze-cad`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Identifier of the stored upload.
    pub cad_upload_id: String,
}

/// Response for a successful analysis.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Always `true`; failures use the error body instead.
    pub success: bool,
    /// The extracted estimate.
    pub analysis: AnalysisReport,
}

/// Query string of `GET /analyses`.
#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    /// Identifier of the analysed upload.
    pub cad_upload_id: String,
}

/// Analyse a stored upload.
/// POST /analyze-cad
pub async fn analyze_cad(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let Json(request) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let analysis = state
        .service
        .analyze(&request.cad_upload_id)
        .await
        .map_err(|err| {
            error!(upload_id = %request.cad_upload_id, error = %err, "CAD analysis failed");
            ApiError::from(err)
        })?;

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
    }))
}

/// Fetch the recorded analysis of an upload.
/// GET /analyses?cad_upload_id=...
pub async fn get_analysis(
    State(state): State<AppState>,
    query: Result<Query<AnalysisQuery>, QueryRejection>,
) -> ApiResult<Json<AnalysisReport>> {
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    state
        .service
        .stored(&query.cad_upload_id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::not_found(format!("No analysis for upload {}", query.cad_upload_id))
        })
}
