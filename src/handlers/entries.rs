// src/handlers/entries.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::entry::{ExamEntry, RecordEntryRequest, ViolationReport},
};

/// Records the start of an attempt together with anti-cheat telemetry.
///
/// Always appends: no published check, no one-attempt check. Whether the
/// user is allowed to sit the exam at all is the access-gating
/// collaborator's decision, made before this call.
pub async fn record_entry(
    State(pool): State<PgPool>,
    Json(payload): Json<RecordEntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let entry = sqlx::query_as::<_, ExamEntry>(
        r#"
        INSERT INTO exam_entries (exam_id, user_id, battery_level, violation_reason)
        VALUES ($1, $2, $3, $4)
        RETURNING id, exam_id, user_id, battery_level, violation_reason, started_at
        "#,
    )
    .bind(payload.exam_id)
    .bind(&payload.user_id)
    .bind(payload.battery_level)
    .bind(&payload.violation_reason)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to record exam entry: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Query parameters identifying one (exam, user) pair.
#[derive(Debug, Deserialize)]
pub struct CorrelateParams {
    pub exam_id: i64,
    pub user_id: String,
}

/// Correlates admission telemetry for a reviewer. Recomputed on every
/// query so new entries are reflected immediately.
pub async fn violation_report(
    State(pool): State<PgPool>,
    Query(params): Query<CorrelateParams>,
) -> Result<impl IntoResponse, AppError> {
    let entries = sqlx::query_as::<_, ExamEntry>(
        r#"
        SELECT id, exam_id, user_id, battery_level, violation_reason, started_at
        FROM exam_entries
        WHERE exam_id = $1 AND user_id = $2
        ORDER BY id
        "#,
    )
    .bind(params.exam_id)
    .bind(&params.user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(ViolationReport::from_entries(&entries)))
}
