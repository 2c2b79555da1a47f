// src/handlers/submissions.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    grading::grade_exam,
    handlers::exams::{fetch_exam, fetch_questions},
    models::submission::{
        ExamSubmission, SetAllowRetryRequest, SubmissionResult, SubmitExamRequest,
    },
};

/// Accepts a finished attempt: grades it against the exam's current
/// question set and stores the result with `allow_retry = false`.
///
/// Submissions are not deduplicated; a user may submit repeatedly and
/// "the result" is the most recent row by creation time.
pub async fn submit_exam(
    State(pool): State<PgPool>,
    Json(payload): Json<SubmitExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let exam = fetch_exam(&pool, payload.exam_id)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    let questions = fetch_questions(&pool, exam.id).await?;

    // Graded once, against the question set as it exists right now.
    // Scores are never recomputed when questions are edited later.
    let report = grade_exam(&questions, &payload.answers, exam.pass_threshold);

    let submission = sqlx::query_as::<_, ExamSubmission>(
        r#"
        INSERT INTO exam_submissions (exam_id, user_id, answers, score, duration_seconds)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, exam_id, user_id, answers, score, duration_seconds, allow_retry, created_at
        "#,
    )
    .bind(exam.id)
    .bind(&payload.user_id)
    .bind(sqlx::types::Json(&payload.answers))
    .bind(report.score)
    .bind(payload.duration_seconds)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to store submission: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResult {
            submission,
            outcomes: report.outcomes,
            total_questions: report.total_questions,
            percent: report.percent,
            passed: report.passed,
        }),
    ))
}

/// Query parameters identifying one (exam, user) pair.
#[derive(Debug, Deserialize)]
pub struct ResultParams {
    pub exam_id: i64,
    pub user_id: String,
}

/// Returns the user's result for an exam: the most recent submission.
pub async fn latest_result(
    State(pool): State<PgPool>,
    Query(params): Query<ResultParams>,
) -> Result<impl IntoResponse, AppError> {
    let submission = sqlx::query_as::<_, ExamSubmission>(
        r#"
        SELECT id, exam_id, user_id, answers, score, duration_seconds, allow_retry, created_at
        FROM exam_submissions
        WHERE exam_id = $1 AND user_id = $2
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(params.exam_id)
    .bind(&params.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound(
        "No submission for this exam and user".to_string(),
    ))?;

    Ok(Json(submission))
}

/// Reviewer action: grants or revokes retry authorization on a single
/// submission. Idempotent. Not cross-checked against violation status;
/// retry authorization and violation review are independent.
pub async fn set_allow_retry(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<SetAllowRetryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let submission = sqlx::query_as::<_, ExamSubmission>(
        r#"
        UPDATE exam_submissions SET allow_retry = $1 WHERE id = $2
        RETURNING id, exam_id, user_id, answers, score, duration_seconds, allow_retry, created_at
        "#,
    )
    .bind(payload.allow_retry)
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Submission not found".to_string()))?;

    Ok(Json(submission))
}
