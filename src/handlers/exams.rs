// src/handlers/exams.rs

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
    models::{
        exam::{CreateExamRequest, Exam, ExamSummary, PaperResponse},
        question::Question,
    },
    utils::html::clean_html,
};

pub(crate) async fn fetch_exam(pool: &PgPool, id: i64) -> Result<Option<Exam>, AppError> {
    let exam = sqlx::query_as::<_, Exam>(
        r#"
        SELECT id, title, subject_id, duration_minutes, pass_threshold, published, created_at
        FROM exams
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(exam)
}

pub(crate) async fn fetch_questions(pool: &PgPool, exam_id: i64) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, exam_id, question_key, position, type, content, options, correct, acceptable
        FROM questions
        WHERE exam_id = $1
        ORDER BY position
        "#,
    )
    .bind(exam_id)
    .fetch_all(pool)
    .await?;

    Ok(questions)
}

/// Creates an exam together with its full question set, in one
/// transaction. Validation failures persist nothing.
pub async fn create_exam(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let mut tx = pool.begin().await?;

    let exam = sqlx::query_as::<_, Exam>(
        r#"
        INSERT INTO exams (title, subject_id, duration_minutes, pass_threshold, published)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, title, subject_id, duration_minutes, pass_threshold, published, created_at
        "#,
    )
    .bind(clean_html(&payload.title))
    .bind(&payload.subject_id)
    .bind(payload.duration_minutes)
    .bind(payload.pass_threshold)
    .bind(payload.published)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create exam: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    for (position, q) in payload.questions.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO questions
            (exam_id, question_key, position, type, content, options, correct, acceptable)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(exam.id)
        .bind(&q.key)
        .bind(position as i64)
        .bind(&q.question_type)
        .bind(clean_html(&q.text))
        .bind(q.options.clone().map(sqlx::types::Json))
        .bind(q.correct.as_ref().map(|c| c.as_text().into_owned()))
        .bind(q.acceptable.clone().map(sqlx::types::Json))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create question '{}': {:?}", q.key, e);
            AppError::InternalServerError(e.to_string())
        })?;
    }

    tx.commit().await?;

    let questions = fetch_questions(&pool, exam.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "exam": exam, "questions": questions })),
    ))
}

/// Query parameters for listing exams.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Filter by published flag; absent means all exams.
    pub published: Option<bool>,
}

/// Lists exam summaries, oldest first.
pub async fn list_exams(
    State(pool): State<PgPool>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let exams = sqlx::query_as::<_, ExamSummary>(
        r#"
        SELECT e.id, e.title, e.duration_minutes, e.published, COUNT(q.id) AS question_count
        FROM exams e
        LEFT JOIN questions q ON q.exam_id = e.id
        WHERE ($1::BOOLEAN IS NULL OR e.published = $1)
        GROUP BY e.id, e.title, e.duration_minutes, e.published
        ORDER BY e.id
        "#,
    )
    .bind(params.published)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list exams: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(exams))
}

/// Delivers the exam paper to a test taker: questions in display order,
/// answer key fields stripped.
pub async fn get_paper(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let exam = fetch_exam(&pool, id)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    let questions = fetch_questions(&pool, exam.id).await?;

    let paper = PaperResponse {
        id: exam.id,
        title: exam.title,
        subject_id: exam.subject_id,
        duration_minutes: exam.duration_minutes,
        questions: questions.iter().map(Question::public).collect(),
    };

    Ok(Json(paper))
}

/// DTO for flipping the published flag.
#[derive(Debug, Deserialize)]
pub struct SetPublishedRequest {
    pub published: bool,
}

/// Publishes or unpublishes an exam. A pure flag flip: existing entries
/// and submissions are untouched.
pub async fn set_published(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<SetPublishedRequest>,
) -> Result<impl IntoResponse, AppError> {
    let exam = sqlx::query_as::<_, Exam>(
        r#"
        UPDATE exams SET published = $1 WHERE id = $2
        RETURNING id, title, subject_id, duration_minutes, pass_threshold, published, created_at
        "#,
    )
    .bind(payload.published)
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    Ok(Json(exam))
}
