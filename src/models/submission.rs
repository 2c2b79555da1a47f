// src/models/submission.rs

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use crate::grading::Outcome;
use crate::models::question::AnswerValue;

/// Represents the 'exam_submissions' table: the graded result of one
/// completed attempt. Immutable after insert except for `allow_retry`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ExamSubmission {
    pub id: i64,
    pub exam_id: i64,
    pub user_id: String,

    /// Raw submitted answers keyed by question key. The question set is
    /// not snapshotted; the score reflects the questions as they were at
    /// submission time and is never recomputed.
    pub answers: Json<HashMap<String, AnswerValue>>,

    pub score: i64,
    pub duration_seconds: i64,

    /// Reviewer-controlled retry authorization. Independent of whether a
    /// violation was detected.
    pub allow_retry: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for submitting a finished attempt.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitExamRequest {
    pub exam_id: i64,

    #[validate(length(min = 1, message = "user_id must not be empty."))]
    pub user_id: String,

    /// Question key -> submitted answer. Keys missing here grade as
    /// unanswered.
    pub answers: HashMap<String, AnswerValue>,

    #[validate(range(min = 0, message = "Duration cannot be negative."))]
    pub duration_seconds: i64,
}

/// DTO for the reviewer's retry decision.
#[derive(Debug, Deserialize)]
pub struct SetAllowRetryRequest {
    pub allow_retry: bool,
}

/// Response for a freshly graded submission. `percent` and `passed` are
/// null when indeterminate (empty question set / unset threshold).
#[derive(Debug, Serialize)]
pub struct SubmissionResult {
    pub submission: ExamSubmission,
    pub outcomes: BTreeMap<String, Outcome>,
    pub total_questions: i64,
    pub percent: Option<i64>,
    pub passed: Option<bool>,
}
