// src/models/exam.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::models::question::{PublicQuestion, QuestionInput};

/// Represents the 'exams' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,
    pub title: String,

    /// Optional reference into the course catalog. Opaque to this engine.
    pub subject_id: Option<String>,

    pub duration_minutes: i64,

    /// Integer percent a submission must reach to pass. When unset, pass
    /// status is indeterminate, never false.
    pub pass_threshold: Option<i64>,

    pub published: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Aggregated row for exam listings (question count via join).
#[derive(Debug, Serialize, FromRow)]
pub struct ExamSummary {
    pub id: i64,
    pub title: String,
    pub duration_minutes: i64,
    pub question_count: i64,
    pub published: bool,
}

/// DTO for delivering an exam paper to a test taker. Answer keys stripped.
#[derive(Debug, Serialize)]
pub struct PaperResponse {
    pub id: i64,
    pub title: String,
    pub subject_id: Option<String>,
    pub duration_minutes: i64,
    pub questions: Vec<PublicQuestion>,
}

/// DTO for creating a new exam together with its full question set.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExamRequest {
    #[validate(length(min = 1, max = 200, message = "Title must not be empty."))]
    pub title: String,

    pub subject_id: Option<String>,

    #[validate(range(min = 1, message = "Duration must be at least one minute."))]
    pub duration_minutes: i64,

    #[validate(range(min = 0, max = 100, message = "Pass threshold must be a percentage."))]
    pub pass_threshold: Option<i64>,

    #[serde(default)]
    pub published: bool,

    #[validate(custom(function = validate_questions))]
    pub questions: Vec<QuestionInput>,
}

fn validate_questions(questions: &[QuestionInput]) -> Result<(), validator::ValidationError> {
    if questions.is_empty() {
        return Err(validator::ValidationError::new("questions_cannot_be_empty"));
    }

    let mut seen = std::collections::HashSet::new();
    for q in questions {
        if q.key.trim().is_empty() {
            return Err(validator::ValidationError::new("question_key_cannot_be_empty"));
        }
        if !seen.insert(q.key.as_str()) {
            return Err(validator::ValidationError::new("question_key_duplicated"));
        }
        if q.text.trim().is_empty() {
            return Err(validator::ValidationError::new("question_text_cannot_be_empty"));
        }
        match q.question_type.as_str() {
            "mcq" => {
                let options = q.options.as_deref().unwrap_or_default();
                if options.is_empty() {
                    return Err(validator::ValidationError::new("mcq_needs_options"));
                }
                if let Some(correct) = &q.correct {
                    if !options.iter().any(|o| o == correct.as_text().as_ref()) {
                        return Err(validator::ValidationError::new("mcq_correct_not_an_option"));
                    }
                }
            }
            "tf" | "essay" => {}
            _ => return Err(validator::ValidationError::new("unknown_question_type")),
        }
    }

    Ok(())
}
