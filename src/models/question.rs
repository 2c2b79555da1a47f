// src/models/question.rs

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub exam_id: i64,

    /// Author-chosen key, unique within its exam. Submitted answers are
    /// keyed by this value, not by the row id.
    pub question_key: String,

    /// Display order within the exam. Not significant for grading.
    pub position: i64,

    /// Question variant: 'mcq', 'tf' or 'essay'.
    /// Mapped from the database column 'type' since `type` is a reserved keyword in Rust.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub question_type: String,

    /// The prompt text of the question.
    pub content: String,

    /// Option texts for mcq questions (e.g., ["Option A", "Option B"]).
    /// Stored as a JSON array in the database.
    pub options: Option<Json<Vec<String>>>,

    /// Reference answer for mcq (option text) and tf questions. tf values
    /// are kept in string form and coerced to a boolean when graded.
    pub correct: Option<String>,

    /// Acceptable reference answers for essay questions. JSON array.
    pub acceptable: Option<Json<Vec<String>>>,
}

/// Variant payload as a tagged union. The grading engine pattern-matches
/// on this rather than coercing loose fields ad hoc.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    Mcq {
        options: Vec<String>,
        correct: Option<String>,
    },
    Tf {
        correct: Option<String>,
    },
    Essay {
        acceptable: Vec<String>,
    },
}

impl Question {
    /// Parses the row into its variant payload. Returns `None` for rows
    /// with an unrecognized variant tag; such questions grade as
    /// unanswered instead of failing the whole submission.
    pub fn kind(&self) -> Option<QuestionKind> {
        match self.question_type.as_str() {
            "mcq" => Some(QuestionKind::Mcq {
                options: self
                    .options
                    .as_ref()
                    .map(|o| o.0.clone())
                    .unwrap_or_default(),
                correct: self.correct.clone(),
            }),
            "tf" => Some(QuestionKind::Tf {
                correct: self.correct.clone(),
            }),
            "essay" => Some(QuestionKind::Essay {
                acceptable: self
                    .acceptable
                    .as_ref()
                    .map(|a| a.0.clone())
                    .unwrap_or_default(),
            }),
            _ => None,
        }
    }

    /// Test-taker view of the question, without the answer key.
    pub fn public(&self) -> PublicQuestion {
        PublicQuestion {
            question_key: self.question_key.clone(),
            question_type: self.question_type.clone(),
            content: self.content.clone(),
            options: self.options.clone(),
            position: self.position,
        }
    }
}

/// DTO for delivering a question to a test taker (excludes `correct` and
/// `acceptable`).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub question_key: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub content: String,
    pub options: Option<Json<Vec<String>>>,
    pub position: i64,
}

/// A submitted answer. mcq and essay answers arrive as strings, tf answers
/// as booleans; string forms of tf answers are coerced by the grading
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Text(String),
}

impl AnswerValue {
    /// String form; booleans stringify to "true"/"false".
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            AnswerValue::Bool(b) => Cow::Owned(b.to_string()),
            AnswerValue::Text(s) => Cow::Borrowed(s),
        }
    }

    /// Boolean form; non-boolean values are truthy iff their text equals
    /// "true" ignoring case.
    pub fn as_bool(&self) -> bool {
        match self {
            AnswerValue::Bool(b) => *b,
            AnswerValue::Text(s) => s.eq_ignore_ascii_case("true"),
        }
    }
}

/// DTO for one question inside an exam-creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionInput {
    pub key: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub options: Option<Vec<String>>,
    /// mcq: the correct option's text. tf: a boolean or its string form.
    pub correct: Option<AnswerValue>,
    pub acceptable: Option<Vec<String>>,
}
