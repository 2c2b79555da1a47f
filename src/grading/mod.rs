// src/grading/mod.rs

//! Pure grading engine: decides per-question outcomes and aggregates them
//! into a score. No I/O and no clock; callers load the question set and
//! persist the result.

pub mod normalize;

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::question::{AnswerValue, Question, QuestionKind};
use self::normalize::normalize;

/// Per-question grading outcome. `Unanswered` covers both a missing
/// submitted answer and a question with no reference answer; it must never
/// be conflated with `Incorrect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
    Unanswered,
}

/// Grades a single question against an optional submitted answer.
pub fn grade(kind: &QuestionKind, answer: Option<&AnswerValue>) -> Outcome {
    match kind {
        QuestionKind::Mcq { correct, .. } => {
            let (Some(correct), Some(answer)) = (correct.as_deref(), answer) else {
                return Outcome::Unanswered;
            };
            // Exact, case-sensitive match; essay grading is the only
            // path that normalizes.
            if answer.as_text() == correct {
                Outcome::Correct
            } else {
                Outcome::Incorrect
            }
        }
        QuestionKind::Tf { correct } => {
            let Some(answer) = answer else {
                return Outcome::Unanswered;
            };
            // The stored reference coerces the same way submitted text
            // does: truthy iff equal to "true" ignoring case.
            let reference = correct
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("true"));
            if answer.as_bool() == reference {
                Outcome::Correct
            } else {
                Outcome::Incorrect
            }
        }
        QuestionKind::Essay { acceptable } => {
            let Some(answer) = answer else {
                return Outcome::Unanswered;
            };
            let submitted = normalize(&answer.as_text());
            if acceptable.iter().any(|a| normalize(a) == submitted) {
                Outcome::Correct
            } else {
                Outcome::Incorrect
            }
        }
    }
}

/// Aggregate result of grading one submission against a question set.
#[derive(Debug)]
pub struct GradeReport {
    /// Outcome per question key, for every question of the exam.
    pub outcomes: BTreeMap<String, Outcome>,

    /// Count of questions graded `Correct`. No negative marking;
    /// unanswered and incorrect questions contribute nothing.
    pub score: i64,

    pub total_questions: i64,

    /// Rounded percentage. Only defined for a non-empty question set.
    pub percent: Option<i64>,

    /// Defined only when both `percent` and the pass threshold are.
    pub passed: Option<bool>,
}

/// Grades every question of an exam against a submitted answer map.
/// Questions whose row carries an unrecognized variant tag grade
/// `Unanswered`.
pub fn grade_exam(
    questions: &[Question],
    answers: &HashMap<String, AnswerValue>,
    pass_threshold: Option<i64>,
) -> GradeReport {
    let mut outcomes = BTreeMap::new();
    let mut score = 0i64;

    for question in questions {
        let outcome = match question.kind() {
            Some(kind) => grade(&kind, answers.get(&question.question_key)),
            None => Outcome::Unanswered,
        };
        if outcome == Outcome::Correct {
            score += 1;
        }
        outcomes.insert(question.question_key.clone(), outcome);
    }

    let total_questions = questions.len() as i64;
    let percent = (total_questions > 0)
        .then(|| ((score as f64 / total_questions as f64) * 100.0).round() as i64);
    let passed = match (percent, pass_threshold) {
        (Some(percent), Some(threshold)) => Some(percent >= threshold),
        _ => None,
    };

    GradeReport {
        outcomes,
        score,
        total_questions,
        percent,
        passed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;

    fn row(key: &str, question_type: &str) -> Question {
        Question {
            id: 0,
            exam_id: 0,
            question_key: key.to_string(),
            position: 0,
            question_type: question_type.to_string(),
            content: "prompt".to_string(),
            options: None,
            correct: None,
            acceptable: None,
        }
    }

    fn mcq(key: &str, options: &[&str], correct: Option<&str>) -> Question {
        let mut q = row(key, "mcq");
        q.options = Some(Json(options.iter().map(|s| s.to_string()).collect()));
        q.correct = correct.map(str::to_string);
        q
    }

    fn tf(key: &str, correct: Option<&str>) -> Question {
        let mut q = row(key, "tf");
        q.correct = correct.map(str::to_string);
        q
    }

    fn essay(key: &str, acceptable: &[&str]) -> Question {
        let mut q = row(key, "essay");
        q.acceptable = Some(Json(acceptable.iter().map(|s| s.to_string()).collect()));
        q
    }

    fn answers(pairs: &[(&str, AnswerValue)]) -> HashMap<String, AnswerValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn text(s: &str) -> AnswerValue {
        AnswerValue::Text(s.to_string())
    }

    #[test]
    fn mcq_exact_match_scores_correct() {
        let questions = [
            mcq("q1", &["A", "B"], Some("B")),
            mcq("q2", &["A", "B", "C"], Some("A")),
        ];
        let report = grade_exam(
            &questions,
            &answers(&[("q1", text("B")), ("q2", text("C"))]),
            None,
        );
        assert_eq!(report.score, 1);
        assert_eq!(report.percent, Some(50));
        assert_eq!(report.outcomes["q1"], Outcome::Correct);
        assert_eq!(report.outcomes["q2"], Outcome::Incorrect);
    }

    #[test]
    fn mcq_comparison_is_case_sensitive() {
        let q = mcq("q1", &["Paris"], Some("Paris")).kind().unwrap();
        assert_eq!(grade(&q, Some(&text("paris"))), Outcome::Incorrect);
        assert_eq!(grade(&q, Some(&text("Paris"))), Outcome::Correct);
    }

    #[test]
    fn mcq_without_reference_answer_is_unanswered() {
        let q = mcq("q1", &["A", "B"], None).kind().unwrap();
        assert_eq!(grade(&q, Some(&text("A"))), Outcome::Unanswered);
    }

    #[test]
    fn essay_matches_after_normalization() {
        let q = essay("q1", &["Paris"]).kind().unwrap();
        assert_eq!(grade(&q, Some(&text("  PARIS!! "))), Outcome::Correct);
        assert_eq!(grade(&q, Some(&text("London"))), Outcome::Incorrect);
    }

    #[test]
    fn essay_matches_any_acceptable_answer() {
        let q = essay("q1", &["Paris", "the capital of France"])
            .kind()
            .unwrap();
        assert_eq!(
            grade(&q, Some(&text("The Capital of France."))),
            Outcome::Correct
        );
    }

    #[test]
    fn essay_with_no_acceptable_answers_is_never_correct() {
        let q = essay("q1", &[]).kind().unwrap();
        assert_eq!(grade(&q, Some(&text("anything"))), Outcome::Incorrect);
    }

    #[test]
    fn tf_string_answer_is_coerced() {
        let q = tf("q1", Some("true")).kind().unwrap();
        assert_eq!(grade(&q, Some(&text("false"))), Outcome::Incorrect);
        assert_eq!(grade(&q, Some(&text("TRUE"))), Outcome::Correct);
        assert_eq!(grade(&q, Some(&AnswerValue::Bool(true))), Outcome::Correct);
    }

    #[test]
    fn tf_reference_stored_with_odd_casing_still_coerces() {
        let q = tf("q1", Some("True")).kind().unwrap();
        assert_eq!(grade(&q, Some(&AnswerValue::Bool(true))), Outcome::Correct);

        // A reference that is not "true" in any casing coerces to false.
        let q = tf("q1", Some("yes")).kind().unwrap();
        assert_eq!(grade(&q, Some(&AnswerValue::Bool(false))), Outcome::Correct);
    }

    #[test]
    fn missing_answers_grade_unanswered_and_do_not_reduce_score() {
        let questions = [
            mcq("q1", &["A", "B"], Some("A")),
            tf("q2", Some("true")),
            essay("q3", &["Paris"]),
        ];
        let report = grade_exam(&questions, &answers(&[("q1", text("A"))]), None);
        assert_eq!(report.score, 1);
        assert_eq!(report.outcomes["q2"], Outcome::Unanswered);
        assert_eq!(report.outcomes["q3"], Outcome::Unanswered);
    }

    #[test]
    fn unknown_variant_rows_grade_unanswered() {
        let questions = [row("q1", "matching")];
        let report = grade_exam(&questions, &answers(&[("q1", text("A"))]), Some(50));
        assert_eq!(report.outcomes["q1"], Outcome::Unanswered);
        assert_eq!(report.score, 0);
    }

    #[test]
    fn all_correct_scores_every_question() {
        let questions = [
            mcq("q1", &["A", "B"], Some("B")),
            tf("q2", Some("false")),
            essay("q3", &["Paris"]),
        ];
        let submitted = answers(&[
            ("q1", text("B")),
            ("q2", AnswerValue::Bool(false)),
            ("q3", text("paris")),
        ]);
        let report = grade_exam(&questions, &submitted, Some(100));
        assert_eq!(report.score, 3);
        assert_eq!(report.percent, Some(100));
        assert_eq!(report.passed, Some(true));
    }

    #[test]
    fn percent_rounds_to_nearest_integer() {
        let questions = [
            mcq("q1", &["A"], Some("A")),
            mcq("q2", &["A"], Some("A")),
            mcq("q3", &["A"], Some("A")),
        ];
        let report = grade_exam(&questions, &answers(&[("q1", text("A"))]), None);
        assert_eq!(report.percent, Some(33));

        let report = grade_exam(
            &questions,
            &answers(&[("q1", text("A")), ("q2", text("A"))]),
            None,
        );
        assert_eq!(report.percent, Some(67));
    }

    #[test]
    fn passed_is_undefined_without_a_threshold() {
        let questions = [mcq("q1", &["A"], Some("A"))];
        let report = grade_exam(&questions, &answers(&[("q1", text("A"))]), None);
        assert_eq!(report.percent, Some(100));
        assert_eq!(report.passed, None);
    }

    #[test]
    fn empty_question_set_has_no_percent_or_passed() {
        let report = grade_exam(&[], &HashMap::new(), Some(60));
        assert_eq!(report.score, 0);
        assert_eq!(report.percent, None);
        assert_eq!(report.passed, None);
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let questions = [
            mcq("q1", &["A"], Some("A")),
            mcq("q2", &["A"], Some("A")),
        ];
        let report = grade_exam(&questions, &answers(&[("q1", text("A"))]), Some(50));
        assert_eq!(report.percent, Some(50));
        assert_eq!(report.passed, Some(true));

        let report = grade_exam(&questions, &answers(&[("q1", text("A"))]), Some(51));
        assert_eq!(report.passed, Some(false));
    }
}
