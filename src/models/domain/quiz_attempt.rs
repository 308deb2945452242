use std::collections::HashMap;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::domain::question::AnswerValue;

/// A single graded submission of answers against a quiz. Attempts are
/// inserted once and never mutated; the grading result is stored, not
/// re-derived later.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttempt {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub quiz_id: String,
    pub user_id: String,
    pub answers: HashMap<String, AnswerValue>,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub results: Vec<QuestionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Per-question grading outcome embedded in an attempt. Carries the
/// correct answer and explanation so the client can show feedback for
/// unanswered questions too.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionResult {
    pub question_id: i32,
    pub correct: bool,
    pub correct_answer: AnswerValue,
    pub explanation: String,
}

impl QuizAttempt {
    pub fn new(
        quiz_id: &str,
        user_id: &str,
        answers: HashMap<String, AnswerValue>,
        score: i32,
        total_questions: i32,
        percentage: f64,
        results: Vec<QuestionResult>,
    ) -> Self {
        QuizAttempt {
            id: None,
            quiz_id: quiz_id.to_string(),
            user_id: user_id.to_string(),
            answers,
            score,
            total_questions,
            percentage,
            results,
            created_at: Some(Utc::now()),
        }
    }
}
