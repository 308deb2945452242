use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::domain::{
    question::{AnswerValue, Question},
    quiz_attempt::QuestionResult,
    Quiz, QuizAttempt, StudyMaterial, User,
};

fn oid_hex(id: Option<ObjectId>) -> String {
    id.map(|oid| oid.to_hex()).unwrap_or_default()
}

fn rfc3339(dt: Option<DateTime<Utc>>) -> String {
    dt.map(|dt| dt.to_rfc3339()).unwrap_or_default()
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: oid_hex(user.id),
            username: user.username,
            email: user.email,
            created_at: rfc3339(user.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MaterialSummaryDto {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<StudyMaterial> for MaterialSummaryDto {
    fn from(material: StudyMaterial) -> Self {
        MaterialSummaryDto {
            id: oid_hex(material.id),
            title: material.title,
            created_at: rfc3339(material.created_at),
            updated_at: rfc3339(material.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MaterialDetailDto {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<StudyMaterial> for MaterialDetailDto {
    fn from(material: StudyMaterial) -> Self {
        MaterialDetailDto {
            id: oid_hex(material.id),
            title: material.title,
            content: material.content,
            created_at: rfc3339(material.created_at),
            updated_at: rfc3339(material.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateMaterialResponse {
    pub message: String,
    pub material_id: String,
}

#[derive(Debug, Serialize)]
pub struct QuizSummaryDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub num_questions: usize,
    pub created_at: String,
    pub material_id: String,
}

impl From<Quiz> for QuizSummaryDto {
    fn from(quiz: Quiz) -> Self {
        QuizSummaryDto {
            id: oid_hex(quiz.id),
            title: quiz.title,
            description: quiz.description,
            num_questions: quiz.questions.len(),
            created_at: rfc3339(quiz.created_at),
            material_id: quiz.material_id,
        }
    }
}

/// Full quiz as returned by GET /{quiz_id}: the stored document with the
/// id rendered as a hex string and dates as ISO-8601 strings.
#[derive(Debug, Serialize)]
pub struct QuizDetailDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
    pub user_id: String,
    pub material_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Quiz> for QuizDetailDto {
    fn from(quiz: Quiz) -> Self {
        QuizDetailDto {
            id: oid_hex(quiz.id),
            title: quiz.title,
            description: quiz.description,
            questions: quiz.questions,
            user_id: quiz.user_id,
            material_id: quiz.material_id,
            created_at: rfc3339(quiz.created_at),
            updated_at: rfc3339(quiz.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateQuizResponse {
    pub message: String,
    pub quiz_id: String,
    pub title: String,
    pub num_questions: usize,
}

#[derive(Debug, Serialize)]
pub struct AttemptResponse {
    pub message: String,
    pub attempt_id: String,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub results: Vec<QuestionResult>,
}

/// Attempt as listed by GET /attempts: the stored record minus the
/// per-question results, to keep the list response compact.
#[derive(Debug, Serialize)]
pub struct AttemptSummaryDto {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub answers: HashMap<String, AnswerValue>,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub created_at: String,
}

impl From<QuizAttempt> for AttemptSummaryDto {
    fn from(attempt: QuizAttempt) -> Self {
        AttemptSummaryDto {
            id: oid_hex(attempt.id),
            quiz_id: attempt.quiz_id,
            user_id: attempt.user_id,
            answers: attempt.answers,
            score: attempt.score,
            total_questions: attempt.total_questions,
            percentage: attempt.percentage,
            created_at: rfc3339(attempt.created_at),
        }
    }
}

/// Attempt as listed by GET /attempts/{quiz_id}: the full stored record.
#[derive(Debug, Serialize)]
pub struct AttemptDetailDto {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub answers: HashMap<String, AnswerValue>,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub results: Vec<QuestionResult>,
    pub created_at: String,
}

impl From<QuizAttempt> for AttemptDetailDto {
    fn from(attempt: QuizAttempt) -> Self {
        AttemptDetailDto {
            id: oid_hex(attempt.id),
            quiz_id: attempt.quiz_id,
            user_id: attempt.user_id,
            answers: attempt.answers,
            score: attempt.score,
            total_questions: attempt.total_questions,
            percentage: attempt.percentage,
            results: attempt.results,
            created_at: rfc3339(attempt.created_at),
        }
    }
}

/// Dashboard row: an attempt stripped of `results` and `answers`, joined
/// with its quiz's title and description.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardAttemptDto {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub created_at: String,
    pub quiz_title: String,
    pub quiz_description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_attempts: usize,
    pub average_score: f64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub attempts: Vec<DashboardAttemptDto>,
    pub stats: DashboardStats,
}
