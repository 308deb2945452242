use std::collections::HashMap;

use serde::Deserialize;
use validator::Validate;

use crate::models::domain::question::{AnswerValue, QuestionType};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMaterialRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMaterialRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    pub material_id: String,

    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 50))]
    pub num_questions: Option<u32>,

    pub question_types: Option<Vec<QuestionType>>,
}

impl GenerateQuizRequest {
    pub fn num_questions(&self) -> u32 {
        self.num_questions.unwrap_or(5)
    }

    pub fn question_types(&self) -> Vec<QuestionType> {
        self.question_types.clone().unwrap_or_else(|| {
            vec![
                QuestionType::MultipleChoice,
                QuestionType::TrueFalse,
                QuestionType::ShortAnswer,
            ]
        })
    }
}

/// Body of POST /{quiz_id}/attempt. Keys are question indices as strings,
/// matching the order of the quiz's question list; missing keys mean the
/// question was left unanswered.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAttemptRequest {
    pub answers: HashMap<String, AnswerValue>,
}
