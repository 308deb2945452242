use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::domain::question::Question;

/// A generated quiz, owned by one user and tied to one study material.
/// Quizzes are created by the generation endpoint and deleted explicitly;
/// the question list is immutable in between.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
    pub user_id: String,
    pub material_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn new(
        title: String,
        description: String,
        questions: Vec<Question>,
        user_id: &str,
        material_id: &str,
    ) -> Self {
        let now = Utc::now();
        Quiz {
            id: None,
            title,
            description,
            questions,
            user_id: user_id.to_string(),
            material_id: material_id.to_string(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}
