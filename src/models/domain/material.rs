use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A study material document: the text quizzes are generated from.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct StudyMaterial {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub content: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StudyMaterial {
    pub fn new(title: &str, content: &str, user_id: &str) -> Self {
        let now = Utc::now();
        StudyMaterial {
            id: None,
            title: title.to_string(),
            content: content.to_string(),
            user_id: user_id.to_string(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}
