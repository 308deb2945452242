use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::quiz_attempt::QuizAttempt};

#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    async fn insert(&self, attempt: QuizAttempt) -> AppResult<ObjectId>;
    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<QuizAttempt>>;
    /// All attempts for a user, most recent first.
    async fn list_recent_for_user(&self, user_id: &str) -> AppResult<Vec<QuizAttempt>>;
    /// Attempts against one quiz, most recent first.
    async fn list_for_quiz(&self, user_id: &str, quiz_id: &str) -> AppResult<Vec<QuizAttempt>>;
}

pub struct MongoQuizAttemptRepository {
    collection: Collection<QuizAttempt>,
}

impl MongoQuizAttemptRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_attempts");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_attempts collection");

        let user_quiz_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "quiz_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("user_quiz".to_string())
                    .build(),
            )
            .build();

        let user_id_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder().name("user_id".to_string()).build())
            .build();

        self.collection.create_index(user_quiz_index).await?;
        self.collection.create_index(user_id_index).await?;
        Ok(())
    }
}

#[async_trait]
impl QuizAttemptRepository for MongoQuizAttemptRepository {
    async fn insert(&self, attempt: QuizAttempt) -> AppResult<ObjectId> {
        let result = self.collection.insert_one(&attempt).await?;
        result.inserted_id.as_object_id().ok_or_else(|| {
            crate::errors::AppError::DatabaseError("Insert did not return an ObjectId".to_string())
        })
    }

    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self
            .collection
            .find(doc! { "user_id": user_id })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn list_recent_for_user(&self, user_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn list_for_quiz(&self, user_id: &str, quiz_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self
            .collection
            .find(doc! { "user_id": user_id, "quiz_id": quiz_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }
}
