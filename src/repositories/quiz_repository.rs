use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::Quiz};

/// Quiz storage. Every lookup is scoped by owner in the same query so a
/// quiz belonging to another user is indistinguishable from a missing one.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn insert(&self, quiz: Quiz) -> AppResult<ObjectId>;
    async fn find_for_user(&self, id: &ObjectId, user_id: &str) -> AppResult<Option<Quiz>>;
    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Quiz>>;
    async fn delete_for_user(&self, id: &ObjectId, user_id: &str) -> AppResult<u64>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quizzes");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder().name("user_id".to_string()).build())
            .build();

        self.collection.create_index(user_index).await?;
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn insert(&self, quiz: Quiz) -> AppResult<ObjectId> {
        let result = self.collection.insert_one(&quiz).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| {
                crate::errors::AppError::DatabaseError(
                    "Insert did not return an ObjectId".to_string(),
                )
            })
    }

    async fn find_for_user(&self, id: &ObjectId, user_id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self
            .collection
            .find_one(doc! { "_id": id, "user_id": user_id })
            .await?;
        Ok(quiz)
    }

    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .collection
            .find(doc! { "user_id": user_id })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn delete_for_user(&self, id: &ObjectId, user_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id, "user_id": user_id })
            .await?;
        Ok(result.deleted_count)
    }
}
