use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::StudyMaterial};

#[async_trait]
pub trait MaterialRepository: Send + Sync {
    async fn insert(&self, material: StudyMaterial) -> AppResult<ObjectId>;
    async fn find_for_user(&self, id: &ObjectId, user_id: &str)
        -> AppResult<Option<StudyMaterial>>;
    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<StudyMaterial>>;
    async fn replace_for_user(
        &self,
        id: &ObjectId,
        user_id: &str,
        material: StudyMaterial,
    ) -> AppResult<u64>;
    async fn delete_for_user(&self, id: &ObjectId, user_id: &str) -> AppResult<u64>;
}

pub struct MongoMaterialRepository {
    collection: Collection<StudyMaterial>,
}

impl MongoMaterialRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("study_materials");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for study_materials collection");

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder().name("user_id".to_string()).build())
            .build();

        self.collection.create_index(user_index).await?;
        Ok(())
    }
}

#[async_trait]
impl MaterialRepository for MongoMaterialRepository {
    async fn insert(&self, material: StudyMaterial) -> AppResult<ObjectId> {
        let result = self.collection.insert_one(&material).await?;
        result.inserted_id.as_object_id().ok_or_else(|| {
            crate::errors::AppError::DatabaseError("Insert did not return an ObjectId".to_string())
        })
    }

    async fn find_for_user(
        &self,
        id: &ObjectId,
        user_id: &str,
    ) -> AppResult<Option<StudyMaterial>> {
        let material = self
            .collection
            .find_one(doc! { "_id": id, "user_id": user_id })
            .await?;
        Ok(material)
    }

    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<StudyMaterial>> {
        let materials = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(materials)
    }

    async fn replace_for_user(
        &self,
        id: &ObjectId,
        user_id: &str,
        material: StudyMaterial,
    ) -> AppResult<u64> {
        let result = self
            .collection
            .replace_one(doc! { "_id": id, "user_id": user_id }, &material)
            .await?;
        Ok(result.matched_count)
    }

    async fn delete_for_user(&self, id: &ObjectId, user_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id, "user_id": user_id })
            .await?;
        Ok(result.deleted_count)
    }
}
