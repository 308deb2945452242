use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> AppResult<ObjectId>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn update(&self, id: &ObjectId, user: User) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("users");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for users collection");

        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("username_unique".to_string())
                    .build(),
            )
            .build();

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(username_index).await?;
        self.collection.create_index(email_index).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: User) -> AppResult<ObjectId> {
        let result = self.collection.insert_one(&user).await?;
        result.inserted_id.as_object_id().ok_or_else(|| {
            crate::errors::AppError::DatabaseError("Insert did not return an ObjectId".to_string())
        })
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "username": username })
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "email": email }).await?;
        Ok(user)
    }

    async fn update(&self, id: &ObjectId, user: User) -> AppResult<()> {
        let result = self
            .collection
            .replace_one(doc! { "_id": id }, &user)
            .await?;

        if result.matched_count == 0 {
            return Err(crate::errors::AppError::NotFound(
                "User not found".to_string(),
            ));
        }

        Ok(())
    }
}
