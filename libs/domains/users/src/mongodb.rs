//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use domain_geo::{ClassifiedError, ClassifiedResult, error::is_duplicate_key};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Binary, Bson, Document, doc, spec::BinarySubtype},
    options::IndexOptions,
};
use tracing::instrument;
use uuid::Uuid;

use crate::models::User;
use crate::repository::{UserRepository, duplicate_email, user_not_found};

pub const USERS_COLLECTION: &str = "users";

/// MongoDB implementation of the UserRepository
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, USERS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<User>(collection_name),
        }
    }

    /// Unique index on `email`, backstopping concurrent signups
    #[instrument(skip(self))]
    pub async fn ensure_indexes(&self) -> ClassifiedResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!(collection = %self.collection.name(), "User indexes ensured");
        Ok(())
    }

    /// UUIDs as the driver stores them on insert (generic binary)
    fn id_filter(id: Uuid) -> Document {
        let id = Binary {
            subtype: BinarySubtype::Generic,
            bytes: id.as_bytes().to_vec(),
        };
        doc! { "_id": Bson::Binary(id) }
    }

    fn map_write_error(err: mongodb::error::Error, email: &str) -> ClassifiedError {
        if is_duplicate_key(&err) {
            return duplicate_email(email);
        }
        err.into()
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: User) -> ClassifiedResult<User> {
        self.collection
            .insert_one(&user)
            .await
            .map_err(|e| Self::map_write_error(e, &user.email))?;

        tracing::info!(user_id = %user.id, "User created successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> ClassifiedResult<Vec<User>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ClassifiedResult<Option<User>> {
        Ok(self.collection.find_one(Self::id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> ClassifiedResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: User) -> ClassifiedResult<User> {
        let result = self
            .collection
            .replace_one(Self::id_filter(user.id), &user)
            .await
            .map_err(|e| Self::map_write_error(e, &user.email))?;

        if result.matched_count == 0 {
            return Err(user_not_found(user.id));
        }

        tracing::info!(user_id = %user.id, "User updated successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ClassifiedResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(user_id = %id, "User deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: Uuid) -> ClassifiedResult<bool> {
        let count = self
            .collection
            .count_documents(Self::id_filter(id))
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> ClassifiedResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "email": email })
            .limit(1)
            .await?;
        Ok(count > 0)
    }
}
