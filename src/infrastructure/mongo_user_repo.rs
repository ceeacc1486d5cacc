use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, oid::ObjectId},
    options::{FindOptions, IndexOptions},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::{
    error::{DomainError, DomainResult},
    id::DocumentId,
    repository::UserRepository,
    user::{CreateUser, User},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    email: String,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self { id: doc.id.into(), name: doc.name, email: doc.email }
    }
}

#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self { collection: db.collection::<UserDocument>(collection_name) }
    }

    async fn find_by_object_id(&self, id: ObjectId) -> DomainResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?.map(User::from))
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn init(&self) -> DomainResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().name("idx_email".to_string()).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    #[instrument(skip(self, input))]
    async fn create(&self, input: CreateUser) -> DomainResult<User> {
        let document = doc! { "name": input.name.as_str(), "email": input.email.as_str() };
        let result = self
            .collection
            .clone_with_type::<Document>()
            .insert_one(document)
            .await?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            DomainError::Persistence(format!("unexpected inserted id {}", result.inserted_id))
        })?;

        let user = self
            .find_by_object_id(id)
            .await?
            .ok_or_else(|| DomainError::Persistence(format!("user {id} missing after insert")))?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    async fn list(&self) -> DomainResult<Vec<User>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let docs: Vec<UserDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let Some(id) = DocumentId::parse(id) else { return Ok(None) };
        self.find_by_object_id(id.object_id()).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let Some(id) = DocumentId::parse(id) else { return Ok(false) };
        let result = self.collection.delete_one(doc! { "_id": id.object_id() }).await?;
        Ok(result.deleted_count == 1)
    }
}
