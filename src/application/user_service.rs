use async_trait::async_trait;
use tracing::instrument;
use validator::Validate;

use crate::domain::error::DomainResult;
use crate::domain::repository::UserRepository;
use crate::domain::user::{CreateUser, UserResponse};

#[async_trait]
pub trait UserService: Send + Sync + 'static {
    async fn create(&self, input: CreateUser) -> DomainResult<UserResponse>;
    async fn list(&self) -> DomainResult<Vec<UserResponse>>;
    async fn get(&self, id: &str) -> DomainResult<Option<UserResponse>>;
    async fn delete(&self, id: &str) -> DomainResult<bool>;
}

#[derive(Clone)]
pub struct UserServiceImpl<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserServiceImpl<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: UserRepository> UserService for UserServiceImpl<R> {
    #[instrument(skip(self, input))]
    async fn create(&self, input: CreateUser) -> DomainResult<UserResponse> {
        input.validate()?;
        Ok(self.repo.create(input).await?.into())
    }

    async fn list(&self) -> DomainResult<Vec<UserResponse>> {
        Ok(self.repo.list().await?.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> DomainResult<Option<UserResponse>> {
        Ok(self.repo.get_by_id(id).await?.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> DomainResult<bool> {
        self.repo.delete(id).await
    }
}
