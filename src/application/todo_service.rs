use async_trait::async_trait;
use tracing::instrument;
use validator::Validate;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{
    CreateTodo, ListOptions, TodoPage, TodoQuery, TodoResponse, TodoStatus, UpdateTodo,
};

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn create(&self, input: CreateTodo) -> DomainResult<TodoResponse>;
    /// `None` when the id is unknown or malformed.
    async fn get(&self, id: &str) -> DomainResult<Option<TodoResponse>>;
    async fn list(&self, query: TodoQuery) -> DomainResult<TodoPage>;
    async fn update(&self, id: &str, input: UpdateTodo) -> DomainResult<Option<TodoResponse>>;
    async fn delete(&self, id: &str) -> DomainResult<bool>;
    async fn list_by_status(&self, status: TodoStatus) -> DomainResult<Vec<TodoResponse>>;
    async fn list_overdue(&self) -> DomainResult<Vec<TodoResponse>>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

/// Records to skip before `page`. `None` when the offset exceeds what the store can address.
pub fn page_offset(page: u64, size: u64) -> Option<u64> {
    page.checked_sub(1)?
        .checked_mul(size)
        .filter(|skip| i64::try_from(*skip).is_ok())
}

/// Number of pages needed for `total` records. An empty result still has one page.
pub fn page_count(total: u64, size: u64) -> u64 {
    if total > 0 { total.div_ceil(size) } else { 1 }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    #[instrument(skip(self, input))]
    async fn create(&self, input: CreateTodo) -> DomainResult<TodoResponse> {
        input.validate()?;
        Ok(self.repo.create(input).await?.into())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> DomainResult<Option<TodoResponse>> {
        Ok(self.repo.get_by_id(id).await?.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list(&self, query: TodoQuery) -> DomainResult<TodoPage> {
        query.validate()?;
        let skip = page_offset(query.page, query.size).ok_or_else(|| {
            DomainError::Validation(format!("page: {} is out of range", query.page))
        })?;
        let options = ListOptions {
            skip,
            limit: query.size,
            status: query.status,
            priority: query.priority,
            sort_by: query.sort_by,
            sort_order: query.sort_order,
        };
        let (todos, total) = self.repo.list(options).await?;

        Ok(TodoPage {
            items: todos.into_iter().map(Into::into).collect(),
            total,
            page: query.page,
            size: query.size,
            pages: page_count(total, query.size),
        })
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: &str, input: UpdateTodo) -> DomainResult<Option<TodoResponse>> {
        input.validate()?;
        Ok(self.repo.update(id, input).await?.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> DomainResult<bool> {
        self.repo.delete(id).await
    }

    #[instrument(skip(self))]
    async fn list_by_status(&self, status: TodoStatus) -> DomainResult<Vec<TodoResponse>> {
        let todos = self.repo.list_by_status(status).await?;
        Ok(todos.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn list_overdue(&self) -> DomainResult<Vec<TodoResponse>> {
        let todos = self.repo.list_overdue().await?;
        Ok(todos.into_iter().map(Into::into).collect())
    }
}
