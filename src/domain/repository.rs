use async_trait::async_trait;

use super::error::DomainResult;
use super::todo::{CreateTodo, ListOptions, Todo, TodoStatus, UpdateTodo};
use super::user::{CreateUser, User};

/// Persistence for todos.
///
/// Ids arrive as raw text. A malformed id behaves exactly like an id that does
/// not exist: lookups and updates yield `None`, deletes yield `false`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    /// Prepares the backing store (indexes and the like).
    async fn init(&self) -> DomainResult<()>;

    /// Inserts a record and returns it as read back from the store.
    async fn create(&self, input: CreateTodo) -> DomainResult<Todo>;

    async fn get_by_id(&self, id: &str) -> DomainResult<Option<Todo>>;

    /// One page of matching records plus the count of all matching records.
    async fn list(&self, options: ListOptions) -> DomainResult<(Vec<Todo>, u64)>;

    /// Writes the supplied fields and refreshes `updated_at`. An empty update
    /// returns the current record without writing.
    async fn update(&self, id: &str, input: UpdateTodo) -> DomainResult<Option<Todo>>;

    /// Hard delete. `true` only when exactly one record was removed.
    async fn delete(&self, id: &str) -> DomainResult<bool>;

    async fn list_by_status(&self, status: TodoStatus) -> DomainResult<Vec<Todo>>;

    /// Records due strictly before now that are not completed.
    async fn list_overdue(&self) -> DomainResult<Vec<Todo>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    async fn init(&self) -> DomainResult<()>;
    async fn create(&self, input: CreateUser) -> DomainResult<User>;
    async fn list(&self) -> DomainResult<Vec<User>>;
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn delete(&self, id: &str) -> DomainResult<bool>;
}
