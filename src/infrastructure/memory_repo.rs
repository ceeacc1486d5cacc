//! In-process stores with the same observable behavior as the MongoDB ones.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::domain::{
    error::DomainResult,
    id::DocumentId,
    repository::{TodoRepository, UserRepository},
    todo::{self, CreateTodo, ListOptions, SortField, SortOrder, Todo, TodoStatus, UpdateTodo},
    user::{CreateUser, User},
};

#[derive(Clone, Default)]
pub struct InMemoryTodoRepository {
    items: Arc<RwLock<HashMap<DocumentId, Todo>>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(todo: &Todo, options: &ListOptions) -> bool {
    options.status.is_none_or(|s| todo.status == s)
        && options.priority.is_none_or(|p| todo.priority == p)
}

fn compare(a: &Todo, b: &Todo, field: SortField) -> Ordering {
    let by_field = match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::DueDate => a.due_date.cmp(&b.due_date),
        SortField::Title => a.title.cmp(&b.title),
        SortField::Status => a.status.rank().cmp(&b.status.rank()),
        SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
    };
    by_field.then_with(|| a.id.bytes().cmp(&b.id.bytes()))
}

fn sorted_by_id(mut todos: Vec<Todo>) -> Vec<Todo> {
    todos.sort_by(|a, b| a.id.bytes().cmp(&b.id.bytes()));
    todos
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn init(&self) -> DomainResult<()> {
        Ok(())
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    async fn create(&self, input: CreateTodo) -> DomainResult<Todo> {
        let todo = Todo::new(input);
        self.items.write().await.insert(todo.id, todo.clone());
        tracing::info!(todo_id = %todo.id, "todo created");
        Ok(todo)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<Todo>> {
        let Some(id) = DocumentId::parse(id) else { return Ok(None) };
        Ok(self.items.read().await.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn list(&self, options: ListOptions) -> DomainResult<(Vec<Todo>, u64)> {
        let mut matching: Vec<Todo> = self
            .items
            .read()
            .await
            .values()
            .filter(|t| matches(t, &options))
            .cloned()
            .collect();
        let total = matching.len() as u64;

        matching.sort_by(|a, b| {
            let ord = compare(a, b, options.sort_by);
            match options.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        let page = matching
            .into_iter()
            .skip(options.skip as usize)
            .take(options.limit as usize)
            .collect();
        Ok((page, total))
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: &str, input: UpdateTodo) -> DomainResult<Option<Todo>> {
        let Some(id) = DocumentId::parse(id) else { return Ok(None) };
        let mut items = self.items.write().await;
        let Some(todo) = items.get_mut(&id) else { return Ok(None) };
        if input.is_empty() {
            return Ok(Some(todo.clone()));
        }
        todo.apply_update(input);
        tracing::info!(todo_id = %id, "todo updated");
        Ok(Some(todo.clone()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let Some(id) = DocumentId::parse(id) else { return Ok(false) };
        let removed = self.items.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(todo_id = %id, "todo deleted");
        }
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn list_by_status(&self, status: TodoStatus) -> DomainResult<Vec<Todo>> {
        let items = self.items.read().await;
        Ok(sorted_by_id(items.values().filter(|t| t.status == status).cloned().collect()))
    }

    #[instrument(skip(self))]
    async fn list_overdue(&self) -> DomainResult<Vec<Todo>> {
        let now = todo::now();
        let items = self.items.read().await;
        Ok(sorted_by_id(items.values().filter(|t| t.is_overdue(now)).cloned().collect()))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    items: Arc<RwLock<HashMap<DocumentId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn init(&self) -> DomainResult<()> {
        Ok(())
    }

    #[instrument(skip(self, input))]
    async fn create(&self, input: CreateUser) -> DomainResult<User> {
        let user = User::new(input);
        self.items.write().await.insert(user.id, user.clone());
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    async fn list(&self) -> DomainResult<Vec<User>> {
        let mut users: Vec<User> = self.items.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.id.bytes().cmp(&b.id.bytes()));
        Ok(users)
    }

    async fn get_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let Some(id) = DocumentId::parse(id) else { return Ok(None) };
        Ok(self.items.read().await.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let Some(id) = DocumentId::parse(id) else { return Ok(false) };
        Ok(self.items.write().await.remove(&id).is_some())
    }
}
