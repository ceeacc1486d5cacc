use chrono::{Duration, Utc};

use super::todo_service::{TodoService, TodoServiceImpl, page_count, page_offset};
use crate::domain::error::DomainError;
use crate::domain::repository::MockTodoRepository;
use crate::domain::todo::{
    CreateTodo, SortField, SortOrder, TodoPriority, TodoQuery, TodoStatus, UpdateTodo,
};
use crate::infrastructure::memory_repo::InMemoryTodoRepository;

fn service() -> TodoServiceImpl<InMemoryTodoRepository> {
    TodoServiceImpl::new(InMemoryTodoRepository::new())
}

fn input(title: &str) -> CreateTodo {
    CreateTodo {
        title: title.into(),
        description: None,
        status: TodoStatus::Pending,
        priority: TodoPriority::Medium,
        due_date: None,
    }
}

#[tokio::test]
async fn unit_create_and_get() {
    let service = service();
    let created = service
        .create(CreateTodo { description: Some("first".into()), ..input("X") })
        .await
        .unwrap();
    assert_eq!(created.title, "X");
    assert_eq!(created.created_at, created.updated_at);

    let got = service.get(&created.id).await.unwrap().unwrap();
    assert_eq!(got, created);
}

#[tokio::test]
async fn partial_update_preserves_untouched_fields() {
    let service = service();
    let due = Utc::now() + Duration::days(3);
    let created = service
        .create(CreateTodo {
            description: Some("details".into()),
            priority: TodoPriority::High,
            due_date: Some(due),
            ..input("Keep me")
        })
        .await
        .unwrap();

    let update = UpdateTodo { status: Some(TodoStatus::InProgress), ..Default::default() };
    let updated = service.update(&created.id, update).await.unwrap().unwrap();

    assert_eq!(updated.status, TodoStatus::InProgress);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.priority, created.priority);
    assert_eq!(updated.due_date, created.due_date);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn back_to_back_updates_advance_updated_at() {
    let service = service();
    let created = service.create(input("busy")).await.unwrap();
    let mut last = created.updated_at;
    for i in 0..50 {
        let update = UpdateTodo { title: Some(format!("busy {i}")), ..Default::default() };
        let updated = service.update(&created.id, update).await.unwrap().unwrap();
        assert!(updated.updated_at > last, "update {i} did not advance updated_at");
        last = updated.updated_at;
    }
}

#[tokio::test]
async fn update_of_unknown_id_is_absent() {
    let service = service();
    let update = UpdateTodo { title: Some("x".into()), ..Default::default() };
    let missing = service.update("507f1f77bcf86cd799439011", update).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn update_rejects_invalid_fields() {
    let service = service();
    let created = service.create(input("ok")).await.unwrap();
    let update = UpdateTodo { title: Some("t".repeat(201)), ..Default::default() };
    let err = service.update(&created.id, update).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn pages_cover_every_matching_item_once() {
    let service = service();
    for i in 0..7 {
        let status = if i % 3 == 0 { TodoStatus::Completed } else { TodoStatus::Pending };
        service.create(CreateTodo { status, ..input(&format!("t{i}")) }).await.unwrap();
    }

    let base = TodoQuery { size: 2, status: Some(TodoStatus::Pending), ..Default::default() };
    let first = service.list(base.clone()).await.unwrap();
    assert_eq!(first.total, 4);
    assert_eq!(first.pages, 2);

    let mut seen = Vec::new();
    for page in 1..=first.pages {
        let result = service.list(TodoQuery { page, ..base.clone() }).await.unwrap();
        assert!(result.items.iter().all(|t| t.status == TodoStatus::Pending));
        seen.extend(result.items.into_iter().map(|t| t.id));
    }
    assert_eq!(seen.len() as u64, first.total);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len() as u64, first.total);
}

#[tokio::test]
async fn empty_listing_reports_one_page() {
    let page = service().list(TodoQuery::default()).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.pages, 1);
}

#[test]
fn page_count_rounds_up() {
    assert_eq!(page_count(0, 10), 1);
    assert_eq!(page_count(1, 10), 1);
    assert_eq!(page_count(10, 10), 1);
    assert_eq!(page_count(11, 10), 2);
    assert_eq!(page_count(3, 2), 2);
}

#[test]
fn page_offset_stays_addressable() {
    assert_eq!(page_offset(1, 10), Some(0));
    assert_eq!(page_offset(3, 10), Some(20));
    assert_eq!(page_offset(u64::MAX, 10), None);
    assert_eq!(page_offset(i64::MAX as u64, 2), None);
    assert_eq!(page_offset(0, 10), None);
}

#[tokio::test]
async fn delete_is_idempotent_in_outcome() {
    let service = service();
    assert!(!service.delete("507f1f77bcf86cd799439011").await.unwrap());
    assert!(!service.delete("507f1f77bcf86cd799439011").await.unwrap());

    let created = service.create(input("gone")).await.unwrap();
    assert!(service.delete(&created.id).await.unwrap());
    assert!(!service.delete(&created.id).await.unwrap());
    assert!(service.get(&created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn completing_an_overdue_todo_removes_it_from_overdue() {
    let service = service();
    let due = Utc::now() - Duration::hours(2);
    let late = service
        .create(CreateTodo { due_date: Some(due), ..input("late") })
        .await
        .unwrap();

    let overdue = service.list_overdue().await.unwrap();
    assert_eq!(overdue.iter().map(|t| &t.id).collect::<Vec<_>>(), vec![&late.id]);

    let update = UpdateTodo { status: Some(TodoStatus::Completed), ..Default::default() };
    let done = service.update(&late.id, update).await.unwrap().unwrap();
    assert_eq!(done.due_date, late.due_date);
    assert!(service.list_overdue().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_by_status_is_unpaginated() {
    let service = service();
    for i in 0..12 {
        service
            .create(CreateTodo { status: TodoStatus::InProgress, ..input(&format!("w{i}")) })
            .await
            .unwrap();
    }
    service.create(input("other")).await.unwrap();

    let in_progress = service.list_by_status(TodoStatus::InProgress).await.unwrap();
    assert_eq!(in_progress.len(), 12);
}

#[tokio::test]
async fn malformed_id_is_absent_not_an_error() {
    let got = service().get("not-a-valid-id").await.unwrap();
    assert!(got.is_none());
}

#[tokio::test]
async fn priority_sort_uses_rank() {
    let service = service();
    for priority in [TodoPriority::Low, TodoPriority::Medium, TodoPriority::High] {
        service.create(CreateTodo { priority, ..input("p") }).await.unwrap();
    }

    let query = TodoQuery {
        page: 1,
        size: 2,
        sort_by: SortField::Priority,
        sort_order: SortOrder::Asc,
        ..Default::default()
    };
    let page = service.list(query).await.unwrap();
    let priorities: Vec<_> = page.items.iter().map(|t| t.priority).collect();
    assert_eq!(priorities, vec![TodoPriority::Low, TodoPriority::Medium]);
    assert_eq!(page.total, 3);
    assert_eq!(page.pages, 2);
}

#[tokio::test]
async fn list_translates_page_to_skip() {
    let mut repo = MockTodoRepository::new();
    repo.expect_list()
        .withf(|options| options.skip == 20 && options.limit == 10)
        .times(1)
        .returning(|_| Ok((Vec::new(), 25)));

    let service = TodoServiceImpl::new(repo);
    let page = service.list(TodoQuery { page: 3, ..Default::default() }).await.unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.pages, 3);
    assert_eq!(page.page, 3);
}

#[tokio::test]
async fn invalid_query_never_reaches_the_store() {
    let mut repo = MockTodoRepository::new();
    repo.expect_list().never();
    let service = TodoServiceImpl::new(repo);

    let err = service.list(TodoQuery { page: 0, ..Default::default() }).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = service.list(TodoQuery { page: u64::MAX, ..Default::default() }).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn store_failures_propagate() {
    let mut repo = MockTodoRepository::new();
    repo.expect_create()
        .returning(|_| Err(DomainError::Persistence("connection refused".into())));
    repo.expect_list_overdue()
        .returning(|| Err(DomainError::Persistence("connection refused".into())));

    let service = TodoServiceImpl::new(repo);
    let err = service.create(input("x")).await.unwrap_err();
    assert!(matches!(err, DomainError::Persistence(ref m) if m == "connection refused"));
    assert!(service.list_overdue().await.is_err());
}
