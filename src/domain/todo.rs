use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::{Validate, ValidationError};

use super::id::DocumentId;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Position in the workflow, used for sorting.
    pub fn rank(self) -> u8 {
        self as u8
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TodoPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TodoPriority {
    pub const ALL: [TodoPriority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// A todo as held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: DocumentId,
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub priority: TodoPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTodo {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TodoStatus,
    #[serde(default)]
    pub priority: TodoPriority,
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update. Only fields that are `Some` are written.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTodo {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub priority: Option<TodoPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

impl UpdateTodo {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

impl Todo {
    /// Builds a fresh record for stores that assign ids in-process.
    pub fn new(input: CreateTodo) -> Self {
        let now = now();
        Self {
            id: DocumentId::new(),
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            due_date: input.due_date.map(|d| d.trunc_subsecs(3)),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateTodo) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = Some(due_date.trunc_subsecs(3));
        }
        self.updated_at = touched(self.updated_at);
    }

    pub fn is_overdue(&self, at: DateTime<Utc>) -> bool {
        self.status != TodoStatus::Completed && self.due_date.is_some_and(|due| due < at)
    }
}

/// Current instant at the store's millisecond resolution.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Refreshed `updated_at`, always at least one tick past `previous`.
pub fn touched(previous: DateTime<Utc>) -> DateTime<Utc> {
    now().max(previous + Duration::milliseconds(1))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    DueDate,
    Title,
    Status,
    Priority,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Paging, filtering and ordering of a todo listing.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TodoQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u64,
    #[serde(default = "default_size")]
    #[validate(range(min = 1, max = 100))]
    pub size: u64,
    pub status: Option<TodoStatus>,
    pub priority: Option<TodoPriority>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for TodoQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
            status: None,
            priority: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_size() -> u64 {
    10
}

/// Repository-level listing parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub skip: u64,
    pub limit: u64,
    pub status: Option<TodoStatus>,
    pub priority: Option<TodoPriority>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub priority: TodoPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id.to_string(),
            title: todo.title,
            description: todo.description,
            status: todo.status,
            priority: todo.priority,
            due_date: todo.due_date,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPage {
    pub items: Vec<TodoResponse>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
    pub pages: u64,
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn create(title: &str) -> CreateTodo {
        CreateTodo {
            title: title.into(),
            description: None,
            status: TodoStatus::default(),
            priority: TodoPriority::default(),
            due_date: None,
        }
    }

    #[test]
    fn create_defaults_to_pending_medium() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"Write report"}"#).unwrap();
        assert_eq!(input.status, TodoStatus::Pending);
        assert_eq!(input.priority, TodoPriority::Medium);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn title_bounds_are_enforced() {
        assert!(create("").validate().is_err());
        assert!(create("   ").validate().is_err());
        assert!(create(&"x".repeat(200)).validate().is_ok());
        assert!(create(&"x".repeat(201)).validate().is_err());
    }

    #[test]
    fn description_length_is_bounded() {
        let mut input = create("ok");
        input.description = Some("d".repeat(1000));
        assert!(input.validate().is_ok());
        input.description = Some("d".repeat(1001));
        assert!(input.validate().is_err());
    }

    #[test]
    fn update_validates_only_supplied_fields() {
        assert!(UpdateTodo::default().validate().is_ok());
        let blank = UpdateTodo { title: Some(" ".into()), ..Default::default() };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn update_is_empty_when_nothing_supplied() {
        let update: UpdateTodo = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert!(update.is_empty());
        let update: UpdateTodo = serde_json::from_str(r#"{"status": "completed"}"#).unwrap();
        assert!(!update.is_empty());
    }

    #[test]
    fn enums_use_snake_case() {
        assert_eq!(TodoStatus::InProgress.to_string(), "in_progress");
        assert_eq!(TodoStatus::from_str("completed").unwrap(), TodoStatus::Completed);
        assert!(TodoStatus::from_str("done").is_err());
        assert_eq!(serde_json::to_string(&TodoPriority::High).unwrap(), r#""high""#);
        assert_eq!(SortField::DueDate.to_string(), "due_date");
    }

    #[test]
    fn ranks_follow_declaration_order() {
        assert!(TodoPriority::Low.rank() < TodoPriority::Medium.rank());
        assert!(TodoPriority::Medium.rank() < TodoPriority::High.rank());
        assert!(TodoStatus::Pending.rank() < TodoStatus::Completed.rank());
    }

    #[test]
    fn apply_update_touches_only_supplied_fields() {
        let mut todo = Todo::new(CreateTodo { description: Some("keep".into()), ..create("Title") });
        let before = todo.clone();
        todo.apply_update(UpdateTodo { status: Some(TodoStatus::Completed), ..Default::default() });
        assert_eq!(todo.status, TodoStatus::Completed);
        assert_eq!(todo.title, before.title);
        assert_eq!(todo.description, before.description);
        assert_eq!(todo.priority, before.priority);
        assert_eq!(todo.created_at, before.created_at);
        assert!(todo.updated_at > before.updated_at);
    }

    #[test]
    fn touched_moves_past_future_timestamps() {
        let ahead = now() + Duration::seconds(5);
        assert_eq!(touched(ahead), ahead + Duration::milliseconds(1));
        let old = now() - Duration::seconds(5);
        assert!(touched(old) > old + Duration::milliseconds(1));
    }

    #[test]
    fn overdue_requires_past_due_date_and_open_status() {
        let now = Utc::now();
        let mut todo = Todo::new(create("Late"));
        assert!(!todo.is_overdue(now));
        todo.due_date = Some(now - Duration::hours(1));
        assert!(todo.is_overdue(now));
        todo.status = TodoStatus::Completed;
        assert!(!todo.is_overdue(now));
    }

    #[test]
    fn response_carries_plain_text_id() {
        let todo = Todo::new(create("Title"));
        let id = todo.id.to_string();
        let response = TodoResponse::from(todo);
        assert_eq!(response.id, id);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], serde_json::Value::String(id));
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn query_defaults() {
        let query: TodoQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.size, 10);
        assert_eq!(query.sort_by, SortField::CreatedAt);
        assert_eq!(query.sort_order, SortOrder::Desc);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn query_bounds_are_enforced() {
        let zero_page = TodoQuery { page: 0, ..Default::default() };
        assert!(zero_page.validate().is_err());
        let big = TodoQuery { size: 101, ..Default::default() };
        assert!(big.validate().is_err());
        let empty = TodoQuery { size: 0, ..Default::default() };
        assert!(empty.validate().is_err());
    }
}
