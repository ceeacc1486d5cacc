//! MongoDB implementation of `TodoRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Bson, Document, doc, oid::ObjectId},
    options::{FindOptions, IndexOptions},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::{
    error::{DomainError, DomainResult},
    id::DocumentId,
    repository::TodoRepository,
    todo::{
        self, CreateTodo, ListOptions, SortField, SortOrder, Todo, TodoPriority, TodoStatus,
        UpdateTodo,
    },
};

const RANK_FIELD: &str = "_sort_rank";

/// Stored form of a todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TodoDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    description: Option<String>,
    status: TodoStatus,
    priority: TodoPriority,
    due_date: Option<bson::DateTime>,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

impl From<TodoDocument> for Todo {
    fn from(doc: TodoDocument) -> Self {
        Self {
            id: doc.id.into(),
            title: doc.title,
            description: doc.description,
            status: doc.status,
            priority: doc.priority,
            due_date: doc.due_date.map(|d| d.to_chrono()),
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

#[derive(Clone)]
pub struct MongoTodoRepository {
    collection: Collection<TodoDocument>,
}

impl MongoTodoRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self { collection: db.collection::<TodoDocument>(collection_name) }
    }

    async fn find_by_object_id(&self, id: ObjectId) -> DomainResult<Option<Todo>> {
        let found = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(found.map(Todo::from))
    }

    async fn find_all(&self, filter: Document) -> DomainResult<Vec<Todo>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let cursor = self.collection.find(filter).with_options(options).await?;
        let docs: Vec<TodoDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Todo::from).collect())
    }
}

fn insert_document(input: &CreateTodo, now: DateTime<Utc>) -> Document {
    let now = bson::DateTime::from_chrono(now);
    doc! {
        "title": input.title.as_str(),
        "description": input.description.clone(),
        "status": input.status.to_string(),
        "priority": input.priority.to_string(),
        "due_date": input.due_date.map(bson::DateTime::from_chrono),
        "created_at": now,
        "updated_at": now,
    }
}

/// Single-stage update pipeline writing only the supplied fields. Values are
/// wrapped in `$literal` so text such as `"$title"` is never read as a path.
/// `updated_at` always moves at least one millisecond past its stored value.
fn update_pipeline(input: &UpdateTodo, now: DateTime<Utc>) -> Vec<Document> {
    let mut set = Document::new();
    let mut put = |field: &str, value: Bson| {
        set.insert(field, doc! { "$literal": value });
    };
    if let Some(ref title) = input.title {
        put("title", Bson::String(title.clone()));
    }
    if let Some(ref description) = input.description {
        put("description", Bson::String(description.clone()));
    }
    if let Some(status) = input.status {
        put("status", Bson::String(status.to_string()));
    }
    if let Some(priority) = input.priority {
        put("priority", Bson::String(priority.to_string()));
    }
    if let Some(due_date) = input.due_date {
        put("due_date", Bson::DateTime(bson::DateTime::from_chrono(due_date)));
    }
    set.insert(
        "updated_at",
        doc! {
            "$max": [
                bson::DateTime::from_chrono(now),
                { "$add": ["$updated_at", 1_i64] },
            ]
        },
    );
    vec![doc! { "$set": set }]
}

fn build_filter(options: &ListOptions) -> Document {
    let mut filter = Document::new();
    if let Some(status) = options.status {
        filter.insert("status", status.to_string());
    }
    if let Some(priority) = options.priority {
        filter.insert("priority", priority.to_string());
    }
    filter
}

fn overdue_filter(now: DateTime<Utc>) -> Document {
    doc! {
        "due_date": { "$lt": bson::DateTime::from_chrono(now) },
        "status": { "$ne": TodoStatus::Completed.to_string() },
    }
}

fn direction(order: SortOrder) -> i32 {
    match order {
        SortOrder::Asc => 1,
        SortOrder::Desc => -1,
    }
}

/// Enum fields sort by their declared rank, not alphabetically. Returns the
/// expression computing that rank, or `None` for fields with a natural order.
fn rank_expression(field: SortField) -> Option<Bson> {
    let (path, values): (&str, Vec<String>) = match field {
        SortField::Status => ("$status", TodoStatus::ALL.iter().map(ToString::to_string).collect()),
        SortField::Priority => {
            ("$priority", TodoPriority::ALL.iter().map(ToString::to_string).collect())
        }
        _ => return None,
    };
    Some(Bson::Document(doc! { "$indexOfArray": [values, path] }))
}

fn ranked_pipeline(filter: Document, rank: Bson, options: &ListOptions) -> Vec<Document> {
    let dir = direction(options.sort_order);
    let skip = options.skip as i64;
    let limit = options.limit as i64;
    vec![
        doc! { "$match": filter },
        doc! { "$addFields": { RANK_FIELD: rank } },
        doc! { "$sort": { RANK_FIELD: dir, "_id": dir } },
        doc! { "$skip": skip },
        doc! { "$limit": limit },
        doc! { "$project": { RANK_FIELD: 0 } },
    ]
}

#[async_trait]
impl TodoRepository for MongoTodoRepository {
    async fn init(&self) -> DomainResult<()> {
        let indexes = ["status", "priority", "due_date", "created_at"]
            .into_iter()
            .map(|field| {
                IndexModel::builder()
                    .keys(doc! { field: 1 })
                    .options(IndexOptions::builder().name(format!("idx_{field}")).build())
                    .build()
            })
            .collect::<Vec<_>>();
        self.collection.create_indexes(indexes).await?;
        tracing::info!("todo indexes ensured");
        Ok(())
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    async fn create(&self, input: CreateTodo) -> DomainResult<Todo> {
        let document = insert_document(&input, todo::now());
        let result = self
            .collection
            .clone_with_type::<Document>()
            .insert_one(document)
            .await?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            DomainError::Persistence(format!("unexpected inserted id {}", result.inserted_id))
        })?;

        let created = self.find_by_object_id(id).await?.ok_or_else(|| {
            DomainError::Persistence(format!("todo {id} missing after insert"))
        })?;
        tracing::info!(todo_id = %created.id, "todo created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<Todo>> {
        let Some(id) = DocumentId::parse(id) else { return Ok(None) };
        self.find_by_object_id(id.object_id()).await
    }

    #[instrument(skip(self))]
    async fn list(&self, options: ListOptions) -> DomainResult<(Vec<Todo>, u64)> {
        let filter = build_filter(&options);
        let total = self.collection.count_documents(filter.clone()).await?;

        let docs: Vec<TodoDocument> = match rank_expression(options.sort_by) {
            Some(rank) => {
                let pipeline = ranked_pipeline(filter, rank, &options);
                let cursor = self.collection.aggregate(pipeline).await?;
                let raw: Vec<Document> = cursor.try_collect().await?;
                raw.into_iter()
                    .map(bson::from_document::<TodoDocument>)
                    .collect::<Result<_, _>>()?
            }
            None => {
                let dir = direction(options.sort_order);
                let field = options.sort_by.to_string();
                let find_options = FindOptions::builder()
                    .sort(doc! { field: dir, "_id": dir })
                    .skip(options.skip)
                    .limit(options.limit as i64)
                    .build();
                let cursor = self.collection.find(filter).with_options(find_options).await?;
                cursor.try_collect().await?
            }
        };

        Ok((docs.into_iter().map(Todo::from).collect(), total))
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: &str, input: UpdateTodo) -> DomainResult<Option<Todo>> {
        let Some(id) = DocumentId::parse(id) else { return Ok(None) };
        if input.is_empty() {
            return self.find_by_object_id(id.object_id()).await;
        }

        let result = self
            .collection
            .update_one(
                doc! { "_id": id.object_id() },
                update_pipeline(&input, todo::now()),
            )
            .await?;
        if result.matched_count == 0 {
            return Ok(None);
        }

        tracing::info!(todo_id = %id, "todo updated");
        self.find_by_object_id(id.object_id()).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let Some(id) = DocumentId::parse(id) else { return Ok(false) };
        let result = self.collection.delete_one(doc! { "_id": id.object_id() }).await?;
        let deleted = result.deleted_count == 1;
        if deleted {
            tracing::info!(todo_id = %id, "todo deleted");
        }
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn list_by_status(&self, status: TodoStatus) -> DomainResult<Vec<Todo>> {
        self.find_all(doc! { "status": status.to_string() }).await
    }

    #[instrument(skip(self))]
    async fn list_overdue(&self) -> DomainResult<Vec<Todo>> {
        self.find_all(overdue_filter(todo::now())).await
    }
}
