use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::application::todo_service::TodoService;
use crate::domain::todo::{CreateTodo, TodoPage, TodoQuery, TodoResponse, TodoStatus, UpdateTodo};
use crate::http::extract::{ValidatedJson, ValidatedQuery};
use crate::http::types::{ApiError, failed};

const NOT_FOUND: ApiError = ApiError::NotFound("Todo not found");

#[derive(Clone)]
pub struct AppState<S: TodoService> {
    pub service: S,
}

pub fn router<S: TodoService + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route("/todos", get(list_todos::<S>).post(create_todo::<S>))
        .route("/todos/overdue/list", get(list_overdue::<S>))
        .route("/todos/status/:status", get(list_by_status::<S>))
        .route(
            "/todos/:id",
            get(get_todo::<S>).put(update_todo::<S>).delete(delete_todo::<S>),
        )
        .with_state(state)
}

async fn create_todo<S: TodoService + Clone>(
    State(state): State<AppState<S>>,
    ValidatedJson(payload): ValidatedJson<CreateTodo>,
) -> Result<(StatusCode, Json<TodoResponse>), ApiError> {
    let todo = state.service.create(payload).await.map_err(failed("create todo"))?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn list_todos<S: TodoService + Clone>(
    State(state): State<AppState<S>>,
    ValidatedQuery(query): ValidatedQuery<TodoQuery>,
) -> Result<Json<TodoPage>, ApiError> {
    let page = state.service.list(query).await.map_err(failed("retrieve todos"))?;
    Ok(Json(page))
}

async fn get_todo<S: TodoService + Clone>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo = state.service.get(&id).await.map_err(failed("retrieve todo"))?;
    todo.map(Json).ok_or(NOT_FOUND)
}

async fn update_todo<S: TodoService + Clone>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateTodo>,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo = state.service.update(&id, payload).await.map_err(failed("update todo"))?;
    todo.map(Json).ok_or(NOT_FOUND)
}

async fn delete_todo<S: TodoService + Clone>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.service.delete(&id).await.map_err(failed("delete todo"))?;
    if deleted { Ok(StatusCode::NO_CONTENT) } else { Err(NOT_FOUND) }
}

async fn list_by_status<S: TodoService + Clone>(
    State(state): State<AppState<S>>,
    Path(status): Path<String>,
) -> Result<Json<Vec<TodoResponse>>, ApiError> {
    let status = TodoStatus::from_str(&status)
        .map_err(|_| ApiError::Validation(format!("invalid status '{status}'")))?;
    let todos = state
        .service
        .list_by_status(status)
        .await
        .map_err(failed("retrieve todos by status"))?;
    Ok(Json(todos))
}

async fn list_overdue<S: TodoService + Clone>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<TodoResponse>>, ApiError> {
    let todos = state.service.list_overdue().await.map_err(failed("retrieve overdue todos"))?;
    Ok(Json(todos))
}
