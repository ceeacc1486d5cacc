use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};

use crate::application::user_service::UserService;
use crate::domain::user::{CreateUser, UserResponse};
use crate::http::extract::ValidatedJson;
use crate::http::types::{ApiError, failed};

const NOT_FOUND: ApiError = ApiError::NotFound("User not found");

#[derive(Clone)]
pub struct AppState<S: UserService> {
    pub service: S,
}

pub fn router<S: UserService + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route("/users", get(list_users::<S>).post(create_user::<S>))
        .route("/users/:id", get(get_user::<S>).delete(delete_user::<S>))
        .with_state(state)
}

async fn create_user<S: UserService + Clone>(
    State(state): State<AppState<S>>,
    ValidatedJson(payload): ValidatedJson<CreateUser>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.service.create(payload).await.map_err(failed("create user"))?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users<S: UserService + Clone>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.service.list().await.map_err(failed("retrieve users"))?;
    Ok(Json(users))
}

async fn get_user<S: UserService + Clone>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.service.get(&id).await.map_err(failed("retrieve user"))?;
    user.map(Json).ok_or(NOT_FOUND)
}

async fn delete_user<S: UserService + Clone>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let deleted = state.service.delete(&id).await.map_err(failed("delete user"))?;
    if deleted { Ok(Json(json!({ "message": "User deleted" }))) } else { Err(NOT_FOUND) }
}
