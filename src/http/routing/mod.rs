pub mod todos;
pub mod users;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::application::{todo_service::TodoService, user_service::UserService};

/// Name and version reported by the health endpoints.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
}

/// Resource routes for both services, without prefix.
pub fn api<T, U>(todo_service: T, user_service: U) -> Router
where
    T: TodoService + Clone,
    U: UserService + Clone,
{
    todos::router(todos::AppState { service: todo_service })
        .merge(users::router(users::AppState { service: user_service }))
}

/// Full application: health endpoints at the root, resources under `prefix`.
pub fn app(info: ServiceInfo, prefix: &str, api: Router) -> Router {
    let router: Router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(Arc::new(info));

    let prefix = prefix.trim_matches('/');
    let router = if prefix.is_empty() {
        router.merge(api)
    } else {
        router.nest(&format!("/{prefix}"), api)
    };

    router.layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    )
}

async fn root(State(info): State<Arc<ServiceInfo>>) -> Json<Value> {
    Json(json!({
        "message": format!("Welcome to {}", info.name),
        "version": info.version,
        "status": "healthy",
    }))
}

async fn health(State(info): State<Arc<ServiceInfo>>) -> Json<Value> {
    Json(json!({ "status": "healthy", "version": info.version }))
}
