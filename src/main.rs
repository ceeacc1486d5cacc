use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use todo_api::{
    application::{todo_service::TodoServiceImpl, user_service::UserServiceImpl},
    config::{Settings, StoreKind},
    domain::repository::{TodoRepository, UserRepository},
    http::routing::{self, ServiceInfo},
    infrastructure::{
        memory_repo::{InMemoryTodoRepository, InMemoryUserRepository},
        mongo,
        mongo_todo_repo::MongoTodoRepository,
        mongo_user_repo::MongoUserRepository,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(%err, "ignoring unreadable .env"),
    }

    let settings = Settings::from_env()?;
    let info = ServiceInfo { name: settings.app_name.clone(), version: settings.app_version.clone() };
    tracing::info!(store = %settings.store, "starting {}", settings.app_name);

    match settings.store {
        StoreKind::Memory => {
            let api = build_api(InMemoryTodoRepository::new(), InMemoryUserRepository::new()).await?;
            serve(settings.bind_addr, routing::app(info, &settings.api_prefix, api)).await
        }
        StoreKind::Mongo => {
            let client = mongo::connect(&settings).await.context("failed to connect to MongoDB")?;
            let db = mongo::database(&client, &settings);
            let api = build_api(
                MongoTodoRepository::new(&db, &settings.todos_collection),
                MongoUserRepository::new(&db, &settings.users_collection),
            )
            .await?;

            let result = serve(settings.bind_addr, routing::app(info, &settings.api_prefix, api)).await;
            client.shutdown().await;
            tracing::info!("disconnected from MongoDB");
            result
        }
    }
}

async fn build_api<T, U>(todos: T, users: U) -> anyhow::Result<Router>
where
    T: TodoRepository + Clone,
    U: UserRepository + Clone,
{
    todos.init().await.context("failed to prepare todo store")?;
    users.init().await.context("failed to prepare user store")?;
    Ok(routing::api(TodoServiceImpl::new(todos), UserServiceImpl::new(users)))
}

async fn serve(addr: SocketAddr, router: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    if let Err(err) = ctrl_c().await {
        // Without a signal handler the server runs until the process is killed.
        tracing::error!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown");
}
