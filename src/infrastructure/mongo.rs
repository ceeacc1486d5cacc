use std::time::Duration;

use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use tracing::info;

use crate::config::Settings;
use crate::domain::error::DomainError;

impl From<mongodb::error::Error> for DomainError {
    fn from(err: mongodb::error::Error) -> Self {
        DomainError::Persistence(err.to_string())
    }
}

impl From<bson::de::Error> for DomainError {
    fn from(err: bson::de::Error) -> Self {
        DomainError::Persistence(format!("malformed document: {err}"))
    }
}

/// Opens the process-wide client and checks the server answers a ping.
pub async fn connect(settings: &Settings) -> Result<Client, mongodb::error::Error> {
    let mut options = ClientOptions::parse(&settings.mongodb_url).await?;
    options.app_name = Some(settings.app_name.clone());
    options.connect_timeout = Some(Duration::from_secs(10));
    options.server_selection_timeout = Some(Duration::from_secs(30));

    let client = Client::with_options(options)?;
    client.database("admin").run_command(doc! { "ping": 1 }).await?;

    info!(database = %settings.database_name, "connected to MongoDB");
    Ok(client)
}

pub fn database(client: &Client, settings: &Settings) -> Database {
    client.database(&settings.database_name)
}
