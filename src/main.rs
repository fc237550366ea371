use std::sync::Arc;

use anyhow::Context;
use bb8_postgres::bb8::Pool;
use bb8_postgres::tokio_postgres::NoTls;
use bb8_postgres::PostgresConnectionManager;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use restaurant_search::config::Config;
use restaurant_search::controller::{self, AppState};
use restaurant_search::repositories::postgres_repo::PostgresConnectionRepo;
use restaurant_search::services::search_service::SearchService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();

    info!(
        "Connecting to postgres at {}:{}/{} as {}",
        config.db_host, config.db_port, config.db_name, config.db_user
    );
    let manager = PostgresConnectionManager::new(config.postgres_config(), NoTls);
    let postgres_connection = Pool::builder()
        .max_size(config.db_pool_size)
        .connection_timeout(config.connection_timeout())
        .build(manager)
        .await
        .context("Error building the postgres connection pool")?;
    info!("Postgres pool ready with up to {} connections", config.db_pool_size);

    let search_service = SearchService::new(
        Arc::new(PostgresConnectionRepo::new(postgres_connection)),
        config.search_settings(),
    );
    let app_state = AppState {
        search_service: Arc::new(search_service),
    };

    controller::serve(app_state, config.listen_addr).await
}
