use std::sync::Arc;

use board_server::application::post_service::PostService;
use board_server::data::memory_post_repository::InMemoryPostRepository;
use board_server::data::post_repository::PostgresPostRepository;
use board_server::infrastructure::config::{AppConfig, StorageConfig};
use board_server::infrastructure::database::{create_pool, run_migrations};
use board_server::infrastructure::logging::init_logging;
use board_server::server::start_rest_server;
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;

    match config.storage.clone() {
        StorageConfig::Postgres { database_url, pool } => {
            let pool = create_pool(&database_url, &pool).await?;
            run_migrations(&pool).await?;

            let post_repo = Arc::new(PostgresPostRepository::new(pool));
            start_rest_server(config, PostService::new(post_repo)).await
        }
        StorageConfig::Memory => {
            warn!("using in-memory storage, posts are lost on shutdown");
            let post_repo = Arc::new(InMemoryPostRepository::new());
            start_rest_server(config, PostService::new(post_repo)).await
        }
    }?;

    info!("server stopped");
    Ok(())
}
