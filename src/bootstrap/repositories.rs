use migration::{Migrator, MigratorTrait};
use std::sync::Arc;

use crate::config::Config;
use crate::db;
use crate::modules::shipping::infra::persistence::{
    InMemoryMethodRepository, InMemoryQuoteRepository, InMemoryZoneRepository,
    SeaOrmMethodRepository, SeaOrmQuoteRepository, SeaOrmZoneRepository,
};
use crate::modules::shipping::repository::{MethodRepository, QuoteRepository, ZoneRepository};

type Repos = (
    Arc<dyn MethodRepository>,
    Arc<dyn ZoneRepository>,
    Arc<dyn QuoteRepository>,
);

pub async fn init_repositories(config: &Config) -> Repos {
    if config.app_env == "dev" {
        tracing::warn!("Using InMemory repositories for dev env, data will not survive restarts");
        return (
            Arc::new(InMemoryMethodRepository::default()),
            Arc::new(InMemoryZoneRepository::default()),
            Arc::new(InMemoryQuoteRepository::default()),
        );
    }

    let conn = Arc::new(
        db::connect(config)
            .await
            .expect("Failed to connect to database"),
    );
    tracing::info!("Connected to database");

    Migrator::up(conn.as_ref(), None)
        .await
        .expect("Failed to run migrations");

    (
        Arc::new(SeaOrmMethodRepository::new(conn.clone())),
        Arc::new(SeaOrmZoneRepository::new(conn.clone())),
        Arc::new(SeaOrmQuoteRepository::new(conn)),
    )
}
