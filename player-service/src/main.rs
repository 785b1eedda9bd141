use player_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    match config.database.clone() {
        #[cfg(feature = "database")]
        Some(db) => {
            let pool = player_service::database::create_pool(&db).await?;
            let repository = PgPlayerRepository::new(pool);
            if db.ensure_schema {
                repository.ensure_schema().await?;
            }
            run(config, repository).await
        }
        #[cfg(not(feature = "database"))]
        Some(_) => {
            tracing::warn!("Database configured but the `database` feature is disabled; using in-memory storage");
            run(config, InMemoryPlayerRepository::new()).await
        }
        None => {
            tracing::info!("No database configured; using in-memory storage");
            run(config, InMemoryPlayerRepository::new()).await
        }
    }
}

async fn run<R: PlayerRepository>(config: Config, repository: R) -> Result<()> {
    tracing::info!(backend = R::BACKEND, "Player storage ready");
    let state = AppState::new(config.clone(), repository);
    Server::new(config).serve(app(state)).await
}
