use std::sync::Arc;

use recipe_api::{
    config::Config,
    db::{self, Cache, CacheWriterHandle},
    routes::{create_router, AppState},
    services::stores::{CachedRecipeStore, PgFeedbackStore, PgRecipeStore, RecipeStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("recipe_api=debug,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db_pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&db_pool).await?;

    let mut recipes: Arc<dyn RecipeStore> = Arc::new(PgRecipeStore::new(db_pool.clone()));
    let mut cache_handle: Option<CacheWriterHandle> = None;

    if let Some(redis_url) = &config.redis_url {
        let client = db::create_redis_client(redis_url)?;
        let (cache, handle) = Cache::new(client);
        recipes = Arc::new(CachedRecipeStore::new(
            recipes,
            cache,
            config.catalog_cache_ttl_secs,
        ));
        cache_handle = Some(handle);
        tracing::info!("Recipe catalog caching enabled");
    }

    let state = AppState::new(
        recipes,
        Arc::new(PgFeedbackStore::new(db_pool)),
        config.recommendation(),
    )
    .with_poll_sample_size(config.poll_sample_size);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
