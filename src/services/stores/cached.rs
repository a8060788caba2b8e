use std::sync::Arc;

use super::RecipeStore;
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::AppResult,
    models::{Recipe, RecipeId, RecipeSummary},
};

/// Read-through Redis cache in front of another recipe store
///
/// Recipes only change when the offline similarity job runs, so catalog scans
/// and id lookups are cached for `ttl` seconds. Poll samples are never cached.
#[derive(Clone)]
pub struct CachedRecipeStore {
    inner: Arc<dyn RecipeStore>,
    cache: Cache,
    ttl: u64,
}

impl CachedRecipeStore {
    pub fn new(inner: Arc<dyn RecipeStore>, cache: Cache, ttl: u64) -> Self {
        Self { inner, cache, ttl }
    }
}

#[async_trait::async_trait]
impl RecipeStore for CachedRecipeStore {
    async fn catalog(&self) -> AppResult<Vec<Recipe>> {
        cached!(self.cache, CacheKey::Catalog, self.ttl, async {
            self.inner.catalog().await
        })
    }

    async fn find_by_ids(&self, ids: &[RecipeId]) -> AppResult<Vec<Recipe>> {
        let key = CacheKey::RecipeLookup(ids.to_vec());
        cached!(self.cache, key, self.ttl, async {
            self.inner.find_by_ids(ids).await
        })
    }

    async fn sample(&self, size: usize) -> AppResult<Vec<RecipeSummary>> {
        self.inner.sample(size).await
    }

    fn name(&self) -> &'static str {
        "redis-cached"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_redis_client;
    use crate::services::stores::MockRecipeStore;

    fn unreachable_cache() -> Cache {
        // Nothing listens on port 1, so every cache read fails to connect
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, _handle) = Cache::new(client);
        cache
    }

    #[tokio::test]
    async fn test_catalog_falls_back_when_redis_is_down() {
        let mut inner = MockRecipeStore::new();
        inner
            .expect_catalog()
            .times(1)
            .returning(|| Ok(vec![Recipe::new("r1", "Hummus", "hummus.jpg")]));

        let store = CachedRecipeStore::new(Arc::new(inner), unreachable_cache(), 60);

        let catalog = store.catalog().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].id, RecipeId::new("r1"));
    }

    #[tokio::test]
    async fn test_lookup_falls_back_when_redis_is_down() {
        let mut inner = MockRecipeStore::new();
        inner
            .expect_find_by_ids()
            .times(1)
            .returning(|_| Ok(vec![Recipe::new("r2", "Fattoush", "fattoush.jpg")]));

        let store = CachedRecipeStore::new(Arc::new(inner), unreachable_cache(), 60);

        let found = store.find_by_ids(&[RecipeId::new("r2")]).await.unwrap();
        assert_eq!(found, vec![Recipe::new("r2", "Fattoush", "fattoush.jpg")]);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis instance"]
    async fn test_catalog_served_from_cache_on_second_call() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let client = create_redis_client(&redis_url).unwrap();
        let (cache, handle) = Cache::new(client.clone());

        let mut inner = MockRecipeStore::new();
        inner
            .expect_catalog()
            .times(1)
            .returning(|| Ok(vec![Recipe::new("r1", "Hummus", "hummus.jpg")]));

        let store = CachedRecipeStore::new(Arc::new(inner), cache, 60);

        let first = store.catalog().await.unwrap();
        handle.shutdown().await;
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        let second = store.catalog().await.unwrap();

        assert_eq!(first, second);

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = redis::AsyncCommands::del(&mut conn, CacheKey::Catalog.to_string())
            .await
            .unwrap();
    }
}
