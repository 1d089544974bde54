//! News service

use anyhow::Result;
use std::sync::Arc;

use crate::db::repositories::NewsRepository;
use crate::models::{CreateNewsInput, News};

/// News service
///
/// News has no web-side write surface; `create` backs fixtures and import
/// tooling, and the read paths back the home and detail pages.
pub struct NewsService {
    repo: Arc<dyn NewsRepository>,
}

impl NewsService {
    pub fn new(repo: Arc<dyn NewsRepository>) -> Self {
        Self { repo }
    }

    /// Create a news item.
    pub async fn create(&self, input: CreateNewsInput) -> Result<News> {
        self.repo.create(&input).await
    }

    /// Get one news item.
    pub async fn get(&self, id: i64) -> Result<Option<News>> {
        self.repo.get_by_id(id).await
    }

    /// The newest news for the home page, capped at `limit`.
    pub async fn home_page(&self, limit: i64) -> Result<Vec<News>> {
        self.repo.list_recent(limit.max(0)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxNewsRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> NewsService {
        let pool = create_test_pool().await.expect("pool");
        migrations::run_migrations(&pool).await.expect("migrations");
        NewsService::new(SqlxNewsRepository::boxed(pool))
    }

    #[tokio::test]
    async fn test_home_page_caps_item_count() {
        let service = setup().await;
        for i in 0..15 {
            service
                .create(CreateNewsInput::new(format!("News {}", i), "Some text"))
                .await
                .expect("create");
        }

        let shown = service.home_page(10).await.expect("home");
        assert_eq!(shown.len(), 10);
    }

    #[tokio::test]
    async fn test_home_page_with_fewer_items_than_cap() {
        let service = setup().await;
        service
            .create(CreateNewsInput::new("Only one", "Some text"))
            .await
            .expect("create");

        let shown = service.home_page(10).await.expect("home");
        assert_eq!(shown.len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_news() {
        let service = setup().await;
        assert!(service.get(999).await.expect("get").is_none());
    }
}
