//! Landing-page counters

use crate::{error::AppResult, models::instance::LoanStatus, repository::Repository};

/// Catalog-wide counts, recomputed on every request
#[derive(Debug, Clone, Copy)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Count books, copies, available copies and authors. No caching; the
    /// dataset is small and the figures must be fresh.
    pub async fn catalog_counts(&self) -> AppResult<CatalogCounts> {
        let num_books = self.repository.books.count().await?;
        let num_instances = self.repository.instances.count().await?;
        let num_instances_available = self
            .repository
            .instances
            .count_by_status(LoanStatus::Available)
            .await?;
        let num_authors = self.repository.authors.count().await?;

        Ok(CatalogCounts {
            num_books,
            num_instances,
            num_instances_available,
            num_authors,
        })
    }
}
