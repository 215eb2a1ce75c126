use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::domain::entities::dataset::Dataset;
use crate::domain::entities::grid::GridState;
use crate::usecase::ports::remote::{RecordSource, SourceError};

pub const COUNT_TTL: Duration = Duration::from_secs(5 * 60);

pub struct QueryService {
    source: Arc<dyn RecordSource>,
    count_ttl: Duration,
    cached_count: Mutex<Option<(u64, Instant)>>,
}

impl QueryService {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self::with_count_ttl(source, COUNT_TTL)
    }

    pub fn with_count_ttl(source: Arc<dyn RecordSource>, count_ttl: Duration) -> Self {
        Self {
            source,
            count_ttl,
            cached_count: Mutex::new(None),
        }
    }

    /// Fetches the page described by `grid`, paired with the overall row
    /// count.
    pub async fn load_page(&self, grid: &GridState) -> Result<Dataset, SourceError> {
        let query = grid.page_query();
        tracing::debug!(page = query.page, page_size = query.page_size, order = %query.order, "loading record page");

        let page = self.source.fetch_page(&query).await?;
        let total_count = self.total_count().await?;

        Ok(Dataset::page(page.rows, total_count))
    }

    /// Total number of records, cached for `count_ttl`.
    pub async fn total_count(&self) -> Result<u64, SourceError> {
        if let Some(count) = self.fresh_count() {
            return Ok(count);
        }

        let count = self.source.fetch_count().await?;
        if let Ok(mut cached) = self.cached_count.lock() {
            *cached = Some((count, Instant::now()));
        }
        Ok(count)
    }

    pub fn invalidate_count(&self) {
        if let Ok(mut cached) = self.cached_count.lock() {
            *cached = None;
        }
    }

    fn fresh_count(&self) -> Option<u64> {
        let cached = self.cached_count.lock().ok()?;
        cached
            .filter(|(_, fetched_at)| fetched_at.elapsed() < self.count_ttl)
            .map(|(count, _)| count)
    }
}
