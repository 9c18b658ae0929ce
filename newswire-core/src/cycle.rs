use crate::config::SourceConfig;
use crate::mapper::map_records;
use crate::store::{Database, StoreError};
use newswire_scraper::{ExtractError, FetchError, Fetcher, extract};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Why one source's refresh failed. Caught at the cycle boundary; a failing
/// source never aborts the rest of the cycle or the process.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of one fetch→extract→map→store pass over all configured sources.
#[derive(Debug, Default)]
pub struct CycleSummary {
    /// (source url, records written) per refreshed source.
    pub completed: Vec<(String, usize)>,
    /// (source url, error text) per skipped source.
    pub failed: Vec<(String, String)>,
}

impl CycleSummary {
    pub fn total_records(&self) -> usize {
        self.completed.iter().map(|(_, count)| count).sum()
    }
}

/// Run one scrape cycle, sequentially over `sources`. Each source's stored
/// records are replaced wholesale; per-source errors are logged and recorded
/// in the summary.
pub async fn run_cycle(
    fetcher: &Fetcher,
    db: &Mutex<Database>,
    sources: &[SourceConfig],
    offset_step: i64,
) -> CycleSummary {
    let mut summary = CycleSummary::default();

    for (position, source) in sources.iter().enumerate() {
        let offset = position as i64 * offset_step;
        match scrape_source(fetcher, db, source, offset).await {
            Ok(count) => {
                info!(site = %source.url, records = count, "source refreshed");
                summary.completed.push((source.url.clone(), count));
            }
            Err(e) => {
                error!(site = %source.url, error = %e, "source failed, skipping for this cycle");
                summary.failed.push((source.url.clone(), e.to_string()));
            }
        }
    }

    summary
}

async fn scrape_source(
    fetcher: &Fetcher,
    db: &Mutex<Database>,
    source: &SourceConfig,
    offset: i64,
) -> Result<usize, SourceError> {
    // Validated at config load; re-compiled here because compiled selectors
    // hold parser state that is cheaper to rebuild than to share.
    let selectors = source.selectors.compile()?;

    let html = fetcher.fetch(&source.url).await?;
    let extraction = extract(&html, &selectors);
    let records = map_records(&extraction, &source.url, offset);

    // An empty extraction still replaces: stale rows from the previous cycle
    // must not outlive the page that no longer shows them.
    let mut db = db.lock().await;
    Ok(db.replace_for_source(&source.url, &records)?)
}
