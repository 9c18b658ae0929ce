use newswire_core::{Database, SourceConfig, run_cycle};
use newswire_scraper::Fetcher;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Drives scrape cycles: once at startup, then on a fixed interval, plus
/// on-demand triggers from the HTTP API. Cycles are serialized with a busy
/// flag; a trigger that lands while a cycle is running is dropped, not queued.
#[derive(Clone)]
pub struct Scheduler {
    fetcher: Fetcher,
    db: Arc<Mutex<Database>>,
    sources: Arc<Vec<SourceConfig>>,
    interval: Duration,
    offset_step: i64,
    busy: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn new(
        fetcher: Fetcher,
        db: Arc<Mutex<Database>>,
        sources: Vec<SourceConfig>,
        interval: Duration,
        offset_step: i64,
    ) -> Self {
        Scheduler {
            fetcher,
            db,
            sources: Arc::new(sources),
            interval,
            offset_step,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Spawn the periodic loop. The first tick fires immediately, so the
    /// store is populated at startup rather than after one full interval.
    pub fn start(&self) -> JoinHandle<()> {
        let scheduler = self.clone();
        info!(interval_secs = self.interval.as_secs(), "scheduler started");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(scheduler.interval);
            loop {
                ticker.tick().await;
                scheduler.run_once().await;
            }
        })
    }

    /// Request an on-demand cycle. The busy flag is claimed before the task
    /// is spawned, so a caller that gets `true` owns the cycle; `false` means
    /// one is already in flight and this request is dropped.
    pub fn trigger(&self) -> bool {
        if !self.claim() {
            return false;
        }
        let scheduler = self.clone();
        tokio::spawn(async move {
            scheduler.cycle_and_release().await;
        });
        true
    }

    pub async fn run_once(&self) {
        if !self.claim() {
            warn!("scrape cycle already in flight, skipping");
            return;
        }
        self.cycle_and_release().await;
    }

    fn claim(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    async fn cycle_and_release(&self) {
        let summary = run_cycle(&self.fetcher, &self.db, &self.sources, self.offset_step).await;
        info!(
            refreshed = summary.completed.len(),
            failed = summary.failed.len(),
            records = summary.total_records(),
            "scrape cycle finished"
        );

        self.busy.store(false, Ordering::SeqCst);
    }
}
