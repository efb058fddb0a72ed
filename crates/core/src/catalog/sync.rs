//! Background availability sync.
//!
//! Periodically loads the trending dimension of each kind and resolves
//! watch-provider availability for stored items that were never checked, so
//! the by-platforms dimension has data before anyone opens an item page.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{info, warn};

use super::{CatalogService, ContentKind};

pub struct AvailabilitySync {
    catalog: Arc<CatalogService>,
    interval: Duration,
    batch: usize,
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl AvailabilitySync {
    pub fn new(catalog: Arc<CatalogService>, interval: Duration, batch: usize) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            catalog,
            interval,
            batch,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// One pass over both kinds. Returns the number of items checked.
    pub async fn run_once(&self) -> usize {
        Self::sync_pass(&self.catalog, self.batch).await
    }

    async fn sync_pass(catalog: &CatalogService, batch: usize) -> usize {
        let mut checked = 0;
        for kind in [ContentKind::Movie, ContentKind::Series] {
            if let Err(e) = catalog.warm_up(kind).await {
                warn!(kind = %kind, error = %e, "Failed to load trending before sync");
            }
            match catalog.sync_availability(kind, batch).await {
                Ok(n) => checked += n,
                Err(e) => warn!(kind = %kind, error = %e, "Availability sync failed"),
            }
        }
        checked
    }

    /// Spawn the sync loop. The first pass runs immediately.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Availability sync already running");
            return;
        }

        let catalog = Arc::clone(&self.catalog);
        let running = Arc::clone(&self.running);
        let interval = self.interval;
        let batch = self.batch;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), batch, "Availability sync started");
            loop {
                if !running.load(Ordering::Relaxed) {
                    break;
                }
                Self::sync_pass(&catalog, batch).await;

                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Availability sync received shutdown signal");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {}
                }
            }
        });
    }

    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown_tx.send(());
        info!("Availability sync stopped");
    }
}
