//! Background eviction of expired cache entries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::store::CoverCache;
use super::types::EvictionReport;

/// Runs eviction sweeps independently of the query path.
///
/// With no interval the sweeper runs a single sweep; otherwise it repeats on
/// a fixed interval until stopped. Callers that must not race the startup
/// sweep wait on [`EvictionSweeper::wait_for_initial_sweep`].
pub struct EvictionSweeper {
    cache: Arc<CoverCache>,
    max_age: Duration,
    interval: Option<Duration>,

    // Runtime state
    running: Arc<AtomicBool>,
    initial_pending: Arc<watch::Sender<bool>>,
    shutdown_tx: broadcast::Sender<()>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl EvictionSweeper {
    pub fn new(cache: Arc<CoverCache>, max_age: Duration, interval: Option<Duration>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let (initial_pending, _) = watch::channel(false);

        Self {
            cache,
            max_age,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            initial_pending: Arc::new(initial_pending),
            shutdown_tx,
            handle: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Spawn the sweep task.
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Eviction sweeper already running");
            return;
        }

        self.initial_pending.send_replace(true);

        let cache = Arc::clone(&self.cache);
        let running = Arc::clone(&self.running);
        let initial_pending = Arc::clone(&self.initial_pending);
        let max_age = self.max_age;
        let interval = self.interval;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let handle = tokio::spawn(async move {
            debug!("Eviction sweeper started");
            cache.evict_expired(max_age).await;
            initial_pending.send_replace(false);

            if let Some(interval) = interval {
                loop {
                    tokio::select! {
                        _ = shutdown_rx.recv() => {
                            debug!("Eviction sweeper received shutdown signal");
                            break;
                        }
                        _ = tokio::time::sleep(interval) => {
                            if !running.load(Ordering::Relaxed) {
                                break;
                            }
                            cache.evict_expired(max_age).await;
                        }
                    }
                }
            }

            running.store(false, Ordering::SeqCst);
            debug!("Eviction sweeper finished");
        });

        *self.handle.lock().await = Some(handle);
    }

    /// Wait until the first sweep after [`start`](Self::start) has finished.
    ///
    /// Returns immediately when the sweeper was never started or has stopped.
    pub async fn wait_for_initial_sweep(&self) {
        let mut rx = self.initial_pending.subscribe();
        let _ = rx.wait_for(|pending| !*pending).await;
    }

    /// Run one sweep on the caller's task.
    pub async fn sweep_now(&self) -> EvictionReport {
        self.cache.evict_expired(self.max_age).await
    }

    /// Stop the sweeper.
    ///
    /// Waits up to `grace` for a sweep in progress, then abandons it.
    pub async fn stop(&self, grace: Duration) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(());

        let Some(mut handle) = self.handle.lock().await.take() else {
            return;
        };

        if tokio::time::timeout(grace, &mut handle).await.is_err() {
            info!("Abandoning eviction sweep in progress");
            handle.abort();
        }
        self.initial_pending.send_replace(false);
    }
}
