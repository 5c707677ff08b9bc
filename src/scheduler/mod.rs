//! Periodic refresh of every tracked feed.
//!
//! Ticks fire at `origin + k * interval`, where `origin` is the moment
//! [`Scheduler::run`] started. A tick whose batch overruns the next boundary
//! skips the missed boundaries instead of firing late ones back to back.
//!
//! Refresh tasks are spawned with [`tokio::task::spawn_local`], so `run` and
//! `run_tick` must be driven from inside a [`tokio::task::LocalSet`].

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{Notify, Semaphore};
use tokio::time::{sleep_until, Instant};

use crate::domain::LoadErrorKind;
use crate::store::Store;
use crate::sync::SyncEngine;

/// Outcome of one tick across all feeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub feeds: usize,
    pub new_posts: usize,
    pub errors: usize,
}

/// Cloneable, thread-safe way to stop a running [`Scheduler`].
#[derive(Clone)]
pub struct SchedulerHandle {
    running: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl SchedulerHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.wake.notify_one();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

pub struct Scheduler<S: Store + 'static> {
    engine: Rc<SyncEngine<S>>,
    interval: Duration,
    semaphore: Arc<Semaphore>,
    handle: SchedulerHandle,
}

impl<S: Store + 'static> Scheduler<S> {
    pub fn new(engine: Rc<SyncEngine<S>>, interval: Duration, workers: usize) -> Self {
        Self {
            engine,
            interval,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
            handle: SchedulerHandle {
                running: Arc::new(AtomicBool::new(true)),
                wake: Arc::new(Notify::new()),
            },
        }
    }

    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    /// Stop the loop; a tick already in progress finishes first.
    pub fn stop(&self) {
        self.handle.stop();
    }

    /// Run ticks until stopped.
    pub async fn run(&self) {
        let origin = Instant::now();
        tracing::info!(
            "Scheduler started (interval: {}ms)",
            self.interval.as_millis()
        );

        while self.handle.is_running() {
            let deadline = next_tick(origin, self.interval, Instant::now());

            tokio::select! {
                _ = sleep_until(deadline) => {}
                _ = self.handle.wake.notified() => {}
            }

            if !self.handle.is_running() {
                break;
            }

            self.run_tick().await;
        }

        tracing::info!("Scheduler stopped");
    }

    /// Refresh every tracked feed once and wait for all of them to settle.
    pub async fn run_tick(&self) -> TickReport {
        let start = Instant::now();
        let feeds = self.engine.store().get_all_feeds();

        let mut report = TickReport {
            feeds: feeds.len(),
            ..Default::default()
        };
        if feeds.is_empty() {
            tracing::debug!("No feeds to refresh");
            return report;
        }

        let handles: Vec<_> = feeds
            .into_iter()
            .map(|feed| {
                let engine = self.engine.clone();
                let semaphore = self.semaphore.clone();

                tokio::task::spawn_local(async move {
                    // The semaphore is never closed.
                    let _permit = semaphore.acquire().await.ok();
                    let result = engine.refresh(&feed).await;
                    (feed, result)
                })
            })
            .collect();

        for joined in join_all(handles).await {
            match joined {
                Ok((_, Ok(count))) => report.new_posts += count,
                Ok((feed, Err(e))) => {
                    report.errors += 1;
                    match LoadErrorKind::from(&e) {
                        LoadErrorKind::Unknown => {
                            tracing::error!("Unexpected error refreshing {}: {}", feed.url, e)
                        }
                        _ => tracing::warn!("Failed to refresh {}: {}", feed.url, e),
                    }
                }
                Err(e) => {
                    report.errors += 1;
                    tracing::error!("Task join error: {}", e);
                }
            }
        }

        tracing::info!(
            "Tick complete: {} feeds, {} new posts, {} errors ({}ms)",
            report.feeds,
            report.new_posts,
            report.errors,
            start.elapsed().as_millis()
        );
        report
    }
}

/// First boundary `origin + k * interval` (k >= 1) strictly after `now`.
pub fn next_tick(origin: Instant, interval: Duration, now: Instant) -> Instant {
    let period = interval.as_nanos().max(1);
    let elapsed = now.saturating_duration_since(origin).as_nanos();
    let k = elapsed / period + 1;
    let offset = u64::try_from(k * period).unwrap_or(u64::MAX);
    origin + Duration::from_nanos(offset)
}
