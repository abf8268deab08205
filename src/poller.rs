//! Fixed-interval polling for new posts while auto-reply is on.
//!
//! The poll task never reads application state directly. The app publishes a
//! [`PollSnapshot`] over a `watch` channel whenever posts or settings change,
//! and the task re-reads it at the start of every tick.

use crate::api::{Backend, BrandSettings, Post};
use crate::message::AppEvent;
use crate::pipeline::spawn_auto_reply;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// What the poll task needs to know about the app at tick time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollSnapshot {
    pub settings: Option<BrandSettings>,
    pub known_ids: HashSet<String>,
}

/// Posts from `fetched` whose IDs are not in `known`, in fetch order.
///
/// A repeated ID inside `fetched` is only returned once.
pub fn unseen_posts(known: &HashSet<String>, fetched: Vec<Post>) -> Vec<Post> {
    let mut seen = HashSet::new();
    fetched
        .into_iter()
        .filter(|post| !known.contains(&post.id) && seen.insert(post.id.clone()))
        .collect()
}

/// Owner of a running poll task.
pub struct PollHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop polling and wait for the task to exit.
    ///
    /// Once this returns no further tick runs and no new auto-reply is
    /// started. A pipeline already in flight is left to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "poll task ended abnormally");
        }
    }
}

pub fn spawn_poller(
    backend: Arc<dyn Backend>,
    interval: Duration,
    snapshot: watch::Receiver<Arc<PollSnapshot>>,
    events: mpsc::UnboundedSender<AppEvent>,
) -> PollHandle {
    let (shutdown, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(poll_loop(backend, interval, snapshot, shutdown_rx, events));
    PollHandle { shutdown, task }
}

async fn poll_loop(
    backend: Arc<dyn Backend>,
    interval: Duration,
    mut snapshot: watch::Receiver<Arc<PollSnapshot>>,
    mut shutdown: watch::Receiver<bool>,
    events: mpsc::UnboundedSender<AppEvent>,
) {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut known: HashSet<String> = HashSet::new();

    info!(interval_secs = interval.as_secs(), "poll loop started");

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        let current = snapshot.borrow_and_update().clone();
        known.extend(current.known_ids.iter().cloned());

        let Some(settings) = current.settings.clone() else {
            debug!("no brand settings, skipping tick");
            continue;
        };

        let fetched = tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            result = backend.fetch_posts() => result,
        };

        let posts = match fetched {
            Ok(posts) => posts,
            Err(e) => {
                warn!(error = %e, "polling for posts failed");
                continue;
            }
        };

        let fresh = unseen_posts(&known, posts);
        if fresh.is_empty() {
            debug!("no new posts");
            continue;
        }

        if *shutdown.borrow() {
            break;
        }

        info!(count = fresh.len(), first = %fresh[0].id, "new posts");
        known.extend(fresh.iter().map(|p| p.id.clone()));
        let first = fresh[0].clone();

        if events.send(AppEvent::PollMerged(fresh)).is_err() {
            break;
        }
        spawn_auto_reply(backend.clone(), first, settings, events.clone());
    }

    info!("poll loop stopped");
}
