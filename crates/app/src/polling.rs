//! Fixed-period background refresh.

use std::{future::Future, ops::ControlFlow, sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::debug;

/// Default refresh period for live views.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest refresh period; shorter requests are raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// A running poll loop. Dropping the handle aborts it.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Run `tick` now and then every `period` until it breaks or the handle is dropped.
    ///
    /// Ticks never overlap: a slow tick delays the next one rather than
    /// stacking up. Periods below [`MIN_POLL_INTERVAL`] are clamped.
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let period = period.max(MIN_POLL_INTERVAL);

        let task = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                if tick().await.is_break() {
                    debug!("poll loop finished");
                    break;
                }
            }
        });

        Self { task }
    }

    /// Whether the loop has stopped on its own or been cancelled.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the loop.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The latest result of a polled fetch, for list views that simply refresh.
#[derive(Debug)]
pub struct Feed<T> {
    latest: watch::Receiver<Option<T>>,
    _poll: PollHandle,
}

impl<T> Feed<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Run `fetch` now and then every `period`, publishing each result.
    pub fn spawn<F, Fut>(period: Duration, mut fetch: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (sender, latest) = watch::channel(None);
        let sender = Arc::new(sender);

        let poll = PollHandle::spawn(period, move || {
            let sender = sender.clone();
            let next = fetch();

            async move {
                if sender.send(Some(next.await)).is_err() {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }
        });

        Self {
            latest,
            _poll: poll,
        }
    }

    /// The most recent result, if any fetch has completed.
    pub fn latest(&self) -> Option<T> {
        self.latest.borrow().clone()
    }

    /// Wait for the next result. Returns `None` once the loop has stopped.
    pub async fn next(&mut self) -> Option<T> {
        self.latest.changed().await.ok()?;
        self.latest.borrow_and_update().clone()
    }
}
