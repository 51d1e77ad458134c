use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use super::senders::NotificationSender;
use crate::store::LeadRecord;

/// Fire-and-forget fan-out of new leads to the configured sender.
///
/// `dispatch` only enqueues; a background worker drains the queue and runs each
/// send on its own task, so delivery order is not guaranteed and no request
/// ever waits on the outbound call. Outcomes are logged and nothing is retried.
///
/// Once every dispatcher clone is dropped the worker stops taking new work and
/// gives in-flight sends up to `drain_deadline` to finish; whatever is still
/// running then is aborted and counted in the log.
#[derive(Clone)]
pub struct NotificationDispatcher {
    queue: Option<mpsc::Sender<LeadRecord>>,
}

impl NotificationDispatcher {
    /// Starts the worker. With no sender the dispatcher is a logged no-op.
    pub fn start(
        sender: Option<Arc<dyn NotificationSender>>,
        capacity: usize,
        drain_deadline: Duration,
    ) -> (Self, Option<JoinHandle<()>>) {
        let Some(sender) = sender else {
            info!("Notification sender not configured; new leads will not be forwarded.");
            return (Self { queue: None }, None);
        };

        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(sender, rx, drain_deadline));
        (Self { queue: Some(tx) }, Some(worker))
    }

    /// A dispatcher that drops everything, for setups without a sender.
    pub fn disabled() -> Self {
        Self { queue: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.queue.is_some()
    }

    /// Queues a notification for `record` without waiting on delivery.
    pub fn dispatch(&self, record: LeadRecord) {
        let Some(queue) = &self.queue else {
            debug!(lead_id = %record.id, "Skipping notification: sender not configured.");
            return;
        };

        if let Err(e) = queue.try_send(record) {
            let (reason, record) = match e {
                mpsc::error::TrySendError::Full(r) => ("queue full", r),
                mpsc::error::TrySendError::Closed(r) => ("worker stopped", r),
            };
            warn!(lead_id = %record.id, reason, "Dropping lead notification.");
        }
    }
}

async fn send_and_log(sender: Arc<dyn NotificationSender>, record: LeadRecord) {
    match sender.send(&record).await {
        Ok(()) => info!(
            lead_id = %record.id,
            channel = sender.channel(),
            "Lead notification sent."
        ),
        Err(e) => error!(
            lead_id = %record.id,
            channel = sender.channel(),
            error = %e,
            "Failed to send lead notification."
        ),
    }
}

async fn run_worker(
    sender: Arc<dyn NotificationSender>,
    mut rx: mpsc::Receiver<LeadRecord>,
    drain_deadline: Duration,
) {
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            next = rx.recv() => match next {
                Some(record) => {
                    in_flight.spawn(send_and_log(sender.clone(), record));
                }
                None => break,
            },
            // Reap finished sends so the set does not grow without bound.
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }

    if in_flight.is_empty() {
        debug!("Notification worker stopped: queue closed.");
        return;
    }

    info!(pending = in_flight.len(), "Queue closed; waiting for in-flight notifications.");
    let drained = tokio::time::timeout(drain_deadline, async {
        while in_flight.join_next().await.is_some() {}
    })
    .await;

    if drained.is_err() {
        warn!(
            abandoned = in_flight.len(),
            deadline_secs = drain_deadline.as_secs_f64(),
            "Abandoning lead notifications still in flight at shutdown."
        );
        in_flight.abort_all();
    } else {
        info!("All in-flight notifications finished.");
    }
}
