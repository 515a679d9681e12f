//! Bounded, multi-threaded fan-out of lifecycle events to subscribers.

use crate::events::types::{Event, EventKind};
use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;
use tracing::{error, info, warn};

/// Error a subscriber may return from [`EventSubscriber::handle`]. Never
/// terminates the worker thread; it is logged and the next subscriber runs.
#[derive(Debug)]
pub struct EventHandlerError(pub String);

impl fmt::Display for EventHandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for EventHandlerError {}

/// A consumer of lifecycle events. One method, so a plain closure can stand
/// in for a full subscriber via the blanket impl below.
pub trait EventSubscriber: Send + Sync {
    /// Handle one event. Errors are logged, never propagated to the bus.
    fn handle(&self, event: &Event) -> Result<(), EventHandlerError>;
}

impl<F> EventSubscriber for F
where
    F: Fn(&Event) -> Result<(), EventHandlerError> + Send + Sync,
{
    fn handle(&self, event: &Event) -> Result<(), EventHandlerError> {
        self(event)
    }
}

/// A handler bound to the event kinds it subscribed to. Subscribers of
/// unrelated kinds never see each other's events: the bus checks
/// `kinds` before invoking `handler`, not after.
pub struct Subscription {
    kinds: HashSet<EventKind>,
    handler: Arc<dyn EventSubscriber>,
}

impl Subscription {
    /// Subscribe `handler` to exactly the given kinds.
    pub fn to(kinds: impl IntoIterator<Item = EventKind>, handler: Arc<dyn EventSubscriber>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            handler,
        }
    }

    /// Subscribe `handler` to all five lifecycle kinds, e.g. for a feed like
    /// `PrivateFeed`/`PublicFeed` that logs every event.
    pub fn to_all(handler: Arc<dyn EventSubscriber>) -> Self {
        Self::to(EventKind::ALL, handler)
    }

    fn wants(&self, kind: EventKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// What `publish` does when the internal queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueuePolicy {
    /// Block the publisher until space frees up. Preserves every event; this
    /// is the default, since subscribers must not miss lifecycle events.
    #[default]
    Block,
    /// Drop the event and log it via `tracing::warn!` rather than block the
    /// matching thread. Opt-in for hosts that prefer shedding load.
    DropAndLog,
}

enum Mailbox {
    Live { sender: Sender<Event>, policy: QueuePolicy },
    /// Disables delivery entirely for deterministic unit tests of the engine.
    Test,
}

/// Process-wide publisher draining into worker threads that invoke each
/// subscription synchronously, one event at a time, skipping subscriptions
/// whose kinds don't include the event just drained.
pub struct EventBus {
    mailbox: Mailbox,
    subscriptions: Arc<RwLock<Vec<Subscription>>>,
    workers: Vec<JoinHandle<()>>,
}

impl EventBus {
    /// Build a bus with `capacity` queue slots, `worker_count` OS-thread
    /// workers (defaults to 1 elsewhere in this crate so that delivery order
    /// to any single subscriber matches publish order process-wide), and the
    /// given initial subscriptions. More can be added later via `subscribe`.
    pub fn new(capacity: usize, worker_count: usize, policy: QueuePolicy, subscriptions: Vec<Subscription>) -> Self {
        let (sender, receiver) = channel::bounded(capacity);
        let subscriptions = Arc::new(RwLock::new(subscriptions));

        let workers = (0..worker_count.max(1))
            .map(|index| spawn_worker(index, receiver.clone(), Arc::clone(&subscriptions)))
            .collect();

        Self {
            mailbox: Mailbox::Live { sender, policy },
            subscriptions,
            workers,
        }
    }

    /// A bus whose `publish` is a no-op. No worker threads are spawned.
    pub fn test_mode() -> Self {
        Self {
            mailbox: Mailbox::Test,
            subscriptions: Arc::new(RwLock::new(Vec::new())),
            workers: Vec::new(),
        }
    }

    /// Add `handler` to the dispatch list for exactly `kinds`. Takes effect
    /// for every event published after this call returns; already-queued
    /// events are unaffected. Subscribers of unrelated kinds never see
    /// each other's events.
    pub fn subscribe(&self, kinds: impl IntoIterator<Item = EventKind>, handler: Arc<dyn EventSubscriber>) {
        self.subscriptions
            .write()
            .expect("subscriptions lock poisoned")
            .push(Subscription::to(kinds, handler));
    }

    /// Hand `event` to the queue and return immediately (or block, per
    /// policy, if the queue is full). A no-op in test mode.
    pub fn publish(&self, event: Event) {
        let Mailbox::Live { sender, policy } = &self.mailbox else {
            return;
        };

        match policy {
            QueuePolicy::Block => {
                if sender.send(event).is_err() {
                    error!("event bus: all workers gone, dropping event");
                }
            }
            QueuePolicy::DropAndLog => match sender.try_send(event) {
                Ok(()) => {}
                Err(TrySendError::Full(event)) => {
                    warn!(event_type = event.kind().as_str(), "event bus queue full, dropping event");
                }
                Err(TrySendError::Disconnected(_)) => {
                    error!("event bus: all workers gone, dropping event");
                }
            },
        }
    }

    /// Number of subscriptions currently registered.
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.read().expect("subscriptions lock poisoned").len()
    }

    /// Signal workers to stop once the queue drains, and join them.
    pub fn shutdown(self) {
        let EventBus { mailbox, workers, .. } = self;
        drop(mailbox);
        for worker in workers {
            let _ = worker.join();
        }
    }
}

fn spawn_worker(
    index: usize,
    receiver: Receiver<Event>,
    subscriptions: Arc<RwLock<Vec<Subscription>>>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        info!(worker = index, "event bus worker started");
        while let Ok(event) = receiver.recv() {
            let kind = event.kind();
            for subscription in subscriptions.read().expect("subscriptions lock poisoned").iter() {
                if !subscription.wants(kind) {
                    continue;
                }
                if let Err(err) = subscription.handler.handle(&event) {
                    error!(worker = index, error = %err, "event subscriber failed");
                }
            }
        }
        info!(worker = index, "event bus worker stopped");
    })
}
