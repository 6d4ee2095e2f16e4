//! In-process event dispatcher.
//!
//! Subscribers register either for one event kind or for every event, and
//! either synchronously (their errors are returned to the publisher) or
//! asynchronously (they run on their own task and their errors are only
//! logged). Synchronous subscribers for a kind run in registration order,
//! followed by the synchronous "all" subscribers.

mod events;
pub mod subscribers;

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, RwLock};

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

pub use events::{
    Event, EventKind, EventPayload, MessagePosted, RefillError, ScheduledMessageUpdated,
    TreatmentPlanActivated, VisitSubmitted,
};

/// How asynchronous subscribers are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Each asynchronous subscriber runs on its own tokio task
    Background,
    /// Asynchronous subscribers are awaited before `publish` returns.
    /// Used by tests that need deterministic delivery.
    Inline,
}

type SyncListener = Arc<dyn Fn(&Event) -> anyhow::Result<()> + Send + Sync>;
type AsyncListener = Arc<dyn Fn(Event) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

#[derive(Clone)]
enum Listener {
    Sync(SyncListener),
    Async(AsyncListener),
}

#[derive(Default)]
struct Registry {
    typed: HashMap<EventKind, Vec<Listener>>,
    all: Vec<Listener>,
}

/// One failed synchronous subscriber
#[derive(Debug, Error)]
#[error("{event} subscriber failed: {source:#}")]
pub struct SubscriberError {
    pub event: &'static str,
    #[source]
    pub source: anyhow::Error,
}

/// Every synchronous subscriber failure from one publish
#[derive(Debug)]
pub struct DispatchError {
    pub errors: Vec<SubscriberError>,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} subscriber(s) failed", self.errors.len())?;
        for (i, err) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{:#}", sep, err.source)?;
        }
        Ok(())
    }
}

impl std::error::Error for DispatchError {}

pub struct Dispatcher {
    registry: RwLock<Registry>,
    mode: DispatchMode,
}

impl Dispatcher {
    pub fn new(mode: DispatchMode) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            mode,
        }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    fn register(&self, kind: Option<EventKind>, listener: Listener) {
        let mut registry = self.registry.write().unwrap_or_else(|e| e.into_inner());
        match kind {
            Some(kind) => registry.typed.entry(kind).or_default().push(listener),
            None => registry.all.push(listener),
        }
        debug!(
            "Registered subscriber for {}",
            kind.map(|k| k.as_str()).unwrap_or("all events")
        );
    }

    /// Synchronous subscriber for one payload type
    pub fn subscribe<E, F>(&self, f: F)
    where
        E: EventPayload,
        F: Fn(&E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let listener: SyncListener = Arc::new(move |event: &Event| match E::from_event(event) {
            Some(payload) => f(payload),
            None => Ok(()),
        });
        self.register(Some(E::KIND), Listener::Sync(listener));
    }

    /// Asynchronous subscriber for one payload type
    pub fn subscribe_async<E, F, Fut>(&self, f: F)
    where
        E: EventPayload,
        F: Fn(E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let listener: AsyncListener = Arc::new(move |event: Event| match E::from_event(&event) {
            Some(payload) => f(payload.clone()).boxed(),
            None => async { Ok(()) }.boxed(),
        });
        self.register(Some(E::KIND), Listener::Async(listener));
    }

    /// Synchronous subscriber for every event
    pub fn subscribe_all<F>(&self, f: F)
    where
        F: Fn(&Event) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(None, Listener::Sync(Arc::new(f)));
    }

    /// Asynchronous subscriber for every event
    pub fn subscribe_all_async<F, Fut>(&self, f: F)
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let listener: AsyncListener = Arc::new(move |event: Event| f(event).boxed());
        self.register(None, Listener::Async(listener));
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        let registry = self.registry.read().unwrap_or_else(|e| e.into_inner());
        registry.typed.get(&kind).map_or(0, Vec::len) + registry.all.len()
    }

    /// Deliver an event. Returns the aggregated errors of the synchronous
    /// subscribers; asynchronous failures are logged.
    pub async fn publish(&self, event: impl Into<Event>) -> Result<(), DispatchError> {
        let event = event.into();
        let kind = event.kind();

        // Snapshot so subscribers may register further subscribers
        let listeners: Vec<Listener> = {
            let registry = self.registry.read().unwrap_or_else(|e| e.into_inner());
            registry
                .typed
                .get(&kind)
                .into_iter()
                .flatten()
                .chain(registry.all.iter())
                .cloned()
                .collect()
        };

        let mut errors = Vec::new();
        let mut deferred = Vec::new();
        for listener in listeners {
            match listener {
                Listener::Sync(f) => {
                    if let Err(source) = f(&event) {
                        errors.push(SubscriberError {
                            event: kind.as_str(),
                            source,
                        });
                    }
                }
                Listener::Async(f) => deferred.push(f),
            }
        }

        for f in deferred {
            let task = f(event.clone());
            match self.mode {
                DispatchMode::Inline => run_logged(kind, task).await,
                DispatchMode::Background => {
                    tokio::spawn(run_logged(kind, task));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DispatchError { errors })
        }
    }

    /// Publish without waiting on synchronous subscribers. Inline mode
    /// publishes on the caller's task instead.
    pub async fn publish_async(self: &Arc<Self>, event: impl Into<Event>) {
        let event = event.into();
        let kind = event.kind();
        match self.mode {
            DispatchMode::Inline => {
                if let Err(e) = self.publish(event).await {
                    error!("Publishing {} failed: {}", kind.as_str(), e);
                }
            }
            DispatchMode::Background => {
                let dispatcher = Arc::clone(self);
                tokio::spawn(async move {
                    if let Err(e) = dispatcher.publish(event).await {
                        error!("Publishing {} failed: {}", kind.as_str(), e);
                    }
                });
            }
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").field("mode", &self.mode).finish()
    }
}

async fn run_logged(kind: EventKind, task: BoxFuture<'static, anyhow::Result<()>>) {
    if let Err(e) = task.await {
        error!("Async {} subscriber failed: {:#}", kind.as_str(), e);
    }
}
