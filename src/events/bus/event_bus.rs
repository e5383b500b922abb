// events/bus/event_bus.rs
//
// In-process fan-out of session facts.
//
// RULES:
// - Delivery is synchronous: `emit` returns after every subscriber ran
// - Subscribers of one fact run in the order they subscribed
// - No lock is held while a subscriber runs, so subscribers may subscribe
// - A panicking subscriber is logged and skipped

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use log::{debug, error};
use uuid::Uuid;

use crate::events::types::DomainEvent;

type Subscriber = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// One fact as it went out
#[derive(Debug, Clone)]
pub struct EmittedEvent {
    pub event_type: &'static str,
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub subscribers: usize,
}

/// Session facts bus. Clones share subscribers and history.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<HashMap<TypeId, Vec<Subscriber>>>>,
    emitted: Arc<Mutex<Vec<EmittedEvent>>>,
}

// Poisoning only means a subscriber panicked elsewhere; the maps stay valid
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `subscriber` for every future `E`.
    ///
    /// ```ignore
    /// bus.subscribe::<PageMerged, _>(|page| {
    ///     log::info!("{}/{} assets", page.loaded_assets, page.total_assets);
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, subscriber: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let erased: Subscriber = Arc::new(move |fact: &dyn Any| match fact.downcast_ref::<E>() {
            Some(fact) => subscriber(fact),
            None => error!("{} subscriber received another fact type", std::any::type_name::<E>()),
        });

        write(&self.subscribers)
            .entry(TypeId::of::<E>())
            .or_default()
            .push(erased);
    }

    /// Hand `fact` to its subscribers
    pub fn emit<E>(&self, fact: E)
    where
        E: DomainEvent + 'static,
    {
        // Snapshot, then release the lock before dispatch
        let targets: Vec<Subscriber> = read(&self.subscribers)
            .get(&TypeId::of::<E>())
            .cloned()
            .unwrap_or_default();

        let record = EmittedEvent {
            event_type: fact.event_type(),
            event_id: fact.event_id(),
            occurred_at: fact.occurred_at(),
            subscribers: targets.len(),
        };
        debug!("[EVENT] {} ({}) -> {} subscriber(s)", record.event_type, record.event_id, record.subscribers);
        lock(&self.emitted).push(record);

        for (position, target) in targets.iter().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| target(&fact as &dyn Any))).is_err() {
                error!("Subscriber #{} of {} panicked", position, fact.event_type());
            }
        }
    }

    /// Every fact emitted so far, oldest first
    pub fn emitted(&self) -> Vec<EmittedEvent> {
        lock(&self.emitted).clone()
    }

    pub fn clear_emitted(&self) {
        lock(&self.emitted).clear();
    }
}
