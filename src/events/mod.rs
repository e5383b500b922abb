// src/events/mod.rs
//
// Internal Event System - Public API
//
// The runtime publishes session facts here after each processed event.
// Subscribers observe; they never feed back into the session.

pub mod bus;
pub mod types;

pub use types::{DomainEvent, EpisodeStarted, ModeChanged, PageMerged, PendingChangesDiscarded};

pub use bus::{EmittedEvent, EventBus};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
