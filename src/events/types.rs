// events/types.rs
//
// Session facts published after each processed event.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::state::ModeTag;
use crate::domain::AssetSource;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! domain_event {
    ($name:ident) => {
        impl DomainEvent for $name {
            fn event_id(&self) -> Uuid { self.event_id }
            fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
            fn event_type(&self) -> &'static str { stringify!($name) }
        }
    };
}

// ============================================================================
// EPISODE EVENTS
// ============================================================================

/// A source was selected and its first page requested
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeStarted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub episode: Uuid,
    pub source: AssetSource,
}

impl EpisodeStarted {
    pub fn new(episode: Uuid, source: AssetSource) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            episode,
            source,
        }
    }
}

domain_event!(EpisodeStarted);

/// A page was folded into the window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMerged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub episode: Uuid,
    pub page: u32,
    pub loaded_assets: u64,
    pub total_assets: u64,
    pub has_more_pages: bool,
}

impl PageMerged {
    pub fn new(episode: Uuid, page: u32, loaded_assets: u64, total_assets: u64, has_more_pages: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            episode,
            page,
            loaded_assets,
            total_assets,
            has_more_pages,
        }
    }
}

domain_event!(PageMerged);

// ============================================================================
// VIEW EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub from: ModeTag,
    pub to: ModeTag,
}

impl ModeChanged {
    pub fn new(from: ModeTag, to: ModeTag) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            from,
            to,
        }
    }
}

domain_event!(ModeChanged);

// ============================================================================
// EDIT EVENTS
// ============================================================================

/// Optimistic membership edits were thrown away after a failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingChangesDiscarded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub discarded: usize,
}

impl PendingChangesDiscarded {
    pub fn new(discarded: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            discarded,
        }
    }
}

domain_event!(PendingChangesDiscarded);
