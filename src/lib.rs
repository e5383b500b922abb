// src/lib.rs
// MediaSession - client-side session engine for a remote, paginated photo catalog
//
// Architecture:
// - Domain-centric: assets, albums, sources and browsing state are plain values
// - Pure services: pagination, history, load guard and reconciler never do I/O
// - Elm-like core: the controller folds one event into the next snapshot + effects
// - The runtime is the only layer that talks to the catalog server

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    validate_album,
    validate_asset,
    // Entities
    Album,
    AlbumId,
    AlbumViewFilters,
    Asset,
    AssetFlag,
    AssetId,
    // Sources
    AssetSource,
    // Browsing
    BrowsingWindow,
    FetchRequest,
    MediaKind,
    PageResponse,
    PaginationState,
    SearchContext,
    SearchFilters,
    SortOrder,
};

// ============================================================================
// PUBLIC API - Errors and Config
// ============================================================================

pub use config::{ServerConfig, SessionConfig};
pub use error::{AppError, AppResult, FailureKind, FetchFailure};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus, DomainEvent, EpisodeStarted, EmittedEvent, EventBus, ModeChanged,
    PageMerged, PendingChangesDiscarded,
};

// ============================================================================
// PUBLIC API - Repositories and Services
// ============================================================================

pub use repositories::AssetStore;

pub use services::{
    HistoryEntry, HistoryNavigation, HistoryView, LoadGuard, LoadPhase, MutationReconciler,
    NavigationHistory, PendingAlbumChange, Precondition,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{
    Effect, Mode, ModeTag, SessionController, SessionEvent, SessionRuntime, SessionState,
    SessionView, StatusMessage, Transition, UserAction,
};

// Re-export application submodules
pub use application::dto;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{CatalogTransport, HttpCatalogClient};
