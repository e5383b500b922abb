// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod album;
pub mod asset;
pub mod browsing;
pub mod ids;
pub mod source;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use ids::{AlbumId, AssetId};

// Asset Domain
pub use asset::{validate_asset, Asset, AssetFlag};

// Album Domain
pub use album::{validate_album, Album};

// Sources and transport shapes
pub use source::{
    AlbumViewFilters, AssetSource, FetchKind, FetchRequest, MediaKind, PageResponse,
    SearchContext, SearchFilters, SortOrder,
};

// Browsing state
pub use browsing::{clamp_index, BrowsingWindow, PaginationState};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of record invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
