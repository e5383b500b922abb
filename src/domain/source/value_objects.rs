// src/domain/source/value_objects.rs
//
// Asset sources and the request/response shapes exchanged with the transport.
//
// CRITICAL INVARIANTS:
// - A source is immutable once an episode starts; a different source is a new episode
// - Requests re-derive everything from the source, so page N has the same filters as page 1
// - No I/O, no side effects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AlbumId, Asset};

// ============================================================================
// FILTERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    #[default]
    All,
    Images,
    Videos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Filters shared by every query shape
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    pub favorites_only: bool,
    pub include_archived: bool,
    pub media: MediaKind,
    pub order: SortOrder,
}

/// Filters for browsing inside one album
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlbumViewFilters {
    pub search: SearchFilters,
    /// Adding the open asset to another album also removes it from this one
    pub move_mode: bool,
}

/// Which search backend a text query goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchContext {
    /// Semantic (content) search
    #[default]
    Smart,
    /// Matches file names and metadata
    Metadata,
}

// ============================================================================
// ASSET SOURCE
// ============================================================================

/// How the current browsing window was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetSource {
    NoAssets,
    Timeline {
        filters: SearchFilters,
    },
    TextSearch {
        query: String,
        context: SearchContext,
    },
    Album {
        album: AlbumId,
    },
    FilteredAlbum {
        album: AlbumId,
        filters: AlbumViewFilters,
    },
}

impl AssetSource {
    /// Timeline-style sources stream the newest assets; everything else is a snapshot
    pub fn is_timeline(&self) -> bool {
        matches!(self, AssetSource::Timeline { .. })
    }

    /// The album currently being browsed, if any
    pub fn album(&self) -> Option<&AlbumId> {
        match self {
            AssetSource::Album { album } | AssetSource::FilteredAlbum { album, .. } => Some(album),
            _ => None,
        }
    }

    /// The album whose members get moved out when adding to another album
    pub fn move_source_album(&self) -> Option<&AlbumId> {
        match self {
            AssetSource::FilteredAlbum { album, filters } if filters.move_mode => Some(album),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<FetchKind> {
        match self {
            AssetSource::NoAssets => None,
            AssetSource::Timeline { .. } => Some(FetchKind::Timeline),
            AssetSource::TextSearch { .. } => Some(FetchKind::TextSearch),
            AssetSource::Album { .. } | AssetSource::FilteredAlbum { .. } => Some(FetchKind::Album),
        }
    }
}

impl std::fmt::Display for AssetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetSource::NoAssets => write!(f, "no assets"),
            AssetSource::Timeline { .. } => write!(f, "timeline"),
            AssetSource::TextSearch { query, .. } => write!(f, "search {:?}", query),
            AssetSource::Album { album } => write!(f, "album {}", album),
            AssetSource::FilteredAlbum { album, filters } => {
                write!(f, "album {} (filtered{})", album, if filters.move_mode { ", move" } else { "" })
            }
        }
    }
}

// ============================================================================
// TRANSPORT CONTRACT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    Timeline,
    TextSearch,
    Album,
}

/// One page request, as handed to the transport.
/// `episode` and `source` travel with the request so the response can be
/// matched against the session's current episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub episode: Uuid,
    pub source: AssetSource,
    pub page_size: u32,
    /// 1-based
    pub page: u32,
}

impl FetchRequest {
    pub fn kind(&self) -> FetchKind {
        self.source.kind().unwrap_or(FetchKind::Timeline)
    }

    pub fn filters(&self) -> SearchFilters {
        match &self.source {
            AssetSource::Timeline { filters } => filters.clone(),
            AssetSource::FilteredAlbum { filters, .. } => filters.search.clone(),
            _ => SearchFilters::default(),
        }
    }

    pub fn query_text(&self) -> Option<&str> {
        match &self.source {
            AssetSource::TextSearch { query, .. } => Some(query),
            _ => None,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageResponse {
    pub assets: Vec<Asset>,
    /// Server-reported total; may be stale or zero
    pub total: u64,
    /// Number of assets in this page
    pub count: u64,
}

impl PageResponse {
    pub fn new(assets: Vec<Asset>, total: u64) -> Self {
        let count = assets.len() as u64;
        Self {
            assets,
            total,
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_source_requires_move_mode() {
        let plain = AssetSource::FilteredAlbum {
            album: AlbumId::from("al1"),
            filters: AlbumViewFilters::default(),
        };
        assert!(plain.move_source_album().is_none());

        let moving = AssetSource::FilteredAlbum {
            album: AlbumId::from("al1"),
            filters: AlbumViewFilters {
                move_mode: true,
                ..Default::default()
            },
        };
        assert_eq!(moving.move_source_album(), Some(&AlbumId::from("al1")));
    }

    #[test]
    fn test_request_carries_filters_forward() {
        let filters = SearchFilters {
            favorites_only: true,
            ..Default::default()
        };
        let request = FetchRequest {
            episode: Uuid::new_v4(),
            source: AssetSource::FilteredAlbum {
                album: AlbumId::from("al1"),
                filters: AlbumViewFilters {
                    search: filters.clone(),
                    move_mode: false,
                },
            },
            page_size: 1000,
            page: 3,
        };
        assert_eq!(request.kind(), FetchKind::Album);
        assert_eq!(request.filters(), filters);
        assert!(request.query_text().is_none());
    }
}
