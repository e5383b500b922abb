// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are UI-friendly representations of one session snapshot
// - DTOs are simple, serializable structs
// - Conversion FROM domain/session state only (never TO)

use serde::{Deserialize, Serialize};

use crate::application::error_handling::StatusMessage;
use crate::application::state::{Mode, ModeTag, SessionState};
use crate::domain::{Album, Asset};

// ============================================================================
// ASSET / ALBUM DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDto {
    pub id: String,
    pub title: String,
    pub path: String,
    pub mime_type: String,
    pub is_video: bool,
    pub is_favorite: bool,
    pub is_archived: bool,
    pub albums: Vec<String>,
    pub created_at: String,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumDto {
    pub id: String,
    pub name: String,
    pub asset_count: u64,
}

// ============================================================================
// SESSION DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationDto {
    pub source: Option<String>,
    pub loaded_assets: u64,
    pub total_assets: u64,
    pub is_loading_more: bool,
    /// Stopped at the safety cap with more on the server
    pub is_partial: bool,
}

/// Everything a front end needs to render the current snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub mode: ModeTag,
    pub asset: Option<AssetDto>,
    pub window_len: usize,
    pub current_index: usize,
    pub pagination: PaginationDto,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub pending_changes: usize,
    /// Present while the album picker is open
    pub album_search: Option<String>,
    /// Albums by name; filled only while the album picker is open
    pub albums: Vec<AlbumDto>,
    /// Blocking status (error / empty result)
    pub status: Option<StatusMessage>,
    /// Non-fatal notice next to a usable view
    pub notice: Option<StatusMessage>,
}

// ============================================================================
// CONVERSION HELPERS (Domain → DTO)
// ============================================================================

impl From<&Asset> for AssetDto {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id.to_string(),
            title: asset.title.clone(),
            path: asset.path.clone(),
            mime_type: asset.mime_type.clone(),
            is_video: asset.is_video(),
            is_favorite: asset.is_favorite,
            is_archived: asset.is_archived,
            albums: asset.albums.iter().map(|a| a.to_string()).collect(),
            created_at: asset.created_at_raw.clone(),
            duration: asset.duration.clone(),
        }
    }
}

impl From<&Album> for AlbumDto {
    fn from(album: &Album) -> Self {
        Self {
            id: album.id.to_string(),
            name: album.name.clone(),
            asset_count: album.asset_count,
        }
    }
}

impl From<&SessionState> for SessionView {
    fn from(state: &SessionState) -> Self {
        let album_search = match &state.mode {
            Mode::ViewingAsset {
                album_search: Some(search),
                ..
            } => Some(search.query.clone()),
            _ => None,
        };
        let albums = if album_search.is_some() {
            state.store.albums_by_name().into_iter().map(AlbumDto::from).collect()
        } else {
            Vec::new()
        };
        let status = match &state.mode {
            Mode::EmptyResult { status } | Mode::Error { status } => Some(status.clone()),
            _ => None,
        };
        let asset = match &state.mode {
            Mode::ViewingAsset { .. } => state.open_asset(),
            Mode::GridView => state.asset_at_cursor(),
            _ => None,
        };

        Self {
            mode: state.mode.tag(),
            asset: asset.map(AssetDto::from),
            window_len: state.window.len(),
            current_index: state.window.current_index(),
            pagination: PaginationDto {
                source: state.pagination.source.as_ref().map(|s| s.to_string()),
                loaded_assets: state.pagination.loaded_assets,
                total_assets: state.pagination.total_assets,
                is_loading_more: state.pagination.is_loading_more,
                is_partial: state.pagination.is_partial(),
            },
            can_go_back: state.history.can_go_back(),
            can_go_forward: state.history.can_go_forward(),
            pending_changes: state.reconciler.pending_count(),
            album_search,
            albums,
            status,
            notice: state.notice.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::state::AlbumSearch;
    use crate::config::SessionConfig;
    use crate::domain::{AlbumId, AssetId, BrowsingWindow};
    use chrono::Utc;

    fn viewing_state() -> SessionState {
        let mut state = SessionState::new(&SessionConfig::default());
        let asset = Asset::new(
            AssetId::from("x"),
            "x.mp4".to_string(),
            "2024-05-01T08:00:00.123Z",
            "2024-05-01T08:00:00.123Z",
        )
        .unwrap();
        state.store.upsert_asset(asset);
        state.store.replace_albums(vec![
            Album::new(AlbumId::from("2"), "Zoo".to_string(), Utc::now()),
            Album::new(AlbumId::from("1"), "Beach".to_string(), Utc::now()),
        ]);
        state.window = BrowsingWindow::from_ids(vec![AssetId::from("x")]);
        state.mode = Mode::ViewingAsset {
            asset_id: AssetId::from("x"),
            album_search: None,
        };
        state
    }

    #[test]
    fn test_view_of_detail_mode() {
        let view = SessionView::from(&viewing_state());
        assert_eq!(view.mode, ModeTag::ViewingAsset);
        assert_eq!(view.asset.as_ref().map(|a| a.id.as_str()), Some("x"));
        assert_eq!(view.asset.as_ref().map(|a| a.created_at.as_str()), Some("2024-05-01T08:00:00.123Z"));
        assert_eq!(view.window_len, 1);
        assert!(view.albums.is_empty());
        assert!(view.status.is_none());
    }

    #[test]
    fn test_albums_listed_while_picker_open() {
        let mut state = viewing_state();
        state.mode = Mode::ViewingAsset {
            asset_id: AssetId::from("x"),
            album_search: Some(AlbumSearch {
                query: "be".to_string(),
            }),
        };

        let view = SessionView::from(&state);
        assert_eq!(view.album_search.as_deref(), Some("be"));
        let names: Vec<_> = view.albums.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Beach", "Zoo"]);
    }

    #[test]
    fn test_error_status_is_surfaced() {
        let mut state = viewing_state();
        state.mode = Mode::Error {
            status: StatusMessage::internal("boom"),
        };
        let view = SessionView::from(&state);
        assert!(view.asset.is_none());
        assert_eq!(view.status.map(|s| s.message), Some("boom".to_string()));

        let json = serde_json::to_string(&SessionView::from(&state)).unwrap();
        assert!(json.contains("\"mode\":\"error\""));
    }
}
