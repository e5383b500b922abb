// src/application/messages.rs
//
// Inbound messages (facts delivered to the session) and outbound effects
// (requests the shell must carry out). Both are plain values.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Album, AlbumId, AssetFlag, AssetId, AssetSource, FetchRequest, PageResponse};
use crate::error::FetchFailure;

// ============================================================================
// INBOUND
// ============================================================================

/// Something the user asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    SelectSource { source: AssetSource },
    NextAsset,
    PreviousAsset,
    OpenGrid,
    OpenAsset { index: usize },
    HistoryBack,
    HistoryForward,
    ToggleFavorite,
    ToggleArchive,
    ToggleAlbum { album: AlbumId },
    OpenAlbumSearch,
    SetAlbumSearch { query: String },
    CloseAlbumSearch,
    CreateAlbum { name: String },
    ReturnToMenu,
}

/// One event processed to completion by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    User(UserAction),

    PageFetched {
        request: FetchRequest,
        result: Result<PageResponse, FetchFailure>,
    },

    MembershipFetched {
        asset_id: AssetId,
        result: Result<Vec<AlbumId>, FetchFailure>,
    },

    AlbumsFetched {
        result: Result<Vec<Album>, FetchFailure>,
    },

    MembershipChangeAcknowledged {
        request_id: Uuid,
        result: Result<(), FetchFailure>,
    },

    AssetUpdateAcknowledged {
        asset_id: AssetId,
        flag: AssetFlag,
        /// The value that was sent
        value: bool,
        result: Result<(), FetchFailure>,
    },

    AlbumCreated {
        result: Result<Album, FetchFailure>,
    },
}

impl From<UserAction> for SessionEvent {
    fn from(action: UserAction) -> Self {
        SessionEvent::User(action)
    }
}

// ============================================================================
// OUTBOUND
// ============================================================================

/// A request for the shell; every variant answers with exactly one `SessionEvent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    FetchPage { request: FetchRequest },
    FetchMembership { asset_id: AssetId },
    FetchAlbums,
    ChangeMembership {
        request_id: Uuid,
        album_id: AlbumId,
        asset_id: AssetId,
        is_addition: bool,
    },
    UpdateAsset {
        asset_id: AssetId,
        flag: AssetFlag,
        value: bool,
    },
    CreateAlbum { name: String },
}
