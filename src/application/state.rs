// src/application/state.rs
//
// The whole session as one explicit snapshot.
// The controller takes a snapshot by value and returns the next one.

use serde::{Deserialize, Serialize};

use crate::application::error_handling::StatusMessage;
use crate::config::SessionConfig;
use crate::domain::{Asset, AssetId, AssetSource, BrowsingWindow, PaginationState};
use crate::repositories::AssetStore;
use crate::services::{LoadGuard, MutationReconciler, NavigationHistory};

/// Album picker state inside the detail view. Scoring is done by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlbumSearch {
    pub query: String,
}

/// UI mode; each variant carries only the data valid in it
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    MainMenu,
    LoadingAssets {
        guard: LoadGuard,
    },
    ViewingAsset {
        asset_id: AssetId,
        album_search: Option<AlbumSearch>,
    },
    GridView,
    EmptyResult {
        status: StatusMessage,
    },
    Error {
        status: StatusMessage,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeTag {
    MainMenu,
    LoadingAssets,
    ViewingAsset,
    GridView,
    EmptyResult,
    Error,
}

impl Mode {
    pub fn tag(&self) -> ModeTag {
        match self {
            Mode::MainMenu => ModeTag::MainMenu,
            Mode::LoadingAssets { .. } => ModeTag::LoadingAssets,
            Mode::ViewingAsset { .. } => ModeTag::ViewingAsset,
            Mode::GridView => ModeTag::GridView,
            Mode::EmptyResult { .. } => ModeTag::EmptyResult,
            Mode::Error { .. } => ModeTag::Error,
        }
    }

    /// Detail or grid
    pub fn is_browsing(&self) -> bool {
        matches!(self, Mode::ViewingAsset { .. } | Mode::GridView)
    }
}

impl std::fmt::Display for ModeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModeTag::MainMenu => "main_menu",
            ModeTag::LoadingAssets => "loading_assets",
            ModeTag::ViewingAsset => "viewing_asset",
            ModeTag::GridView => "grid_view",
            ModeTag::EmptyResult => "empty_result",
            ModeTag::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub mode: Mode,
    pub store: AssetStore,
    pub window: BrowsingWindow,
    pub pagination: PaginationState,
    pub history: NavigationHistory,
    pub reconciler: MutationReconciler,
    /// Non-fatal problem to show alongside a usable view
    pub notice: Option<StatusMessage>,
    /// The current episode already re-announced itself once after an empty result
    pub(crate) empty_retry_spent: bool,
}

impl SessionState {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            mode: Mode::MainMenu,
            store: AssetStore::new(),
            window: BrowsingWindow::new(),
            pagination: PaginationState::idle(config.page_size, config.max_assets_to_fetch),
            history: NavigationHistory::new(config.history_limit),
            reconciler: MutationReconciler::new(),
            notice: None,
            empty_retry_spent: false,
        }
    }

    /// Source of the active episode
    pub fn active_source(&self) -> AssetSource {
        self.pagination.source.clone().unwrap_or(AssetSource::NoAssets)
    }

    /// Asset shown in the detail view
    pub fn open_asset_id(&self) -> Option<&AssetId> {
        match &self.mode {
            Mode::ViewingAsset { asset_id, .. } => Some(asset_id),
            _ => None,
        }
    }

    pub fn open_asset(&self) -> Option<&Asset> {
        self.open_asset_id().and_then(|id| self.store.asset(id))
    }

    /// Asset under the window cursor, if loaded
    pub fn asset_at_cursor(&self) -> Option<&Asset> {
        self.window.current().and_then(|id| self.store.asset(id))
    }
}
