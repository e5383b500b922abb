use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AlbumId, Asset};

/// A server-side album
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,

    pub name: String,

    /// Displayed asset count; nudged by ±1 as membership edits are acknowledged
    pub asset_count: u64,

    /// Present only when the server embeds the album's assets in the response
    pub assets: Option<Vec<Asset>>,

    pub created_at: DateTime<Utc>,
}

impl Album {
    pub fn new(id: AlbumId, name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            asset_count: 0,
            assets: None,
            created_at,
        }
    }

    /// Apply a signed count change, saturating at zero
    pub fn apply_count_delta(&mut self, delta: i64) {
        self.asset_count = self.asset_count.saturating_add_signed(delta);
    }
}

impl std::fmt::Display for Album {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
