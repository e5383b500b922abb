use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::{AlbumId, AssetId};

/// A photo or video known to the remote catalog.
/// Records are replaced wholesale on refresh; only album membership and the
/// favorite/archive flags are edited locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,

    /// Original path on the server
    pub path: String,

    /// Display title (usually the original file name)
    pub title: String,

    pub mime_type: String,

    pub is_favorite: bool,

    pub is_archived: bool,

    /// Albums this asset belongs to, as last seen by the client
    pub albums: BTreeSet<AlbumId>,

    pub created_at: DateTime<Utc>,

    pub modified_at: DateTime<Utc>,

    /// Server timestamp exactly as received; sub-second precision matters for ordering
    pub created_at_raw: String,

    pub modified_at_raw: String,

    /// Perceptual-hash placeholder for thumbnails
    pub thumbhash: Option<String>,

    /// Playback duration for videos, as reported by the server ("0:01:12.500")
    pub duration: Option<String>,
}

impl Asset {
    /// Create an asset from its two raw server timestamps.
    pub fn new(
        id: AssetId,
        title: String,
        created_at_raw: &str,
        modified_at_raw: &str,
    ) -> Result<Self, chrono::ParseError> {
        let created_at = DateTime::parse_from_rfc3339(created_at_raw)?.with_timezone(&Utc);
        let modified_at = DateTime::parse_from_rfc3339(modified_at_raw)?.with_timezone(&Utc);
        Ok(Self {
            id,
            path: String::new(),
            title,
            mime_type: String::new(),
            is_favorite: false,
            is_archived: false,
            albums: BTreeSet::new(),
            created_at,
            modified_at,
            created_at_raw: created_at_raw.to_string(),
            modified_at_raw: modified_at_raw.to_string(),
            thumbhash: None,
            duration: None,
        })
    }

    pub fn is_member_of(&self, album_id: &AlbumId) -> bool {
        self.albums.contains(album_id)
    }

    /// Set or clear membership in one album
    pub fn set_membership(&mut self, album_id: &AlbumId, member: bool) {
        if member {
            self.albums.insert(album_id.clone());
        } else {
            self.albums.remove(album_id);
        }
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }

    pub fn flag(&self, flag: AssetFlag) -> bool {
        match flag {
            AssetFlag::Favorite => self.is_favorite,
            AssetFlag::Archived => self.is_archived,
        }
    }

    pub fn set_flag(&mut self, flag: AssetFlag, value: bool) {
        match flag {
            AssetFlag::Favorite => self.is_favorite = value,
            AssetFlag::Archived => self.is_archived = value,
        }
    }
}

/// Boolean asset attributes the user can toggle from the detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetFlag {
    Favorite,
    Archived,
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title, self.id)
    }
}
