// src/integrations/catalog/wire.rs
//
// JSON shapes of the catalog API and their mapping to domain values.
// Raw timestamp strings are kept next to the parsed dates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    validate_album, Album, AlbumId, Asset, AssetId, AssetSource, FetchRequest, MediaKind,
    SearchContext, SearchFilters, SortOrder,
};
use crate::error::AppResult;

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    pub id: String,
    #[serde(default)]
    pub original_path: String,
    #[serde(default)]
    pub original_file_name: String,
    #[serde(default)]
    pub original_mime_type: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_archived: bool,
    pub file_created_at: String,
    pub file_modified_at: String,
    #[serde(default)]
    pub thumbhash: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumResponse {
    pub id: String,
    pub album_name: String,
    #[serde(default)]
    pub asset_count: u64,
    pub created_at: String,
    #[serde(default)]
    pub assets: Option<Vec<AssetResponse>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub assets: SearchAssets,
}

#[derive(Debug, Deserialize)]
pub struct SearchAssets {
    pub total: u64,
    pub count: u64,
    pub items: Vec<AssetResponse>,
}

/// One row of a bulk album edit result
#[derive(Debug, Deserialize)]
pub struct BulkIdResponse {
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

// ============================================================================
// REQUESTS
// ============================================================================

/// Body shared by metadata and smart search
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    pub with_archived: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<&'static str>,
    pub order: &'static str,
}

/// Which search endpoint a request goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEndpoint {
    Metadata,
    Smart,
}

impl SearchEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            SearchEndpoint::Metadata => "/api/search/metadata",
            SearchEndpoint::Smart => "/api/search/smart",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IdsBody {
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetsBody {
    pub ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumBody {
    pub album_name: String,
}

// ============================================================================
// MAPPING
// ============================================================================

/// Endpoint and body for one page of a source
pub fn search_for(request: &FetchRequest) -> (SearchEndpoint, SearchBody) {
    let filters = request.filters();
    let mut body = SearchBody {
        page: request.page,
        size: request.page_size,
        query: None,
        original_file_name: None,
        album_ids: None,
        is_favorite: filters.favorites_only.then_some(true),
        with_archived: filters.include_archived,
        media_type: media_type(&filters),
        order: match filters.order {
            SortOrder::NewestFirst => "desc",
            SortOrder::OldestFirst => "asc",
        },
    };

    let endpoint = match &request.source {
        AssetSource::TextSearch {
            query,
            context: SearchContext::Smart,
        } => {
            body.query = Some(query.clone());
            SearchEndpoint::Smart
        }
        AssetSource::TextSearch {
            query,
            context: SearchContext::Metadata,
        } => {
            body.original_file_name = Some(query.clone());
            SearchEndpoint::Metadata
        }
        AssetSource::Album { album } | AssetSource::FilteredAlbum { album, .. } => {
            body.album_ids = Some(vec![album.to_string()]);
            SearchEndpoint::Metadata
        }
        AssetSource::Timeline { .. } | AssetSource::NoAssets => SearchEndpoint::Metadata,
    };

    (endpoint, body)
}

fn media_type(filters: &SearchFilters) -> Option<&'static str> {
    match filters.media {
        MediaKind::All => None,
        MediaKind::Images => Some("IMAGE"),
        MediaKind::Videos => Some("VIDEO"),
    }
}

impl AssetResponse {
    pub fn into_asset(self) -> AppResult<Asset> {
        let mut asset = Asset::new(
            AssetId::new(self.id),
            self.original_file_name,
            &self.file_created_at,
            &self.file_modified_at,
        )?;
        asset.path = self.original_path;
        asset.mime_type = self.original_mime_type.unwrap_or_default();
        asset.is_favorite = self.is_favorite;
        asset.is_archived = self.is_archived;
        asset.thumbhash = self.thumbhash;
        asset.duration = self.duration;
        Ok(asset)
    }
}

impl AlbumResponse {
    pub fn into_album(self) -> AppResult<Album> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)?.with_timezone(&Utc);
        let mut album = Album::new(AlbumId::new(self.id), self.album_name, created_at);
        album.asset_count = self.asset_count;
        album.assets = self
            .assets
            .map(|assets| assets.into_iter().map(AssetResponse::into_asset).collect::<AppResult<Vec<_>>>())
            .transpose()?;
        validate_album(&album)?;
        Ok(album)
    }
}
