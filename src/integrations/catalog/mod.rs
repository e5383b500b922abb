// src/integrations/catalog/mod.rs
//
// Remote catalog integration
//
// ARCHITECTURE:
// - `CatalogTransport` is the seam between the session runtime and the network
// - Implementations map wire data → domain values (NO session mutation)
// - Every method answers exactly one effect

pub mod client;
pub mod wire;

use async_trait::async_trait;

use crate::domain::{Album, AlbumId, AssetFlag, AssetId, FetchRequest, PageResponse};
use crate::error::AppResult;

pub use client::HttpCatalogClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    /// One page of assets for the request's source
    async fn fetch_page(&self, request: &FetchRequest) -> AppResult<PageResponse>;

    /// Authoritative album membership of one asset
    async fn fetch_membership(&self, asset_id: &AssetId) -> AppResult<Vec<AlbumId>>;

    async fn fetch_albums(&self) -> AppResult<Vec<Album>>;

    async fn change_membership(&self, album_id: &AlbumId, asset_id: &AssetId, is_addition: bool) -> AppResult<()>;

    async fn update_asset(&self, asset_id: &AssetId, flag: AssetFlag, value: bool) -> AppResult<()>;

    async fn create_album(&self, name: &str) -> AppResult<Album>;
}
