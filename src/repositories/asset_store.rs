// src/repositories/asset_store.rs
//
// In-memory store of every asset and album the session has seen.
//
// CRITICAL RULES:
// - DUMB data holder: no business logic, no event emission
// - Grows append-only; records are replaced wholesale on refresh
// - Only the pagination engine's merge and the mutation reconciler write here
// - A lookup miss is a valid "not yet loaded" state, never an error

use std::collections::HashMap;

use crate::domain::{Album, AlbumId, Asset, AssetId};

#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    known_assets: HashMap<AssetId, Asset>,
    known_albums: HashMap<AlbumId, Album>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // ASSETS
    // ========================================================================

    /// Insert or replace an asset by id. Returns true if the id was new.
    pub fn upsert_asset(&mut self, asset: Asset) -> bool {
        self.known_assets.insert(asset.id.clone(), asset).is_none()
    }

    pub fn asset(&self, id: &AssetId) -> Option<&Asset> {
        self.known_assets.get(id)
    }

    pub(crate) fn asset_mut(&mut self, id: &AssetId) -> Option<&mut Asset> {
        self.known_assets.get_mut(id)
    }

    pub fn contains_asset(&self, id: &AssetId) -> bool {
        self.known_assets.contains_key(id)
    }

    pub fn asset_count(&self) -> usize {
        self.known_assets.len()
    }

    // ========================================================================
    // ALBUMS
    // ========================================================================

    /// Replace the whole album map
    pub fn replace_albums(&mut self, albums: Vec<Album>) {
        self.known_albums = albums
            .into_iter()
            .map(|album| (album.id.clone(), album))
            .collect();
    }

    pub fn upsert_album(&mut self, album: Album) {
        self.known_albums.insert(album.id.clone(), album);
    }

    pub fn album(&self, id: &AlbumId) -> Option<&Album> {
        self.known_albums.get(id)
    }

    pub(crate) fn album_mut(&mut self, id: &AlbumId) -> Option<&mut Album> {
        self.known_albums.get_mut(id)
    }

    /// Albums sorted by name, for pickers
    pub fn albums_by_name(&self) -> Vec<&Album> {
        let mut albums: Vec<&Album> = self.known_albums.values().collect();
        albums.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        albums
    }

    pub fn album_count(&self) -> usize {
        self.known_albums.len()
    }
}
