// src/services/mutation_reconciler.rs
//
// Mutation Reconciler - optimistic album-membership edits
//
// CRITICAL RULES:
// - Local edits apply immediately; the server catches up later
// - Every edit is queued in submission order and acknowledged one at a time
// - A failure discards the WHOLE queue; the client cannot know which edits landed
// - Authoritative membership is re-fetched once the queue drains or fails
// - This is one of only two writers of the AssetStore

use std::collections::VecDeque;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AlbumId, Asset, AssetFlag, AssetId, AssetSource};
use crate::repositories::AssetStore;

/// A membership edit sent to the server and not yet confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAlbumChange {
    pub request_id: Uuid,
    pub album_id: AlbumId,
    pub asset_id: AssetId,
    pub is_addition: bool,
}

/// Result of flipping one album on one asset
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipToggle {
    /// The asset with the local edit(s) applied
    pub asset: Asset,
    pub album_id: AlbumId,
    pub is_addition: bool,
    /// Set when move mode also removed the asset from the browsed album
    pub move_from_album_id: Option<AlbumId>,
}

impl MembershipToggle {
    /// The edits to submit, in submission order
    pub fn edits(&self) -> Vec<(AlbumId, bool)> {
        let mut edits = vec![(self.album_id.clone(), self.is_addition)];
        if let Some(source_album) = &self.move_from_album_id {
            edits.push((source_album.clone(), false));
        }
        edits
    }
}

/// Flip `album_id` on `asset`. While browsing a filtered album in move mode,
/// adding to another album also removes the asset from the browsed one.
pub fn toggle_membership(asset: &Asset, album_id: &AlbumId, current_source: &AssetSource) -> MembershipToggle {
    let mut updated = asset.clone();
    let is_addition = !asset.is_member_of(album_id);
    updated.set_membership(album_id, is_addition);

    let move_from_album_id = match current_source.move_source_album() {
        Some(source_album)
            if is_addition && source_album != album_id && asset.is_member_of(source_album) =>
        {
            updated.set_membership(source_album, false);
            Some(source_album.clone())
        }
        _ => None,
    };

    MembershipToggle {
        asset: updated,
        album_id: album_id.clone(),
        is_addition,
        move_from_album_id,
    }
}

/// What a successful acknowledgement means for the session
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgement {
    pub change: Option<PendingAlbumChange>,
    pub album_count_delta: Option<(AlbumId, i64)>,
    pub should_refetch_membership: bool,
}

impl Acknowledgement {
    fn ignored() -> Self {
        Self {
            change: None,
            album_count_delta: None,
            should_refetch_membership: false,
        }
    }
}

/// What a failed acknowledgement means for the session
#[derive(Debug, Clone, PartialEq)]
pub struct FailureReconciliation {
    pub discarded: usize,
    /// Asset whose membership must be re-fetched from the server
    pub refetch_asset: Option<AssetId>,
}

#[derive(Debug, Clone, Default)]
pub struct MutationReconciler {
    queue: VecDeque<PendingAlbumChange>,
}

impl MutationReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> impl Iterator<Item = &PendingAlbumChange> {
        self.queue.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    // ========================================================================
    // SUBMISSION
    // ========================================================================

    /// Toggle `album_id` on a stored asset, write the result back and queue
    /// the resulting edits. Returns the queued changes (empty if the asset is unknown).
    pub fn submit_toggle(
        &mut self,
        store: &mut AssetStore,
        asset_id: &AssetId,
        album_id: &AlbumId,
        current_source: &AssetSource,
    ) -> Vec<PendingAlbumChange> {
        let Some(asset) = store.asset(asset_id) else {
            warn!("Membership toggle for unknown asset {}", asset_id);
            return Vec::new();
        };

        let toggle = toggle_membership(asset, album_id, current_source);
        let edits = toggle.edits();
        store.upsert_asset(toggle.asset);

        edits
            .into_iter()
            .map(|(album, is_addition)| self.enqueue(asset_id.clone(), album, is_addition))
            .collect()
    }

    pub fn enqueue(&mut self, asset_id: AssetId, album_id: AlbumId, is_addition: bool) -> PendingAlbumChange {
        let change = PendingAlbumChange {
            request_id: Uuid::new_v4(),
            album_id,
            asset_id,
            is_addition,
        };
        self.queue.push_back(change.clone());
        change
    }

    // ========================================================================
    // RECONCILIATION
    // ========================================================================

    /// Pop exactly one pending change.
    ///
    /// With a `request_id` only the matching entry is taken; an id that is no
    /// longer queued belongs to a change already discarded and is ignored.
    /// Without one the oldest entry is taken. `open_asset` is the asset
    /// currently shown in the detail view.
    pub fn on_change_acknowledged(&mut self, request_id: Option<Uuid>, open_asset: Option<&AssetId>) -> Acknowledgement {
        let position = match request_id {
            Some(id) => match self.queue.iter().position(|c| c.request_id == id) {
                Some(position) => position,
                None => {
                    debug!("Acknowledgement for discarded change {}; ignoring", id);
                    return Acknowledgement::ignored();
                }
            },
            None => 0,
        };
        if position != 0 {
            warn!("Acknowledgement arrived out of submission order (position {})", position);
        }

        let Some(change) = self.queue.remove(position) else {
            debug!("Acknowledgement with no pending change; ignoring");
            return Acknowledgement::ignored();
        };

        let delta = if change.is_addition { 1 } else { -1 };
        let should_refetch_membership = self.queue.is_empty() && open_asset == Some(&change.asset_id);

        Acknowledgement {
            album_count_delta: Some((change.album_id.clone(), delta)),
            should_refetch_membership,
            change: Some(change),
        }
    }

    /// Discard every pending change and ask for the current asset's membership
    pub fn on_change_failed(&mut self, current_asset: Option<&AssetId>) -> FailureReconciliation {
        let discarded = self.queue.len();
        self.queue.clear();
        warn!("Membership change failed; discarded {} pending change(s)", discarded);
        FailureReconciliation {
            discarded,
            refetch_asset: current_asset.cloned(),
        }
    }

    // ========================================================================
    // STORE WRITES
    // ========================================================================

    /// Apply a displayed-count delta to a known album
    pub fn apply_count_delta(store: &mut AssetStore, album_id: &AlbumId, delta: i64) {
        if let Some(album) = store.album_mut(album_id) {
            album.apply_count_delta(delta);
        }
    }

    /// Replace an asset's membership with the server's authoritative list.
    /// Returns false if the asset is not in the store.
    pub fn apply_membership(store: &mut AssetStore, asset_id: &AssetId, album_ids: Vec<AlbumId>) -> bool {
        match store.asset_mut(asset_id) {
            Some(asset) => {
                asset.albums = album_ids.into_iter().collect();
                true
            }
            None => false,
        }
    }

    /// Flip a boolean flag locally. Returns the new value.
    pub fn toggle_flag(store: &mut AssetStore, asset_id: &AssetId, flag: AssetFlag) -> Option<bool> {
        let asset = store.asset_mut(asset_id)?;
        let value = !asset.flag(flag);
        asset.set_flag(flag, value);
        Some(value)
    }

    /// Put a flag back after the server rejected the change
    pub fn revert_flag(store: &mut AssetStore, asset_id: &AssetId, flag: AssetFlag, rejected_value: bool) {
        if let Some(asset) = store.asset_mut(asset_id) {
            if asset.flag(flag) == rejected_value {
                asset.set_flag(flag, !rejected_value);
            }
        }
    }
}
