// src/services/load_guard.rs
//
// Load-Completion Guard - barrier over the preconditions of one load episode
//
// Each precondition is `None` (not required), `Some(false)` (pending) or
// `Some(true)` (satisfied). A guard is complete iff nothing is pending.
// Failures never satisfy a precondition; they end the episode instead.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::AssetSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precondition {
    FetchedAssetList,
    FetchedAssetMembership,
}

impl std::str::FromStr for Precondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fetched_asset_list" => Ok(Precondition::FetchedAssetList),
            "fetched_asset_membership" => Ok(Precondition::FetchedAssetMembership),
            other => Err(format!("unknown precondition: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadGuard {
    preconditions: BTreeMap<Precondition, Option<bool>>,
}

impl LoadGuard {
    fn with(asset_list: Option<bool>, membership: Option<bool>) -> Self {
        let mut preconditions = BTreeMap::new();
        preconditions.insert(Precondition::FetchedAssetList, asset_list);
        preconditions.insert(Precondition::FetchedAssetMembership, membership);
        Self { preconditions }
    }

    /// Guard for a freshly selected source. `None` means no episode is needed.
    pub fn create_initial_guard(source: &AssetSource) -> Option<Self> {
        match source {
            AssetSource::NoAssets => None,
            _ => Some(Self::with(Some(false), None)),
        }
    }

    /// Guard for opening one asset in the detail view.
    /// `needs_asset_list` is set when the asset itself still has to be fetched.
    pub fn for_asset_detail(needs_asset_list: bool) -> Self {
        Self::with(needs_asset_list.then_some(false), Some(false))
    }

    /// Mark a precondition satisfied. Entries the guard does not track are left alone.
    pub fn mark_satisfied(mut self, precondition: Precondition) -> Self {
        if let Some(slot) = self.preconditions.get_mut(&precondition) {
            debug!("Guard precondition {:?} satisfied", precondition);
            *slot = Some(true);
        }
        self
    }

    /// By-name variant for collaborators that speak strings; unknown names are a no-op
    pub fn mark_satisfied_by_name(self, name: &str) -> Self {
        match name.parse::<Precondition>() {
            Ok(precondition) => self.mark_satisfied(precondition),
            Err(e) => {
                debug!("Ignoring {}", e);
                self
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.preconditions
            .values()
            .all(|state| matches!(state, None | Some(true)))
    }

    /// True iff `precondition` is required and still pending
    pub fn is_pending(&self, precondition: Precondition) -> bool {
        matches!(self.preconditions.get(&precondition), Some(Some(false)))
    }

    /// True iff `precondition` is part of this episode at all
    pub fn requires(&self, precondition: Precondition) -> bool {
        matches!(self.preconditions.get(&precondition), Some(Some(_)))
    }
}

// ============================================================================
// EPISODE STATE MACHINE
// ============================================================================

/// Idle -> Loading(guard) -> { Ready | Loading(guard') }
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading(LoadGuard),
    Ready,
}

impl LoadPhase {
    pub fn start(source: &AssetSource) -> Self {
        match LoadGuard::create_initial_guard(source) {
            Some(guard) => LoadPhase::Loading(guard),
            None => LoadPhase::Idle,
        }
    }

    /// Advance after a precondition was met
    pub fn advance(self, precondition: Precondition) -> Self {
        match self {
            LoadPhase::Loading(guard) => Self::settle(guard.mark_satisfied(precondition)),
            other => other,
        }
    }

    /// Ready when the guard is complete, otherwise still loading
    fn settle(guard: LoadGuard) -> Self {
        if guard.is_complete() {
            LoadPhase::Ready
        } else {
            LoadPhase::Loading(guard)
        }
    }
}
