// src/services/navigation_history.rs
//
// Navigation History - back/current/forward over viewing snapshots
//
// CRITICAL RULES:
// - Pure data transitions, no side effects
// - Entering a NEW view clears the forward queue (branching drops the alternate future)
// - Call order for a new view is record-then-push
// - Intra-view movement updates the current entry in place, never adds a step
// - The back stack is bounded; the oldest entry is dropped silently

use std::collections::VecDeque;

use log::info;
use serde::{Deserialize, Serialize};

use crate::domain::{AssetSource, BrowsingWindow, PaginationState};

/// Which viewing mode a snapshot was taken in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryView {
    AssetDetail,
    Grid,
}

impl HistoryView {
    pub fn is_asset_viewing(self) -> bool {
        matches!(self, HistoryView::AssetDetail)
    }
}

/// Snapshot of the browsing state at the moment a view was entered
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub view: HistoryView,
    pub source: AssetSource,
    /// Carries the cursor (`current_index`) with it
    pub window: BrowsingWindow,
    pub pagination: PaginationState,
}

impl HistoryEntry {
    pub fn current_index(&self) -> usize {
        self.window.current_index()
    }
}

/// Outcome of a back/forward traversal
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryNavigation {
    NoHistory,
    Restored {
        entry: HistoryEntry,
        /// The restored view shows a single asset and must be re-resolved from
        /// the window and index rather than a cached rendering
        needs_asset_switch: bool,
    },
}

#[derive(Debug, Clone)]
pub struct NavigationHistory {
    back_stack: VecDeque<HistoryEntry>,
    current: Option<HistoryEntry>,
    forward_queue: Vec<HistoryEntry>,
    limit: usize,
}

impl NavigationHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            back_stack: VecDeque::new(),
            current: None,
            forward_queue: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.current.as_ref()
    }

    pub fn back_depth(&self) -> usize {
        self.back_stack.len()
    }

    pub fn forward_depth(&self) -> usize {
        self.forward_queue.len()
    }

    pub fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward_queue.is_empty()
    }

    /// First half of entering a new (non-traversal) view: drop the forward queue
    pub fn record_entry(&mut self) {
        self.forward_queue.clear();
    }

    /// Second half: the snapshot becomes current, the previous current goes back
    pub fn push_current_as_history_entry(&mut self, snapshot: HistoryEntry) {
        if let Some(previous) = self.current.replace(snapshot) {
            self.push_back_bounded(previous);
        }
    }

    /// record-then-push in one call
    pub fn enter_new_view(&mut self, snapshot: HistoryEntry) {
        self.record_entry();
        self.push_current_as_history_entry(snapshot);
    }

    /// Rewrite the current entry for movement inside the same view.
    /// Returns false when there is no current entry.
    pub fn update_current_entry_in_place(
        &mut self,
        window: &BrowsingWindow,
        source: &AssetSource,
        pagination: &PaginationState,
    ) -> bool {
        match self.current.as_mut() {
            Some(entry) => {
                entry.window = window.clone();
                entry.source = source.clone();
                entry.pagination = pagination.clone();
                true
            }
            None => false,
        }
    }

    pub fn navigate_back(&mut self) -> HistoryNavigation {
        let Some(entry) = self.back_stack.pop_back() else {
            return HistoryNavigation::NoHistory;
        };
        if let Some(previous) = self.current.take() {
            self.forward_queue.push(previous);
        }
        info!("History back to {:?} over {}", entry.view, entry.source);
        self.restore(entry)
    }

    pub fn navigate_forward(&mut self) -> HistoryNavigation {
        let Some(entry) = self.forward_queue.pop() else {
            return HistoryNavigation::NoHistory;
        };
        if let Some(previous) = self.current.take() {
            self.push_back_bounded(previous);
        }
        info!("History forward to {:?} over {}", entry.view, entry.source);
        self.restore(entry)
    }

    fn restore(&mut self, entry: HistoryEntry) -> HistoryNavigation {
        let needs_asset_switch = entry.view.is_asset_viewing();
        self.current = Some(entry.clone());
        HistoryNavigation::Restored {
            entry,
            needs_asset_switch,
        }
    }

    fn push_back_bounded(&mut self, entry: HistoryEntry) {
        self.back_stack.push_back(entry);
        while self.back_stack.len() > self.limit {
            self.back_stack.pop_front();
        }
    }
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new(20)
    }
}
