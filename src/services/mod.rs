// src/services/mod.rs
//
// Services Module - the pure subsystems the session controller composes

pub mod load_guard;
pub mod mutation_reconciler;
pub mod navigation_history;
pub mod pagination_engine;


pub use load_guard::{LoadGuard, LoadPhase, Precondition};

pub use mutation_reconciler::{
    toggle_membership, Acknowledgement, FailureReconciliation, MembershipToggle,
    MutationReconciler, PendingAlbumChange,
};

pub use navigation_history::{HistoryEntry, HistoryNavigation, HistoryView, NavigationHistory};

pub use pagination_engine::{
    append_assets, compute_next_page_request, detail_index_after_fold, fold_page,
    on_page_failed, should_fetch_next_page, update_pagination_state_from_response,
    MergeOutcome, PageFold,
};
