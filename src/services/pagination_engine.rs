// src/services/pagination_engine.rs
//
// Pagination Engine - multi-page fetch orchestration
//
// CRITICAL RULES:
// - Pure functions over explicit state; the caller owns the snapshot
// - A short page is the authoritative end-of-data signal, whatever `total` says
// - Merge is idempotent under duplicate ids and never reorders the window
// - A failed page stops the chain; merged pages are kept, nothing is retried here

use log::{debug, warn};

use crate::domain::{
    validate_asset, Asset, AssetSource, BrowsingWindow, FetchRequest, PageResponse,
    PaginationState,
};
use crate::repositories::AssetStore;

/// Counts from one merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    /// Ids the store had never seen
    pub inserted: usize,
    /// Ids already in the store, replaced last-write-wins
    pub replaced: usize,
    /// Ids appended to the window
    pub appended: usize,
    /// Records rejected by `validate_asset`
    pub skipped: usize,
}

/// Result of folding one successful page into the session
#[derive(Debug, Clone)]
pub struct PageFold {
    pub state: PaginationState,
    pub merge: MergeOutcome,
    /// Present when another page must be requested
    pub next_request: Option<FetchRequest>,
}

/// True iff another page is needed after `response`.
///
/// `state` is the state *before* the response is folded in.
pub fn should_fetch_next_page(response: &PageResponse, state: &PaginationState) -> bool {
    let limit = response.total.min(state.max_assets_to_fetch);
    state.loaded_assets + response.count < limit && response.count == u64::from(state.page_size)
}

/// Request for `next_page` with the same shape and filters as the episode's source
pub fn compute_next_page_request(next_page: u32, state: &PaginationState) -> Option<FetchRequest> {
    match &state.source {
        None | Some(AssetSource::NoAssets) => None,
        Some(source) => Some(FetchRequest {
            episode: state.episode,
            source: source.clone(),
            page_size: state.page_size,
            page: next_page,
        }),
    }
}

/// Upsert every asset into the store and append unseen ids to the window in
/// arrival order. The cursor is preserved unless it falls off the end.
pub fn append_assets(
    new_assets: Vec<Asset>,
    store: &mut AssetStore,
    window: &mut BrowsingWindow,
) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for asset in new_assets {
        if let Err(e) = validate_asset(&asset) {
            warn!("Skipping invalid asset record: {}", e);
            outcome.skipped += 1;
            continue;
        }

        let id = asset.id.clone();
        if store.upsert_asset(asset) {
            outcome.inserted += 1;
        } else {
            outcome.replaced += 1;
        }
        if window.push_if_new(id) {
            outcome.appended += 1;
        }
    }

    window.clamp_index();
    outcome
}

/// New pagination state after folding `response` as page `page_number`
pub fn update_pagination_state_from_response(
    response: &PageResponse,
    page_number: u32,
    state: &PaginationState,
) -> PaginationState {
    let has_more_pages = should_fetch_next_page(response, state);
    let loaded_assets = state.loaded_assets + response.count;

    if !has_more_pages && loaded_assets >= state.max_assets_to_fetch && response.total > loaded_assets {
        warn!(
            "Safety cap reached: stopped at {} of {} assets",
            loaded_assets, response.total
        );
    }

    PaginationState {
        current_page: page_number,
        total_assets: response.total,
        loaded_assets,
        has_more_pages,
        ..state.clone()
    }
}

/// Fold one page: merge, advance the state, and decide on the next request.
pub fn fold_page(
    response: PageResponse,
    page_number: u32,
    state: &PaginationState,
    store: &mut AssetStore,
    window: &mut BrowsingWindow,
) -> PageFold {
    let mut next_state = update_pagination_state_from_response(&response, page_number, state);
    let merge = append_assets(response.assets, store, window);

    let next_request = if next_state.has_more_pages {
        compute_next_page_request(page_number + 1, &next_state)
    } else {
        None
    };
    next_state.is_loading_more = next_request.is_some();

    debug!(
        "Folded page {} ({} new, {} replaced); loaded {}/{}",
        page_number, merge.inserted, merge.replaced, next_state.loaded_assets, next_state.total_assets
    );

    PageFold {
        state: next_state,
        merge,
        next_request,
    }
}

/// State after a failed page: the chain stops, merged pages stay
pub fn on_page_failed(state: &PaginationState) -> PaginationState {
    PaginationState {
        has_more_pages: false,
        is_loading_more: false,
        ..state.clone()
    }
}

/// Detail-view index after a successful fold.
///
/// Timeline views showing an asset are re-pointed at the newest asset so
/// "latest photo" stays fresh while pages stream in.
pub fn detail_index_after_fold(is_timeline_view: bool, showing_detail: bool, current_index: usize) -> usize {
    if is_timeline_view && showing_detail {
        0
    } else {
        current_index
    }
}
