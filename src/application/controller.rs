// src/application/controller.rs
//
// Session Controller - composes the pure subsystems into mode transitions
//
// CRITICAL RULES:
// - One event in, one snapshot + effects out; no I/O here
// - Stale page responses are detected explicitly and dropped
// - Failures become state transitions (error mode or notice), never panics
// - Entering a view records history; moving inside a view updates it in place

use log::{debug, info, warn};
use uuid::Uuid;

use crate::application::error_handling::StatusMessage;
use crate::application::messages::{Effect, SessionEvent, UserAction};
use crate::application::state::{AlbumSearch, Mode, SessionState};
use crate::config::SessionConfig;
use crate::domain::{
    Album, AlbumId, AssetFlag, AssetId, AssetSource, BrowsingWindow, FetchRequest, PageResponse,
    PaginationState,
};
use crate::error::FetchFailure;
use crate::services::{
    compute_next_page_request, detail_index_after_fold, fold_page, on_page_failed, HistoryEntry,
    HistoryNavigation, HistoryView, LoadGuard, LoadPhase, MutationReconciler, PendingAlbumChange,
    Precondition,
};

/// The next snapshot plus the requests the shell must carry out
#[derive(Debug)]
pub struct Transition {
    pub state: SessionState,
    pub effects: Vec<Effect>,
}

pub struct SessionController {
    config: SessionConfig,
}

impl SessionController {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Initial snapshot; albums are fetched right away
    pub fn start(&self) -> Transition {
        Transition {
            state: SessionState::new(&self.config),
            effects: vec![Effect::FetchAlbums],
        }
    }

    /// Process one event to completion
    pub fn handle(&self, state: SessionState, event: SessionEvent) -> Transition {
        let mut step = Step {
            config: &self.config,
            state,
            effects: Vec::new(),
        };

        match event {
            SessionEvent::User(action) => {
                step.state.notice = None;
                step.on_user_action(action);
            }
            SessionEvent::PageFetched { request, result } => step.on_page_fetched(request, result),
            SessionEvent::MembershipFetched { asset_id, result } => step.on_membership_fetched(asset_id, result),
            SessionEvent::AlbumsFetched { result } => step.on_albums_fetched(result),
            SessionEvent::MembershipChangeAcknowledged { request_id, result } => {
                step.on_membership_change_acknowledged(request_id, result)
            }
            SessionEvent::AssetUpdateAcknowledged {
                asset_id,
                flag,
                value,
                result,
            } => step.on_asset_update_acknowledged(asset_id, flag, value, result),
            SessionEvent::AlbumCreated { result } => step.on_album_created(result),
        }

        Transition {
            state: step.state,
            effects: step.effects,
        }
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

/// Working copy for one event
struct Step<'a> {
    config: &'a SessionConfig,
    state: SessionState,
    effects: Vec<Effect>,
}

impl Step<'_> {
    // ========================================================================
    // USER ACTIONS
    // ========================================================================

    fn on_user_action(&mut self, action: UserAction) {
        match action {
            UserAction::SelectSource { source } => self.select_source(source, false),
            UserAction::NextAsset => self.move_cursor(1),
            UserAction::PreviousAsset => self.move_cursor(-1),
            UserAction::OpenGrid => {
                if matches!(self.state.mode, Mode::ViewingAsset { .. }) {
                    self.enter_view(HistoryView::Grid);
                }
            }
            UserAction::OpenAsset { index } => self.open_asset(index),
            UserAction::HistoryBack => self.history_back(),
            UserAction::HistoryForward => {
                let navigation = self.state.history.navigate_forward();
                self.apply_history(navigation);
            }
            UserAction::ToggleFavorite => self.toggle_flag(AssetFlag::Favorite),
            UserAction::ToggleArchive => self.toggle_flag(AssetFlag::Archived),
            UserAction::ToggleAlbum { album } => {
                if let Some(asset_id) = self.state.open_asset_id().cloned() {
                    self.submit_membership_toggle(&asset_id, &album);
                    self.set_album_search(None);
                }
            }
            UserAction::OpenAlbumSearch => self.set_album_search(Some(AlbumSearch::default())),
            UserAction::SetAlbumSearch { query } => {
                if let Mode::ViewingAsset {
                    album_search: Some(search),
                    ..
                } = &mut self.state.mode
                {
                    search.query = query;
                }
            }
            UserAction::CloseAlbumSearch => self.set_album_search(None),
            UserAction::CreateAlbum { name } => self.create_album(name),
            UserAction::ReturnToMenu => self.return_to_menu(),
        }
    }

    /// Start a new episode. `is_retry` marks the single re-announcement after an empty result.
    fn select_source(&mut self, source: AssetSource, is_retry: bool) {
        self.state.window = BrowsingWindow::new();

        let LoadPhase::Loading(guard) = LoadPhase::start(&source) else {
            self.state.pagination = self.idle_pagination();
            self.state.mode = Mode::MainMenu;
            return;
        };

        if !is_retry {
            self.state.empty_retry_spent = false;
        }

        let mut pagination =
            PaginationState::for_source(source.clone(), self.config.page_size, self.config.max_assets_to_fetch);
        match compute_next_page_request(1, &pagination) {
            Some(request) => {
                info!("Episode {} started for {}", pagination.episode, source);
                pagination.is_loading_more = true;
                self.effects.push(Effect::FetchPage { request });
                self.state.mode = Mode::LoadingAssets { guard };
            }
            None => {
                self.state.mode = Mode::Error {
                    status: StatusMessage::internal(format!("Cannot build a request for {}", source)),
                };
            }
        }
        self.state.pagination = pagination;
    }

    fn move_cursor(&mut self, delta: isize) {
        if !self.state.mode.is_browsing() || !self.state.window.step(delta) {
            return;
        }

        if matches!(self.state.mode, Mode::ViewingAsset { .. }) {
            match self.state.window.current().cloned() {
                Some(id) if self.state.store.contains_asset(&id) => {
                    self.state.mode = Mode::ViewingAsset {
                        asset_id: id.clone(),
                        album_search: None,
                    };
                    self.effects.push(Effect::FetchMembership { asset_id: id });
                }
                _ => {
                    self.sync_history_in_place();
                    self.begin_asset_detail();
                    return;
                }
            }
        }
        self.sync_history_in_place();
    }

    fn open_asset(&mut self, index: usize) {
        if !self.state.mode.is_browsing() || index >= self.state.window.len() {
            return;
        }
        self.state.window.set_current_index(index);
        self.sync_history_in_place();
        self.begin_asset_detail();
    }

    fn history_back(&mut self) {
        // Outside a view, "back" returns to the last view itself
        if !self.state.mode.is_browsing() {
            if let Some(entry) = self.state.history.current().cloned() {
                let needs_asset_switch = entry.view.is_asset_viewing();
                info!("Returning to last view over {}", entry.source);
                self.restore(entry, needs_asset_switch);
                return;
            }
        }
        let navigation = self.state.history.navigate_back();
        self.apply_history(navigation);
    }

    fn apply_history(&mut self, navigation: HistoryNavigation) {
        match navigation {
            HistoryNavigation::NoHistory => debug!("No history in that direction"),
            HistoryNavigation::Restored {
                entry,
                needs_asset_switch,
            } => self.restore(entry, needs_asset_switch),
        }
    }

    fn toggle_flag(&mut self, flag: AssetFlag) {
        let Some(asset_id) = self.state.open_asset_id().cloned() else {
            return;
        };
        if let Some(value) = MutationReconciler::toggle_flag(&mut self.state.store, &asset_id, flag) {
            self.effects.push(Effect::UpdateAsset { asset_id, flag, value });
        }
    }

    fn create_album(&mut self, name: String) {
        if self.state.open_asset_id().is_none() {
            return;
        }
        let name = name.trim().to_string();
        if name.is_empty() {
            self.state.notice = Some(StatusMessage::internal("Album name cannot be empty"));
            return;
        }
        self.effects.push(Effect::CreateAlbum { name });
    }

    fn return_to_menu(&mut self) {
        // In-flight pages for the abandoned episode become stale
        self.state.pagination = self.idle_pagination();
        self.state.window = BrowsingWindow::new();
        self.state.mode = Mode::MainMenu;
    }

    fn set_album_search(&mut self, search: Option<AlbumSearch>) {
        if let Mode::ViewingAsset { album_search, .. } = &mut self.state.mode {
            *album_search = search;
        }
    }

    // ========================================================================
    // PAGES
    // ========================================================================

    fn is_current_episode(&self, request: &FetchRequest) -> bool {
        let pagination = &self.state.pagination;
        pagination.is_loading_more
            && pagination.episode == request.episode
            && pagination.source.as_ref() == Some(&request.source)
            && request.page == pagination.expected_page()
    }

    fn on_page_fetched(&mut self, request: FetchRequest, result: Result<PageResponse, FetchFailure>) {
        if !self.is_current_episode(&request) {
            debug!(
                "Discarding stale page {} for {} (episode {})",
                request.page, request.source, request.episode
            );
            return;
        }

        let response = match result {
            Ok(response) => response,
            Err(failure) => {
                self.state.pagination = on_page_failed(&self.state.pagination);
                let status = StatusMessage::from_failure(&format!("Loading {}", request.source), &failure);
                if self.waiting_on(Precondition::FetchedAssetList) {
                    self.state.mode = Mode::Error { status };
                } else {
                    self.state.notice = Some(status);
                }
                self.sync_history_in_place();
                return;
            }
        };

        let fold = fold_page(
            response,
            request.page,
            &self.state.pagination,
            &mut self.state.store,
            &mut self.state.window,
        );
        self.state.pagination = fold.state;
        if let Some(next) = fold.next_request {
            self.effects.push(Effect::FetchPage { request: next });
        }

        self.sync_timeline_detail(request.source.is_timeline());
        self.sync_history_in_place();

        if let Mode::LoadingAssets { guard } = &self.state.mode {
            if guard.is_pending(Precondition::FetchedAssetList) {
                let guard = guard.clone();
                if guard.requires(Precondition::FetchedAssetMembership) {
                    self.resume_detail_entry(guard);
                } else {
                    self.advance_guard(guard, Precondition::FetchedAssetList);
                }
            }
        }
    }

    /// Keep a timeline detail view on the newest asset while pages stream in
    fn sync_timeline_detail(&mut self, is_timeline_view: bool) {
        let Mode::ViewingAsset { asset_id, .. } = &self.state.mode else {
            return;
        };
        let index = detail_index_after_fold(is_timeline_view, true, self.state.window.current_index());
        self.state.window.set_current_index(index);

        let Some(newest) = self.state.window.current().cloned() else {
            return;
        };
        if &newest != asset_id && self.state.store.contains_asset(&newest) {
            self.state.mode = Mode::ViewingAsset {
                asset_id: newest.clone(),
                album_search: None,
            };
            self.effects.push(Effect::FetchMembership { asset_id: newest });
        }
    }

    // ========================================================================
    // GUARD AND VIEW ENTRY
    // ========================================================================

    fn waiting_on(&self, precondition: Precondition) -> bool {
        matches!(&self.state.mode, Mode::LoadingAssets { guard } if guard.is_pending(precondition))
    }

    fn advance_guard(&mut self, guard: LoadGuard, met: Precondition) {
        let opens_detail = guard.requires(Precondition::FetchedAssetMembership);
        match LoadPhase::Loading(guard).advance(met) {
            LoadPhase::Loading(guard) => self.state.mode = Mode::LoadingAssets { guard },
            LoadPhase::Ready if opens_detail => self.enter_view(HistoryView::AssetDetail),
            LoadPhase::Ready => self.on_list_ready(),
            LoadPhase::Idle => {}
        }
    }

    /// The first page of an episode is in
    fn on_list_ready(&mut self) {
        if !self.state.window.is_empty() {
            info!(
                "Episode {} ready with {} asset(s)",
                self.state.pagination.episode,
                self.state.window.len()
            );
            self.begin_asset_detail();
            return;
        }

        let source = self.state.active_source();
        if self.state.empty_retry_spent {
            info!("Episode for {} is empty", source);
            self.state.mode = Mode::EmptyResult {
                status: StatusMessage::empty_result(&source.to_string()),
            };
        } else {
            info!("Empty result for {}; re-announcing once", source);
            self.state.empty_retry_spent = true;
            self.select_source(source, true);
        }
    }

    /// Open the asset under the cursor through the membership guard
    fn begin_asset_detail(&mut self) {
        self.resume_detail_entry(LoadGuard::for_asset_detail(true));
    }

    fn resume_detail_entry(&mut self, guard: LoadGuard) {
        match self.state.window.current().cloned() {
            Some(id) if self.state.store.contains_asset(&id) => {
                self.state.mode = Mode::LoadingAssets {
                    guard: guard.mark_satisfied(Precondition::FetchedAssetList),
                };
                self.effects.push(Effect::FetchMembership { asset_id: id });
            }
            Some(id) if self.state.pagination.is_loading_more => {
                debug!("Asset {} not loaded yet; waiting for the next page", id);
                self.state.mode = Mode::LoadingAssets { guard };
            }
            Some(id) => {
                warn!("Asset {} is in the window but was never loaded", id);
                self.state.mode = Mode::Error {
                    status: StatusMessage::internal(format!("Asset {} is not available", id)),
                };
            }
            None => {
                self.state.mode = Mode::EmptyResult {
                    status: StatusMessage::empty_result(&self.state.active_source().to_string()),
                };
            }
        }
    }

    /// Enter a new (non-traversal) view: record-then-push
    fn enter_view(&mut self, view: HistoryView) {
        self.state.mode = match view {
            HistoryView::AssetDetail => match self.state.window.current() {
                Some(id) => Mode::ViewingAsset {
                    asset_id: id.clone(),
                    album_search: None,
                },
                None => return,
            },
            HistoryView::Grid => Mode::GridView,
        };

        let snapshot = HistoryEntry {
            view,
            source: self.state.active_source(),
            window: self.state.window.clone(),
            pagination: self.state.pagination.clone(),
        };
        self.state.history.record_entry();
        self.state.history.push_current_as_history_entry(snapshot);
    }

    /// Re-establish a snapshot taken by the history
    fn restore(&mut self, entry: HistoryEntry, needs_asset_switch: bool) {
        self.state.window = entry.window;
        self.state.window.clamp_index();
        self.state.pagination = entry.pagination;
        self.state.pagination.is_loading_more = false;

        if self.state.pagination.has_more_pages {
            let page = self.state.pagination.expected_page();
            if let Some(request) = compute_next_page_request(page, &self.state.pagination) {
                debug!("Resuming pagination of {} at page {}", entry.source, page);
                self.state.pagination.is_loading_more = true;
                self.effects.push(Effect::FetchPage { request });
            }
        }

        if needs_asset_switch {
            match self.state.window.current().cloned() {
                Some(id) if self.state.store.contains_asset(&id) => {
                    self.state.mode = Mode::ViewingAsset {
                        asset_id: id.clone(),
                        album_search: None,
                    };
                    self.effects.push(Effect::FetchMembership { asset_id: id });
                }
                _ => self.begin_asset_detail(),
            }
        } else {
            self.state.mode = Mode::GridView;
        }
        self.sync_history_in_place();
    }

    fn sync_history_in_place(&mut self) {
        if self.state.mode.is_browsing() {
            let source = self.state.active_source();
            self.state
                .history
                .update_current_entry_in_place(&self.state.window, &source, &self.state.pagination);
        }
    }

    fn idle_pagination(&self) -> PaginationState {
        PaginationState::idle(self.config.page_size, self.config.max_assets_to_fetch)
    }

    // ========================================================================
    // MEMBERSHIP AND ALBUMS
    // ========================================================================

    fn on_membership_fetched(&mut self, asset_id: AssetId, result: Result<Vec<AlbumId>, FetchFailure>) {
        let waiting_here = self.waiting_on(Precondition::FetchedAssetMembership)
            && self.state.window.current() == Some(&asset_id);

        match result {
            Ok(album_ids) => {
                if self.state.reconciler.pending().any(|c| c.asset_id == asset_id) {
                    debug!("Keeping optimistic membership for {} until edits settle", asset_id);
                } else {
                    MutationReconciler::apply_membership(&mut self.state.store, &asset_id, album_ids);
                }

                if waiting_here {
                    if let Mode::LoadingAssets { guard } = &self.state.mode {
                        let guard = guard.clone();
                        self.advance_guard(guard, Precondition::FetchedAssetMembership);
                    }
                }
            }
            Err(failure) => {
                let status = StatusMessage::from_failure("Loading album membership", &failure);
                if waiting_here {
                    self.state.mode = Mode::Error { status };
                } else {
                    self.state.notice = Some(status);
                }
            }
        }
    }

    fn on_albums_fetched(&mut self, result: Result<Vec<Album>, FetchFailure>) {
        match result {
            Ok(albums) => {
                debug!("Album list refreshed ({} albums)", albums.len());
                self.state.store.replace_albums(albums);
            }
            Err(failure) => {
                self.state.notice = Some(StatusMessage::from_failure("Loading albums", &failure));
            }
        }
    }

    fn submit_membership_toggle(&mut self, asset_id: &AssetId, album_id: &AlbumId) {
        let source = self.state.active_source();
        let changes = self
            .state
            .reconciler
            .submit_toggle(&mut self.state.store, asset_id, album_id, &source);
        self.effects.extend(changes.into_iter().map(change_effect));
    }

    fn on_membership_change_acknowledged(&mut self, request_id: Uuid, result: Result<(), FetchFailure>) {
        match result {
            Ok(()) => {
                let open_asset = self.state.open_asset_id().cloned();
                let ack = self
                    .state
                    .reconciler
                    .on_change_acknowledged(Some(request_id), open_asset.as_ref());
                if let Some((album_id, delta)) = &ack.album_count_delta {
                    MutationReconciler::apply_count_delta(&mut self.state.store, album_id, *delta);
                }
                if ack.should_refetch_membership {
                    if let Some(change) = ack.change {
                        self.effects.push(Effect::FetchMembership {
                            asset_id: change.asset_id,
                        });
                    }
                }
            }
            Err(failure) => {
                let current = self.state.window.current().cloned();
                let outcome = self.state.reconciler.on_change_failed(current.as_ref());
                self.state.notice = Some(StatusMessage::from_failure("Updating album membership", &failure));
                if let Some(asset_id) = outcome.refetch_asset {
                    self.effects.push(Effect::FetchMembership { asset_id });
                }
            }
        }
    }

    fn on_asset_update_acknowledged(
        &mut self,
        asset_id: AssetId,
        flag: AssetFlag,
        value: bool,
        result: Result<(), FetchFailure>,
    ) {
        if let Err(failure) = result {
            MutationReconciler::revert_flag(&mut self.state.store, &asset_id, flag, value);
            self.state.notice = Some(StatusMessage::from_failure("Updating asset", &failure));
        }
    }

    fn on_album_created(&mut self, result: Result<Album, FetchFailure>) {
        match result {
            Ok(album) => {
                info!("Album {:?} created", album.name);
                let album_id = album.id.clone();
                self.state.store.upsert_album(album);
                if let Some(asset_id) = self.state.open_asset_id().cloned() {
                    self.submit_membership_toggle(&asset_id, &album_id);
                    self.set_album_search(None);
                }
            }
            Err(failure) => {
                self.state.notice = Some(StatusMessage::from_failure("Creating album", &failure));
            }
        }
    }
}

fn change_effect(change: PendingAlbumChange) -> Effect {
    Effect::ChangeMembership {
        request_id: change.request_id,
        album_id: change.album_id,
        asset_id: change.asset_id,
        is_addition: change.is_addition,
    }
}
