// src/application/runtime.rs
//
// Session Runtime - the effect interpreter around the pure controller
//
// ARCHITECTURE:
// - Owns the only live SessionState
// - Performs each Effect through the CatalogTransport, one at a time
// - Every transport answer re-enters as exactly one SessionEvent
// - Publishes observable facts on the EventBus after each event
//
// CRITICAL RULES:
// - Transport errors never escape: they are converted to FetchFailure values
// - Events are processed strictly one after another (no interleaving)

use std::collections::VecDeque;
use std::sync::Arc;

use log::debug;
use uuid::Uuid;

use crate::application::controller::{SessionController, Transition};
use crate::application::dto::SessionView;
use crate::application::messages::{Effect, SessionEvent};
use crate::application::state::{ModeTag, SessionState};
use crate::error::FetchFailure;
use crate::events::{EpisodeStarted, EventBus, ModeChanged, PageMerged, PendingChangesDiscarded};
use crate::integrations::CatalogTransport;

pub struct SessionRuntime<T: CatalogTransport> {
    controller: SessionController,
    state: SessionState,
    transport: Arc<T>,
    bus: EventBus,
    inbox: VecDeque<SessionEvent>,
}

impl<T: CatalogTransport> SessionRuntime<T> {
    pub fn new(controller: SessionController, transport: Arc<T>, bus: EventBus) -> Self {
        let state = SessionState::new(controller.config());
        Self {
            controller,
            state,
            transport,
            bus,
            inbox: VecDeque::new(),
        }
    }

    /// Install the initial snapshot and run its effects to completion
    pub async fn start(&mut self) {
        let Transition { state, effects } = self.controller.start();
        self.state = state;
        self.perform_all(effects).await;
        self.run_until_idle().await;
    }

    /// Deliver one event and keep going until no effect is outstanding
    pub async fn dispatch(&mut self, event: impl Into<SessionEvent>) {
        self.inbox.push_back(event.into());
        self.run_until_idle().await;
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn view(&self) -> SessionView {
        SessionView::from(&self.state)
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    async fn run_until_idle(&mut self) {
        while let Some(event) = self.inbox.pop_front() {
            let effects = self.process(event);
            self.perform_all(effects).await;
        }
    }

    fn process(&mut self, event: SessionEvent) -> Vec<Effect> {
        let failed_ack = matches!(
            &event,
            SessionEvent::MembershipChangeAcknowledged { result: Err(_), .. }
        );

        let placeholder = SessionState::new(self.controller.config());
        let before = std::mem::replace(&mut self.state, placeholder);
        let facts = Facts::of(&before);

        let Transition { state, effects } = self.controller.handle(before, event);
        self.state = state;
        self.publish(&facts, failed_ack);
        effects
    }

    async fn perform_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            let reply = self.perform(effect).await;
            self.inbox.push_back(reply);
        }
    }

    /// Carry out one effect; the answer is always an event
    pub async fn perform(&self, effect: Effect) -> SessionEvent {
        debug!("Performing {:?}", effect);
        match effect {
            Effect::FetchPage { request } => {
                let result = self.transport.fetch_page(&request).await.map_err(FetchFailure::from);
                SessionEvent::PageFetched { request, result }
            }
            Effect::FetchMembership { asset_id } => {
                let result = self
                    .transport
                    .fetch_membership(&asset_id)
                    .await
                    .map_err(FetchFailure::from);
                SessionEvent::MembershipFetched { asset_id, result }
            }
            Effect::FetchAlbums => SessionEvent::AlbumsFetched {
                result: self.transport.fetch_albums().await.map_err(FetchFailure::from),
            },
            Effect::ChangeMembership {
                request_id,
                album_id,
                asset_id,
                is_addition,
            } => {
                let result = self
                    .transport
                    .change_membership(&album_id, &asset_id, is_addition)
                    .await
                    .map_err(FetchFailure::from);
                SessionEvent::MembershipChangeAcknowledged { request_id, result }
            }
            Effect::UpdateAsset { asset_id, flag, value } => {
                let result = self
                    .transport
                    .update_asset(&asset_id, flag, value)
                    .await
                    .map_err(FetchFailure::from);
                SessionEvent::AssetUpdateAcknowledged {
                    asset_id,
                    flag,
                    value,
                    result,
                }
            }
            Effect::CreateAlbum { name } => SessionEvent::AlbumCreated {
                result: self.transport.create_album(&name).await.map_err(FetchFailure::from),
            },
        }
    }

    fn publish(&self, before: &Facts, failed_ack: bool) {
        let after = Facts::of(&self.state);

        if after.episode != before.episode {
            if let Some(source) = &self.state.pagination.source {
                self.bus.emit(EpisodeStarted::new(after.episode, source.clone()));
            }
        } else if after.current_page > before.current_page {
            let pagination = &self.state.pagination;
            self.bus.emit(PageMerged::new(
                pagination.episode,
                pagination.current_page,
                pagination.loaded_assets,
                pagination.total_assets,
                pagination.has_more_pages,
            ));
        }

        if after.mode != before.mode {
            self.bus.emit(ModeChanged::new(before.mode, after.mode));
        }

        if failed_ack && before.pending > after.pending {
            self.bus.emit(PendingChangesDiscarded::new(before.pending - after.pending));
        }
    }
}

/// What the bus diff looks at
struct Facts {
    episode: Uuid,
    current_page: u32,
    mode: ModeTag,
    pending: usize,
}

impl Facts {
    fn of(state: &SessionState) -> Self {
        Self {
            episode: state.pagination.episode,
            current_page: state.pagination.current_page,
            mode: state.mode.tag(),
            pending: state.reconciler.pending_count(),
        }
    }
}
