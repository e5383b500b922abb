// src/application/controller_tests.rs
//
// Session controller: episodes, stale responses, history and optimistic edits

#[cfg(test)]
mod tests {
    use crate::application::controller::SessionController;
    use crate::application::error_handling::ErrorType;
    use crate::application::messages::{Effect, SessionEvent, UserAction};
    use crate::application::state::{AlbumSearch, Mode, ModeTag, SessionState};
    use crate::config::SessionConfig;
    use crate::domain::{
        Album, AlbumId, AlbumViewFilters, Asset, AssetFlag, AssetId, AssetSource, FetchRequest,
        PageResponse, SearchFilters,
    };
    use crate::error::FetchFailure;
    use chrono::Utc;

    // ========================================================================
    // TEST HELPERS
    // ========================================================================

    struct Harness {
        controller: SessionController,
        state: Option<SessionState>,
    }

    impl Harness {
        fn new(page_size: u32) -> Self {
            let controller = SessionController::new(SessionConfig {
                page_size,
                ..SessionConfig::default()
            });
            let start = controller.start();
            assert_eq!(start.effects, vec![Effect::FetchAlbums]);
            Self {
                controller,
                state: Some(start.state),
            }
        }

        fn send(&mut self, event: impl Into<SessionEvent>) -> Vec<Effect> {
            let state = self.state.take().unwrap();
            let transition = self.controller.handle(state, event.into());
            self.state = Some(transition.state);
            transition.effects
        }

        fn state(&self) -> &SessionState {
            self.state.as_ref().unwrap()
        }

        /// Select `source`, deliver one page and its membership, land in the detail view
        fn open_source(&mut self, source: AssetSource, page: Vec<Asset>, total: u64) -> Vec<Effect> {
            let effects = self.send(UserAction::SelectSource { source });
            let request = page_request(&effects);
            let effects = self.send(ok_page(request, page, total));
            let first = membership_request(&effects).expect("membership requested");
            let albums = self.state().store.asset(&first).unwrap().albums.iter().cloned().collect();
            self.send(SessionEvent::MembershipFetched {
                asset_id: first,
                result: Ok(albums),
            });
            assert_eq!(self.state().mode.tag(), ModeTag::ViewingAsset);
            effects
        }
    }

    fn asset(id: &str) -> Asset {
        Asset::new(
            AssetId::from(id),
            format!("{}.jpg", id),
            "2024-05-01T08:00:00.000Z",
            "2024-05-01T08:00:00.000Z",
        )
        .unwrap()
    }

    fn asset_in(id: &str, albums: &[&str]) -> Asset {
        let mut asset = asset(id);
        asset.albums = albums.iter().map(|a| AlbumId::from(*a)).collect();
        asset
    }

    fn assets(ids: &[&str]) -> Vec<Asset> {
        ids.iter().map(|id| asset(id)).collect()
    }

    fn album(id: &str, count: u64) -> Album {
        let mut album = Album::new(AlbumId::from(id), id.to_uppercase(), Utc::now());
        album.asset_count = count;
        album
    }

    fn timeline() -> AssetSource {
        AssetSource::Timeline {
            filters: SearchFilters::default(),
        }
    }

    fn album_source(id: &str) -> AssetSource {
        AssetSource::Album {
            album: AlbumId::from(id),
        }
    }

    fn ok_page(request: FetchRequest, assets: Vec<Asset>, total: u64) -> SessionEvent {
        SessionEvent::PageFetched {
            request,
            result: Ok(PageResponse::new(assets, total)),
        }
    }

    fn page_request(effects: &[Effect]) -> FetchRequest {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::FetchPage { request } => Some(request.clone()),
                _ => None,
            })
            .expect("page requested")
    }

    fn membership_request(effects: &[Effect]) -> Option<AssetId> {
        effects.iter().find_map(|e| match e {
            Effect::FetchMembership { asset_id } => Some(asset_id.clone()),
            _ => None,
        })
    }

    fn change_requests(effects: &[Effect]) -> Vec<(uuid::Uuid, AlbumId, bool)> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::ChangeMembership {
                    request_id,
                    album_id,
                    is_addition,
                    ..
                } => Some((*request_id, album_id.clone(), *is_addition)),
                _ => None,
            })
            .collect()
    }

    fn window_ids(state: &SessionState) -> Vec<&str> {
        state.window.ids().iter().map(|id| id.as_str()).collect()
    }

    // ========================================================================
    // EPISODES
    // ========================================================================

    #[test]
    fn test_timeline_streams_three_pages() {
        let mut h = Harness::new(2);

        let effects = h.send(UserAction::SelectSource { source: timeline() });
        let first = page_request(&effects);
        assert_eq!(first.page, 1);
        assert!(matches!(h.state().mode, Mode::LoadingAssets { .. }));

        let effects = h.send(ok_page(first, assets(&["a", "b"]), 5));
        let second = page_request(&effects);
        assert_eq!(second.page, 2);
        assert_eq!(membership_request(&effects), Some(AssetId::from("a")));

        h.send(SessionEvent::MembershipFetched {
            asset_id: AssetId::from("a"),
            result: Ok(Vec::new()),
        });
        assert_eq!(h.state().open_asset_id(), Some(&AssetId::from("a")));

        let effects = h.send(ok_page(second, assets(&["c", "d"]), 5));
        let third = page_request(&effects);
        assert_eq!(third.page, 3);
        // Still showing the newest asset; nothing to re-resolve
        assert_eq!(membership_request(&effects), None);

        let effects = h.send(ok_page(third, assets(&["e"]), 5));
        assert!(effects.is_empty());

        let state = h.state();
        assert_eq!(window_ids(state), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(state.pagination.loaded_assets, 5);
        assert!(!state.pagination.has_more_pages);
        assert!(!state.pagination.is_loading_more);
        assert_eq!(state.history.back_depth(), 0);
    }


    #[test]
    fn test_timeline_page_returns_detail_to_newest() {
        let mut h = Harness::new(2);
        let effects = h.open_source(timeline(), assets(&["a", "b"]), 6);
        let second = page_request(&effects);

        h.send(UserAction::NextAsset);
        assert_eq!(h.state().window.current_index(), 1);
        assert_eq!(h.state().open_asset_id(), Some(&AssetId::from("b")));

        let effects = h.send(ok_page(second, assets(&["c", "d"]), 6));
        assert_eq!(h.state().window.current_index(), 0);
        assert_eq!(h.state().open_asset_id(), Some(&AssetId::from("a")));
        assert_eq!(membership_request(&effects), Some(AssetId::from("a")));
    }

    #[test]
    fn test_album_page_keeps_detail_cursor() {
        let mut h = Harness::new(2);
        let effects = h.open_source(album_source("al"), assets(&["a", "b"]), 6);
        let second = page_request(&effects);

        h.send(UserAction::NextAsset);
        let effects = h.send(ok_page(second, assets(&["c", "d"]), 6));

        assert_eq!(h.state().window.current_index(), 1);
        assert_eq!(h.state().open_asset_id(), Some(&AssetId::from("b")));
        assert_eq!(membership_request(&effects), None);
        assert_eq!(window_ids(h.state()), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_duplicate_delivery_is_stale() {
        let mut h = Harness::new(2);
        let effects = h.send(UserAction::SelectSource { source: timeline() });
        let first = page_request(&effects);

        h.send(ok_page(first.clone(), assets(&["a", "b"]), 10));
        let effects = h.send(ok_page(first, assets(&["x", "y"]), 10));

        assert!(effects.is_empty());
        assert_eq!(window_ids(h.state()), vec!["a", "b"]);
    }

    #[test]
    fn test_response_from_previous_episode_is_discarded() {
        let mut h = Harness::new(2);
        let effects = h.send(UserAction::SelectSource { source: timeline() });
        let old_request = page_request(&effects);

        let effects = h.send(UserAction::SelectSource {
            source: album_source("trips"),
        });
        let new_request = page_request(&effects);
        assert_ne!(old_request.episode, new_request.episode);

        let effects = h.send(ok_page(old_request, assets(&["stale"]), 1));
        assert!(effects.is_empty());
        assert!(h.state().window.is_empty());
        assert!(matches!(h.state().mode, Mode::LoadingAssets { .. }));

        h.send(ok_page(new_request, assets(&["fresh"]), 1));
        assert_eq!(window_ids(h.state()), vec!["fresh"]);
    }

    #[test]
    fn test_empty_result_retries_once() {
        let mut h = Harness::new(2);
        let effects = h.send(UserAction::SelectSource {
            source: album_source("empty"),
        });

        let effects = h.send(ok_page(page_request(&effects), Vec::new(), 0));
        let retry = page_request(&effects);
        assert_eq!(retry.page, 1);
        assert!(matches!(h.state().mode, Mode::LoadingAssets { .. }));

        let effects = h.send(ok_page(retry, Vec::new(), 0));
        assert!(effects.is_empty());
        match &h.state().mode {
            Mode::EmptyResult { status } => assert_eq!(status.error_type, ErrorType::EmptyResult),
            other => panic!("expected empty result, got {:?}", other),
        }

        // A fresh user selection earns a fresh retry
        let effects = h.send(UserAction::SelectSource {
            source: album_source("empty"),
        });
        let effects = h.send(ok_page(page_request(&effects), Vec::new(), 0));
        assert_eq!(page_request(&effects).page, 1);
    }

    #[test]
    fn test_first_page_failure_is_error_mode() {
        let mut h = Harness::new(2);
        let effects = h.send(UserAction::SelectSource { source: timeline() });

        h.send(SessionEvent::PageFetched {
            request: page_request(&effects),
            result: Err(FetchFailure::network("connection refused")),
        });

        match &h.state().mode {
            Mode::Error { status } => assert_eq!(status.error_type, ErrorType::Connection),
            other => panic!("expected error, got {:?}", other),
        }
        assert!(!h.state().pagination.is_loading_more);
    }

    #[test]
    fn test_later_page_failure_keeps_view() {
        let mut h = Harness::new(2);
        let effects = h.open_source(album_source("trips"), assets(&["a", "b"]), 6);
        let second = page_request(&effects);

        let effects = h.send(SessionEvent::PageFetched {
            request: second,
            result: Err(FetchFailure::network("timeout")),
        });

        assert!(effects.is_empty());
        assert_eq!(h.state().mode.tag(), ModeTag::ViewingAsset);
        assert!(h.state().notice.is_some());
        assert!(!h.state().pagination.has_more_pages);
        assert_eq!(window_ids(h.state()), vec!["a", "b"]);
    }

    #[test]
    fn test_no_assets_source_returns_to_menu() {
        let mut h = Harness::new(2);
        let effects = h.send(UserAction::SelectSource {
            source: AssetSource::NoAssets,
        });
        assert!(effects.is_empty());
        assert_eq!(h.state().mode, Mode::MainMenu);
    }

    #[test]
    fn test_return_to_menu_makes_in_flight_pages_stale() {
        let mut h = Harness::new(2);
        let effects = h.open_source(album_source("trips"), assets(&["a", "b"]), 6);
        let second = page_request(&effects);

        h.send(UserAction::ReturnToMenu);
        assert_eq!(h.state().mode, Mode::MainMenu);
        assert!(h.state().pagination.source.is_none());

        let effects = h.send(ok_page(second, assets(&["c", "d"]), 6));
        assert!(effects.is_empty());
        assert!(h.state().window.is_empty());
    }

    // ========================================================================
    // NAVIGATION AND HISTORY
    // ========================================================================

    #[test]
    fn test_next_and_previous_clamp() {
        let mut h = Harness::new(10);
        h.open_source(album_source("trips"), assets(&["a", "b"]), 2);

        let effects = h.send(UserAction::PreviousAsset);
        assert!(effects.is_empty());
        assert_eq!(h.state().open_asset_id(), Some(&AssetId::from("a")));

        let effects = h.send(UserAction::NextAsset);
        assert_eq!(membership_request(&effects), Some(AssetId::from("b")));
        assert_eq!(h.state().open_asset_id(), Some(&AssetId::from("b")));

        let effects = h.send(UserAction::NextAsset);
        assert!(effects.is_empty());
        assert_eq!(h.state().window.current_index(), 1);

        // Intra-view movement rewrote the entry instead of adding one
        assert_eq!(h.state().history.back_depth(), 0);
        assert_eq!(h.state().history.current().unwrap().current_index(), 1);
    }

    #[test]
    fn test_history_round_trip_and_branching() {
        let mut h = Harness::new(10);
        h.open_source(album_source("trips"), assets(&["a", "b", "c"]), 3);

        h.send(UserAction::OpenGrid);
        assert_eq!(h.state().mode, Mode::GridView);

        let effects = h.send(UserAction::OpenAsset { index: 2 });
        assert_eq!(membership_request(&effects), Some(AssetId::from("c")));
        h.send(SessionEvent::MembershipFetched {
            asset_id: AssetId::from("c"),
            result: Ok(Vec::new()),
        });
        assert_eq!(h.state().open_asset_id(), Some(&AssetId::from("c")));
        assert_eq!(h.state().history.back_depth(), 2);

        h.send(UserAction::HistoryBack);
        assert_eq!(h.state().mode, Mode::GridView);
        assert_eq!(h.state().window.current_index(), 2);
        assert_eq!(h.state().history.forward_depth(), 1);

        let effects = h.send(UserAction::HistoryBack);
        assert_eq!(h.state().open_asset_id(), Some(&AssetId::from("a")));
        assert_eq!(membership_request(&effects), Some(AssetId::from("a")));
        assert_eq!(h.state().history.forward_depth(), 2);

        h.send(UserAction::HistoryForward);
        assert_eq!(h.state().mode, Mode::GridView);
        assert_eq!(h.state().history.forward_depth(), 1);

        // A new view drops the alternate future
        h.send(UserAction::OpenAsset { index: 1 });
        h.send(SessionEvent::MembershipFetched {
            asset_id: AssetId::from("b"),
            result: Ok(Vec::new()),
        });
        assert_eq!(h.state().history.forward_depth(), 0);

        let effects = h.send(UserAction::HistoryForward);
        assert!(effects.is_empty());
        assert_eq!(h.state().open_asset_id(), Some(&AssetId::from("b")));
    }

    #[test]
    fn test_history_restore_resumes_pagination() {
        let mut h = Harness::new(2);
        let effects = h.open_source(album_source("trips"), assets(&["a", "b"]), 6);
        let in_flight = page_request(&effects);

        h.send(UserAction::OpenGrid);
        h.send(UserAction::ReturnToMenu);
        let effects = h.send(ok_page(in_flight, assets(&["c", "d"]), 6));
        assert!(effects.is_empty());

        // From the menu, back returns to the last view and keeps paging
        let effects = h.send(UserAction::HistoryBack);
        assert_eq!(h.state().mode, Mode::GridView);
        let resumed = page_request(&effects);
        assert_eq!(resumed.page, 2);

        h.send(ok_page(resumed, assets(&["c", "d"]), 6));
        assert_eq!(window_ids(h.state()), vec!["a", "b", "c", "d"]);
    }

    // ========================================================================
    // OPTIMISTIC EDITS
    // ========================================================================

    #[test]
    fn test_move_mode_adds_then_removes() {
        let mut h = Harness::new(10);
        h.send(SessionEvent::AlbumsFetched {
            result: Ok(vec![album("a", 5), album("b", 0)]),
        });
        let source = AssetSource::FilteredAlbum {
            album: AlbumId::from("a"),
            filters: AlbumViewFilters {
                move_mode: true,
                ..AlbumViewFilters::default()
            },
        };
        h.open_source(source, vec![asset_in("x", &["a"])], 1);

        let effects = h.send(UserAction::ToggleAlbum {
            album: AlbumId::from("b"),
        });
        let changes = change_requests(&effects);
        assert_eq!(changes.len(), 2);
        assert_eq!((changes[0].1.as_str(), changes[0].2), ("b", true));
        assert_eq!((changes[1].1.as_str(), changes[1].2), ("a", false));

        let x = h.state().store.asset(&AssetId::from("x")).unwrap();
        assert!(x.is_member_of(&AlbumId::from("b")));
        assert!(!x.is_member_of(&AlbumId::from("a")));

        let effects = h.send(SessionEvent::MembershipChangeAcknowledged {
            request_id: changes[0].0,
            result: Ok(()),
        });
        assert!(effects.is_empty());

        let effects = h.send(SessionEvent::MembershipChangeAcknowledged {
            request_id: changes[1].0,
            result: Ok(()),
        });
        assert_eq!(effects, vec![Effect::FetchMembership {
            asset_id: AssetId::from("x")
        }]);

        let store = &h.state().store;
        assert_eq!(store.album(&AlbumId::from("a")).unwrap().asset_count, 4);
        assert_eq!(store.album(&AlbumId::from("b")).unwrap().asset_count, 1);
    }

    #[test]
    fn test_failure_discards_whole_queue_with_one_refetch() {
        let mut h = Harness::new(10);
        h.open_source(album_source("trips"), assets(&["x"]), 1);

        let mut requests = Vec::new();
        for album in ["c1", "c2", "c3"] {
            let effects = h.send(UserAction::ToggleAlbum {
                album: AlbumId::from(album),
            });
            requests.extend(change_requests(&effects));
        }
        assert_eq!(h.state().reconciler.pending_count(), 3);

        let effects = h.send(SessionEvent::MembershipChangeAcknowledged {
            request_id: requests[0].0,
            result: Err(FetchFailure::network("reset")),
        });
        assert_eq!(effects, vec![Effect::FetchMembership {
            asset_id: AssetId::from("x")
        }]);
        assert_eq!(h.state().reconciler.pending_count(), 0);
        assert!(h.state().notice.is_some());

        // Late successes for discarded edits change nothing
        let effects = h.send(SessionEvent::MembershipChangeAcknowledged {
            request_id: requests[1].0,
            result: Ok(()),
        });
        assert!(effects.is_empty());

        // The authoritative answer wins once the queue is empty
        h.send(SessionEvent::MembershipFetched {
            asset_id: AssetId::from("x"),
            result: Ok(vec![AlbumId::from("c1")]),
        });
        let x = h.state().store.asset(&AssetId::from("x")).unwrap();
        assert_eq!(x.albums.len(), 1);
        assert!(x.is_member_of(&AlbumId::from("c1")));
    }

    #[test]
    fn test_membership_answer_does_not_clobber_pending_edits() {
        let mut h = Harness::new(10);
        h.open_source(album_source("trips"), assets(&["x"]), 1);
        h.send(UserAction::ToggleAlbum {
            album: AlbumId::from("c1"),
        });

        h.send(SessionEvent::MembershipFetched {
            asset_id: AssetId::from("x"),
            result: Ok(Vec::new()),
        });
        let x = h.state().store.asset(&AssetId::from("x")).unwrap();
        assert!(x.is_member_of(&AlbumId::from("c1")));
    }

    #[test]
    fn test_favorite_reverts_on_rejection() {
        let mut h = Harness::new(10);
        h.open_source(album_source("trips"), assets(&["x"]), 1);

        let effects = h.send(UserAction::ToggleFavorite);
        assert_eq!(effects, vec![Effect::UpdateAsset {
            asset_id: AssetId::from("x"),
            flag: AssetFlag::Favorite,
            value: true,
        }]);
        assert!(h.state().store.asset(&AssetId::from("x")).unwrap().is_favorite);

        h.send(SessionEvent::AssetUpdateAcknowledged {
            asset_id: AssetId::from("x"),
            flag: AssetFlag::Favorite,
            value: true,
            result: Err(FetchFailure::network("timeout")),
        });
        assert!(!h.state().store.asset(&AssetId::from("x")).unwrap().is_favorite);
        assert!(h.state().notice.is_some());

        // The next user action clears the notice
        h.send(UserAction::NextAsset);
        assert!(h.state().notice.is_none());
    }

    #[test]
    fn test_album_search_and_create() {
        let mut h = Harness::new(10);
        h.open_source(album_source("trips"), assets(&["x"]), 1);

        h.send(UserAction::OpenAlbumSearch);
        h.send(UserAction::SetAlbumSearch {
            query: "bea".to_string(),
        });
        match &h.state().mode {
            Mode::ViewingAsset { album_search, .. } => assert_eq!(
                album_search.as_ref(),
                Some(&AlbumSearch {
                    query: "bea".to_string()
                })
            ),
            other => panic!("expected detail view, got {:?}", other),
        }

        let effects = h.send(UserAction::CreateAlbum {
            name: "  Beach  ".to_string(),
        });
        assert_eq!(effects, vec![Effect::CreateAlbum {
            name: "Beach".to_string()
        }]);

        let effects = h.send(SessionEvent::AlbumCreated {
            result: Ok(album("beach", 0)),
        });
        let changes = change_requests(&effects);
        assert_eq!(changes.len(), 1);
        assert_eq!((changes[0].1.as_str(), changes[0].2), ("beach", true));
        assert!(h.state().store.album(&AlbumId::from("beach")).is_some());
        assert!(matches!(
            h.state().mode,
            Mode::ViewingAsset {
                album_search: None,
                ..
            }
        ));
    }

    #[test]
    fn test_blank_album_name_is_a_notice() {
        let mut h = Harness::new(10);
        h.open_source(album_source("trips"), assets(&["x"]), 1);

        let effects = h.send(UserAction::CreateAlbum {
            name: "   ".to_string(),
        });
        assert!(effects.is_empty());
        assert!(h.state().notice.is_some());
    }
}
