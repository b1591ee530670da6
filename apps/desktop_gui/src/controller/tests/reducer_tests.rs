use super::*;
use client_core::ClientError;
use serde_json::json;
use shared::{
    domain::AppearanceId,
    protocol::{
        AppearanceDetail, AppearanceRecord, EpisodeDetail, EpisodeSummary, GuestProfile,
        GuestSummary,
    },
};

fn episode(id: i64, number: i64, date: &str) -> EpisodeSummary {
    EpisodeSummary {
        id: EpisodeId(id),
        number,
        date: date.to_string(),
    }
}

fn guest(id: i64, name: &str) -> GuestSummary {
    GuestSummary {
        id: GuestId(id),
        name: name.to_string(),
        occupation: "actor".to_string(),
    }
}

fn detail(id: i64, number: i64) -> EpisodeDetail {
    EpisodeDetail {
        id: EpisodeId(id),
        number,
        date: "2024-01-01".to_string(),
        appearances: vec![AppearanceDetail {
            id: AppearanceId(1),
            rating: 4,
            episode_id: None,
            guest_id: None,
            guest: GuestProfile {
                id: None,
                name: "Michael J. Fox".to_string(),
                occupation: "actor".to_string(),
            },
        }],
    }
}

fn record() -> AppearanceRecord {
    AppearanceRecord {
        id: AppearanceId(9),
        rating: 3,
        episode_id: EpisodeId(1),
        guest_id: GuestId(2),
        episode: episode(1, 1, "2024-01-01"),
        guest: guest(2, "Sandra Bernhard"),
    }
}

fn step(state: AppState, message: impl Into<Message>) -> (AppState, Vec<BackendCommand>) {
    reduce(state, message.into())
}

fn with_selection(id: i64) -> AppState {
    AppState {
        view: ViewState::EpisodeDetail,
        selected_episode: Some(detail(id, id)),
        ..AppState::default()
    }
}

#[test]
fn initial_state_shows_episode_list_without_selection() {
    let state = AppState::default();
    assert_eq!(state.view, ViewState::EpisodeList);
    assert!(state.selected_episode.is_none());
    assert!(state.status.is_none());
    assert_eq!(state.draft, AppearanceDraft::default());
    assert_eq!(state.draft.rating, 5);
}

#[test]
fn startup_loads_episodes_and_guests() {
    let (state, commands) = step(AppState::default(), UiAction::Startup);
    assert_eq!(state, AppState::default());
    assert_eq!(
        commands,
        vec![BackendCommand::LoadEpisodes, BackendCommand::LoadGuests]
    );
}

#[test]
fn list_loads_replace_collections_in_fetched_order() {
    let mut state = AppState::default();
    state.episodes = vec![episode(7, 7, "old")];
    let fetched = vec![episode(3, 3, "1/13/99"), episode(1, 1, "1/11/99")];

    let (state, commands) = step(state, UiEvent::EpisodesLoaded(Ok(fetched.clone())));
    assert_eq!(state.episodes, fetched);
    assert!(commands.is_empty());

    let guests = vec![guest(2, "B"), guest(1, "A")];
    let (state, _) = step(state, UiEvent::GuestsLoaded(Ok(guests.clone())));
    assert_eq!(state.guests, guests);
}

#[test]
fn failed_list_loads_leave_state_untouched() {
    let mut state = AppState::default();
    state.episodes = vec![episode(1, 1, "1/11/99")];
    state.guests = vec![guest(1, "A")];
    let before = state.clone();

    let (state, commands) = step(
        state,
        UiEvent::EpisodesLoaded(Err(ClientError::Transport("refused".into()))),
    );
    assert_eq!(state, before);
    assert!(commands.is_empty());

    let (state, _) = step(
        state,
        UiEvent::GuestsLoaded(Err(ClientError::Status {
            status: 500,
            body: None,
        })),
    );
    assert_eq!(state, before);
}

#[test]
fn opening_a_card_requests_detail_without_changing_view() {
    let (state, commands) = step(AppState::default(), UiAction::OpenEpisode(EpisodeId(4)));
    assert_eq!(state.view, ViewState::EpisodeList);
    assert_eq!(
        commands,
        vec![BackendCommand::LoadEpisodeDetail {
            episode_id: EpisodeId(4)
        }]
    );
}

#[test]
fn successful_detail_load_selects_episode_and_switches_view() {
    let loaded = detail(2, 2);
    let (state, commands) = step(
        AppState::default(),
        UiEvent::EpisodeDetailLoaded {
            episode_id: EpisodeId(2),
            result: Ok(loaded.clone()),
        },
    );
    assert_eq!(state.view, ViewState::EpisodeDetail);
    assert_eq!(state.selected_episode, Some(loaded));
    assert!(commands.is_empty());
}

#[test]
fn failed_detail_load_is_silent() {
    let start = AppState {
        episodes: vec![episode(1, 1, "1/11/99")],
        ..AppState::default()
    };
    let not_found = ClientError::Status {
        status: 404,
        body: Some(json!({ "error": "Episode not found" })),
    };
    let (state, commands) = step(
        start.clone(),
        UiEvent::EpisodeDetailLoaded {
            episode_id: EpisodeId(1),
            result: Err(not_found),
        },
    );
    assert_eq!(state, start);
    assert!(commands.is_empty());

    let (state, _) = step(
        state,
        UiEvent::EpisodeDetailLoaded {
            episode_id: EpisodeId(1),
            result: Err(ClientError::Transport("timed out".into())),
        },
    );
    assert_eq!(state, start);
}

#[test]
fn failed_detail_load_keeps_previous_selection() {
    let start = with_selection(1);
    let (state, _) = step(
        start.clone(),
        UiEvent::EpisodeDetailLoaded {
            episode_id: EpisodeId(2),
            result: Err(ClientError::Status {
                status: 404,
                body: None,
            }),
        },
    );
    assert_eq!(state.view, ViewState::EpisodeDetail);
    assert_eq!(state.selected_episode, start.selected_episode);
}

#[test]
fn navigation_keeps_selected_episode() {
    let (state, _) = step(with_selection(1), UiAction::Navigate(ViewState::GuestList));
    assert_eq!(state.view, ViewState::GuestList);
    assert!(state.selected_episode.is_some());

    let (state, _) = step(state, UiAction::Navigate(ViewState::AppearanceForm));
    assert_eq!(state.view, ViewState::AppearanceForm);

    let (state, _) = step(state, UiAction::Navigate(ViewState::EpisodeDetail));
    assert_eq!(state.view, ViewState::EpisodeDetail);

    let (state, _) = step(state, UiAction::BackToEpisodes);
    assert_eq!(state.view, ViewState::EpisodeList);
    assert!(state.selected_episode.is_some());
}

#[test]
fn detail_view_requires_a_selection() {
    let (state, commands) = step(
        AppState::default(),
        UiAction::Navigate(ViewState::EpisodeDetail),
    );
    assert_eq!(state.view, ViewState::EpisodeList);
    assert!(commands.is_empty());
}

#[test]
fn delete_action_queues_delete_command() {
    let (_, commands) = step(AppState::default(), UiAction::DeleteEpisode(EpisodeId(3)));
    assert_eq!(
        commands,
        vec![BackendCommand::DeleteEpisode {
            episode_id: EpisodeId(3)
        }]
    );
}

#[test]
fn deleting_selected_episode_returns_to_list_and_clears_selection() {
    let (state, commands) = step(
        with_selection(1),
        UiEvent::EpisodeDeleted {
            episode_id: EpisodeId(1),
            result: Ok(()),
        },
    );
    assert_eq!(state.view, ViewState::EpisodeList);
    assert!(state.selected_episode.is_none());
    assert_eq!(state.status.as_deref(), Some("Episode deleted successfully!"));
    assert_eq!(commands, vec![BackendCommand::LoadEpisodes]);
}

#[test]
fn deleting_another_episode_keeps_selection_and_view() {
    let start = with_selection(1);
    let (state, commands) = step(
        start.clone(),
        UiEvent::EpisodeDeleted {
            episode_id: EpisodeId(2),
            result: Ok(()),
        },
    );
    assert_eq!(state.view, ViewState::EpisodeDetail);
    assert_eq!(state.selected_episode, start.selected_episode);
    assert_eq!(state.status.as_deref(), Some("Episode deleted successfully!"));
    assert_eq!(commands, vec![BackendCommand::LoadEpisodes]);
}

#[test]
fn failed_delete_sets_error_status_only() {
    for err in [
        ClientError::Status {
            status: 404,
            body: Some(json!({ "error": "Episode not found" })),
        },
        ClientError::Transport("connection reset".into()),
    ] {
        let start = with_selection(1);
        let (state, commands) = step(
            start.clone(),
            UiEvent::EpisodeDeleted {
                episode_id: EpisodeId(1),
                result: Err(err),
            },
        );
        assert_eq!(state.status.as_deref(), Some("Error deleting episode"));
        assert_eq!(state.view, start.view);
        assert_eq!(state.selected_episode, start.selected_episode);
        assert!(commands.is_empty());
    }
}

#[test]
fn draft_edits_update_only_the_draft() {
    let (state, _) = step(AppState::default(), UiAction::SetDraftRating(2));
    let (state, _) = step(state, UiAction::SelectDraftEpisode(Some(EpisodeId(3))));
    let (state, commands) = step(state, UiAction::SelectDraftGuest(Some(GuestId(4))));
    assert_eq!(
        state.draft,
        AppearanceDraft {
            rating: 2,
            episode_id: Some(EpisodeId(3)),
            guest_id: Some(GuestId(4)),
        }
    );
    assert!(commands.is_empty());

    let (state, _) = step(state, UiAction::SelectDraftGuest(None));
    assert_eq!(state.draft.guest_id, None);
}

#[test]
fn submit_sends_draft_as_is() {
    let (state, _) = step(AppState::default(), UiAction::SetDraftRating(4));
    let (state, commands) = step(state, UiAction::SubmitAppearance);
    assert_eq!(
        commands,
        vec![BackendCommand::CreateAppearance {
            request: shared::protocol::CreateAppearanceRequest {
                rating: 4,
                episode_id: None,
                guest_id: None,
            }
        }]
    );
    assert_eq!(state.draft.rating, 4);
}

#[test]
fn successful_create_resets_draft_and_reloads_lists() {
    let start = AppState {
        view: ViewState::AppearanceForm,
        draft: AppearanceDraft {
            rating: 3,
            episode_id: Some(EpisodeId(1)),
            guest_id: Some(GuestId(2)),
        },
        ..AppState::default()
    };
    let (state, commands) = step(start, UiEvent::AppearanceCreated(Ok(record())));
    assert_eq!(state.view, ViewState::AppearanceForm);
    assert_eq!(state.draft, AppearanceDraft::default());
    assert_eq!(
        state.status.as_deref(),
        Some("Appearance created successfully!")
    );
    assert_eq!(
        commands,
        vec![BackendCommand::LoadEpisodes, BackendCommand::LoadGuests]
    );
}

#[test]
fn validation_failure_surfaces_server_errors_and_keeps_draft() {
    let draft = AppearanceDraft {
        rating: 5,
        episode_id: Some(EpisodeId(99)),
        guest_id: None,
    };
    let start = AppState {
        view: ViewState::AppearanceForm,
        draft: draft.clone(),
        ..AppState::default()
    };
    let (state, commands) = step(
        start,
        UiEvent::AppearanceCreated(Err(ClientError::Validation {
            status: 400,
            errors: json!(["X"]),
        })),
    );
    assert_eq!(state.status.as_deref(), Some("Error: [\"X\"]"));
    assert!(state.status.as_deref().is_some_and(|s| s.contains('X')));
    assert_eq!(state.draft, draft);
    assert!(commands.is_empty());
}

#[test]
fn structured_validation_errors_are_shown_as_sent() {
    let (state, _) = step(
        AppState::default(),
        UiEvent::AppearanceCreated(Err(ClientError::Validation {
            status: 400,
            errors: json!([{ "rating": "must be between 1 and 5" }]),
        })),
    );
    assert_eq!(
        state.status.as_deref(),
        Some(r#"Error: [{"rating":"must be between 1 and 5"}]"#)
    );

    let (state, _) = step(
        state,
        UiEvent::AppearanceCreated(Err(ClientError::Validation {
            status: 422,
            errors: json!("rating invalid"),
        })),
    );
    assert_eq!(state.status.as_deref(), Some(r#"Error: "rating invalid""#));
}

#[test]
fn other_create_failures_use_body_or_generic_message() {
    let (state, _) = step(
        AppState::default(),
        UiEvent::AppearanceCreated(Err(ClientError::Status {
            status: 500,
            body: Some(json!({ "error": "boom" })),
        })),
    );
    assert_eq!(state.status.as_deref(), Some("Error: {\"error\":\"boom\"}"));

    let (state, _) = step(
        state,
        UiEvent::AppearanceCreated(Err(ClientError::Transport("refused".into()))),
    );
    assert_eq!(state.status.as_deref(), Some("Error creating appearance"));
}

#[test]
fn status_is_replaced_by_next_outcome() {
    let (state, _) = step(
        AppState::default(),
        UiEvent::EpisodeDeleted {
            episode_id: EpisodeId(1),
            result: Err(ClientError::Transport("refused".into())),
        },
    );
    let (state, _) = step(state, UiEvent::AppearanceCreated(Ok(record())));
    assert_eq!(
        state.status.as_deref(),
        Some("Appearance created successfully!")
    );
}

#[test]
fn delete_click_takes_precedence_over_card_click() {
    let id = EpisodeId(1);
    assert_eq!(
        card_click_action(id, true, true),
        Some(UiAction::DeleteEpisode(id))
    );
    assert_eq!(
        card_click_action(id, true, false),
        Some(UiAction::OpenEpisode(id))
    );
    assert_eq!(
        card_click_action(id, false, true),
        Some(UiAction::DeleteEpisode(id))
    );
    assert_eq!(card_click_action(id, false, false), None);
}

#[test]
fn clicking_first_card_opens_its_detail() {
    let (state, _) = step(
        AppState::default(),
        UiEvent::EpisodesLoaded(Ok(vec![episode(1, 1, "2024-01-01")])),
    );
    let action = card_click_action(state.episodes[0].id, true, false).expect("action");
    let (state, commands) = step(state, action);
    assert_eq!(
        commands,
        vec![BackendCommand::LoadEpisodeDetail {
            episode_id: EpisodeId(1)
        }]
    );

    let loaded = EpisodeDetail {
        id: EpisodeId(1),
        number: 1,
        date: "2024-01-01".to_string(),
        appearances: Vec::new(),
    };
    let (state, _) = step(
        state,
        UiEvent::EpisodeDetailLoaded {
            episode_id: EpisodeId(1),
            result: Ok(loaded),
        },
    );
    assert_eq!(state.view, ViewState::EpisodeDetail);
    let selected = state.selected_episode.expect("selected");
    assert_eq!(selected.number, 1);
    assert!(selected.appearances.is_empty());
}
