//! Rendering for the navigation bar, status line and the four views.
//!
//! Views read the state and push [`UiAction`]s; they never mutate state
//! directly.

use eframe::egui;
use shared::{
    domain::{EpisodeId, GuestId, MAX_RATING, MIN_RATING},
    protocol::{AppearanceDetail, EpisodeSummary, GuestSummary},
};

use crate::controller::reducer::{card_click_action, UiAction};
use crate::controller::state::{AppState, ViewState};

const CARD_FILL: egui::Color32 = egui::Color32::from_rgb(34, 35, 40);
const CARD_STROKE: egui::Color32 = egui::Color32::from_rgb(58, 60, 70);

pub fn nav_bar(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        for view in [
            ViewState::EpisodeList,
            ViewState::GuestList,
            ViewState::AppearanceForm,
        ] {
            if ui
                .selectable_label(state.view == view, view.label())
                .clicked()
            {
                actions.push(UiAction::Navigate(view));
            }
        }
        if let Some(episode) = &state.selected_episode {
            let label = format!("Episode #{}", episode.number);
            if ui
                .selectable_label(state.view == ViewState::EpisodeDetail, label)
                .clicked()
            {
                actions.push(UiAction::Navigate(ViewState::EpisodeDetail));
            }
        }
    });
}

pub fn status_line(ui: &mut egui::Ui, status: Option<&str>) {
    if let Some(status) = status {
        let color = if status.starts_with("Error") {
            egui::Color32::from_rgb(240, 110, 110)
        } else {
            egui::Color32::from_rgb(120, 200, 140)
        };
        ui.label(egui::RichText::new(status).color(color));
    }
}

pub fn current_view(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<UiAction>) {
    match state.view {
        ViewState::EpisodeList => episode_list(ui, &state.episodes, actions),
        ViewState::EpisodeDetail => episode_detail(ui, state, actions),
        ViewState::GuestList => guest_list(ui, &state.guests),
        ViewState::AppearanceForm => appearance_form(ui, state, actions),
    }
}

fn card_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(CARD_FILL)
        .stroke(egui::Stroke::new(1.0, CARD_STROKE))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 8))
}

fn episode_list(ui: &mut egui::Ui, episodes: &[EpisodeSummary], actions: &mut Vec<UiAction>) {
    ui.heading("Episodes");
    if episodes.is_empty() {
        ui.weak("No episodes loaded.");
        return;
    }
    egui::ScrollArea::vertical()
        .id_salt("episode_list_scroll")
        .show(ui, |ui| {
            for episode in episodes {
                if let Some(action) = episode_card(ui, episode) {
                    actions.push(action);
                }
                ui.add_space(6.0);
            }
        });
}

fn episode_card(ui: &mut egui::Ui, episode: &EpisodeSummary) -> Option<UiAction> {
    let card = ui.scope_builder(
        egui::UiBuilder::new()
            .id_salt(("episode_card", episode.id.0))
            .sense(egui::Sense::click()),
        |ui| {
            card_frame()
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.label(egui::RichText::new(format!("Episode #{}", episode.number)).strong());
                            ui.label(format!("Air date: {}", episode.date));
                        });
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.button("Delete").clicked()
                        })
                        .inner
                    })
                    .inner
                })
                .inner
        },
    );
    let delete_clicked = card.inner;
    let card_clicked = card.response.clicked();
    card.response.on_hover_cursor(egui::CursorIcon::PointingHand);
    card_click_action(episode.id, card_clicked, delete_clicked)
}

fn episode_detail(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<UiAction>) {
    let Some(episode) = &state.selected_episode else {
        ui.weak("No episode selected.");
        return;
    };

    if ui.button("< Back to episodes").clicked() {
        actions.push(UiAction::BackToEpisodes);
    }
    ui.heading(format!("Episode #{}", episode.number));
    ui.label(format!("Air date: {}", episode.date));
    ui.separator();
    ui.label(egui::RichText::new("Appearances").strong());

    if episode.appearances.is_empty() {
        ui.weak("No appearances recorded.");
        return;
    }
    egui::ScrollArea::vertical()
        .id_salt("episode_detail_scroll")
        .show(ui, |ui| {
            for appearance in &episode.appearances {
                appearance_card(ui, appearance);
                ui.add_space(6.0);
            }
        });
}

fn appearance_card(ui: &mut egui::Ui, appearance: &AppearanceDetail) {
    card_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new(&appearance.guest.name).strong());
        ui.label(&appearance.guest.occupation);
        ui.label(format!("Rating: {}/{MAX_RATING}", appearance.rating));
    });
}

fn guest_list(ui: &mut egui::Ui, guests: &[GuestSummary]) {
    ui.heading("Guests");
    if guests.is_empty() {
        ui.weak("No guests loaded.");
        return;
    }
    egui::ScrollArea::vertical()
        .id_salt("guest_list_scroll")
        .show(ui, |ui| {
            for guest in guests {
                card_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(egui::RichText::new(&guest.name).strong());
                    ui.label(&guest.occupation);
                });
                ui.add_space(6.0);
            }
        });
}

fn appearance_form(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<UiAction>) {
    ui.heading("New Appearance");
    let draft = &state.draft;

    egui::Grid::new("appearance_form_grid")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.label("Rating");
            let mut rating = draft.rating;
            egui::ComboBox::from_id_salt("appearance_rating")
                .selected_text(rating.to_string())
                .show_ui(ui, |ui| {
                    for value in MIN_RATING..=MAX_RATING {
                        ui.selectable_value(&mut rating, value, value.to_string());
                    }
                });
            if rating != draft.rating {
                actions.push(UiAction::SetDraftRating(rating));
            }
            ui.end_row();

            ui.label("Episode");
            let mut episode_id = draft.episode_id;
            egui::ComboBox::from_id_salt("appearance_episode")
                .selected_text(episode_choice_label(&state.episodes, episode_id))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut episode_id, None, "Select an episode");
                    for episode in &state.episodes {
                        ui.selectable_value(
                            &mut episode_id,
                            Some(episode.id),
                            format!("#{} ({})", episode.number, episode.date),
                        );
                    }
                });
            if episode_id != draft.episode_id {
                actions.push(UiAction::SelectDraftEpisode(episode_id));
            }
            ui.end_row();

            ui.label("Guest");
            let mut guest_id = draft.guest_id;
            egui::ComboBox::from_id_salt("appearance_guest")
                .selected_text(guest_choice_label(&state.guests, guest_id))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut guest_id, None, "Select a guest");
                    for guest in &state.guests {
                        ui.selectable_value(&mut guest_id, Some(guest.id), guest.name.as_str());
                    }
                });
            if guest_id != draft.guest_id {
                actions.push(UiAction::SelectDraftGuest(guest_id));
            }
            ui.end_row();
        });

    ui.add_space(8.0);
    if ui.button("Create Appearance").clicked() {
        actions.push(UiAction::SubmitAppearance);
    }
}

fn episode_choice_label(episodes: &[EpisodeSummary], selected: Option<EpisodeId>) -> String {
    match selected {
        None => "Select an episode".to_string(),
        Some(id) => episodes
            .iter()
            .find(|episode| episode.id == id)
            .map(|episode| format!("#{} ({})", episode.number, episode.date))
            .unwrap_or_else(|| format!("Episode {id}")),
    }
}

fn guest_choice_label(guests: &[GuestSummary], selected: Option<GuestId>) -> String {
    match selected {
        None => "Select a guest".to_string(),
        Some(id) => guests
            .iter()
            .find(|guest| guest.id == id)
            .map(|guest| guest.name.clone())
            .unwrap_or_else(|| format!("Guest {id}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_labels_fall_back_to_raw_ids() {
        let episodes = vec![EpisodeSummary {
            id: EpisodeId(1),
            number: 1,
            date: "1/11/99".to_string(),
        }];
        assert_eq!(episode_choice_label(&episodes, None), "Select an episode");
        assert_eq!(episode_choice_label(&episodes, Some(EpisodeId(1))), "#1 (1/11/99)");
        assert_eq!(episode_choice_label(&episodes, Some(EpisodeId(8))), "Episode 8");
        assert_eq!(guest_choice_label(&[], Some(GuestId(3))), "Guest 3");
    }
}
