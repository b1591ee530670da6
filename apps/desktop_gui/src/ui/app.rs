use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::UiEvent,
    orchestration::dispatch_all,
    reducer::{reduce, Message, UiAction},
    state::AppState,
};
use crate::ui::views;

/// The egui shell. It owns the single [`AppState`] and is the only place
/// messages are reduced, so every state write happens on the UI thread.
pub struct LateShowApp {
    state: AppState,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    server_url: String,
}

impl LateShowApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        server_url: impl Into<String>,
    ) -> Self {
        let mut app = Self {
            state: AppState::default(),
            cmd_tx,
            ui_rx,
            server_url: server_url.into(),
        };
        app.handle(UiAction::Startup.into());
        app
    }

    fn handle(&mut self, message: Message) {
        let state = std::mem::take(&mut self.state);
        let (state, commands) = reduce(state, message);
        self.state = state;
        dispatch_all(&self.cmd_tx, commands, &mut self.state.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.handle(event.into());
        }
    }
}

impl eframe::App for LateShowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut actions = Vec::new();
        egui::TopBottomPanel::top("late_show_nav")
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.heading("Late Show");
                    ui.separator();
                    views::nav_bar(ui, &self.state, &mut actions);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.weak(&self.server_url);
                    });
                });
                views::status_line(ui, self.state.status.as_deref());
                ui.add_space(4.0);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            views::current_view(ui, &self.state, &mut actions);
        });

        for action in actions {
            self.handle(action.into());
        }

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
