use std::sync::Arc;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{LateShowClient, DEFAULT_SERVER_URL};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{commands::BackendCommand, runtime};
use crate::controller::events::UiEvent;
use crate::ui::LateShowApp;

#[derive(Debug, Parser)]
#[command(name = "lateshow-desktop", about = "Browse Late Show episodes, guests and appearances")]
struct Args {
    /// Base URL of the Late Show REST API.
    #[arg(long, env = "LATESHOW_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let client = LateShowClient::new(&args.server_url)?;
    tracing::info!(server_url = %client.base_url(), "starting desktop client");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    let _worker = runtime::launch(cmd_rx, ui_tx, Arc::new(client));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Late Show")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    let server_url = args.server_url;
    eframe::run_native(
        "Late Show",
        options,
        Box::new(move |_cc| Ok(Box::new(LateShowApp::new(cmd_tx, ui_rx, server_url)))),
    )
    .map_err(|err| anyhow::anyhow!("desktop window failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;

    #[test]
    fn server_url_flag_overrides_default() {
        let args = Args::try_parse_from(["lateshow-desktop", "--server-url", "http://10.0.0.2:5005"])
            .expect("args");
        assert_eq!(args.server_url, "http://10.0.0.2:5005");
    }
}
