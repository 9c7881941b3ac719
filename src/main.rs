use anyhow::{anyhow, Result};
use eframe::egui;

use outfit_explorer::{AppState, Cli, ExplorerConfig, OutfitExplorerApp};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse_args();
    let config = ExplorerConfig::load(cli.config.as_deref())?;
    let mut state = AppState::new(config);

    if let Some(path) = &cli.data {
        if let Err(e) = state.load_path(path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Outfit Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(OutfitExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow!("running the UI: {e}"))
}
