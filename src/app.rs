use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::{loadout, panels, plot, search, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct OutfitExplorerApp {
    pub state: AppState,
}

impl OutfitExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl Default for OutfitExplorerApp {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl eframe::App for OutfitExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: current view ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Engines => table::engine_table(ui, &mut self.state),
            View::Comparison => {
                table::comparison_table(ui, &mut self.state);
                ui.separator();
                plot::comparison_plot(ui, &mut self.state);
            }
            View::Loadout => loadout::loadout_view(ui, &mut self.state),
            View::Search => search::search_view(ui, &mut self.state),
        });
    }
}
