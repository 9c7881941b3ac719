use eframe::egui::{self, Ui};

use crate::data::filter::search_by_name;
use crate::state::AppState;

/// Name search across every category of the loaded file.
pub fn search_view(ui: &mut Ui, state: &mut AppState) {
    let Some(catalog) = &state.catalog else {
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Search:");
        ui.text_edit_singleline(&mut state.search_query);
    });
    ui.separator();

    if state.search_query.is_empty() {
        return;
    }

    let results = search_by_name(catalog, &state.search_query, None);
    if results.is_empty() {
        ui.label("No matches.");
        return;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for group in results {
                egui::CollapsingHeader::new(format!("{} ({})", group.category, group.records.len()))
                    .id_salt(group.category)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        for record in group.records {
                            ui.label(record.name().unwrap_or("?"));
                        }
                    });
            }
        });
}
