use eframe::egui::{self, Color32, DragValue, RichText, Ui};

use crate::data::loadout::input_step;
use crate::data::table::format_cell;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// "My Ship" view
// ---------------------------------------------------------------------------

/// Render the user's loadout: picked engines and the outfit space budget.
pub fn loadout_view(ui: &mut Ui, state: &mut AppState) {
    let Some(catalog) = &state.catalog else {
        return;
    };

    ui.heading("My Ship");
    if ui.button("Reset Ship").clicked() {
        state.loadout.reset();
        return;
    }
    ui.separator();

    let mut removed: Option<usize> = None;
    if state.loadout.engines.is_empty() {
        ui.label("No engines added. Use “+” in the Engines view.");
    } else {
        egui::Grid::new("loadout_engines")
            .striped(true)
            .num_columns(4)
            .show(ui, |ui: &mut Ui| {
                ui.strong("Engine");
                ui.strong("Outfit Space");
                ui.strong("Engine Capacity");
                ui.label("");
                ui.end_row();

                for &idx in &state.loadout.engines {
                    let Some(engine) = catalog.engines.get(idx) else {
                        continue;
                    };
                    ui.label(engine.name().unwrap_or("?"));
                    ui.label(format_cell(engine.get("outfit space")));
                    ui.label(format_cell(engine.get("engine capacity")));
                    if ui.small_button("Remove").clicked() {
                        removed = Some(idx);
                    }
                    ui.end_row();
                }
            });
    }
    ui.separator();

    let occupied = state.loadout.occupied_outfit_space(&catalog.engines);
    let free = state.loadout.free_outfit_space(&catalog.engines);
    let over = state.loadout.is_over_capacity(&catalog.engines);

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Outfit Space:");
        let used = RichText::new(format!("{occupied}"));
        ui.label(if over { used.color(Color32::RED) } else { used });
        ui.label("of");
        let step = input_step(state.loadout.max_outfit_space);
        ui.add(
            DragValue::new(&mut state.loadout.max_outfit_space)
                .speed(step)
                .range(0.0..=f64::MAX),
        );
        ui.label(format!("({free} free)"));
    });

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Otherwise occupied:");
        let step = input_step(state.loadout.otherwise_occupied);
        let max = state.loadout.max_outfit_space;
        ui.add(
            DragValue::new(&mut state.loadout.otherwise_occupied)
                .speed(step)
                .range(0.0..=max),
        );
    });

    if let Some(idx) = removed {
        state.loadout.remove(idx);
    }
}
