use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Slider, Ui};

use crate::data::filter::dynamic_step;
use crate::data::table::write_csv;
use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.catalog.is_none() {
        ui.label("No outfit file loaded.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Reset Filters").clicked() {
            state.reset_filters();
        }
        if ui.button("Show All").clicked() {
            state.show_all_columns();
        }
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            column_picker(ui, state);
            license_picker(ui, state);
            ui.separator();
            numeric_filters(ui, state);
            ui.separator();
            text_filters(ui, state);
        });
}

fn column_picker(ui: &mut Ui, state: &mut AppState) {
    let n_visible = state.visible_columns.len();
    let n_total = state.columns.len();
    egui::CollapsingHeader::new(RichText::new(format!("Columns  ({n_visible}/{n_total})")).strong())
        .id_salt("columns")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for key in state.columns.clone() {
                let mut checked = state.visible_columns.contains(&key);
                if ui.checkbox(&mut checked, key.as_str()).changed() {
                    state.toggle_column(&key);
                }
            }
        });
}

fn license_picker(ui: &mut Ui, state: &mut AppState) {
    let names: Vec<String> = match &state.catalog {
        Some(catalog) => catalog
            .sorted_license_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        None => return,
    };
    let n_selected = state.selected_licenses.len();

    egui::CollapsingHeader::new(RichText::new(format!("Licenses  ({n_selected})")).strong())
        .id_salt("licenses")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for name in &names {
                let mut checked = state.selected_licenses.contains(name);
                let mut text = RichText::new(name);
                if let Some(cm) = &state.color_map {
                    text = text.color(cm.color_for(Some(name.as_str())));
                }
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_license(name);
                }
            }
        });
}

/// Min/max inputs for every visible numeric column.
fn numeric_filters(ui: &mut Ui, state: &mut AppState) {
    let keys: Vec<String> = state
        .numeric_keys
        .iter()
        .filter(|k| state.visible_columns.contains(k))
        .cloned()
        .collect();

    for key in keys {
        let Some(&(min, max)) = state.numeric_ranges.get(&key) else {
            continue;
        };
        let (mut lo, mut hi) = state.range_for(&key);
        let step = dynamic_step(min, max);
        let mut changed = false;
        let mut cleared = false;

        ui.label(RichText::new(&key).strong());
        if state.config.show_sliders {
            changed |= ui.add(Slider::new(&mut lo, min..=max).step_by(step)).changed();
            changed |= ui.add(Slider::new(&mut hi, min..=max).step_by(step)).changed();
        }
        ui.horizontal(|ui: &mut Ui| {
            changed |= ui
                .add(DragValue::new(&mut lo).speed(step).range(min..=max))
                .changed();
            ui.label("to");
            changed |= ui
                .add(DragValue::new(&mut hi).speed(step).range(min..=max))
                .changed();
            if state.filters.contains_key(&key) && ui.small_button("×").clicked() {
                cleared = true;
            }
        });

        if cleared {
            state.clear_filter(&key);
        } else if changed {
            state.set_range(&key, lo, hi);
        }
    }
}

/// Substring inputs for every visible text or list column.
fn text_filters(ui: &mut Ui, state: &mut AppState) {
    let keys: Vec<String> = state
        .string_keys
        .iter()
        .filter(|k| state.visible_columns.contains(k))
        .cloned()
        .collect();

    for key in keys {
        ui.label(RichText::new(&key).strong());
        let mut query = state.text_filter(&key).to_string();
        let response = ui.add(
            egui::TextEdit::singleline(&mut query).hint_text(format!("Filter by {key}")),
        );
        if response.changed() {
            state.set_text_filter(&key, &query);
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.catalog.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for (view, label) in [
            (View::Engines, "Engines"),
            (View::Comparison, "Comparison"),
            (View::Loadout, "My Ship"),
            (View::Search, "Search"),
        ] {
            ui.selectable_value(&mut state.view, view, label);
        }

        ui.separator();

        if let Some(catalog) = &state.catalog {
            ui.label(format!(
                "{} engines loaded, {} visible",
                catalog.engines.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open outfit data")
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.load_path(&path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export visible engines")
        .add_filter("CSV", &["csv"])
        .set_file_name("engines.csv")
        .save_file();

    if let Some(path) = file {
        match export_csv(state, &path) {
            Ok(()) => {
                log::info!("Exported {} engines to {}", state.visible_indices.len(), path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

/// Write the visible rows and columns of the engine table to `path`.
pub fn export_csv(state: &AppState, path: &Path) -> Result<()> {
    let Some(catalog) = &state.catalog else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_csv(
        BufWriter::new(file),
        &catalog.engines,
        &state.visible_indices,
        &state.shown_columns(),
    )
    .with_context(|| format!("writing {}", path.display()))
}
