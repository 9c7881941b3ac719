use eframe::egui::{self, Align, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::table::{column_header, format_cell};
use crate::state::AppState;

const ROW_HEIGHT: f32 = 20.0;
const HEADER_HEIGHT: f32 = 24.0;

// ---------------------------------------------------------------------------
// Engine table (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered, sorted engine table.
pub fn engine_table(ui: &mut Ui, state: &mut AppState) {
    let Some(catalog) = &state.catalog else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open an outfit file to browse engines  (File → Open…)");
        });
        return;
    };

    let columns = state.shown_columns();
    let mut sort_clicked: Option<String> = None;
    let mut compare_toggled: Option<usize> = None;
    let mut ship_added: Option<usize> = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto())
        .columns(Column::auto().at_least(60.0), columns.len())
        .min_scrolled_height(0.0)
        .header(HEADER_HEIGHT, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Compare");
            });
            for col in &columns {
                header.col(|ui: &mut Ui| {
                    let mut label = column_header(col);
                    if let Some((sorted, order)) = &state.sort {
                        if sorted == col {
                            label = format!("{label} {}", order.arrow());
                        }
                    }
                    if ui.button(RichText::new(label).strong()).clicked() {
                        sort_clicked = Some(col.clone());
                    }
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, state.visible_indices.len(), |mut row| {
                let idx = state.visible_indices[row.index()];
                let engine = &catalog.engines[idx];
                row.col(|ui: &mut Ui| {
                    let mut compared = state.comparison.contains(&idx);
                    if ui.checkbox(&mut compared, "").changed() {
                        compare_toggled = Some(idx);
                    }
                    if ui.small_button("+").on_hover_text("Add to ship").clicked() {
                        ship_added = Some(idx);
                    }
                });
                for col in &columns {
                    row.col(|ui: &mut Ui| {
                        ui.label(format_cell(engine.get(col)));
                    });
                }
            });
        });

    if let Some(col) = sort_clicked {
        state.sort_by(&col);
    }
    if let Some(idx) = compare_toggled {
        state.toggle_comparison(idx);
    }
    if let Some(idx) = ship_added {
        state.loadout.add(idx);
    }
}

// ---------------------------------------------------------------------------
// Comparison table: one column per compared engine
// ---------------------------------------------------------------------------

/// Render the compared engines side by side, one row per visible column.
pub fn comparison_table(ui: &mut Ui, state: &mut AppState) {
    let Some(catalog) = &state.catalog else {
        return;
    };
    if state.comparison.is_empty() {
        ui.label("Tick engines in the Engines view to compare them here.");
        return;
    }

    let compared: Vec<usize> = state.comparison.iter().copied().collect();
    let fields = state.shown_columns();
    let mut removed: Option<usize> = None;

    egui::ScrollArea::horizontal()
        .id_salt("comparison_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .id_salt("comparison_table")
                .striped(true)
                .cell_layout(Layout::left_to_right(Align::Center))
                .column(Column::auto())
                .columns(Column::auto().at_least(80.0), compared.len())
                .header(HEADER_HEIGHT, |mut header| {
                    header.col(|ui: &mut Ui| {
                        ui.strong("Field");
                    });
                    for &idx in &compared {
                        header.col(|ui: &mut Ui| {
                            let name = catalog.engines[idx].name().unwrap_or("?");
                            if ui.button(RichText::new(name).strong()).on_hover_text("Remove").clicked() {
                                removed = Some(idx);
                            }
                        });
                    }
                })
                .body(|mut body| {
                    for field in &fields {
                        body.row(ROW_HEIGHT, |mut row| {
                            row.col(|ui: &mut Ui| {
                                ui.strong(column_header(field));
                            });
                            for &idx in &compared {
                                row.col(|ui: &mut Ui| {
                                    ui.label(format_cell(catalog.engines[idx].get(field)));
                                });
                            }
                        });
                    }
                });
        });

    if let Some(idx) = removed {
        state.toggle_comparison(idx);
    }
}
