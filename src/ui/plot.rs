use std::collections::BTreeMap;

use eframe::egui::{self, Color32, Ui};
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::data::table::column_header;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Comparison scatter plot
// ---------------------------------------------------------------------------

/// Render axis pickers and a scatter of the visible engines over two
/// numeric columns, one series per first license.
pub fn comparison_plot(ui: &mut Ui, state: &mut AppState) {
    let Some(catalog) = &state.catalog else {
        return;
    };

    let keys = state.numeric_keys.clone();
    ui.horizontal(|ui: &mut Ui| {
        axis_picker(ui, "x_axis", "X", &keys, &mut state.plot_x);
        axis_picker(ui, "y_axis", "Y", &keys, &mut state.plot_y);
    });

    let (Some(x_key), Some(y_key)) = (&state.plot_x, &state.plot_y) else {
        ui.label("Pick two numeric columns to plot.");
        return;
    };

    // Group by first license so every license gets its own legend entry.
    let mut series: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for &idx in &state.visible_indices {
        let engine = &catalog.engines[idx];
        let (Some(x), Some(y)) = (engine.number(x_key), engine.number(y_key)) else {
            continue;
        };
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        let license = engine
            .licenses()
            .first()
            .map(|l| l.name.clone())
            .unwrap_or_else(|| "No license".to_string());
        series.entry(license).or_default().push([x, y]);
    }

    Plot::new("comparison_plot")
        .legend(Legend::default())
        .x_axis_label(column_header(x_key))
        .y_axis_label(column_header(y_key))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (license, points) in series {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(Some(license.as_str())))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let points = Points::new(PlotPoints::from(points))
                    .name(&license)
                    .color(color)
                    .radius(4.0);
                plot_ui.points(points);
            }
        });
}

fn axis_picker(ui: &mut Ui, id: &str, label: &str, keys: &[String], current: &mut Option<String>) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.as_deref().unwrap_or("-"))
        .show_ui(ui, |ui: &mut Ui| {
            for key in keys {
                ui.selectable_value(current, Some(key.clone()), key.as_str());
            }
        });
}
