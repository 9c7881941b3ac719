use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::color::ColorMap;
use crate::config::ExplorerConfig;
use crate::data::filter::{
    all_keys, filtered_indices, numeric_keys, numeric_ranges, string_keys, Constraint,
    FilterState, LicenseSelection,
};
use crate::data::loader::load_file;
use crate::data::loadout::Loadout;
use crate::data::model::Catalog;
use crate::data::normalize::Normalizer;
use crate::data::table::{default_visible_columns, ordered_columns, sort_indices, SortOrder};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which view the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Engines,
    Comparison,
    Loadout,
    Search,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ExplorerConfig,
    normalizer: Normalizer,

    /// Loaded catalog (None until user loads a file).
    pub catalog: Option<Catalog>,
    pub source_path: Option<PathBuf>,

    /// Engine columns in display order (known first, extras after).
    pub columns: Vec<String>,
    pub numeric_keys: Vec<String>,
    pub string_keys: Vec<String>,
    /// Min/max of every numeric engine column.
    pub numeric_ranges: BTreeMap<String, (f64, f64)>,

    /// Per-field engine constraints.
    pub filters: FilterState,
    pub selected_licenses: LicenseSelection,
    pub visible_columns: Vec<String>,
    pub sort: Option<(String, SortOrder)>,

    /// Indices of engines passing the current filters, in display order (cached).
    pub visible_indices: Vec<usize>,

    /// Engines picked for side-by-side comparison.
    pub comparison: BTreeSet<usize>,
    pub loadout: Loadout,

    pub plot_x: Option<String>,
    pub plot_y: Option<String>,
    pub color_map: Option<ColorMap>,

    pub view: View,
    pub search_query: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config.ignore_set()),
            config,
            catalog: None,
            source_path: None,
            columns: Vec::new(),
            numeric_keys: Vec::new(),
            string_keys: Vec::new(),
            numeric_ranges: BTreeMap::new(),
            filters: FilterState::new(),
            selected_licenses: LicenseSelection::new(),
            visible_columns: Vec::new(),
            sort: None,
            visible_indices: Vec::new(),
            comparison: BTreeSet::new(),
            loadout: Loadout::default(),
            plot_x: None,
            plot_y: None,
            color_map: None,
            view: View::default(),
            search_query: String::new(),
            status_message: None,
        }
    }

    /// Load an outfit file. On failure the previous catalog stays in place.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        let catalog = load_file(path, &self.normalizer)?;
        self.set_catalog(catalog);
        self.source_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Ingest a newly normalized catalog, reset view state and refilter.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        let keys = all_keys(&catalog.engines);
        self.columns = ordered_columns(&keys, &self.config.default_column_order);
        self.numeric_keys = numeric_keys(&catalog.engines);
        self.string_keys = string_keys(&catalog.engines);
        self.numeric_ranges = numeric_ranges(&catalog.engines, &self.numeric_keys);
        self.visible_columns = default_visible_columns(&keys, &self.config.default_visible_columns);

        self.filters.clear();
        self.selected_licenses.clear();
        self.sort = None;
        self.comparison.clear();
        self.loadout.reset();

        self.plot_x = self.numeric_keys.iter().find(|k| *k == "cost").cloned();
        self.plot_y = self.numeric_keys.iter().find(|k| *k == "thrust").cloned();
        self.color_map = Some(ColorMap::new(catalog.sorted_license_names()));

        self.catalog = Some(catalog);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` after a filter or sort change.
    pub fn refilter(&mut self) {
        let Some(catalog) = &self.catalog else {
            return;
        };
        let mut indices =
            filtered_indices(&catalog.engines, &self.filters, &self.selected_licenses);
        if let Some((column, order)) = &self.sort {
            sort_indices(&catalog.engines, &mut indices, column, *order);
        }
        self.visible_indices = indices;
    }

    /// Current numeric bounds for `key`: the user's range or the data range.
    pub fn range_for(&self, key: &str) -> (f64, f64) {
        match self.filters.get(key) {
            Some(Constraint::Range { min, max }) => (*min, *max),
            _ => self.numeric_ranges.get(key).copied().unwrap_or((0.0, 0.0)),
        }
    }

    pub fn set_range(&mut self, key: &str, min: f64, max: f64) {
        self.filters.insert(key.to_string(), Constraint::range(min, max));
        self.refilter();
    }

    /// Set a substring filter; an empty query removes it.
    pub fn set_text_filter(&mut self, key: &str, query: &str) {
        if query.is_empty() {
            self.filters.remove(key);
        } else {
            self.filters.insert(key.to_string(), Constraint::contains(query));
        }
        self.refilter();
    }

    pub fn text_filter(&self, key: &str) -> &str {
        match self.filters.get(key) {
            Some(Constraint::Contains(query)) => query,
            _ => "",
        }
    }

    pub fn clear_filter(&mut self, key: &str) {
        self.filters.remove(key);
        self.refilter();
    }

    pub fn reset_filters(&mut self) {
        self.filters.clear();
        self.selected_licenses.clear();
        self.refilter();
    }

    pub fn toggle_license(&mut self, name: &str) {
        log::debug!("Toggled license {name:?}");
        if !self.selected_licenses.remove(name) {
            self.selected_licenses.insert(name.to_string());
        }
        self.refilter();
    }

    pub fn toggle_column(&mut self, key: &str) {
        if let Some(pos) = self.visible_columns.iter().position(|c| c == key) {
            self.visible_columns.remove(pos);
        } else {
            self.visible_columns.push(key.to_string());
        }
    }

    /// Make every column visible, in display order.
    pub fn show_all_columns(&mut self) {
        self.visible_columns = self.columns.clone();
    }

    /// Visible columns in display order.
    pub fn shown_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| self.visible_columns.contains(c))
            .cloned()
            .collect()
    }

    /// Sort by `column`; sorting by the same column again flips the order.
    pub fn sort_by(&mut self, column: &str) {
        self.sort = match self.sort.take() {
            Some((current, order)) if current == column => Some((current, order.toggled())),
            _ => Some((column.to_string(), SortOrder::Ascending)),
        };
        self.refilter();
    }

    pub fn toggle_comparison(&mut self, engine: usize) {
        if !self.comparison.remove(&engine) {
            self.comparison.insert(engine);
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ExplorerConfig::default())
    }
}
