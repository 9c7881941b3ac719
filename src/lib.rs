pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;

pub use app::OutfitExplorerApp;
pub use cli::Cli;
pub use config::ExplorerConfig;
pub use data::filter::{filter_records, filtered_indices, Constraint, FilterState, LicenseSelection};
pub use data::model::{Catalog, Engine, FieldValue, License, Record};
pub use data::normalize::Normalizer;
pub use state::AppState;
