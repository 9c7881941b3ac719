//! Data layer: core types, normalization, filtering and tabulation.
//!
//! Architecture:
//! ```text
//!  outfits.json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse document → category → raw records
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ normalize  │  ignore patterns, transforms, licenses, derived metrics
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Catalog  │  Vec<Arc<License>>, Vec<Engine>, other categories
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  apply field constraints + license selection → indices
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  table    │  column order, sorting, CSV export
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod loadout;
pub mod model;
pub mod normalize;
pub mod pattern;
pub mod table;
