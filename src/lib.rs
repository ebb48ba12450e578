//! Justified cover-grid layout engine.
//!
//! Packs an ordered list of catalog items into fixed-column rows and derives
//! per-row pixel geometry from each item's aspect ratio and the measured
//! container box.

pub mod bench;
pub mod config;
pub mod error;
pub mod layout;
pub mod models;

pub use config::LayoutSettings;
pub use error::LayoutError;
pub use layout::{compute_row_layouts, resolve_aspect_ratio, GridLayout, LayoutMode};
pub use models::{MediaCategory, MediaId, MediaItem, RowItem, RowLayout};
