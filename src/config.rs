//! User-configurable grid settings.
//!
//! Persisted values come back as strings; anything unparseable or out of range
//! is replaced by the default on restore. Programmatic setters reject instead.

use std::ops::RangeInclusive;

use crate::error::{LayoutError, Result};
use crate::layout::{GridLayout, LayoutMode};

pub const DEFAULT_COLUMNS: usize = 4;
pub const COLUMNS_RANGE: RangeInclusive<usize> = 1..=8;

pub const DEFAULT_MIN_ROWS: usize = 2;
pub const MIN_ROWS_RANGE: RangeInclusive<usize> = 1..=6;

/// Width ceiling so rows do not grow without bound on very wide viewports.
pub const DEFAULT_MAX_GRID_WIDTH: f32 = 1600.0;

/// Theme size token holding the gap between cells.
pub const DEFAULT_GAP_TOKEN: &str = "--grid-gap";

const ENV_COLUMNS: &str = "COVERGRID_COLUMNS";
const ENV_MIN_ROWS: &str = "COVERGRID_MIN_ROWS";
const ENV_LAYOUT_MODE: &str = "COVERGRID_LAYOUT_MODE";
const ENV_MAX_WIDTH: &str = "COVERGRID_MAX_WIDTH";

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSettings {
    pub columns: usize,
    pub min_rows: usize,
    pub mode: LayoutMode,
    pub max_grid_width: f32,
    /// Optional ceiling for the measured height; `None` leaves it unbounded.
    pub max_grid_height: Option<f32>,
    pub gap_token: String,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            min_rows: DEFAULT_MIN_ROWS,
            mode: LayoutMode::default(),
            max_grid_width: DEFAULT_MAX_GRID_WIDTH,
            max_grid_height: None,
            gap_token: DEFAULT_GAP_TOKEN.to_string(),
        }
    }
}

impl LayoutSettings {
    /// Rebuilds settings from stored values, falling back per field.
    pub fn restore(columns: Option<&str>, min_rows: Option<&str>, mode: Option<&str>) -> Self {
        Self {
            columns: restore_in_range(columns, COLUMNS_RANGE, DEFAULT_COLUMNS),
            min_rows: restore_in_range(min_rows, MIN_ROWS_RANGE, DEFAULT_MIN_ROWS),
            mode: mode.and_then(LayoutMode::from_name).unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `COVERGRID_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let columns = lookup(ENV_COLUMNS);
        let min_rows = lookup(ENV_MIN_ROWS);
        let mode = lookup(ENV_LAYOUT_MODE);
        let mut settings = Self::restore(columns.as_deref(), min_rows.as_deref(), mode.as_deref());

        if let Some(raw) = lookup(ENV_MAX_WIDTH) {
            match raw.trim().parse::<f32>() {
                Ok(width) if width.is_finite() && width > 0.0 => settings.max_grid_width = width,
                _ => tracing::warn!("Ignoring invalid {}={:?}", ENV_MAX_WIDTH, raw),
            }
        }

        settings
    }

    pub fn set_columns(&mut self, columns: usize) -> Result<()> {
        if !COLUMNS_RANGE.contains(&columns) {
            return Err(LayoutError::InvalidSetting {
                key: "columns",
                value: columns.to_string(),
            });
        }
        self.columns = columns;
        Ok(())
    }

    pub fn set_min_rows(&mut self, min_rows: usize) -> Result<()> {
        if !MIN_ROWS_RANGE.contains(&min_rows) {
            return Err(LayoutError::InvalidSetting {
                key: "min_rows",
                value: min_rows.to_string(),
            });
        }
        self.min_rows = min_rows;
        Ok(())
    }

    pub fn set_mode_name(&mut self, name: &str) -> Result<()> {
        self.mode = LayoutMode::from_name(name).ok_or_else(|| LayoutError::InvalidSetting {
            key: "mode",
            value: name.to_string(),
        })?;
        Ok(())
    }

    /// Builds a packer for these settings and the current gap.
    pub fn grid_layout(&self, gap: f32) -> Result<GridLayout> {
        GridLayout::new(self.columns, self.min_rows, gap, self.mode)
    }
}

fn restore_in_range(stored: Option<&str>, range: RangeInclusive<usize>, default: usize) -> usize {
    stored
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|value| range.contains(value))
        .unwrap_or(default)
}
