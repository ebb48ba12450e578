//! Keeps packer inputs in sync with the live container box.
//!
//! The host forwards its native size-change notifications to
//! [`ResizeCoordinator::on_resize`]. Every call re-measures the container and
//! re-reads the gap token; the packer only runs when a measured value or a
//! layout input actually changed.

use std::collections::HashMap;

use crate::config::LayoutSettings;
use crate::error::Result;
use crate::layout::grid::{sanitize_gap, LayoutMode};
use crate::layout::layout_cache::CachedLayoutComputer;
use crate::models::{MediaId, MediaItem, RowLayout};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Client box of the hosting container, padding included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxMetrics {
    pub client_width: f32,
    pub client_height: f32,
    pub padding: Padding,
}

impl BoxMetrics {
    pub fn new(client_width: f32, client_height: f32) -> Self {
        Self {
            client_width,
            client_height,
            padding: Padding::default(),
        }
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }
}

/// Something that can report its current box.
pub trait ContainerBox {
    /// Returns `None` while the container is not attached.
    fn measure(&self) -> Option<BoxMetrics>;
}

/// Source of themeable size tokens such as the grid gap.
pub trait ThemeTokens {
    fn size_token(&self, name: &str) -> Option<String>;
}

impl ThemeTokens for HashMap<String, String> {
    fn size_token(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Parses a pixel length such as `16`, `16px` or ` 12.5px `.
pub fn parse_size_token(raw: &str) -> Option<f32> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
    number
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Measured inputs for one packer run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub available_width: f32,
    pub available_height: f32,
    pub gap: f32,
}

/// What the observer hook sees after each computation.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    pub geometry: Geometry,
    pub columns: usize,
    pub min_rows: usize,
    pub mode: LayoutMode,
    pub item_count: usize,
    pub row_count: usize,
}

pub type LayoutObserver = Box<dyn FnMut(&LayoutSnapshot)>;

pub struct ResizeCoordinator<C: ContainerBox, T: ThemeTokens> {
    container: C,
    theme: T,
    settings: LayoutSettings,
    items: Vec<MediaItem>,
    geometry: Option<Geometry>,
    rows: Vec<RowLayout>,
    computer: CachedLayoutComputer,
    observer: Option<LayoutObserver>,
}

impl<C: ContainerBox, T: ThemeTokens> ResizeCoordinator<C, T> {
    pub fn new(container: C, theme: T, settings: LayoutSettings) -> Self {
        Self {
            container,
            theme,
            settings,
            items: Vec::new(),
            geometry: None,
            rows: Vec::new(),
            computer: CachedLayoutComputer::new(),
            observer: None,
        }
    }

    /// Installs a hook called with a snapshot after every computation.
    pub fn with_observer(mut self, observer: impl FnMut(&LayoutSnapshot) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Last computed rows. Empty until the first successful measurement.
    pub fn rows(&self) -> &[RowLayout] {
        &self.rows
    }

    pub fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn theme_mut(&mut self) -> &mut T {
        &mut self.theme
    }

    /// Initial measurement. Returns whether the rows were recomputed.
    pub fn mount(&mut self) -> Result<bool> {
        self.on_resize()
    }

    /// Handles a container size-change notification.
    pub fn on_resize(&mut self) -> Result<bool> {
        let Some(metrics) = self.container.measure() else {
            self.detach();
            return Ok(false);
        };

        let geometry = self.derive_geometry(&metrics);
        if self.geometry == Some(geometry) {
            tracing::trace!("measurement unchanged; skipping relayout");
            return Ok(false);
        }

        self.geometry = Some(geometry);
        self.relayout()
    }

    /// Handles a theme change; the gap token is re-read on the next measure.
    pub fn on_theme_changed(&mut self) -> Result<bool> {
        self.on_resize()
    }

    pub fn set_items(&mut self, items: Vec<MediaItem>) -> Result<bool> {
        if self.items == items {
            return Ok(false);
        }
        self.items = items;
        self.relayout()
    }

    pub fn set_columns(&mut self, columns: usize) -> Result<bool> {
        if self.settings.columns == columns {
            return Ok(false);
        }
        self.settings.set_columns(columns)?;
        self.relayout()
    }

    pub fn set_min_rows(&mut self, min_rows: usize) -> Result<bool> {
        if self.settings.min_rows == min_rows {
            return Ok(false);
        }
        self.settings.set_min_rows(min_rows)?;
        self.relayout()
    }

    pub fn set_mode(&mut self, mode: LayoutMode) -> Result<bool> {
        if self.settings.mode == mode {
            return Ok(false);
        }
        self.settings.mode = mode;
        self.relayout()
    }

    /// Records the natural ratio of a loaded cover for the item with `id`.
    ///
    /// Items that already carry an explicit ratio are left alone.
    pub fn update_aspect_ratio(&mut self, id: &MediaId, aspect_ratio: f32) -> Result<bool> {
        let changed = self
            .items
            .iter_mut()
            .find(|item| &item.id == id)
            .is_some_and(|item| item.learn_aspect_ratio(aspect_ratio));
        if !changed {
            return Ok(false);
        }
        tracing::debug!("learned aspect ratio {:.3} for item {}", aspect_ratio, id);
        self.relayout()
    }

    fn derive_geometry(&self, metrics: &BoxMetrics) -> Geometry {
        let width = (metrics.client_width - metrics.padding.horizontal()).max(0.0);
        let mut height = (metrics.client_height - metrics.padding.vertical()).max(0.0);
        if let Some(max_height) = self.settings.max_grid_height {
            height = height.min(max_height);
        }

        let gap = self
            .theme
            .size_token(&self.settings.gap_token)
            .and_then(|raw| parse_size_token(&raw))
            .unwrap_or(0.0);

        Geometry {
            available_width: width.min(self.settings.max_grid_width),
            available_height: height,
            gap: sanitize_gap(gap),
        }
    }

    /// Forgets the measured geometry so the next attached measurement always
    /// relayouts. The last rows stay as they are.
    fn detach(&mut self) {
        tracing::trace!("container not attached; keeping {} rows", self.rows.len());
        self.geometry = None;
    }

    fn relayout(&mut self) -> Result<bool> {
        if self.container.measure().is_none() {
            self.detach();
            return Ok(false);
        }
        let Some(geometry) = self.geometry else {
            return Ok(false);
        };

        let layout = self.settings.grid_layout(geometry.gap)?;
        self.rows = self.computer.compute(
            &layout,
            &self.items,
            geometry.available_width,
            geometry.available_height,
        );

        tracing::debug!(
            "layout-widths available={:.1}x{:.1} gap={:.1} columns={} min_rows={} mode={} items={} rows={}",
            geometry.available_width,
            geometry.available_height,
            geometry.gap,
            layout.columns(),
            layout.min_rows_visible(),
            layout.mode().as_str(),
            self.items.len(),
            self.rows.len()
        );

        if let Some(observer) = self.observer.as_mut() {
            observer(&LayoutSnapshot {
                geometry,
                columns: layout.columns(),
                min_rows: layout.min_rows_visible(),
                mode: layout.mode(),
                item_count: self.items.len(),
                row_count: self.rows.len(),
            });
        }

        Ok(true)
    }
}
