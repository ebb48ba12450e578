use super::MediaItem;

#[derive(Debug, Clone, PartialEq)]
pub struct RowItem {
    pub item: MediaItem,
    pub width: f32,
    pub height: f32,
}

/// Geometry of one grid row. Derived on every layout pass and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    pub row_index: u32,
    pub height_px: f32,
    pub items: Vec<RowItem>,
}

impl RowLayout {
    pub fn new(row_index: u32, height_px: f32, items: Vec<RowItem>) -> Self {
        Self {
            row_index,
            height_px,
            items,
        }
    }

    /// Sum of item widths plus the gaps between them.
    pub fn content_width(&self, gap: f32) -> f32 {
        let widths: f32 = self.items.iter().map(|i| i.width).sum();
        widths + self.items.len().saturating_sub(1) as f32 * gap
    }
}
