use crate::error::{LayoutError, Result};
use crate::layout::aspect::resolve_aspect_ratio;
use crate::models::{MediaItem, RowItem, RowLayout};

/// Which dimension of a row is held fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutMode {
    /// Rows fill the available width; row height is derived and may be clamped.
    #[default]
    Height,
    /// Every column has the same width; row height follows the tallest item.
    Width,
}

impl LayoutMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "height" => Some(Self::Height),
            "width" => Some(Self::Width),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Height => "height",
            Self::Width => "width",
        }
    }
}

/// Configuration for the fixed-column row packer.
///
/// Items are split into consecutive groups of `columns` in input order. Group
/// membership never depends on aspect ratio; only the geometry of each group
/// does.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    columns: usize,
    min_rows_visible: usize,
    gap: f32,
    mode: LayoutMode,
}

impl GridLayout {
    /// Creates a packer, rejecting configurations that indicate a caller bug.
    ///
    /// A negative or non-finite gap is treated as no gap.
    pub fn new(columns: usize, min_rows_visible: usize, gap: f32, mode: LayoutMode) -> Result<Self> {
        if columns < 1 {
            return Err(LayoutError::InvalidColumns(columns));
        }
        if min_rows_visible < 1 {
            return Err(LayoutError::InvalidMinRows(min_rows_visible));
        }
        Ok(Self {
            columns,
            min_rows_visible,
            gap: sanitize_gap(gap),
            mode,
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn min_rows_visible(&self) -> usize {
        self.min_rows_visible
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// Computes row geometry for `items` inside the given content box.
    ///
    /// # Algorithm
    /// 1. Partition items into rows of `columns` (the last row may be shorter).
    /// 2. In `Height` mode, size each row so it spans the width, capped at the
    ///    height one row may take when `max(rows, min_rows_visible)` rows share
    ///    the container. A capped row is left short of the full width.
    /// 3. In `Width` mode, give every cell the same width and let the tallest
    ///    item in each row decide the row height.
    ///
    /// An empty or zero-sized container yields no rows.
    pub fn compute(
        &self,
        items: &[MediaItem],
        available_width: f32,
        available_height: f32,
    ) -> Vec<RowLayout> {
        if items.is_empty() || !is_positive(available_width) || !is_positive(available_height) {
            tracing::trace!(
                items = items.len(),
                available_width,
                available_height,
                "skipping layout for empty input or degenerate container"
            );
            return Vec::new();
        }

        match self.mode {
            LayoutMode::Height => self.compute_fill_width(items, available_width, available_height),
            LayoutMode::Width => self.compute_fixed_width(items, available_width),
        }
    }

    /// Number of rows `item_count` items occupy.
    pub fn row_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.columns)
    }

    /// Height ceiling for every row in `Height` mode.
    pub fn max_row_height(&self, item_count: usize, available_height: f32) -> f32 {
        let effective_min_rows = self.row_count(item_count).max(self.min_rows_visible) as f32;
        let max_height =
            (available_height - (effective_min_rows - 1.0) * self.gap) / effective_min_rows;
        if max_height.is_finite() && max_height > 0.0 {
            max_height
        } else {
            0.0
        }
    }

    /// Column width in `Width` mode. Zero when the gaps alone exceed the width.
    pub fn fixed_column_width(&self, available_width: f32) -> f32 {
        let columns = self.columns as f32;
        let width = (available_width - (columns - 1.0) * self.gap) / columns;
        width.max(0.0)
    }

    fn compute_fill_width(
        &self,
        items: &[MediaItem],
        available_width: f32,
        available_height: f32,
    ) -> Vec<RowLayout> {
        let max_row_height = self.max_row_height(items.len(), available_height);
        let mut rows = Vec::with_capacity(self.row_count(items.len()));

        for (row_index, chunk) in items.chunks(self.columns).enumerate() {
            let ratios: Vec<f32> = chunk.iter().map(resolve_aspect_ratio).collect();
            let sum_ratios: f32 = ratios.iter().sum();
            if !is_positive(sum_ratios) {
                return Vec::new();
            }

            let total_gaps = (chunk.len() - 1) as f32 * self.gap;
            let natural_height = ((available_width - total_gaps) / sum_ratios).max(0.0);
            let height = natural_height.min(max_row_height);
            let height = if height.is_finite() { height } else { 0.0 };

            let row_items = chunk
                .iter()
                .zip(&ratios)
                .map(|(item, ar)| RowItem {
                    item: item.clone(),
                    width: height * ar,
                    height,
                })
                .collect();
            rows.push(RowLayout::new(row_index as u32, height, row_items));
        }

        rows
    }

    fn compute_fixed_width(&self, items: &[MediaItem], available_width: f32) -> Vec<RowLayout> {
        let fixed_width = self.fixed_column_width(available_width);
        if fixed_width <= 0.0 {
            return Vec::new();
        }

        items
            .chunks(self.columns)
            .enumerate()
            .map(|(row_index, chunk)| {
                let height = chunk
                    .iter()
                    .map(|item| fixed_width / resolve_aspect_ratio(item))
                    .fold(0.0f32, f32::max);
                let height = if height.is_finite() { height } else { 0.0 };
                let row_items = chunk
                    .iter()
                    .map(|item| RowItem {
                        item: item.clone(),
                        width: fixed_width,
                        height,
                    })
                    .collect();
                RowLayout::new(row_index as u32, height, row_items)
            })
            .collect()
    }
}

/// One-shot form of [`GridLayout::compute`].
pub fn compute_row_layouts(
    items: &[MediaItem],
    columns: usize,
    available_width: f32,
    available_height: f32,
    gap: f32,
    min_rows_visible: usize,
    mode: LayoutMode,
) -> Result<Vec<RowLayout>> {
    let layout = GridLayout::new(columns, min_rows_visible, gap, mode)?;
    Ok(layout.compute(items, available_width, available_height))
}

/// Scroll extent of `rows` stacked with `row_gap` between them.
pub fn total_height(rows: &[RowLayout], row_gap: f32) -> f32 {
    if rows.is_empty() {
        return 0.0;
    }

    let heights_sum: f32 = rows.iter().map(|r| r.height_px).sum();
    let gaps_sum = (rows.len().saturating_sub(1)) as f32 * sanitize_gap(row_gap);
    heights_sum + gaps_sum
}

pub(crate) fn sanitize_gap(gap: f32) -> f32 {
    if gap.is_finite() && gap > 0.0 {
        gap
    } else {
        0.0
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::aspect::{MAX_ASPECT_RATIO, MIN_ASPECT_RATIO};
    use crate::models::MediaCategory;

    const TOLERANCE: f32 = 1e-3;

    fn make_item(id: i64, aspect_ratio: f32) -> MediaItem {
        MediaItem::new(id, MediaCategory::Movies).with_aspect_ratio(aspect_ratio)
    }

    fn posters(count: usize) -> Vec<MediaItem> {
        (0..count as i64).map(|i| make_item(i, 2.0 / 3.0)).collect()
    }

    fn mixed(count: usize) -> Vec<MediaItem> {
        let ratios = [2.0 / 3.0, 1.0, 1.78, 0.5, 0.7];
        (0..count)
            .map(|i| make_item(i as i64, ratios[i % ratios.len()]))
            .collect()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() <= TOLERANCE * b.abs().max(1.0)
    }

    #[test]
    fn test_empty_items() {
        let rows = compute_row_layouts(&[], 4, 1200.0, 800.0, 16.0, 2, LayoutMode::Height).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_rejects_zero_columns() {
        let err = GridLayout::new(0, 1, 16.0, LayoutMode::Height).unwrap_err();
        assert_eq!(err, LayoutError::InvalidColumns(0));
    }

    #[test]
    fn test_rejects_zero_min_rows() {
        let err = compute_row_layouts(&posters(3), 2, 600.0, 600.0, 0.0, 0, LayoutMode::Width)
            .unwrap_err();
        assert_eq!(err, LayoutError::InvalidMinRows(0));
    }

    #[test]
    fn test_row_counts_and_membership() {
        for mode in [LayoutMode::Height, LayoutMode::Width] {
            for columns in 1..=5 {
                for count in 0..=13 {
                    let items = mixed(count);
                    let rows =
                        compute_row_layouts(&items, columns, 1200.0, 900.0, 8.0, 2, mode).unwrap();
                    assert_eq!(rows.len(), count.div_ceil(columns));
                    let total: usize = rows.iter().map(|r| r.items.len()).sum();
                    assert_eq!(total, count);

                    for (idx, row) in rows.iter().enumerate() {
                        assert_eq!(row.row_index as usize, idx);
                        assert!(row.items.len() <= columns);
                        if idx + 1 < rows.len() {
                            assert_eq!(row.items.len(), columns);
                        }
                    }

                    let order: Vec<_> = rows
                        .iter()
                        .flat_map(|r| r.items.iter().map(|i| i.item.id.clone()))
                        .collect();
                    let expected: Vec<_> = items.iter().map(|i| i.id.clone()).collect();
                    assert_eq!(order, expected);
                }
            }
        }
    }

    #[test]
    fn test_width_mode_scenario() {
        let rows = compute_row_layouts(&posters(4), 2, 616.0, 1000.0, 16.0, 1, LayoutMode::Width)
            .unwrap();
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert!(approx(row.height_px, 450.0), "row height {}", row.height_px);
            for cell in &row.items {
                assert_eq!(cell.width, 300.0);
                assert_eq!(cell.height, row.height_px);
            }
        }
    }

    #[test]
    fn test_width_mode_tallest_item_governs() {
        let items = mixed(7);
        let layout = GridLayout::new(3, 1, 12.0, LayoutMode::Width).unwrap();
        let rows = layout.compute(&items, 1000.0, 500.0);
        let fixed_width = layout.fixed_column_width(1000.0);

        for row in &rows {
            let expected = row
                .items
                .iter()
                .map(|cell| fixed_width / resolve_aspect_ratio(&cell.item))
                .fold(0.0f32, f32::max);
            assert_eq!(row.height_px, expected);
            for cell in &row.items {
                assert_eq!(cell.width, fixed_width);
                assert_eq!(cell.height, row.height_px);
            }
        }
        // Fixed columns always span the whole width.
        assert!(approx(rows[0].content_width(12.0), 1000.0));
    }

    #[test]
    fn test_width_mode_ignores_min_rows() {
        let layout_a = GridLayout::new(2, 1, 16.0, LayoutMode::Width).unwrap();
        let layout_b = GridLayout::new(2, 6, 16.0, LayoutMode::Width).unwrap();
        let items = posters(2);
        assert_eq!(
            layout_a.compute(&items, 616.0, 300.0),
            layout_b.compute(&items, 616.0, 300.0)
        );
    }

    #[test]
    fn test_height_mode_fills_row() {
        let items = vec![make_item(1, 2.0 / 3.0), make_item(2, 1.0)];
        let rows =
            compute_row_layouts(&items, 2, 616.0, 1000.0, 16.0, 1, LayoutMode::Height).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert!(approx(row.height_px, 360.0), "row height {}", row.height_px);
        assert!(approx(row.items[0].width, 240.0));
        assert!(approx(row.items[1].width, 360.0));
        assert!(approx(row.content_width(16.0), 616.0));
    }

    #[test]
    fn test_height_mode_clamped_row_is_under_filled() {
        let items = vec![make_item(1, 2.0 / 3.0), make_item(2, 1.0)];
        let rows =
            compute_row_layouts(&items, 2, 616.0, 300.0, 16.0, 1, LayoutMode::Height).unwrap();
        let row = &rows[0];
        assert_eq!(row.height_px, 300.0);
        assert!(approx(row.items[0].width, 200.0));
        assert!(approx(row.items[1].width, 300.0));
        assert!(approx(row.content_width(16.0), 516.0));
        assert!(row.content_width(16.0) < 616.0);
    }

    #[test]
    fn test_min_rows_caps_single_row() {
        let items = vec![make_item(1, 2.0 / 3.0), make_item(2, 1.0)];
        let layout = GridLayout::new(2, 3, 16.0, LayoutMode::Height).unwrap();
        let max_row_height = layout.max_row_height(items.len(), 900.0);
        assert!(approx(max_row_height, 868.0 / 3.0));

        let rows = layout.compute(&items, 616.0, 900.0);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].height_px, max_row_height);
    }

    #[test]
    fn test_height_mode_rows_never_exceed_ceiling() {
        let items = mixed(11);
        for min_rows in 1..=4 {
            let layout = GridLayout::new(4, min_rows, 10.0, LayoutMode::Height).unwrap();
            for (width, height) in [(1600.0, 900.0), (320.0, 2000.0), (900.0, 120.0)] {
                let max_row_height = layout.max_row_height(items.len(), height);
                for row in layout.compute(&items, width, height) {
                    assert!(row.height_px <= max_row_height);
                    let ratios: f32 = row.items.iter().map(|c| resolve_aspect_ratio(&c.item)).sum();
                    let gaps = (row.items.len() - 1) as f32 * 10.0;
                    let natural = (width - gaps) / ratios;
                    if natural <= max_row_height {
                        assert_eq!(row.height_px, natural);
                        assert!(approx(row.content_width(10.0), width));
                    } else {
                        assert_eq!(row.height_px, max_row_height);
                        assert!(row.content_width(10.0) <= width + TOLERANCE);
                    }
                }
            }
        }
    }

    #[test]
    fn test_missing_ratio_uses_category_default() {
        let items = vec![
            MediaItem::new("album", MediaCategory::Music),
            MediaItem::new("film", MediaCategory::Movies),
        ];
        let rows =
            compute_row_layouts(&items, 2, 616.0, 1000.0, 16.0, 1, LayoutMode::Height).unwrap();
        assert!(approx(rows[0].items[0].width, 360.0));
        assert!(approx(rows[0].items[1].width, 240.0));
    }

    #[test]
    fn test_idempotent() {
        let items = mixed(9);
        for mode in [LayoutMode::Height, LayoutMode::Width] {
            let first = compute_row_layouts(&items, 4, 1234.0, 777.0, 16.0, 2, mode).unwrap();
            let second = compute_row_layouts(&items, 4, 1234.0, 777.0, 16.0, 2, mode).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_degenerate_geometry() {
        let items = mixed(5);
        for mode in [LayoutMode::Height, LayoutMode::Width] {
            for (w, h) in [(0.0, 600.0), (600.0, 0.0), (-10.0, 600.0), (f32::NAN, 600.0)] {
                assert!(compute_row_layouts(&items, 2, w, h, 16.0, 1, mode)
                    .unwrap()
                    .is_empty());
            }
        }
    }

    #[test]
    fn test_gaps_wider_than_container_stay_finite() {
        let items = mixed(8);
        let width_rows =
            compute_row_layouts(&items, 4, 30.0, 600.0, 16.0, 1, LayoutMode::Width).unwrap();
        assert!(width_rows.is_empty());

        let height_rows =
            compute_row_layouts(&items, 4, 30.0, 20.0, 16.0, 4, LayoutMode::Height).unwrap();
        for row in &height_rows {
            assert_eq!(row.height_px, 0.0);
            for cell in &row.items {
                assert!(cell.width.is_finite() && cell.width >= 0.0);
            }
        }
    }

    #[test]
    fn test_negative_gap_treated_as_zero() {
        let layout = GridLayout::new(2, 1, -4.0, LayoutMode::Width).unwrap();
        assert_eq!(layout.gap(), 0.0);
        assert_eq!(layout.fixed_column_width(600.0), 300.0);
    }

    #[test]
    fn test_layout_mode_names() {
        assert_eq!(LayoutMode::from_name("Width"), Some(LayoutMode::Width));
        assert_eq!(LayoutMode::from_name("height"), Some(LayoutMode::Height));
        assert_eq!(LayoutMode::from_name("diagonal"), None);
        assert_eq!(LayoutMode::default(), LayoutMode::Height);
    }

    #[test]
    fn test_total_height() {
        let rows = compute_row_layouts(&posters(4), 2, 616.0, 1000.0, 16.0, 1, LayoutMode::Width)
            .unwrap();
        let expected = rows[0].height_px + rows[1].height_px + 16.0;
        assert_eq!(total_height(&rows, 16.0), expected);
        assert_eq!(total_height(&[], 16.0), 0.0);
    }

    #[test]
    fn test_width_mode_sliver_ratio_stays_finite() {
        let items = vec![make_item(1, 1e-37)];
        let rows =
            compute_row_layouts(&items, 1, 616.0, 1000.0, 16.0, 1, LayoutMode::Width).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].height_px.is_finite());
        assert!(approx(rows[0].height_px, 616.0 / MIN_ASPECT_RATIO));
        assert!(rows[0].items[0].height.is_finite());
    }

    #[test]
    fn test_height_mode_huge_ratio_row_keeps_other_rows() {
        let items = vec![
            make_item(1, 3e38),
            make_item(2, 3e38),
            MediaItem::new(3, MediaCategory::Movies),
            MediaItem::new(4, MediaCategory::Music),
        ];
        let rows =
            compute_row_layouts(&items, 2, 616.0, 1000.0, 16.0, 1, LayoutMode::Height).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(approx(rows[0].height_px, 600.0 / (2.0 * MAX_ASPECT_RATIO)));
        assert!(approx(rows[0].content_width(16.0), 616.0));
        assert!(approx(rows[1].height_px, 360.0));
        for row in &rows {
            for cell in &row.items {
                assert!(cell.width.is_finite() && cell.height.is_finite());
            }
        }
    }
}
