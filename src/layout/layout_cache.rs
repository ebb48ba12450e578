use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use xxhash_rust::xxh3::xxh3_64;

use crate::layout::grid::{GridLayout, LayoutMode};
use crate::models::{MediaId, MediaItem, RowLayout};

/// Maximum number of cached layouts to keep in memory.
const MAX_CACHE_ENTRIES: usize = 8;

/// Every input the packer reads. Floats are keyed by their bit patterns so a
/// hit only occurs for exactly the same geometry.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    list_hash: u64,
    columns: usize,
    min_rows_visible: usize,
    mode: LayoutMode,
    gap_bits: u32,
    width_bits: u32,
    height_bits: u32,
}

impl CacheKey {
    fn new(layout: &GridLayout, list_hash: u64, available_width: f32, available_height: f32) -> Self {
        Self {
            list_hash,
            columns: layout.columns(),
            min_rows_visible: layout.min_rows_visible(),
            mode: layout.mode(),
            gap_bits: layout.gap().to_bits(),
            width_bits: available_width.to_bits(),
            height_bits: available_height.to_bits(),
        }
    }
}

/// Cached rows plus the item count they were computed for.
#[derive(Debug, Clone)]
struct CachedLayout {
    rows: Vec<RowLayout>,
    item_count: usize,
}

/// Memoizes packer output keyed by its full input tuple.
///
/// The list hash covers (id, category, aspect ratio) of every item in order,
/// so reordering items or learning a cover's real proportions misses.
pub struct LayoutCache {
    cache: Mutex<LruCache<CacheKey, CachedLayout>>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHE_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Computes a fast hash of the item list.
    pub fn compute_list_hash(items: &[MediaItem]) -> u64 {
        let mut hasher_input = Vec::with_capacity(items.len() * 32);

        for item in items {
            match &item.id {
                MediaId::Numeric(n) => {
                    hasher_input.push(0);
                    hasher_input.extend_from_slice(&n.to_le_bytes());
                }
                MediaId::Text(s) => {
                    hasher_input.push(1);
                    hasher_input.extend_from_slice(&(s.len() as u64).to_le_bytes());
                    hasher_input.extend_from_slice(s.as_bytes());
                }
            }
            hasher_input.extend_from_slice(item.category.as_str().as_bytes());
            let ratio_bits = item.aspect_ratio.map(f32::to_bits).unwrap_or(u32::MAX);
            hasher_input.extend_from_slice(&ratio_bits.to_le_bytes());
        }

        xxh3_64(&hasher_input)
    }

    /// Returns the cached rows for these inputs, if any.
    ///
    /// An entry computed for a different number of items is a miss even when
    /// the list hash matches.
    pub fn get(
        &self,
        layout: &GridLayout,
        list_hash: u64,
        item_count: usize,
        available_width: f32,
        available_height: f32,
    ) -> Option<Vec<RowLayout>> {
        let key = CacheKey::new(layout, list_hash, available_width, available_height);
        let mut cache = self.cache.lock();
        let entry = cache.get(&key)?;
        if entry.item_count != item_count {
            return None;
        }
        Some(entry.rows.clone())
    }

    /// Stores rows, evicting the least recently used entry at capacity.
    pub fn set(
        &self,
        layout: &GridLayout,
        list_hash: u64,
        item_count: usize,
        available_width: f32,
        available_height: f32,
        rows: Vec<RowLayout>,
    ) {
        let key = CacheKey::new(layout, list_hash, available_width, available_height);
        self.cache.lock().put(key, CachedLayout { rows, item_count });
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

/// A convenience struct that combines layout computation with caching.
#[derive(Default)]
pub struct CachedLayoutComputer {
    pub cache: LayoutCache,
}

impl CachedLayoutComputer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the layout, reusing a previous result for identical inputs.
    pub fn compute(
        &self,
        layout: &GridLayout,
        items: &[MediaItem],
        available_width: f32,
        available_height: f32,
    ) -> Vec<RowLayout> {
        if items.is_empty() {
            return Vec::new();
        }

        let list_hash = LayoutCache::compute_list_hash(items);
        if let Some(rows) = self.cache.get(
            layout,
            list_hash,
            items.len(),
            available_width,
            available_height,
        ) {
            tracing::trace!(list_hash, "layout cache hit");
            return rows;
        }

        let rows = layout.compute(items, available_width, available_height);
        self.cache.set(
            layout,
            list_hash,
            items.len(),
            available_width,
            available_height,
            rows.clone(),
        );
        rows
    }

    /// Invalidates the cache, forcing recomputation on next call.
    pub fn invalidate(&self) {
        self.cache.clear();
    }
}
