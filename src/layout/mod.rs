pub mod aspect;
pub mod grid;
pub mod layout_cache;
pub mod resize;

pub use aspect::resolve_aspect_ratio;
pub use grid::{compute_row_layouts, total_height, GridLayout, LayoutMode};
pub use layout_cache::{CachedLayoutComputer, LayoutCache};
pub use resize::{
    BoxMetrics, ContainerBox, Geometry, LayoutSnapshot, Padding, ResizeCoordinator, ThemeTokens,
};
