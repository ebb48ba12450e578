use crate::models::{MediaCategory, MediaItem};

/// Portrait poster proportions used by most catalogs.
pub const POSTER_ASPECT_RATIO: f32 = 2.0 / 3.0;

/// Album covers are square.
pub const SQUARE_ASPECT_RATIO: f32 = 1.0;

/// Bounds for a resolved ratio. Keeps derived row geometry finite no matter
/// what a catalog reports.
pub const MIN_ASPECT_RATIO: f32 = 0.01;
pub const MAX_ASPECT_RATIO: f32 = 100.0;

impl MediaCategory {
    /// Aspect ratio assumed for a cover until its real proportions are known.
    pub fn default_aspect_ratio(&self) -> f32 {
        match self {
            Self::Music => SQUARE_ASPECT_RATIO,
            Self::Movies | Self::Tv | Self::Books | Self::Games | Self::Custom => {
                POSTER_ASPECT_RATIO
            }
        }
    }
}

/// Returns a strictly positive width/height ratio for `item`.
///
/// An explicit ratio is used when it is finite and positive, clamped to
/// `MIN_ASPECT_RATIO..=MAX_ASPECT_RATIO`; otherwise the category default
/// applies. Never fails.
pub fn resolve_aspect_ratio(item: &MediaItem) -> f32 {
    match item.aspect_ratio {
        Some(ar) if ar.is_finite() && ar > 0.0 => ar.clamp(MIN_ASPECT_RATIO, MAX_ASPECT_RATIO),
        _ => item.category.default_aspect_ratio(),
    }
}
