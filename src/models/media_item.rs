use std::fmt;

/// Catalog a grid item was picked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    Movies,
    Tv,
    Books,
    Music,
    Games,
    Custom,
}

impl MediaCategory {
    pub const ALL: [MediaCategory; 6] = [
        Self::Movies,
        Self::Tv,
        Self::Books,
        Self::Music,
        Self::Games,
        Self::Custom,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "movies" | "movie" => Some(Self::Movies),
            "tv" => Some(Self::Tv),
            "books" | "book" => Some(Self::Books),
            "music" => Some(Self::Music),
            "games" | "game" => Some(Self::Games),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movies => "movies",
            Self::Tv => "tv",
            Self::Books => "books",
            Self::Music => "music",
            Self::Games => "games",
            Self::Custom => "custom",
        }
    }
}

/// Identifier assigned by the upstream catalog: TMDB and MusicBrainz hand out
/// numbers, OpenLibrary and custom covers use strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for MediaId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for MediaId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MediaId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub id: MediaId,
    pub category: MediaCategory,
    /// Width divided by height, when known.
    pub aspect_ratio: Option<f32>,
}

impl MediaItem {
    pub fn new(id: impl Into<MediaId>, category: MediaCategory) -> Self {
        Self {
            id: id.into(),
            category,
            aspect_ratio: None,
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = Some(aspect_ratio);
        self
    }

    /// Records the natural proportions of a loaded cover.
    ///
    /// Only fills in a missing ratio; an explicit one always wins. Returns
    /// true when the item changed.
    pub fn learn_natural_dimensions(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.learn_aspect_ratio(width as f32 / height as f32)
    }

    pub(crate) fn learn_aspect_ratio(&mut self, aspect_ratio: f32) -> bool {
        if self.has_explicit_aspect_ratio() || !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return false;
        }
        self.aspect_ratio = Some(aspect_ratio);
        true
    }

    pub fn has_explicit_aspect_ratio(&self) -> bool {
        matches!(self.aspect_ratio, Some(ar) if ar.is_finite() && ar > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names_round_trip() {
        for category in MediaCategory::ALL {
            assert_eq!(MediaCategory::from_name(category.as_str()), Some(category));
        }
        assert_eq!(MediaCategory::from_name(" Movie "), Some(MediaCategory::Movies));
        assert_eq!(MediaCategory::from_name("podcasts"), None);
    }

    #[test]
    fn test_media_id_display() {
        assert_eq!(MediaId::from(603).to_string(), "603");
        assert_eq!(MediaId::from("OL45804W").to_string(), "OL45804W");
    }

    #[test]
    fn test_learn_natural_dimensions_fills_missing_ratio() {
        let mut item = MediaItem::new(1, MediaCategory::Music);
        assert!(item.learn_natural_dimensions(500, 250));
        assert_eq!(item.aspect_ratio, Some(2.0));
    }

    #[test]
    fn test_learn_natural_dimensions_keeps_explicit_ratio() {
        let mut item = MediaItem::new(1, MediaCategory::Movies).with_aspect_ratio(0.7);
        assert!(!item.learn_natural_dimensions(500, 250));
        assert_eq!(item.aspect_ratio, Some(0.7));
    }

    #[test]
    fn test_learn_natural_dimensions_ignores_zero_size() {
        let mut item = MediaItem::new("x", MediaCategory::Books);
        assert!(!item.learn_natural_dimensions(0, 300));
        assert!(!item.learn_natural_dimensions(300, 0));
        assert!(item.aspect_ratio.is_none());
    }

    #[test]
    fn test_non_positive_ratio_is_not_explicit() {
        let item = MediaItem::new(2, MediaCategory::Games).with_aspect_ratio(0.0);
        assert!(!item.has_explicit_aspect_ratio());
        let mut item = item;
        assert!(item.learn_aspect_ratio(1.5));
        assert_eq!(item.aspect_ratio, Some(1.5));
    }
}
