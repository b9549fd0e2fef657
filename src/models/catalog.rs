use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Content type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Series,
    Live,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Movie => write!(f, "movie"),
            ContentType::Series => write!(f, "series"),
            ContentType::Live => write!(f, "live"),
        }
    }
}

/// Resolved kind of a catalog entry.
///
/// Episode details only exist on the `Series` variant, so a movie or live
/// channel can never carry a season or episode number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Live,
    #[serde(rename_all = "camelCase")]
    Series {
        #[serde(skip_serializing_if = "Option::is_none")]
        series_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        season: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        episode: Option<u32>,
    },
}

impl ContentKind {
    pub fn content_type(&self) -> ContentType {
        match self {
            ContentKind::Movie => ContentType::Movie,
            ContentKind::Live => ContentType::Live,
            ContentKind::Series { .. } => ContentType::Series,
        }
    }

    /// Series episode without any title-derived details (explicit hint only)
    pub fn bare_series() -> Self {
        ContentKind::Series {
            series_name: None,
            season: None,
            episode: None,
        }
    }
}

/// Single catalog entry (movie, live channel or series episode)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: usize,
    pub title: String,
    /// Empty when the playlist declared no logo
    pub image_url: String,
    pub description: String,
    pub stream_url: String,
    pub categories: Vec<String>,
    #[serde(flatten)]
    pub kind: ContentKind,
}

impl ContentItem {
    pub fn content_type(&self) -> ContentType {
        self.kind.content_type()
    }

    pub fn series_name(&self) -> Option<&str> {
        match &self.kind {
            ContentKind::Series { series_name, .. } => series_name.as_deref(),
            _ => None,
        }
    }

    pub fn season(&self) -> Option<u32> {
        match self.kind {
            ContentKind::Series { season, .. } => season,
            _ => None,
        }
    }

    pub fn episode(&self) -> Option<u32> {
        match self.kind {
            ContentKind::Series { episode, .. } => episode,
            _ => None,
        }
    }

    /// First category label, if any
    pub fn primary_category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }
}

/// Episodes sharing a series name, bucketed by season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub name: String,
    pub cover_image_url: String,
    pub category: String,
    pub seasons: BTreeMap<u32, Vec<ContentItem>>,
}

impl Series {
    pub fn episode_count(&self) -> usize {
        self.seasons.values().map(Vec::len).sum()
    }
}

/// Parsed playlist split by content type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub movies: Vec<ContentItem>,
    pub series: Vec<Series>,
    pub live_channels: Vec<ContentItem>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.series.is_empty() && self.live_channels.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            movie_count: self.movies.len(),
            live_count: self.live_channels.len(),
            series_count: self.series.len(),
            episode_count: self.series.iter().map(Series::episode_count).sum(),
        }
    }

    /// All accepted items in identifier order
    pub fn items(&self) -> Vec<&ContentItem> {
        let mut items: Vec<&ContentItem> = self
            .movies
            .iter()
            .chain(self.live_channels.iter())
            .chain(
                self.series
                    .iter()
                    .flat_map(|s| s.seasons.values().flatten()),
            )
            .collect();
        items.sort_by_key(|item| item.id);
        items
    }
}

/// Catalog statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub movie_count: usize,
    pub live_count: usize,
    pub series_count: usize,
    pub episode_count: usize,
}

/// Counters collected while parsing a single playlist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    pub entries_seen: usize,
    pub accepted: usize,
    pub blocked: usize,
    /// Attribute lines without a usable title
    pub malformed: usize,
    /// URL lines with no preceding attribute line
    pub orphan_urls: usize,
    pub found_header: bool,
}

/// Request to fetch and parse a playlist
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    pub url: String,
}

/// Parse response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub hash: String,
    pub stats: CatalogStats,
    pub catalog: Catalog,
    pub parsed_at: i64,
}
