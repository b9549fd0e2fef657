use lazy_static::lazy_static;
use regex::Regex;
use sha1::{Digest, Sha1};
use std::borrow::Cow;
use std::collections::HashMap;
use std::time::Instant;

use crate::models::{Catalog, ContentItem, ContentKind, ContentType, ParseReport};
use crate::services::classifier::{ContentClassifier, Signals, TypeHint};
use crate::services::content_filter::ContentFilter;
use crate::services::metrics;
use crate::services::series_grouper::group_series;

const EXTINF_MARKER: &str = "#EXTINF";
const HEADER_MARKER: &str = "#EXTM3U";
const DEFAULT_CATEGORY: &str = "Uncategorized";

lazy_static! {
    /// Regex to parse attributes (tvg-logo="...", group-title="...", etc)
    static ref ATTR_REGEX: Regex = Regex::new(r#"([\w-]+)="([^"]*)""#).unwrap();

    /// Regex to extract the duration right after the marker
    static ref DURATION_REGEX: Regex = Regex::new(r"^:?\s*(-?\d+)").unwrap();
}

/// Parsed attribute line data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtinfRecord {
    pub duration: i64,
    /// Lowercased keys, first occurrence wins
    pub attributes: HashMap<String, String>,
    pub title: String,
}

impl ExtinfRecord {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn logo(&self) -> Option<&str> {
        self.attribute("tvg-logo").filter(|l| !l.is_empty())
    }

    pub fn category(&self) -> &str {
        self.attribute("group-title").unwrap_or(DEFAULT_CATEGORY)
    }

    pub fn type_hint(&self) -> Option<TypeHint> {
        self.attribute("type").and_then(TypeHint::parse)
    }
}

/// Parse an attribute line.
/// Format: #EXTINF:duration tvg-logo="..." group-title="..." type="...",Title
///
/// Returns `None` when the line has no title (no comma, or nothing after the
/// last one).
pub fn parse_extinf(line: &str) -> Option<ExtinfRecord> {
    let content = line.strip_prefix(EXTINF_MARKER)?;

    // Title is whatever follows the last comma
    let last_comma = content.rfind(',')?;
    let header = &content[..last_comma];
    let title = content[last_comma + 1..].trim();
    if title.is_empty() {
        return None;
    }

    let duration = DURATION_REGEX
        .captures(header)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);

    let mut attributes = HashMap::new();
    for caps in ATTR_REGEX.captures_iter(header) {
        let key = caps.get(1).map(|m| m.as_str().to_lowercase()).unwrap_or_default();
        let value = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
        attributes.entry(key).or_insert(value);
    }

    Some(ExtinfRecord {
        duration,
        attributes,
        title: title.to_string(),
    })
}

/// Generate SHA1 hash of a playlist URL or body
pub fn hash_source(source: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(source);
    let result = hasher.finalize();
    format!("{:x}", result)
}

/// One scanned entry: attribute line plus the URL line after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub extinf: ExtinfRecord,
    pub stream_url: String,
}

/// What the scanner found on a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Header,
    Entry(PlaylistEntry),
    /// Attribute line that yielded no usable record
    Malformed,
    /// URL line with no attribute line before it
    OrphanUrl,
}

/// Line scanner pairing each attribute line with the next URL line
pub struct LineScanner<I> {
    lines: I,
    pending: Option<ExtinfRecord>,
}

impl<I> LineScanner<I> {
    pub fn new(lines: I) -> Self {
        Self { lines, pending: None }
    }
}

impl<'a, I: Iterator<Item = &'a str>> Iterator for LineScanner<I> {
    type Item = ScanEvent;

    fn next(&mut self) -> Option<ScanEvent> {
        for line in self.lines.by_ref() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                continue;
            }

            if trimmed.starts_with(HEADER_MARKER) {
                return Some(ScanEvent::Header);
            }

            if trimmed.starts_with(EXTINF_MARKER) {
                // A newer attribute line replaces any pending one
                self.pending = parse_extinf(trimmed);
                if self.pending.is_none() {
                    return Some(ScanEvent::Malformed);
                }
                continue;
            }

            // Skip other comments/directives
            if trimmed.starts_with('#') {
                continue;
            }

            return Some(match self.pending.take() {
                Some(extinf) => ScanEvent::Entry(PlaylistEntry {
                    extinf,
                    stream_url: trimmed.to_string(),
                }),
                None => ScanEvent::OrphanUrl,
            });
        }

        None
    }
}

/// Running catalog lists with a shared identifier counter
#[derive(Debug, Default)]
pub struct CatalogAssembler {
    movies: Vec<ContentItem>,
    live_channels: Vec<ContentItem>,
    series_episodes: Vec<ContentItem>,
}

impl CatalogAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier the next accepted item will get
    pub fn next_id(&self) -> usize {
        self.movies.len() + self.live_channels.len() + self.series_episodes.len()
    }

    /// Append an accepted entry to its list, returning the assigned id
    pub fn accept(&mut self, entry: PlaylistEntry, kind: ContentKind) -> usize {
        let id = self.next_id();
        let category = entry.extinf.category().to_string();

        let item = ContentItem {
            id,
            image_url: entry.extinf.logo().unwrap_or_default().to_string(),
            description: format!("Group: {}", category),
            title: entry.extinf.title,
            stream_url: entry.stream_url,
            categories: vec![category],
            kind,
        };

        match item.content_type() {
            ContentType::Movie => self.movies.push(item),
            ContentType::Live => self.live_channels.push(item),
            ContentType::Series => self.series_episodes.push(item),
        }

        id
    }

    /// Group the episode buffer into series and produce the catalog
    pub fn finish(self) -> Catalog {
        Catalog {
            movies: self.movies,
            series: group_series(self.series_episodes),
            live_channels: self.live_channels,
        }
    }
}

/// Playlist parser turning playlist text into a `Catalog`
#[derive(Debug, Clone, Default)]
pub struct PlaylistParser {
    filter: ContentFilter,
}

impl PlaylistParser {
    pub fn new(filter: ContentFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &ContentFilter {
        &self.filter
    }

    /// Parse playlist text into a catalog
    pub fn parse(&self, text: &str) -> Catalog {
        self.parse_with_report(text).0
    }

    /// Parse raw playlist bytes (lossy UTF-8, BOM stripped)
    pub fn parse_bytes(&self, bytes: &[u8]) -> Catalog {
        let text: Cow<'_, str> = String::from_utf8_lossy(bytes);
        self.parse(&text)
    }

    /// Parse playlist text, also returning per-parse counters
    pub fn parse_with_report(&self, text: &str) -> (Catalog, ParseReport) {
        let started = Instant::now();
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut report = ParseReport::default();
        let mut assembler = CatalogAssembler::new();

        // Bare '\r' also ends a line; the blank pieces of "\r\n" are skipped
        for event in LineScanner::new(text.split(['\n', '\r'])) {
            match event {
                ScanEvent::Header => report.found_header = true,
                ScanEvent::Malformed => {
                    report.malformed += 1;
                    tracing::debug!("Skipping attribute line without title");
                }
                ScanEvent::OrphanUrl => report.orphan_urls += 1,
                ScanEvent::Entry(entry) => {
                    report.entries_seen += 1;

                    let extinf = &entry.extinf;
                    let kind = ContentClassifier::classify(&Signals {
                        title: &extinf.title,
                        category: extinf.category(),
                        type_hint: extinf.type_hint(),
                        duration: extinf.duration,
                        stream_url: &entry.stream_url,
                    });

                    if let Some(keyword) = self.filter.matched_keyword(&extinf.title, extinf.category()) {
                        tracing::debug!(title = %extinf.title, keyword, "Blocked entry");
                        report.blocked += 1;
                        continue;
                    }

                    assembler.accept(entry, kind);
                    report.accepted += 1;
                }
            }
        }

        if !report.found_header {
            tracing::warn!("Playlist has no #EXTM3U header, parsing anyway");
        }

        let catalog = assembler.finish();
        let stats = catalog.stats();

        tracing::info!(
            movies = stats.movie_count,
            live = stats.live_count,
            series = stats.series_count,
            episodes = stats.episode_count,
            blocked = report.blocked,
            malformed = report.malformed,
            "Parsing complete"
        );

        metrics::record_parse(&report, started.elapsed());

        (catalog, report)
    }
}
