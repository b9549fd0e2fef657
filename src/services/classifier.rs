use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{ContentKind, ContentType};

lazy_static! {
    // "<name> S<season> E<episode> ..." - anything may follow the episode number
    static ref SERIES_EPISODE_PATTERN: Regex = Regex::new(r"(?i)^(.+?)\s+S(\d+)\s*E(\d+)").unwrap();
}

/// Category keywords that mark on-demand movie content
const MOVIE_CATEGORY_KEYWORDS: &[&str] = &["pelicula", "movie"];

/// Category keywords that mark live channels
const LIVE_CATEGORY_KEYWORDS: &[&str] = &["live", "tv", "vivo", "canales", "noticias"];

/// Stream URL extensions of downloadable files
const VOD_EXTENSIONS: &[&str] = &[".mkv", ".mp4", ".avi"];

/// Explicit `type="..."` attribute on an attribute line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHint {
    Movie,
    Series,
    Live,
    Stream,
    /// Any other non-empty value
    Other,
}

impl TypeHint {
    /// Case-insensitive parse; empty values mean "no hint"
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        let hint = match value.to_lowercase().as_str() {
            "movie" => TypeHint::Movie,
            "series" => TypeHint::Series,
            "live" => TypeHint::Live,
            "stream" => TypeHint::Stream,
            _ => TypeHint::Other,
        };
        Some(hint)
    }
}

/// Everything the classifier looks at for one playlist entry
#[derive(Debug, Clone, Copy)]
pub struct Signals<'a> {
    pub title: &'a str,
    pub category: &'a str,
    pub type_hint: Option<TypeHint>,
    pub duration: i64,
    pub stream_url: &'a str,
}

/// Series name, season and episode captured from a title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeMatch {
    pub series_name: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl From<EpisodeMatch> for ContentKind {
    fn from(m: EpisodeMatch) -> Self {
        ContentKind::Series {
            series_name: Some(m.series_name),
            season: m.season,
            episode: m.episode,
        }
    }
}

/// A base rule: first one that applies decides the type
struct Rule {
    name: &'static str,
    applies: fn(&Signals) -> bool,
    outcome: ContentType,
}

/// A correction applied to the base outcome, in order
struct Override {
    name: &'static str,
    applies: fn(&Signals, ContentType) -> bool,
    outcome: ContentType,
}

const BASE_RULES: &[Rule] = &[
    Rule {
        name: "series-hint",
        applies: series_hint,
        outcome: ContentType::Series,
    },
    Rule {
        name: "live-hint",
        applies: live_hint,
        outcome: ContentType::Live,
    },
    Rule {
        name: "title-pattern",
        applies: unhinted_title_pattern,
        outcome: ContentType::Series,
    },
    Rule {
        name: "unbounded-duration",
        applies: unhinted_unbounded_duration,
        outcome: ContentType::Live,
    },
    Rule {
        name: "live-category",
        applies: unhinted_live_category,
        outcome: ContentType::Live,
    },
];

const DEFAULT_RULE: &str = "default";

const OVERRIDES: &[Override] = &[
    Override {
        name: "file-extension",
        applies: live_with_vod_extension,
        outcome: ContentType::Movie,
    },
    // Must stay last: the title pattern beats every earlier signal
    Override {
        name: "series-pattern",
        applies: title_matches_series,
        outcome: ContentType::Series,
    },
];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

fn has_movie_keyword(category: &str) -> bool {
    contains_any(category, MOVIE_CATEGORY_KEYWORDS)
}

fn series_hint(s: &Signals) -> bool {
    s.type_hint == Some(TypeHint::Series)
}

fn live_hint(s: &Signals) -> bool {
    matches!(s.type_hint, Some(TypeHint::Live) | Some(TypeHint::Stream)) && !has_movie_keyword(s.category)
}

fn unhinted_title_pattern(s: &Signals) -> bool {
    s.type_hint.is_none() && SERIES_EPISODE_PATTERN.is_match(s.title)
}

fn unhinted_unbounded_duration(s: &Signals) -> bool {
    s.type_hint.is_none() && s.duration == -1 && !has_movie_keyword(s.category)
}

fn unhinted_live_category(s: &Signals) -> bool {
    s.type_hint.is_none() && contains_any(s.category, LIVE_CATEGORY_KEYWORDS)
}

fn live_with_vod_extension(s: &Signals, current: ContentType) -> bool {
    if current != ContentType::Live {
        return false;
    }
    let url = s.stream_url.to_lowercase();
    VOD_EXTENSIONS.iter().any(|ext| url.ends_with(ext))
}

fn title_matches_series(s: &Signals, _current: ContentType) -> bool {
    SERIES_EPISODE_PATTERN.is_match(s.title)
}

/// Layered content classifier for playlist entries
pub struct ContentClassifier;

impl ContentClassifier {
    /// Resolve the content kind of one entry
    pub fn classify(signals: &Signals) -> ContentKind {
        let (rule, base) = Self::base_rule(signals);
        let mut content_type = base;

        for o in OVERRIDES {
            if (o.applies)(signals, content_type) {
                if o.outcome != content_type {
                    tracing::trace!(
                        title = signals.title,
                        "override" = o.name,
                        from = %content_type,
                        to = %o.outcome
                    );
                }
                content_type = o.outcome;
            }
        }

        tracing::trace!(title = signals.title, rule, kind = %content_type, "classified");

        match content_type {
            ContentType::Movie => ContentKind::Movie,
            ContentType::Live => ContentKind::Live,
            ContentType::Series => Self::extract_series_info(signals.title)
                .map(ContentKind::from)
                .unwrap_or_else(ContentKind::bare_series),
        }
    }

    /// First base rule that fires, before any override
    pub fn base_rule(signals: &Signals) -> (&'static str, ContentType) {
        BASE_RULES
            .iter()
            .find(|rule| (rule.applies)(signals))
            .map(|rule| (rule.name, rule.outcome))
            .unwrap_or((DEFAULT_RULE, ContentType::Movie))
    }

    /// Extract series name/season/episode from a title like "Show S01E02"
    pub fn extract_series_info(title: &str) -> Option<EpisodeMatch> {
        let caps = SERIES_EPISODE_PATTERN.captures(title)?;
        Some(EpisodeMatch {
            series_name: caps.get(1).map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
            season: caps.get(2).and_then(|m| m.as_str().parse().ok()),
            episode: caps.get(3).and_then(|m| m.as_str().parse().ok()),
        })
    }
}
