use std::collections::{BTreeMap, HashMap};

use crate::models::{ContentItem, Series};

const DEFAULT_CATEGORY: &str = "Uncategorized";
const DEFAULT_SEASON: u32 = 1;

/// Episodes accumulated for one series name, in buffer order
#[derive(Debug)]
struct SeriesAccumulator {
    name: String,
    episodes: Vec<ContentItem>,
}

/// Group accepted series episodes into `Series`, keeping first-seen order
pub fn group_series(episodes: Vec<ContentItem>) -> Vec<Series> {
    let mut order: Vec<SeriesAccumulator> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for episode in episodes {
        // Explicit "series" hints without a title pattern carry no series name
        let key = episode
            .series_name()
            .map(str::to_string)
            .unwrap_or_else(|| episode.title.clone());

        match index.get(&key) {
            Some(&pos) => order[pos].episodes.push(episode),
            None => {
                index.insert(key.clone(), order.len());
                order.push(SeriesAccumulator {
                    name: key,
                    episodes: vec![episode],
                });
            }
        }
    }

    order.into_iter().map(build_series).collect()
}

fn build_series(accum: SeriesAccumulator) -> Series {
    let cover_image_url = accum
        .episodes
        .iter()
        .find(|e| !e.image_url.is_empty())
        .map(|e| e.image_url.clone())
        .unwrap_or_default();

    let category = dominant_category(&accum.episodes);

    let mut seasons: BTreeMap<u32, Vec<ContentItem>> = BTreeMap::new();
    for episode in accum.episodes {
        seasons
            .entry(episode.season().unwrap_or(DEFAULT_SEASON))
            .or_default()
            .push(episode);
    }

    Series {
        name: accum.name,
        cover_image_url,
        category,
        seasons,
    }
}

/// Most common first category; ties go to the one seen first
fn dominant_category(episodes: &[ContentItem]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for episode in episodes {
        let category = episode.primary_category().unwrap_or(DEFAULT_CATEGORY);
        match counts.iter_mut().find(|(c, _)| *c == category) {
            Some((_, n)) => *n += 1,
            None => counts.push((category, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (category, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((category, n));
        }
    }

    best.map(|(c, _)| c).unwrap_or(DEFAULT_CATEGORY).to_string()
}
