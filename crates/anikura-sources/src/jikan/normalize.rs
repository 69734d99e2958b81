use super::api::RawAnime;
use anikura_models::{script, AnimeRecord, MediaKind};
use chrono::{DateTime, Datelike};
use std::collections::HashSet;

/// Shape one raw catalog row into its canonical record.
///
/// Total: missing fields degrade to documented fallbacks instead of
/// failing. Kind falls back to TV, episodes and score to unknown, the
/// image to the WebP variant and then to empty.
pub fn normalize(raw: &RawAnime) -> AnimeRecord {
    AnimeRecord {
        id: raw.mal_id,
        title: pick_title(raw),
        kind: raw.kind.as_deref().and_then(MediaKind::parse).unwrap_or_default(),
        status: raw.status.clone().unwrap_or_default(),
        year: extract_year(raw),
        episodes: raw.episodes,
        score: raw.score,
        image_url: pick_image(raw),
        url: raw.url.clone().unwrap_or_default(),
        aired: raw
            .aired
            .as_ref()
            .and_then(|a| a.string.clone())
            .unwrap_or_default(),
    }
}

/// First Chinese candidate wins; otherwise the first candidate overall,
/// which the translation coordinator will later pick up.
fn pick_title(raw: &RawAnime) -> String {
    let candidates = title_candidates(raw);
    candidates
        .iter()
        .find(|t| script::is_chinese(t))
        .cloned()
        .or_else(|| candidates.into_iter().next())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Candidate titles in priority order: localized titles list, English,
/// Japanese, primary, synonyms. Deduplicated keeping the first
/// occurrence.
pub(crate) fn title_candidates(raw: &RawAnime) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut push = |candidate: Option<&str>| {
        if let Some(text) = candidate {
            if !text.is_empty() && seen.insert(text.to_string()) {
                out.push(text.to_string());
            }
        }
    };
    for entry in &raw.titles {
        push(entry.title.as_deref());
    }
    push(raw.title_english.as_deref());
    push(raw.title_japanese.as_deref());
    push(raw.title.as_deref());
    for synonym in &raw.title_synonyms {
        push(Some(synonym));
    }
    out
}

/// Year fallback chain: explicit field, structured aired date parts,
/// calendar year parsed from the start-date string. First hit wins;
/// sources are never merged.
fn extract_year(raw: &RawAnime) -> Option<i32> {
    if let Some(year) = raw.year {
        return Some(year);
    }
    let aired = raw.aired.as_ref()?;
    if let Some(year) = aired
        .prop
        .as_ref()
        .and_then(|p| p.from.as_ref())
        .and_then(|f| f.year)
    {
        return Some(year);
    }
    aired
        .from
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.year())
}

fn pick_image(raw: &RawAnime) -> String {
    let images = match &raw.images {
        Some(images) => images,
        None => return String::new(),
    };
    images
        .jpg
        .as_ref()
        .and_then(|set| set.image_url.clone())
        .or_else(|| images.webp.as_ref().and_then(|set| set.image_url.clone()))
        .unwrap_or_default()
}
