use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One normalized catalog entry, keyed by its MAL id.
///
/// A later upsert for the same id replaces every attribute. The title
/// alone may additionally be patched out-of-band once a translation
/// resolves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimeRecord {
    pub id: u64,
    pub title: String,
    pub kind: MediaKind,
    pub status: String,
    pub year: Option<i32>,
    /// None means the catalog does not know the episode count yet.
    pub episodes: Option<u32>,
    /// None means unrated; ordering treats it as zero.
    pub score: Option<f32>,
    pub image_url: String,
    pub url: String,
    /// Human-readable air-date text as the catalog renders it.
    pub aired: String,
}

impl AnimeRecord {
    pub fn score_or_zero(&self) -> f32 {
        self.score.unwrap_or(0.0)
    }

    /// Presentation dedup key: lowercased trimmed title plus year.
    pub fn dedup_key(&self) -> (String, Option<i32>) {
        (self.title.trim().to_lowercase(), self.year)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaKind {
    #[serde(rename = "TV")]
    Tv,
    Movie,
    #[serde(rename = "OVA")]
    Ova,
    #[serde(rename = "ONA")]
    Ona,
    Special,
    Music,
}

impl MediaKind {
    /// Parse a catalog-native kind string; unknown spellings map to None
    /// so callers can choose the fallback.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tv" => Some(MediaKind::Tv),
            "movie" => Some(MediaKind::Movie),
            "ova" => Some(MediaKind::Ova),
            "ona" => Some(MediaKind::Ona),
            "special" | "tv special" => Some(MediaKind::Special),
            "music" => Some(MediaKind::Music),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Tv => "TV",
            MediaKind::Movie => "Movie",
            MediaKind::Ova => "OVA",
            MediaKind::Ona => "ONA",
            MediaKind::Special => "Special",
            MediaKind::Music => "Music",
        }
    }
}

impl Default for MediaKind {
    fn default() -> Self {
        MediaKind::Tv
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaKind::parse(s).ok_or_else(|| {
            format!("unknown media kind '{}'; expected TV, Movie, OVA, ONA, Special, or Music", s)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parse_is_case_insensitive() {
        assert_eq!(MediaKind::parse("tv"), Some(MediaKind::Tv));
        assert_eq!(MediaKind::parse("OVA"), Some(MediaKind::Ova));
        assert_eq!(MediaKind::parse("TV Special"), Some(MediaKind::Special));
        assert_eq!(MediaKind::parse("CM"), None);
    }

    #[test]
    fn kind_defaults_to_tv() {
        assert_eq!(MediaKind::default(), MediaKind::Tv);
    }

    #[test]
    fn dedup_key_normalizes_title() {
        let record = AnimeRecord {
            id: 1,
            title: "  Cowboy Bebop ".to_string(),
            kind: MediaKind::Tv,
            status: String::new(),
            year: Some(1998),
            episodes: Some(26),
            score: Some(8.7),
            image_url: String::new(),
            url: String::new(),
            aired: String::new(),
        };
        assert_eq!(record.dedup_key(), ("cowboy bebop".to_string(), Some(1998)));
    }

    #[test]
    fn missing_score_ranks_as_zero() {
        let record = AnimeRecord {
            id: 2,
            title: "x".to_string(),
            kind: MediaKind::Tv,
            status: String::new(),
            year: None,
            episodes: None,
            score: None,
            image_url: String::new(),
            url: String::new(),
            aired: String::new(),
        };
        assert_eq!(record.score_or_zero(), 0.0);
    }
}
