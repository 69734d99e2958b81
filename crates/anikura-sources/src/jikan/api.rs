//! Wire types for the Jikan v4 anime search endpoint. Only the fields
//! the normalizer consumes are modeled; everything else is ignored.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct PageEnvelope {
    #[serde(default)]
    pub data: Vec<RawAnime>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAnime {
    pub mal_id: u64,
    pub title: Option<String>,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    #[serde(default)]
    pub titles: Vec<RawTitle>,
    #[serde(default)]
    pub title_synonyms: Vec<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub episodes: Option<u32>,
    pub score: Option<f32>,
    pub year: Option<i32>,
    pub aired: Option<RawAired>,
    pub images: Option<RawImages>,
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTitle {
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAired {
    /// RFC 3339 start date, e.g. "1998-04-03T00:00:00+00:00".
    pub from: Option<String>,
    /// Human-readable range, e.g. "Apr 3, 1998 to Apr 24, 1999".
    pub string: Option<String>,
    pub prop: Option<RawAiredProp>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAiredProp {
    pub from: Option<RawDateParts>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawDateParts {
    pub year: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawImages {
    pub jpg: Option<RawImageSet>,
    pub webp: Option<RawImageSet>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawImageSet {
    pub image_url: Option<String>,
}
