use crate::library::Library;
use anikura_models::{AnimeRecord, MediaKind};
use std::collections::HashSet;

/// Read-side filter. Absent fields pass everything; `status` compares
/// exactly, `search` is a case-insensitive substring match on the title.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub year: Option<i32>,
    pub kind: Option<MediaKind>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.kind.is_none() && self.status.is_none() && self.search.is_none()
    }

    fn matches(&self, record: &AnimeRecord) -> bool {
        if let Some(year) = self.year {
            if record.year != Some(year) {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if record.kind != kind {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if record.status != *status {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !record.title.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Filter, sort score-descending (unknown score ranks as zero), then
/// drop presentation duplicates: records sharing a trimmed lowercase
/// title and year collapse to the first, highest-scoring one.
pub fn query(library: &Library, filter: &RecordFilter) -> Vec<AnimeRecord> {
    let mut records: Vec<AnimeRecord> = library
        .all()
        .into_iter()
        .filter(|record| filter.matches(record))
        .collect();
    records.sort_by(|a, b| {
        b.score_or_zero()
            .partial_cmp(&a.score_or_zero())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut seen = HashSet::new();
    records.retain(|record| seen.insert(record.dedup_key()));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    fn record(id: u64, title: &str, year: Option<i32>, score: Option<f32>) -> AnimeRecord {
        AnimeRecord {
            id,
            title: title.to_string(),
            kind: MediaKind::Tv,
            status: "Finished Airing".to_string(),
            year,
            episodes: Some(12),
            score,
            image_url: String::new(),
            url: String::new(),
            aired: String::new(),
        }
    }

    fn library_with(records: Vec<AnimeRecord>) -> (tempfile::TempDir, Library) {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::load(Storage::at(dir.path()).unwrap());
        for r in records {
            library.upsert(r).unwrap();
        }
        (dir, library)
    }

    #[test]
    fn empty_filter_returns_everything_sorted_by_score() {
        let (_dir, library) = library_with(vec![
            record(1, "Low", Some(2020), Some(6.1)),
            record(2, "High", Some(2020), Some(9.2)),
            record(3, "Mid", Some(2020), Some(7.7)),
        ]);
        let titles: Vec<String> = query(&library, &RecordFilter::default())
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, ["High", "Mid", "Low"]);
    }

    #[test]
    fn unknown_score_ranks_as_zero() {
        let (_dir, library) = library_with(vec![
            record(1, "Unscored", Some(2020), None),
            record(2, "Scored", Some(2020), Some(0.1)),
        ]);
        let out = query(&library, &RecordFilter::default());
        assert_eq!(out[0].title, "Scored");
        assert_eq!(out[1].title, "Unscored");
    }

    #[test]
    fn year_filter_is_exact_and_excludes_unknown_years() {
        let (_dir, library) = library_with(vec![
            record(1, "A", Some(2013), Some(8.0)),
            record(2, "B", Some(2014), Some(8.0)),
            record(3, "C", None, Some(8.0)),
        ]);
        let filter = RecordFilter {
            year: Some(2013),
            ..Default::default()
        };
        let out = query(&library, &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "A");
    }

    #[test]
    fn kind_status_and_search_filters_compose() {
        let mut movie = record(1, "Your Name", Some(2016), Some(8.9));
        movie.kind = MediaKind::Movie;
        let (_dir, library) = library_with(vec![
            movie,
            record(2, "Your Lie in April", Some(2014), Some(8.7)),
            record(3, "Steins;Gate", Some(2011), Some(9.0)),
        ]);

        let filter = RecordFilter {
            kind: Some(MediaKind::Movie),
            ..Default::default()
        };
        assert_eq!(query(&library, &filter).len(), 1);

        let filter = RecordFilter {
            search: Some("your".to_string()),
            ..Default::default()
        };
        assert_eq!(query(&library, &filter).len(), 2);

        let filter = RecordFilter {
            status: Some("Finished Airing".to_string()),
            ..Default::default()
        };
        assert_eq!(query(&library, &filter).len(), 3);
    }

    #[test]
    fn status_filter_matches_the_stored_casing_exactly() {
        let (_dir, library) = library_with(vec![
            record(1, "Your Lie in April", Some(2014), Some(8.7)),
            record(2, "Steins;Gate", Some(2011), Some(9.0)),
        ]);
        let filter = RecordFilter {
            status: Some("finished airing".to_string()),
            ..Default::default()
        };
        assert!(query(&library, &filter).is_empty());
    }

    #[test]
    fn duplicate_titles_collapse_to_the_highest_scoring_record() {
        // Two distinct ids share a normalized title and year; a third
        // sits between them by score and must survive in order.
        let (_dir, library) = library_with(vec![
            record(1, "Monogatari", Some(2009), Some(9.0)),
            record(2, "Other Show", Some(2009), Some(8.5)),
            record(3, "  monogatari ", Some(2009), Some(8.0)),
        ]);
        let out = query(&library, &RecordFilter::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, 1);
        assert_eq!(out[1].id, 2);
    }

    #[test]
    fn same_title_in_different_years_is_not_a_duplicate() {
        let (_dir, library) = library_with(vec![
            record(1, "Remake", Some(1995), Some(8.0)),
            record(2, "Remake", Some(2021), Some(7.0)),
        ]);
        assert_eq!(query(&library, &RecordFilter::default()).len(), 2);
    }
}
