use crate::library::Library;
use crate::watched::WatchedSet;
use anikura_models::AnimeRecord;
use std::collections::BTreeMap;

/// Shelf coverage counters. `watched` counts only ids that still exist
/// in the library; stale watched ids are ignored here rather than
/// pruned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShelfStats {
    pub loaded: usize,
    pub watched: usize,
    pub coverage_percent: f64,
}

pub fn shelf_stats(library: &Library, watched: &WatchedSet) -> ShelfStats {
    let loaded = library.len();
    let seen = watched
        .ids()
        .iter()
        .filter(|id| library.contains(**id))
        .count();
    let coverage_percent = if loaded == 0 {
        0.0
    } else {
        seen as f64 / loaded as f64 * 100.0
    };
    ShelfStats {
        loaded,
        watched: seen,
        coverage_percent,
    }
}

/// Watched record count per release year, records with no year omitted.
pub fn watched_per_year(library: &Library, watched: &WatchedSet) -> BTreeMap<i32, usize> {
    let mut per_year = BTreeMap::new();
    for id in watched.ids() {
        if let Some(year) = library.get(id).and_then(|r| r.year) {
            *per_year.entry(year).or_insert(0) += 1;
        }
    }
    per_year
}

/// The year with the most watched records. Ties resolve to the earliest
/// year via the ordered map.
pub fn hot_year(library: &Library, watched: &WatchedSet) -> Option<(i32, usize)> {
    watched_per_year(library, watched)
        .into_iter()
        .fold(None, |best, (year, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((year, count)),
        })
}

/// Per-year top titles for the export table: one row per year from
/// `end` down to `start`, each holding at most `max_cols` records,
/// score-descending. Years with no records still get an empty row.
pub fn year_table(
    library: &Library,
    start: i32,
    end: i32,
    max_cols: usize,
) -> Vec<(i32, Vec<AnimeRecord>)> {
    let mut by_year: BTreeMap<i32, Vec<AnimeRecord>> = BTreeMap::new();
    for record in library.all() {
        if let Some(year) = record.year {
            if (start..=end).contains(&year) {
                by_year.entry(year).or_default().push(record);
            }
        }
    }

    (start..=end)
        .rev()
        .map(|year| {
            let mut records = by_year.remove(&year).unwrap_or_default();
            records.sort_by(|a, b| {
                b.score_or_zero()
                    .partial_cmp(&a.score_or_zero())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            records.truncate(max_cols);
            (year, records)
        })
        .collect()
}
