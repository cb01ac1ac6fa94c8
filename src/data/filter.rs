use super::model::{Catalog, Difficulty, VideoRecord};
use crate::color::{self, Rgb};

// ---------------------------------------------------------------------------
// Criteria – one query's worth of filter and sort settings
// ---------------------------------------------------------------------------

/// Duration buckets. Boundaries are inclusive downward: exactly 15 minutes
/// is Quick, exactly 45 is Medium.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DurationBucket {
    #[default]
    All,
    /// At most 15 minutes.
    Quick,
    /// More than 15, at most 45.
    Medium,
    /// More than 45.
    Long,
}

impl DurationBucket {
    fn matches(self, minutes: f64) -> bool {
        match self {
            DurationBucket::All => true,
            DurationBucket::Quick => minutes <= 15.0,
            DurationBucket::Medium => minutes > 15.0 && minutes <= 45.0,
            DurationBucket::Long => minutes > 45.0,
        }
    }
}

/// Requested result order when no color target is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Preserve catalog order.
    #[default]
    CatalogOrder,
    DurationAsc,
    DurationDesc,
}

/// An active color match: keep records whose dominant color lies strictly
/// within `tolerance` of `target`, ranked nearest-first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatch {
    pub target: Rgb,
    pub tolerance: f64,
}

/// All filter predicates for one query. Each is optional and independent;
/// active predicates are ANDed. Defaults to "match everything, catalog
/// order".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    /// Case-insensitive substring over title or transcript.
    pub search_term: Option<String>,
    /// Exact difficulty; `None` means All.
    pub difficulty: Option<Difficulty>,
    /// Case-insensitive substring over the category column.
    pub category_tag: Option<String>,
    pub duration: DurationBucket,
    /// When set, also overrides `sort` with nearest-color ranking.
    pub color_match: Option<ColorMatch>,
    pub sort: SortKey,
}

// ---------------------------------------------------------------------------
// Query execution
// ---------------------------------------------------------------------------

/// One query result: a catalog index plus, when color matching was active,
/// the computed distance to the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryHit {
    pub index: usize,
    pub color_distance: Option<f64>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches(record: &VideoRecord, criteria: &Criteria) -> bool {
    if let Some(term) = &criteria.search_term {
        if !contains_ci(&record.title, term) && !contains_ci(&record.transcript, term) {
            return false;
        }
    }
    if let Some(level) = criteria.difficulty {
        if record.difficulty != level {
            return false;
        }
    }
    if let Some(tag) = &criteria.category_tag {
        if !contains_ci(&record.category, tag) {
            return false;
        }
    }
    criteria.duration.matches(record.duration)
}

/// Run a query: apply every active predicate, then order the hits.
///
/// Ordering precedence: an active color match ranks by ascending distance
/// (overriding any requested sort key); otherwise the requested duration
/// sort applies; otherwise catalog order is preserved. All sorts are
/// stable, so ties keep catalog order.
///
/// An empty result is an ordinary value; filtering never fails.
pub fn run_query(catalog: &Catalog, criteria: &Criteria) -> Vec<QueryHit> {
    let mut hits: Vec<QueryHit> = catalog
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| matches(rec, criteria))
        .map(|(index, rec)| QueryHit {
            index,
            color_distance: criteria
                .color_match
                .map(|cm| color::distance(rec.dominant_rgb, cm.target)),
        })
        .collect();

    if let Some(cm) = criteria.color_match {
        hits.retain(|hit| hit.color_distance.is_some_and(|d| d < cm.tolerance));
        hits.sort_by(|a, b| {
            a.color_distance
                .partial_cmp(&b.color_distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        return hits;
    }

    match criteria.sort {
        SortKey::CatalogOrder => {}
        SortKey::DurationAsc => hits.sort_by(|a, b| {
            catalog.records[a.index]
                .duration
                .total_cmp(&catalog.records[b.index].duration)
        }),
        SortKey::DurationDesc => hits.sort_by(|a, b| {
            catalog.records[b.index]
                .duration
                .total_cmp(&catalog.records[a.index].duration)
        }),
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DEFAULT_GRAY;

    fn record(title: &str, duration: f64, category: &str, rgb: Rgb) -> VideoRecord {
        VideoRecord {
            title: title.to_string(),
            thumbnail_url: "https://example.com/t.jpg".to_string(),
            url: "https://example.com/v".to_string(),
            channel: "Stitch Lab".to_string(),
            duration,
            transcript: String::new(),
            category: category.to_string(),
            difficulty: Difficulty::classify(title),
            dominant_rgb: rgb,
        }
    }

    /// The worked two-record catalog used throughout.
    fn sample_catalog() -> Catalog {
        Catalog::from_records(vec![
            record("Easy Granny Square", 10.0, "grannysquare", Rgb(255, 0, 0)),
            record("Advanced Tapestry", 60.0, "tapestry", Rgb(0, 0, 255)),
        ])
    }

    fn titles(catalog: &Catalog, hits: &[QueryHit]) -> Vec<String> {
        hits.iter()
            .map(|h| catalog.records[h.index].title.clone())
            .collect()
    }

    #[test]
    fn empty_criteria_keeps_catalog_order() {
        let catalog = sample_catalog();
        let hits = run_query(&catalog, &Criteria::default());
        assert_eq!(
            titles(&catalog, &hits),
            vec!["Easy Granny Square", "Advanced Tapestry"]
        );
        assert!(hits.iter().all(|h| h.color_distance.is_none()));
    }

    #[test]
    fn search_matches_title_or_transcript_case_insensitively() {
        let mut records = vec![
            record("Easy Granny Square", 10.0, "", DEFAULT_GRAY),
            record("Cardigan", 30.0, "", DEFAULT_GRAY),
        ];
        records[1].transcript = "we start with a granny square base".to_string();
        let catalog = Catalog::from_records(records);

        let criteria = Criteria {
            search_term: Some("GRANNY".to_string()),
            ..Criteria::default()
        };
        let hits = run_query(&catalog, &criteria);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn difficulty_and_duration_bucket_combine() {
        let catalog = sample_catalog();
        let criteria = Criteria {
            difficulty: Some(Difficulty::Easy),
            duration: DurationBucket::Quick,
            ..Criteria::default()
        };
        let hits = run_query(&catalog, &criteria);
        assert_eq!(titles(&catalog, &hits), vec!["Easy Granny Square"]);
    }

    #[test]
    fn duration_bucket_boundaries_are_inclusive_downward() {
        let catalog = Catalog::from_records(vec![
            record("At Fifteen", 15.0, "", DEFAULT_GRAY),
            record("At Forty Five", 45.0, "", DEFAULT_GRAY),
        ]);

        let quick = run_query(
            &catalog,
            &Criteria {
                duration: DurationBucket::Quick,
                ..Criteria::default()
            },
        );
        assert_eq!(titles(&catalog, &quick), vec!["At Fifteen"]);

        let medium = run_query(
            &catalog,
            &Criteria {
                duration: DurationBucket::Medium,
                ..Criteria::default()
            },
        );
        assert_eq!(titles(&catalog, &medium), vec!["At Forty Five"]);

        let long = run_query(
            &catalog,
            &Criteria {
                duration: DurationBucket::Long,
                ..Criteria::default()
            },
        );
        assert!(long.is_empty());
    }

    #[test]
    fn category_tag_is_substring_match() {
        let catalog = sample_catalog();
        let criteria = Criteria {
            category_tag: Some("granny".to_string()),
            ..Criteria::default()
        };
        let hits = run_query(&catalog, &criteria);
        assert_eq!(titles(&catalog, &hits), vec!["Easy Granny Square"]);
    }

    #[test]
    fn color_match_filters_by_strict_tolerance_and_ranks_nearest_first() {
        let catalog = sample_catalog();
        let criteria = Criteria {
            color_match: Some(ColorMatch {
                target: Rgb(250, 0, 0),
                tolerance: 20.0,
            }),
            ..Criteria::default()
        };
        let hits = run_query(&catalog, &criteria);
        assert_eq!(titles(&catalog, &hits), vec!["Easy Granny Square"]);
        let d = hits[0].color_distance.expect("distance must be recorded");
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn tolerance_is_strictly_less_than() {
        let catalog = Catalog::from_records(vec![record("Red", 5.0, "", Rgb(10, 0, 0))]);
        // Distance to black is exactly 10; a tolerance of 10 excludes it.
        let at_boundary = Criteria {
            color_match: Some(ColorMatch {
                target: Rgb(0, 0, 0),
                tolerance: 10.0,
            }),
            ..Criteria::default()
        };
        assert!(run_query(&catalog, &at_boundary).is_empty());

        let just_above = Criteria {
            color_match: Some(ColorMatch {
                target: Rgb(0, 0, 0),
                tolerance: 10.01,
            }),
            ..Criteria::default()
        };
        assert_eq!(run_query(&catalog, &just_above).len(), 1);
    }

    #[test]
    fn color_match_overrides_requested_sort() {
        let catalog = Catalog::from_records(vec![
            record("Far But Short", 5.0, "", Rgb(100, 0, 0)),
            record("Near But Long", 90.0, "", Rgb(250, 0, 0)),
        ]);
        let criteria = Criteria {
            color_match: Some(ColorMatch {
                target: Rgb(255, 0, 0),
                tolerance: 400.0,
            }),
            sort: SortKey::DurationAsc,
            ..Criteria::default()
        };
        let hits = run_query(&catalog, &criteria);
        assert_eq!(
            titles(&catalog, &hits),
            vec!["Near But Long", "Far But Short"]
        );
    }

    #[test]
    fn duration_sorts_are_stable() {
        let catalog = Catalog::from_records(vec![
            record("B Side", 20.0, "", DEFAULT_GRAY),
            record("A Side", 20.0, "", DEFAULT_GRAY),
            record("Opener", 5.0, "", DEFAULT_GRAY),
        ]);
        let asc = run_query(
            &catalog,
            &Criteria {
                sort: SortKey::DurationAsc,
                ..Criteria::default()
            },
        );
        assert_eq!(titles(&catalog, &asc), vec!["Opener", "B Side", "A Side"]);

        let desc = run_query(
            &catalog,
            &Criteria {
                sort: SortKey::DurationDesc,
                ..Criteria::default()
            },
        );
        assert_eq!(titles(&catalog, &desc), vec!["B Side", "A Side", "Opener"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let catalog = sample_catalog();
        let criteria = Criteria {
            difficulty: Some(Difficulty::Easy),
            duration: DurationBucket::Quick,
            ..Criteria::default()
        };
        let once = run_query(&catalog, &criteria);

        // Re-run the same query over the result subset.
        let subset = Catalog::from_records(
            once.iter()
                .map(|h| catalog.records[h.index].clone())
                .collect(),
        );
        let twice = run_query(&subset, &criteria);
        assert_eq!(
            titles(&catalog, &once),
            titles(&subset, &twice),
            "filtering its own result set must change nothing"
        );
    }

    #[test]
    fn empty_results_are_ordinary_values() {
        let catalog = sample_catalog();
        let criteria = Criteria {
            search_term: Some("macrame".to_string()),
            ..Criteria::default()
        };
        assert!(run_query(&catalog, &criteria).is_empty());
    }
}
