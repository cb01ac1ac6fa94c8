use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

// ---------------------------------------------------------------------------
// Difficulty – derived label, never user-supplied
// ---------------------------------------------------------------------------

/// Difficulty class of a tutorial, derived from its title and transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Unspecified,
}

/// Keyword rule list evaluated in fixed precedence; the first set with a
/// matching keyword wins, so a title with both "easy" and "advanced" is Easy.
const DIFFICULTY_RULES: &[(&[&str], Difficulty)] = &[
    (
        &["beginner", "easy", "no-sew", "simple", "basic"],
        Difficulty::Easy,
    ),
    (
        &["intermediate", "medium", "project", "practice"],
        Difficulty::Medium,
    ),
    (
        &["advanced", "complex", "expert", "intricate"],
        Difficulty::Hard,
    ),
];

impl Difficulty {
    /// Classify a blob of title + transcript text. Case-insensitive substring
    /// matching; no rule hit means [`Difficulty::Unspecified`].
    pub fn classify(text: &str) -> Difficulty {
        let text = text.to_lowercase();
        for (keywords, label) in DIFFICULTY_RULES {
            if keywords.iter().any(|k| text.contains(k)) {
                return *label;
            }
        }
        Difficulty::Unspecified
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Unspecified => "Unspecified",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "unspecified" => Ok(Difficulty::Unspecified),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// VideoRecord – one row of the catalog
// ---------------------------------------------------------------------------

/// A single video tutorial (one row of the source spreadsheet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub title: String,
    pub thumbnail_url: String,
    pub url: String,
    pub channel: String,
    /// Length in minutes; unparseable source values are coerced to 0.
    pub duration: f64,
    /// Empty when the source has no transcript column.
    pub transcript: String,
    /// Empty when the source has no category column.
    pub category: String,
    pub difficulty: Difficulty,
    pub dominant_rgb: Rgb,
}

// ---------------------------------------------------------------------------
// Catalog – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed catalog with a pre-computed category index. Immutable
/// after load; queries derive new sequences and never touch the records.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// All records, in source order.
    pub records: Vec<VideoRecord>,
    /// Sorted unique non-empty category values.
    pub categories: Vec<String>,
}

impl Catalog {
    /// Build the category index from the loaded records.
    pub fn from_records(records: Vec<VideoRecord>) -> Self {
        let categories_set: BTreeSet<String> = records
            .iter()
            .filter(|r| !r.category.is_empty())
            .map(|r| r.category.clone())
            .collect();
        Catalog {
            records,
            categories: categories_set.into_iter().collect(),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count of records per difficulty, for the stats row (easy, medium,
    /// hard, unspecified).
    pub fn difficulty_counts(&self) -> DifficultyCounts {
        let mut counts = DifficultyCounts::default();
        for rec in &self.records {
            match rec.difficulty {
                Difficulty::Easy => counts.easy += 1,
                Difficulty::Medium => counts.medium += 1,
                Difficulty::Hard => counts.hard += 1,
                Difficulty::Unspecified => counts.unspecified += 1,
            }
        }
        counts
    }
}

/// Per-difficulty record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DifficultyCounts {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
    pub unspecified: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DEFAULT_GRAY;

    fn record(title: &str, category: &str, difficulty: Difficulty) -> VideoRecord {
        VideoRecord {
            title: title.to_string(),
            thumbnail_url: "https://example.com/thumb.jpg".to_string(),
            url: "https://example.com/watch".to_string(),
            channel: "Stitch Lab".to_string(),
            duration: 12.0,
            transcript: String::new(),
            category: category.to_string(),
            difficulty,
            dominant_rgb: DEFAULT_GRAY,
        }
    }

    #[test]
    fn classify_checks_rules_in_precedence_order() {
        assert_eq!(Difficulty::classify("Easy amigurumi"), Difficulty::Easy);
        assert_eq!(
            Difficulty::classify("an INTERMEDIATE stitch"),
            Difficulty::Medium
        );
        assert_eq!(Difficulty::classify("expert tapestry"), Difficulty::Hard);
        assert_eq!(Difficulty::classify("granny square"), Difficulty::Unspecified);
        // "easy" outranks "advanced" because the Easy rule is checked first.
        assert_eq!(
            Difficulty::classify("Easy version of an advanced pattern"),
            Difficulty::Easy
        );
    }

    #[test]
    fn classify_is_case_insensitive_substring() {
        assert_eq!(Difficulty::classify("NO-SEW bunny"), Difficulty::Easy);
        // "basically" contains "basic"; substring semantics are intentional.
        assert_eq!(Difficulty::classify("basically a scarf"), Difficulty::Easy);
    }

    #[test]
    fn category_index_is_sorted_and_deduplicated() {
        let catalog = Catalog::from_records(vec![
            record("a", "tapestry", Difficulty::Easy),
            record("b", "flowers", Difficulty::Medium),
            record("c", "tapestry", Difficulty::Hard),
            record("d", "", Difficulty::Unspecified),
        ]);
        assert_eq!(catalog.categories, vec!["flowers", "tapestry"]);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn difficulty_counts_cover_all_classes() {
        let catalog = Catalog::from_records(vec![
            record("a", "", Difficulty::Easy),
            record("b", "", Difficulty::Easy),
            record("c", "", Difficulty::Hard),
            record("d", "", Difficulty::Unspecified),
        ]);
        let counts = catalog.difficulty_counts();
        assert_eq!(counts.easy, 2);
        assert_eq!(counts.medium, 0);
        assert_eq!(counts.hard, 1);
        assert_eq!(counts.unspecified, 1);
    }
}
