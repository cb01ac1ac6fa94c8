use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, info};

use crate::data::filter::{run_query, ColorMatch, Criteria, DurationBucket, QueryHit, SortKey};
use crate::data::loader::{load_file, LoadError};
use crate::data::model::{Catalog, Difficulty};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// A loaded catalog tagged with its source identity, so repeat opens of an
/// unchanged file reuse the parsed records instead of re-deriving columns.
struct CachedCatalog {
    path: PathBuf,
    modified: Option<SystemTime>,
    catalog: Catalog,
}

/// One user session: the cached catalog, the live filter criteria, and the
/// current query results. Selection state (search text, picked category,
/// color target) lives here as plain criteria fields, independent of any
/// rendering.
#[derive(Default)]
pub struct SessionState {
    cached: Option<CachedCatalog>,
    pub criteria: Criteria,
    /// Hits for the current criteria, refreshed on every mutation.
    pub visible: Vec<QueryHit>,
    /// Load failure message for the presentation layer, if any.
    pub status_message: Option<String>,
}

impl SessionState {
    /// Open a catalog file, reusing the cached parse when the source
    /// identity (path + modification time) is unchanged.
    ///
    /// On failure the session holds no catalog at all: a load error means
    /// "no data, stop", never "zero matches".
    pub fn open(&mut self, path: &Path) -> Result<&Catalog, LoadError> {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();

        let fresh = match &self.cached {
            Some(c) => c.path != path || c.modified != modified,
            None => true,
        };
        if fresh {
            match load_file(path) {
                Ok(catalog) => {
                    self.cached = Some(CachedCatalog {
                        path: path.to_path_buf(),
                        modified,
                        catalog,
                    });
                    self.status_message = None;
                    self.refilter();
                }
                Err(err) => {
                    self.cached = None;
                    self.visible.clear();
                    self.status_message = Some(err.to_string());
                    return Err(err);
                }
            }
            info!("catalog (re)loaded from {}", path.display());
        } else {
            debug!("catalog cache hit for {}", path.display());
        }

        Ok(&self.cached.as_ref().expect("cache populated above").catalog)
    }

    /// The loaded catalog, if any.
    pub fn catalog(&self) -> Option<&Catalog> {
        self.cached.as_ref().map(|c| &c.catalog)
    }

    /// Recompute `visible` after a criteria change.
    pub fn refilter(&mut self) {
        self.visible = match &self.cached {
            Some(c) => run_query(&c.catalog, &self.criteria),
            None => Vec::new(),
        };
    }

    pub fn set_search(&mut self, term: Option<String>) {
        self.criteria.search_term = term.filter(|t| !t.is_empty());
        self.refilter();
    }

    pub fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.criteria.difficulty = difficulty;
        self.refilter();
    }

    pub fn select_category(&mut self, tag: String) {
        self.criteria.category_tag = Some(tag);
        self.refilter();
    }

    pub fn clear_category(&mut self) {
        self.criteria.category_tag = None;
        self.refilter();
    }

    pub fn set_duration(&mut self, bucket: DurationBucket) {
        self.criteria.duration = bucket;
        self.refilter();
    }

    pub fn set_color_match(&mut self, color_match: Option<ColorMatch>) {
        self.criteria.color_match = color_match;
        self.refilter();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.criteria.sort = sort;
        self.refilter();
    }
}
