use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use agf_core::Adventure;
use agf_dsl::ParseError;

/// The shared, read-mostly collection of compiled adventures.
///
/// Names are case-folded so the same adventure saved under different casing
/// maps to one entry; insertion order is preserved for listings. Reads take a
/// shared lock and `upsert` the exclusive lock. Sessions clone the
/// `Arc<Adventure>` at start time, so a later upsert replaces the entry
/// without a running session ever observing the swap.
#[derive(Debug, Default)]
pub struct Catalog {
    inner: RwLock<CatalogInner>,
}

#[derive(Debug, Default)]
struct CatalogInner {
    entries: HashMap<String, Arc<Adventure>>,
    order: Vec<String>,
}

/// A successful upsert: the compiled adventure plus its canonical bytes.
///
/// Persisting `canonical` is the caller's job — the catalog itself does no
/// I/O on upsert.
#[derive(Debug, Clone)]
pub struct Upserted {
    /// The normalized catalog name.
    pub name: String,
    /// The compiled adventure now in the catalog.
    pub adventure: Arc<Adventure>,
    /// Canonical AGF text for persistence.
    pub canonical: String,
}

/// Outcome of loading a directory of adventure files.
#[derive(Debug, Default)]
pub struct LoadSummary {
    /// Names loaded successfully, in catalog order.
    pub loaded: Vec<String>,
    /// Files skipped because they failed to parse, with the cause.
    pub skipped: Vec<(String, ParseError)>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source` and store the result under the case-folded `name`,
    /// replacing any existing entry (later upload wins).
    ///
    /// On a parse failure the catalog is left unchanged and the error is
    /// returned verbatim.
    pub fn upsert(&self, name: &str, source: &str) -> Result<Upserted, ParseError> {
        let adventure = Arc::new(agf_dsl::parse(source)?);
        let canonical = agf_dsl::serialize(&adventure);
        let name = name.to_lowercase();

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner
            .entries
            .insert(name.clone(), Arc::clone(&adventure))
            .is_none()
        {
            inner.order.push(name.clone());
        }
        tracing::info!(name = %name, title = %adventure.title(), "adventure upserted");
        Ok(Upserted {
            name,
            adventure,
            canonical,
        })
    }

    /// Look up an adventure by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<Arc<Adventure>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .get(&name.to_lowercase())
            .cloned()
    }

    /// `(name, title)` pairs in insertion order.
    pub fn list(&self) -> Vec<(String, String)> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .order
            .iter()
            .filter_map(|name| {
                inner
                    .entries
                    .get(name)
                    .map(|a| (name.clone(), a.title().to_string()))
            })
            .collect()
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Whether the catalog holds no adventures.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load every `*.agf` file in `dir`, in lexicographic order.
    ///
    /// A file that fails to parse is logged and reported in the summary
    /// rather than aborting the whole load. A missing directory is treated as
    /// an empty catalog; creating it for future saves is the caller's
    /// concern.
    pub fn load_dir(&self, dir: &Path) -> LoadSummary {
        let mut summary = LoadSummary::default();

        let Ok(entries) = std::fs::read_dir(dir) else {
            tracing::debug!(dir = %dir.display(), "adventure directory missing, starting empty");
            return summary;
        };

        let mut files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "agf"))
            .collect();
        files.sort();

        for path in files {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot read adventure file");
                    continue;
                }
            };
            match self.upsert(&name, &source) {
                Ok(upserted) => summary.loaded.push(upserted.name),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping adventure that failed to parse");
                    summary.skipped.push((name, e));
                }
            }
        }

        summary
    }
}
