//! Host-owned cache of built gradient tables.
//!
//! Tables are expensive to build and immutable once built, so the host
//! constructs one [`StyleCache`] at startup and passes it by reference
//! into resolution and encoding calls. Tables are built lazily from
//! their persisted definitions and rebuilt only when a definition is
//! replaced.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use epithet_style::{GradientDef, GradientError, GradientTable};

/// Gradient definitions plus the tables built from them, keyed by
/// definition id.
#[derive(Debug, Default)]
pub struct StyleCache {
    defs: FxHashMap<u64, GradientDef>,
    built: FxHashMap<u64, GradientTable>,
}

impl StyleCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache seeded with persisted definitions.
    #[must_use]
    pub fn with_defs(defs: impl IntoIterator<Item = GradientDef>) -> Self {
        let mut cache = Self::new();
        for def in defs {
            cache.insert_def(def);
        }
        cache
    }

    /// Insert or replace a definition, dropping any table built from the
    /// previous version.
    pub fn insert_def(&mut self, def: GradientDef) {
        self.built.remove(&def.id);
        self.defs.insert(def.id, def);
    }

    /// Remove a definition and its built table.
    pub fn remove_def(&mut self, id: u64) -> Option<GradientDef> {
        self.built.remove(&id);
        self.defs.remove(&id)
    }

    /// The stored definition for `id`, if any.
    #[must_use]
    pub fn def(&self, id: u64) -> Option<&GradientDef> {
        self.defs.get(&id)
    }

    /// Number of stored definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether no definitions are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// The built table for `id`, building it on first use.
    ///
    /// `Ok(None)` means no definition with that id exists. A build
    /// failure is returned to be surfaced at the editor; callers on the
    /// rendering path treat it like a missing table.
    pub fn get_or_build(&mut self, id: u64) -> Result<Option<&GradientTable>, GradientError> {
        if !self.built.contains_key(&id) {
            let Some(def) = self.defs.get(&id) else {
                return Ok(None);
            };
            let table = def.build().inspect_err(|err| {
                warn!(id, %err, "gradient table build failed");
            })?;
            debug!(id, len = table.len(), "gradient table built");
            self.built.insert(id, table);
        }
        Ok(self.built.get(&id))
    }
}
