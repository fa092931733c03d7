//! Layout cache in normalized coordinates.
//!
//! The canonical presentation computes the two-level layout at its own size and
//! stores every rectangle as fractions: sectors relative to the canvas, items
//! relative to their sector's region. Any other presentation rescales those
//! fractions to its own size instead of re-running the packer, so a small
//! overview always shows the same tiling as the large view.
//!
//! # Consistency
//!
//! Writers build a complete [`CacheSnapshot`] and swap it in under the write
//! lock. Readers clone the current `Arc` and never see a sector map from one
//! computation next to item maps from another.
//!
//! # Invalidation
//!
//! Geometry is tied to the item set's structure stamp. Membership or sector
//! changes invalidate it; weight and change updates do not (geometry only moves
//! when the canonical presentation recomputes). A snapshot is only reused for a
//! set whose every sector it has an entry for.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use compact_str::CompactString;

use crate::model::ItemSet;

use super::compose::{compose, TreemapLayout};
use super::{LayoutConfig, Rect};

/// Address of one cached rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Sector(CompactString),
    Item {
        sector: CompactString,
        ticker: CompactString,
    },
}

impl CacheKey {
    pub fn sector(name: &str) -> Self {
        CacheKey::Sector(CompactString::new(name))
    }

    pub fn item(sector: &str, ticker: &str) -> Self {
        CacheKey::Item {
            sector: CompactString::new(sector),
            ticker: CompactString::new(ticker),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedItem {
    pub ticker: CompactString,
    /// Fractions of the owning sector's width/height
    pub fraction: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedSector {
    pub name: CompactString,
    /// Fractions of the canvas width/height
    pub fraction: Rect,
    pub items: Vec<CachedItem>,
}

impl CachedSector {
    pub fn item(&self, ticker: &str) -> Option<&CachedItem> {
        self.items.iter().find(|i| i.ticker == ticker)
    }
}

/// An immutable view of the cache as published by one write.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    generation: u64,
    structure: Option<u64>,
    canvas: Option<(f64, f64)>,
    sectors: Vec<CachedSector>,
    index: HashMap<CompactString, usize>,
}

impl CacheSnapshot {
    /// Number of writes (including invalidations) before this snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Structure version of the item set this geometry was computed for.
    pub fn structure(&self) -> Option<u64> {
        self.structure
    }

    /// Canvas size of the computation that produced this snapshot.
    pub fn canvas(&self) -> Option<(f64, f64)> {
        self.canvas
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Sectors in the order of the latest computation.
    pub fn sectors(&self) -> &[CachedSector] {
        &self.sectors
    }

    pub fn sector(&self, name: &str) -> Option<&CachedSector> {
        self.index.get(name).map(|&i| &self.sectors[i])
    }

    /// Whether this geometry can be reused for `set` as it is now.
    pub fn is_current_for(&self, set: &ItemSet) -> bool {
        !self.is_empty()
            && self.structure == Some(set.structure_version())
            && set.iter().all(|item| self.index.contains_key(item.sector.as_str()))
    }

    pub fn fraction(&self, key: &CacheKey) -> Option<Rect> {
        match key {
            CacheKey::Sector(name) => self.sector(name).map(|s| s.fraction),
            CacheKey::Item { sector, ticker } => self
                .sector(sector)
                .and_then(|s| s.item(ticker))
                .map(|i| i.fraction),
        }
    }

    /// Scale a cached entry onto a `width` x `height` region.
    pub fn rescale(&self, key: &CacheKey, width: f64, height: f64) -> Option<Rect> {
        self.fraction(key).map(|f| f.scale(width, height))
    }

    /// Empty snapshot that supersedes this one.
    fn cleared(&self) -> Self {
        Self {
            generation: self.generation + 1,
            ..Self::default()
        }
    }

    fn push(&mut self, sector: CachedSector) {
        self.index.insert(sector.name.clone(), self.sectors.len());
        self.sectors.push(sector);
    }

    /// Snapshot for a fresh computation, in its order. Entries of `previous`
    /// the computation did not produce are carried over after the fresh ones.
    fn rebuild(
        generation: u64,
        structure: u64,
        canvas: (f64, f64),
        fresh: Vec<CachedSector>,
        previous: Option<&CacheSnapshot>,
    ) -> Self {
        let mut next = Self {
            generation,
            structure: Some(structure),
            canvas: Some(canvas),
            sectors: Vec::with_capacity(fresh.len()),
            index: HashMap::with_capacity(fresh.len()),
        };

        for mut sector in fresh {
            if let Some(prior) = previous.and_then(|p| p.sector(&sector.name)) {
                let carried: Vec<CachedItem> = prior
                    .items
                    .iter()
                    .filter(|cached| sector.item(&cached.ticker).is_none())
                    .cloned()
                    .collect();
                sector.items.extend(carried);
            }
            next.push(sector);
        }

        for prior in previous.map(|p| p.sectors.as_slice()).unwrap_or_default() {
            if !next.index.contains_key(prior.name.as_str()) {
                next.push(prior.clone());
            }
        }

        next
    }
}

/// Shared normalized layout cache. Share it between presentations with `Arc`.
#[derive(Debug, Default)]
pub struct LayoutCache {
    config: LayoutConfig,
    current: RwLock<Arc<CacheSnapshot>>,
}

impl LayoutCache {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            current: RwLock::new(Arc::new(CacheSnapshot::default())),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<CacheSnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Compute the layout of `set` at `width` x `height` and publish it as
    /// fractions, in this computation's order. Under an unchanged structure
    /// stamp, entries this computation did not produce are kept; a snapshot for
    /// a different stamp is discarded.
    ///
    /// A zero-sized canvas is laid out but not cached.
    pub fn compute_and_cache<'a>(&self, set: &'a ItemSet, width: f64, height: f64) -> TreemapLayout<'a> {
        let layout = compose(set, width, height, &self.config);
        if width <= 0.0 || height <= 0.0 {
            tracing::debug!(
                "Not caching layout for empty {:.0}x{:.0} canvas",
                width,
                height
            );
            return layout;
        }

        let fresh: Vec<CachedSector> = layout
            .sectors
            .iter()
            .map(|sector| CachedSector {
                name: CompactString::new(sector.sector.name),
                fraction: sector.rect.to_fraction(width, height),
                items: sector
                    .items
                    .iter()
                    .map(|p| CachedItem {
                        ticker: p.data.ticker.clone(),
                        fraction: p.rect.to_fraction(sector.rect.w, sector.rect.h),
                    })
                    .collect(),
            })
            .collect();

        let structure = set.structure_version();
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous = (guard.structure == Some(structure)).then_some(&**guard);
        let next = CacheSnapshot::rebuild(
            guard.generation + 1,
            structure,
            (width, height),
            fresh,
            previous,
        );

        tracing::info!(
            "Cached layout for {} sectors / {} items at {:.0}x{:.0} (generation {})",
            layout.sectors.len(),
            layout.item_count(),
            width,
            height,
            next.generation
        );

        *guard = Arc::new(next);
        layout
    }

    /// Rescale one cached entry. `None` when nothing is cached under `key`.
    pub fn rescale(&self, key: &CacheKey, width: f64, height: f64) -> Option<Rect> {
        self.snapshot().rescale(key, width, height)
    }

    /// Drop all cached geometry.
    pub fn invalidate(&self) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if guard.is_empty() && guard.structure.is_none() {
            return;
        }
        tracing::debug!("Invalidating layout cache (generation {})", guard.generation);
        let cleared = guard.cleared();
        *guard = Arc::new(cleared);
    }

    /// Invalidate if the cache was computed for a different structure stamp.
    /// Returns whether anything was dropped.
    pub fn sync_structure(&self, structure: u64) -> bool {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        match guard.structure {
            Some(version) if version != structure => {
                tracing::debug!(
                    "Structure changed, invalidating layout cache (generation {})",
                    guard.generation
                );
                let cleared = guard.cleared();
                *guard = Arc::new(cleared);
                true
            }
            _ => false,
        }
    }

    /// Make sure geometry for `set` exists, computing it at the configured
    /// canonical size if needed. Returns whether a computation ran.
    pub fn prime(&self, set: &ItemSet) -> bool {
        self.sync_structure(set.structure_version());
        if self.snapshot().is_current_for(set) {
            return false;
        }
        let (w, h) = (self.config.canonical_width, self.config.canonical_height);
        tracing::debug!("Priming layout cache at canonical {:.0}x{:.0}", w, h);
        self.compute_and_cache(set, w, h);
        true
    }
}
