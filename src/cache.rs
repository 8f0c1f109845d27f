//! Per-run render cache.
//!
//! Several catalog slots share a pixel size (`40x40@3x` and `60x60@2x` are
//! both 120×120; every idiom with a 1024pt slot renders 1024×1024). The
//! cache makes sure each distinct [`PixelSize`] is drawn and encoded exactly
//! once per generation run.
//!
//! # Design
//!
//! The key is the structured `(width, height)` pair, never a formatted
//! string. A cache is created at the start of a run and dropped at the end;
//! there is no eviction and no reuse across runs.
//!
//! ## Preview handles
//!
//! Every cached asset carries a [`PreviewHandle`], a short-lived `preview:N`
//! reference the CLI shows next to each generated file. Handles are issued by
//! a [`PreviewRegistry`] and revoked when dropped. Because the cache owns
//! them, dropping the cache (on success, error, or unwind) revokes every
//! handle of the run.

use crate::targets::PixelSize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: AtomicU64,
    live: Mutex<HashSet<u64>>,
}

/// Issues and tracks preview handles.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<RegistryInner>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> PreviewHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.lock_live().insert(id);
        PreviewHandle {
            id,
            registry: self.clone(),
        }
    }

    /// Number of handles not yet revoked.
    pub fn live_count(&self) -> usize {
        self.lock_live().len()
    }

    #[cfg(test)]
    pub fn is_live(&self, id: u64) -> bool {
        self.lock_live().contains(&id)
    }

    fn revoke(&self, id: u64) {
        self.lock_live().remove(&id);
    }

    fn lock_live(&self) -> std::sync::MutexGuard<'_, HashSet<u64>> {
        // A poisoned set is still a valid set of ids.
        self.inner
            .live
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Revocable reference to a rendered asset. Revoked on drop.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn uri(&self) -> String {
        format!("preview:{}", self.id)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.revoke(self.id);
    }
}

/// One encoded image held by the cache.
#[derive(Debug)]
pub struct RenderedAsset {
    pub size: PixelSize,
    pub png: Vec<u8>,
    pub preview: PreviewHandle,
}

/// Summary of cache performance for a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} rendered, {} reused ({} total)",
                self.misses,
                self.hits,
                self.total()
            )
        } else {
            write!(f, "{} rendered", self.misses)
        }
    }
}

/// Render cache for one generation run.
#[derive(Debug)]
pub struct RenderCache {
    entries: HashMap<PixelSize, RenderedAsset>,
    previews: PreviewRegistry,
    stats: CacheStats,
}

impl RenderCache {
    pub fn new(previews: PreviewRegistry) -> Self {
        Self {
            entries: HashMap::new(),
            previews,
            stats: CacheStats::default(),
        }
    }

    /// Return the asset for `size`, calling `render` only on a miss.
    ///
    /// The returned flag is `true` when the asset came from the cache.
    /// A failed render leaves the cache unchanged.
    pub fn get_or_render<E>(
        &mut self,
        size: PixelSize,
        render: impl FnOnce() -> Result<Vec<u8>, E>,
    ) -> Result<(&RenderedAsset, bool), E> {
        let hit = self.entries.contains_key(&size);
        if hit {
            self.stats.hit();
        } else {
            let png = render()?;
            self.stats.miss();
            let asset = RenderedAsset {
                size,
                png,
                preview: self.previews.issue(),
            };
            self.entries.insert(size, asset);
        }
        // Present in both branches.
        let asset = &self.entries[&size];
        Ok((asset, hit))
    }

    #[cfg(test)]
    pub fn get(&self, size: PixelSize) -> Option<&RenderedAsset> {
        self.entries.get(&size)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
