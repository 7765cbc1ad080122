//! Process-wide memoization of room terrain.
//!
//! [`TerrainCache`] asks a [`TerrainSource`] for each room at most once while
//! the resulting matrix is alive. Entries come in three strengths:
//! - **stored**: loaded through [`TerrainCache::load`], dropped by
//!   [`TerrainCache::flush`]
//! - **pinned**: provided through [`TerrainCache::insert`], never dropped
//! - **weak**: every published matrix; after a flush, a matrix that callers
//!   still hold is handed out again instead of being reloaded
//!
//! The cache does no I/O itself. Loads run outside the lock, so two threads
//! missing the same room may both call the source, but only the first
//! published matrix is ever returned.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use thiserror::Error;
use world_core::{
    ErrorSeverity, GridError, RoomCoordinate, TerrainError, TerrainMatrix, TerrainSource,
};

/// Errors surfaced by the terrain cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("terrain cache lock was poisoned")]
    LockPoisoned,

    #[error("failed to load terrain for room {room}")]
    Load {
        room: RoomCoordinate,
        #[source]
        source: TerrainError,
    },
}

impl GridError for CacheError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::LockPoisoned => ErrorSeverity::Internal,
            Self::Load { source, .. } => source.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LockPoisoned => "CACHE_LOCK_POISONED",
            Self::Load { .. } => "CACHE_LOAD_FAILED",
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Lookup counters, monotonically increasing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Loads answered without calling the source.
    pub hits: u64,
    /// Loads that called the source, failed calls included.
    pub misses: u64,
}

#[derive(Default)]
struct Entries {
    stored: HashMap<RoomCoordinate, Arc<TerrainMatrix>>,
    pinned: HashMap<RoomCoordinate, Arc<TerrainMatrix>>,
    weak: HashMap<RoomCoordinate, Weak<TerrainMatrix>>,
}

impl Entries {
    /// Live matrix for `room`, and whether it was only reachable weakly.
    fn find(&self, room: RoomCoordinate) -> Option<(Arc<TerrainMatrix>, bool)> {
        if let Some(terrain) = self.pinned.get(&room).or_else(|| self.stored.get(&room)) {
            return Some((Arc::clone(terrain), false));
        }
        self.weak
            .get(&room)
            .and_then(Weak::upgrade)
            .map(|terrain| (terrain, true))
    }

    fn publish(&mut self, room: RoomCoordinate, terrain: &Arc<TerrainMatrix>) {
        self.stored.insert(room, Arc::clone(terrain));
        self.weak.insert(room, Arc::downgrade(terrain));
    }
}

/// Thread-safe, compute-once terrain cache keyed by room.
pub struct TerrainCache<S> {
    source: S,
    entries: RwLock<Entries>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: TerrainSource> TerrainCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: RwLock::new(Entries::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Terrain of `room`, loading it from the source on first use.
    pub fn load(&self, room: RoomCoordinate) -> Result<Arc<TerrainMatrix>> {
        let found = self
            .entries
            .read()
            .map_err(|_| CacheError::LockPoisoned)?
            .find(room);

        match found {
            Some((terrain, false)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Terrain cache hit: room={}", room);
                Ok(terrain)
            }
            Some((terrain, true)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                self.revive(room, terrain)
            }
            None => self.load_from_source(room),
        }
    }

    /// Stores a weakly reachable matrix again until the next flush.
    fn revive(
        &self,
        room: RoomCoordinate,
        terrain: Arc<TerrainMatrix>,
    ) -> Result<Arc<TerrainMatrix>> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;
        if let Some((current, _)) = entries.find(room) {
            return Ok(current);
        }
        entries.publish(room, &terrain);
        tracing::debug!("Terrain cache revived held matrix: room={}", room);
        Ok(terrain)
    }

    fn load_from_source(&self, room: RoomCoordinate) -> Result<Arc<TerrainMatrix>> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Terrain cache miss: room={}", room);

        let terrain = match self.source.terrain(room) {
            Ok(terrain) => Arc::new(terrain),
            Err(source) => {
                tracing::warn!("Terrain source failed: room={}, error={}", room, source);
                return Err(CacheError::Load { room, source });
            }
        };

        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;
        // Another thread may have published while the source ran.
        if let Some((current, weakly_held)) = entries.find(room) {
            if weakly_held {
                entries.publish(room, &current);
            }
            return Ok(current);
        }
        entries.publish(room, &terrain);
        Ok(terrain)
    }

    /// Pins `terrain` for `room` for the life of the cache, replacing any
    /// earlier entry.
    pub fn insert(
        &self,
        room: RoomCoordinate,
        terrain: TerrainMatrix,
    ) -> Result<Arc<TerrainMatrix>> {
        let terrain = Arc::new(terrain);
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;
        entries.stored.remove(&room);
        entries.pinned.insert(room, Arc::clone(&terrain));
        entries.weak.insert(room, Arc::downgrade(&terrain));
        tracing::debug!("Terrain cache pinned room={}", room);
        Ok(terrain)
    }

    /// Drops every stored matrix; pinned ones stay, and matrices still held
    /// elsewhere remain reachable. Returns how many stored entries were dropped.
    pub fn flush(&self) -> Result<usize> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;
        let dropped = entries.stored.len();
        entries.stored.clear();
        entries.weak.retain(|_, terrain| terrain.strong_count() > 0);

        tracing::info!(
            "Flushed terrain cache: dropped={}, pinned={}, still_held={}",
            dropped,
            entries.pinned.len(),
            entries.weak.len().saturating_sub(entries.pinned.len())
        );
        Ok(dropped)
    }

    /// Number of rooms whose terrain is currently available without the source.
    pub fn len(&self) -> Result<usize> {
        let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned)?;
        Ok(entries
            .weak
            .values()
            .filter(|terrain| terrain.strong_count() > 0)
            .count())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn contains(&self, room: RoomCoordinate) -> Result<bool> {
        let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned)?;
        Ok(entries.find(room).is_some())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
