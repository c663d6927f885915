use crate::ephemeris::provider::{EphemerisError, PositionProvider};
use crate::ephemeris::types::{Body, Position};
use crate::time::Instant;
use log::trace;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Memoizes successful lookups of an inner provider.
///
/// Keys are the exact Julian Day bits, so only repeated queries for the same
/// instant hit. Failures are never stored. When the map reaches capacity it is
/// cleared wholesale.
pub struct CachedProvider<P> {
    inner: P,
    capacity: usize,
    entries: RwLock<HashMap<(Body, u64), Position>>,
}

impl<P: PositionProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(inner: P, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P: PositionProvider> PositionProvider for CachedProvider<P> {
    fn position_at(&self, body: Body, instant: Instant) -> Result<Position, EphemerisError> {
        let key = (body, instant.jd.to_bits());
        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(*hit);
        }

        let position = self.inner.position_at(body, instant)?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.len() >= self.capacity {
            trace!("position cache full ({} entries), clearing", entries.len());
            entries.clear();
        }
        entries.insert(key, position);
        Ok(position)
    }

    fn supported_range(&self) -> (f64, f64) {
        self.inner.supported_range()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
