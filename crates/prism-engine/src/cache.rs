//! Content-addressed result cache with single-flight computation.
//!
//! Keys combine the schema id and platform with a BLAKE3 digest of the
//! canonical JSON of the schema and options, so any token or component change
//! produces a new key. Completed results live in a bounded LRU. Requests for a
//! key that is already being computed wait on the same `OnceCell` instead of
//! starting a second computation.
//!
//! Only successful computations are stored. A failure is handed to every
//! caller that was waiting on it and then forgotten. A computation whose
//! callers were all dropped releases its key. In both cases the next request
//! for that key starts over.

use crate::error::{EngineError, Result};
use lru::LruCache;
use prism_codegen::{TransformOptions, TransformationResult};
use prism_core::{PlatformId, TokenSchema};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OnceCell;
use tracing::debug;

const KEY_DOMAIN: &[u8] = b"prism:transform:v1";

/// Cache key for one (schema, platform, options) triple.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    schema_id: String,
    platform: PlatformId,
    digest: [u8; 32],
}

impl CacheKey {
    pub fn new(
        schema: &TokenSchema,
        platform: &PlatformId,
        options: &TransformOptions,
    ) -> std::result::Result<Self, serde_json::Error> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(KEY_DOMAIN);
        hasher.update(&[0]);
        hasher.update(platform.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(&serde_json::to_vec(schema)?);
        hasher.update(&[0]);
        hasher.update(&serde_json::to_vec(options)?);
        Ok(Self {
            schema_id: schema.id.clone(),
            platform: platform.clone(),
            digest: *hasher.finalize().as_bytes(),
        })
    }

    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    pub fn platform(&self) -> &PlatformId {
        &self.platform
    }

    pub fn digest_hex(&self) -> String {
        blake3::Hash::from(self.digest).to_hex().to_string()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.digest_hex();
        write!(f, "{}/{}@{}", self.schema_id, self.platform, &hex[..12])
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({})", self)
    }
}

/// Counters since the cache was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Requests that joined a computation already in flight.
    pub coalesced: u64,
    pub evictions: u64,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Hit rate as a fraction (0.0 to 1.0). Coalesced waits count as hits.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.coalesced + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits + self.coalesced) as f64 / total as f64
        }
    }
}

type Outcome = std::result::Result<Arc<TransformationResult>, Arc<EngineError>>;
type Slot = Arc<OnceCell<Outcome>>;

struct CacheState {
    entries: LruCache<CacheKey, Arc<TransformationResult>>,
    in_flight: HashMap<CacheKey, Slot>,
    stats: CacheStats,
}

impl CacheState {
    fn is_registered(&self, key: &CacheKey, slot: &Slot) -> bool {
        self.in_flight
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }
}

/// Bounded LRU of transformation results with single-flight coalescing.
pub struct TransformCache {
    state: Mutex<CacheState>,
}

/// Releases an in-flight slot whose last caller went away before the
/// computation finished.
struct FlightGuard<'a> {
    cache: &'a TransformCache,
    key: CacheKey,
    slot: Slot,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.cache.lock();
        // in_flight plus this guard: nobody else is waiting on the slot.
        let abandoned = !self.slot.initialized() && Arc::strong_count(&self.slot) == 2;
        if abandoned && state.is_registered(&self.key, &self.slot) {
            state.in_flight.remove(&self.key);
            debug!(key = %self.key, "abandoned in-flight transformation");
        }
    }
}

impl TransformCache {
    /// A cache holding at most `capacity` results (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                in_flight: HashMap::new(),
                stats: CacheStats {
                    capacity: capacity.get(),
                    ..Default::default()
                },
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cached result for `key` without touching recency or counters.
    pub fn peek(&self, key: &CacheKey) -> Option<Arc<TransformationResult>> {
        self.lock().entries.peek(key).cloned()
    }

    /// Return the cached result for `key`, or run `compute` once across all
    /// concurrent callers and cache its success.
    ///
    /// Callers that joined a computation share its outcome, failures
    /// included. If the caller running `compute` is dropped, a waiting caller
    /// takes over; if nobody is left waiting, the key is released and the
    /// next request starts a fresh computation.
    pub async fn get_or_compute<F, Fut>(&self, key: CacheKey, compute: F) -> Result<Arc<TransformationResult>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TransformationResult>>,
    {
        let slot = {
            let mut state = self.lock();
            if let Some(hit) = state.entries.get(&key).cloned() {
                state.stats.hits += 1;
                debug!(key = %key, "cache hit");
                return Ok(hit);
            }
            match state.in_flight.get(&key).cloned() {
                Some(slot) => {
                    state.stats.coalesced += 1;
                    debug!(key = %key, "joining in-flight transformation");
                    slot
                }
                None => {
                    state.stats.misses += 1;
                    debug!(key = %key, "cache miss");
                    let slot = Slot::default();
                    state.in_flight.insert(key.clone(), slot.clone());
                    slot
                }
            }
        };
        let guard = FlightGuard {
            cache: self,
            key,
            slot,
        };

        let outcome = guard
            .slot
            .get_or_init(|| async { compute().await.map(Arc::new).map_err(Arc::new) })
            .await
            .clone();

        {
            let mut state = self.lock();
            if state.is_registered(&guard.key, &guard.slot) {
                state.in_flight.remove(&guard.key);
                if let Ok(result) = &outcome {
                    if let Some((evicted, _)) = state.entries.push(guard.key.clone(), result.clone()) {
                        if evicted != guard.key {
                            state.stats.evictions += 1;
                            debug!(key = %evicted, "evicted cached result");
                        }
                    }
                }
            }
            state.stats.size = state.entries.len();
        }
        drop(guard);
        outcome.map_err(EngineError::Shared)
    }

    /// Drop every entry and in-flight slot for `schema_id`. Computations
    /// already running finish for their callers but are not stored.
    pub fn invalidate_schema(&self, schema_id: &str) -> usize {
        let mut state = self.lock();
        let stale: Vec<CacheKey> = state
            .entries
            .iter()
            .filter(|(k, _)| k.schema_id == schema_id)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &stale {
            state.entries.pop(key);
        }
        state.in_flight.retain(|k, _| k.schema_id != schema_id);
        state.stats.size = state.entries.len();
        debug!(schema = schema_id, removed = stale.len(), "invalidated schema");
        stale.len()
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.in_flight.clear();
        state.stats.size = 0;
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of keys with a computation currently running.
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight.len()
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            size: state.entries.len(),
            ..state.stats
        }
    }
}

impl fmt::Debug for TransformCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformCache").field("stats", &self.stats()).finish()
    }
}
