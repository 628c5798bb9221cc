//! Shared cache of resolved CMap resources.
//!
//! A [`ResourceCache`] owns one [`ResourceLoader`] and resolves each
//! resource name at most once per successful load. Resolved maps are
//! immutable and handed out as `Arc`s, so every encoding that names the
//! same resource reads the same map.
//!
//! Each name gets its own slot in a concurrent map. A published map is read
//! from the slot without locking. The slot's lock is only taken before
//! publication and held for the duration of a load, so concurrent requests
//! for the same name wait for the first one and observe its result, while
//! requests for other names proceed in parallel.

use std::fmt;
use std::sync::{Arc, OnceLock};

use cidmap_core::{CMapError, CidCodeMap, CidUnicodeMap, Result, is_identity_cmap};
use cidmap_parse::{FsResourceLoader, LoaderOptions, ResourceKind, ResourceLoader};
use dashmap::DashMap;
use parking_lot::Mutex;

/// Load state of one cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// The name was never requested.
    NotStarted,
    /// A load is in progress.
    Loading,
    /// A map is published and shared.
    Ready,
    /// The last load failed. The next request retries.
    Failed,
}

struct Slot<T> {
    /// Set once by the load that succeeds; read without locking.
    published: OnceLock<Arc<T>>,
    /// Held for the duration of a load. `true` after a failed one.
    load: Mutex<bool>,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Self {
            published: OnceLock::new(),
            load: Mutex::new(false),
        }
    }
}

/// Slots for one resource kind.
struct Keyspace<T> {
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    kind: ResourceKind,
    slots: DashMap<String, Arc<Slot<T>>>,
}

impl<T> Keyspace<T> {
    fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            slots: DashMap::new(),
        }
    }

    fn get_or_load<F>(&self, name: &str, load: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        if is_identity_cmap(name) {
            return Err(CMapError::IdentityResource(name.to_string()));
        }

        if let Some(map) = self
            .slots
            .get(name)
            .and_then(|entry| entry.value().published.get().cloned())
        {
            return Ok(map);
        }

        // Clone the slot out so the map shard is not held while loading.
        let slot = Arc::clone(
            self.slots
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Slot::new()))
                .value(),
        );

        let mut failed = slot.load.lock();
        // Another caller may have published while this one waited.
        if let Some(map) = slot.published.get() {
            return Ok(Arc::clone(map));
        }
        #[cfg(feature = "tracing")]
        {
            if *failed {
                tracing::debug!(kind = %self.kind, name, "retrying CMap resource after failed load");
            } else {
                tracing::debug!(kind = %self.kind, name, "loading CMap resource");
            }
        }

        match load() {
            Ok(value) => {
                *failed = false;
                Ok(Arc::clone(slot.published.get_or_init(|| Arc::new(value))))
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(kind = %self.kind, name, error = %err, "CMap resource load failed");
                *failed = true;
                Err(err)
            }
        }
    }

    fn load_state(&self, name: &str) -> LoadState {
        let Some(slot) = self.slots.get(name).map(|entry| Arc::clone(entry.value())) else {
            return LoadState::NotStarted;
        };
        if slot.published.get().is_some() {
            return LoadState::Ready;
        }
        // Before publication the lock is only held by a load in progress.
        match slot.load.try_lock() {
            None => LoadState::Loading,
            Some(failed) if *failed => LoadState::Failed,
            Some(_) => LoadState::NotStarted,
        }
    }

    fn ready_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.value().published.get().is_some())
            .count()
    }
}

/// Cache of CID → code and CID → Unicode maps, keyed by resource name.
///
/// The two kinds have disjoint keyspaces. Entries are never evicted. A
/// failed load is not cached; the next request for that name calls the
/// loader again.
///
/// The cache is `Send + Sync` and meant to be shared (by reference or in an
/// `Arc`) by everything that builds [`CMapEncoding`](crate::CMapEncoding)s.
pub struct ResourceCache {
    loader: Arc<dyn ResourceLoader>,
    code_maps: Keyspace<CidCodeMap>,
    unicode_maps: Keyspace<CidUnicodeMap>,
}

impl ResourceCache {
    /// Create an empty cache that loads through `loader`.
    pub fn new(loader: impl ResourceLoader + 'static) -> Self {
        Self::from_shared(Arc::new(loader))
    }

    /// Create an empty cache around an already shared loader.
    pub fn from_shared(loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            loader,
            code_maps: Keyspace::new(ResourceKind::CidToCode),
            unicode_maps: Keyspace::new(ResourceKind::CidToUnicode),
        }
    }

    /// Create an empty cache that reads CMap files per `options`.
    pub fn with_options(options: LoaderOptions) -> Self {
        Self::new(FsResourceLoader::new(options))
    }

    /// The loader this cache resolves names through.
    pub fn loader(&self) -> &Arc<dyn ResourceLoader> {
        &self.loader
    }

    /// Resolve the CID → code map for the character-collection CMap `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CMapError::IdentityResource`] for `Identity-H`/`Identity-V`,
    /// which never reach the loader, and the loader's failure
    /// ([`CMapError::ResourceNotFound`], [`CMapError::MalformedResource`],
    /// ...) otherwise.
    pub fn cid_to_code(&self, name: &str) -> Result<Arc<CidCodeMap>> {
        self.code_maps.get_or_load(name, || {
            self.loader
                .load_cid_to_code(name)
                .map(CidCodeMap::from_table)
                .map_err(|e| e.into_cmap_error(name))
        })
    }

    /// Resolve the CID → Unicode map for the Unicode CMap `name`.
    ///
    /// # Errors
    ///
    /// Same as [`ResourceCache::cid_to_code`].
    pub fn cid_to_unicode(&self, name: &str) -> Result<Arc<CidUnicodeMap>> {
        self.unicode_maps.get_or_load(name, || {
            self.loader
                .load_cid_to_unicode(name)
                .map(CidUnicodeMap::from_table)
                .map_err(|e| e.into_cmap_error(name))
        })
    }

    /// Current load state of `name` in the keyspace of `kind`.
    ///
    /// A snapshot for diagnostics; it may be stale by the time it returns.
    pub fn load_state(&self, kind: ResourceKind, name: &str) -> LoadState {
        match kind {
            ResourceKind::CidToCode => self.code_maps.load_state(name),
            ResourceKind::CidToUnicode => self.unicode_maps.load_state(name),
        }
    }

    /// Number of published maps across both kinds.
    pub fn len(&self) -> usize {
        self.code_maps.ready_count() + self.unicode_maps.ready_count()
    }

    /// Returns true if no map has been published yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCache")
            .field("code_maps", &self.code_maps.ready_count())
            .field("unicode_maps", &self.unicode_maps.ready_count())
            .finish_non_exhaustive()
    }
}
