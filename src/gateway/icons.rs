//! Extension-keyed icon cache.
//!
//! Icon resolution on a real platform goes through the shell and is slow
//! enough to matter during a large reconciliation, while the answer only
//! depends on the file-name extension (directories share one icon). The
//! cache sits in front of any resolver function and hands out stable
//! handles per extension.

use crate::gateway::IconProvider;
use crate::types::IconHandle;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;

/// Resolver invoked once per previously unseen extension. Returning `None`
/// maps to the placeholder handle, fulfilling the never-fails contract.
pub type IconResolver = Box<dyn Fn(&Path) -> Option<IconHandle> + Send + Sync>;

pub struct CachedIcons {
    resolver: IconResolver,
    by_extension: RwLock<HashMap<String, IconHandle>>,
}

impl CachedIcons {
    pub fn new(resolver: IconResolver) -> Self {
        Self {
            resolver,
            by_extension: RwLock::new(HashMap::new()),
        }
    }

    /// Cache key: lowercased extension, or a marker for extensionless paths.
    fn key_for(path: &Path) -> String {
        path.extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| String::from("<none>"))
    }
}

impl IconProvider for CachedIcons {
    fn icon_for(&self, path: &Path) -> IconHandle {
        let key = Self::key_for(path);
        if let Some(handle) = self.by_extension.read().get(&key) {
            return *handle;
        }
        let handle = (self.resolver)(path).unwrap_or(IconHandle::PLACEHOLDER);
        self.by_extension.write().entry(key).or_insert(handle);
        handle
    }
}
