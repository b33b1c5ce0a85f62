//! In-memory repository gateway backing the engine tests.
//!
//! The mock pairs a real temporary working copy on disk with a scripted
//! remote side: listings and node kinds come from maps keyed by URI, and
//! `repo_location` answers for any on-disk path below the configured root
//! unless the path was registered as unversioned. Update and listing calls
//! are recorded so tests can assert call counts and ordering.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use svnview::error::GatewayError;
use svnview::gateway::RepoGateway;
use svnview::types::{NodeKind, RepoEntry, RepoUri, UpdateSpec};

pub struct MockGateway {
    wc_root: PathBuf,
    base_uri: RepoUri,
    listings: HashMap<RepoUri, Vec<RepoEntry>>,
    kinds: HashMap<RepoUri, NodeKind>,
    unversioned: HashSet<PathBuf>,
    pub list_calls: Mutex<Vec<RepoUri>>,
    pub update_calls: Mutex<Vec<PathBuf>>,
    fail_update_on_call: Option<usize>,
    fail_root_probe: bool,
}

impl MockGateway {
    pub fn new(wc_root: impl Into<PathBuf>, base_uri: &str) -> Self {
        Self {
            wc_root: wc_root.into(),
            base_uri: RepoUri::new(base_uri),
            listings: HashMap::new(),
            kinds: HashMap::new(),
            unversioned: HashSet::new(),
            list_calls: Mutex::new(Vec::new()),
            update_calls: Mutex::new(Vec::new()),
            fail_update_on_call: None,
            fail_root_probe: false,
        }
    }

    /// Script the children of a repository directory. Also records each
    /// entry's kind so metadata probes agree with the listing.
    pub fn with_listing(mut self, uri: &RepoUri, entries: Vec<(&str, NodeKind)>) -> Self {
        let children = entries
            .into_iter()
            .map(|(name, kind)| {
                let child_uri = match kind {
                    NodeKind::Directory => uri.join(&format!("{}/", name)),
                    NodeKind::File => uri.join(name),
                };
                self.kinds.insert(child_uri.clone(), kind);
                RepoEntry {
                    name: name.to_string(),
                    kind,
                    uri: child_uri,
                }
            })
            .collect();
        self.listings.insert(uri.clone(), children);
        self
    }

    /// Mark a local path as having no repository counterpart.
    pub fn with_unversioned(mut self, path: impl Into<PathBuf>) -> Self {
        self.unversioned.insert(path.into());
        self
    }

    /// Make the n-th update call (1-based) fail.
    pub fn fail_update_on_call(mut self, call: usize) -> Self {
        self.fail_update_on_call = Some(call);
        self
    }

    /// Make every working-copy-root probe fail.
    pub fn fail_working_copy_probe(mut self) -> Self {
        self.fail_root_probe = true;
        self
    }

    fn uri_for_local(&self, path: &Path) -> Option<RepoUri> {
        if self.unversioned.contains(path) {
            return None;
        }
        let rel = path.strip_prefix(&self.wc_root).ok()?;
        let mut uri = self.base_uri.clone();
        for component in rel.components() {
            uri = uri.join(&component.as_os_str().to_string_lossy());
        }
        if path.is_dir() {
            uri = RepoUri::new(format!("{}/", uri.as_str().trim_end_matches('/')));
        }
        Some(uri)
    }
}

#[async_trait]
impl RepoGateway for MockGateway {
    async fn working_copy_root(&self, path: &Path) -> Result<Option<PathBuf>, GatewayError> {
        if self.fail_root_probe {
            return Err(GatewayError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "injected probe failure",
            )));
        }
        Ok(path
            .starts_with(&self.wc_root)
            .then(|| self.wc_root.clone()))
    }

    async fn repo_location(&self, path: &Path) -> Result<Option<RepoUri>, GatewayError> {
        Ok(self.uri_for_local(path))
    }

    async fn list_directory(&self, uri: &RepoUri) -> Result<Vec<RepoEntry>, GatewayError> {
        self.list_calls.lock().push(uri.clone());
        Ok(self.listings.get(uri).cloned().unwrap_or_default())
    }

    async fn metadata(&self, uri: &RepoUri) -> Result<Option<NodeKind>, GatewayError> {
        if let Some(kind) = self.kinds.get(uri) {
            return Ok(Some(*kind));
        }
        // URIs derived from versioned local paths: the trailing separator
        // already encodes the kind.
        Ok(Some(if uri.is_directory() {
            NodeKind::Directory
        } else {
            NodeKind::File
        }))
    }

    async fn update(&self, local_dir: &Path, _spec: &UpdateSpec) -> Result<(), GatewayError> {
        let call_number = {
            let mut calls = self.update_calls.lock();
            calls.push(local_dir.to_path_buf());
            calls.len()
        };
        if self.fail_update_on_call == Some(call_number) {
            return Err(GatewayError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "injected update failure",
            )));
        }
        Ok(())
    }
}
