//! Gateway contracts.
//!
//! Traits for the external capabilities the engine consumes: the
//! version-control client and the platform icon source. The engine never
//! talks to a concrete client type; everything goes through these seams so
//! tests can substitute in-memory fakes.

use crate::error::GatewayError;
use crate::types::{IconHandle, NodeKind, RepoEntry, RepoUri, UpdateSpec};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Capability boundary around the version-control client.
///
/// Every call may block on disk or network inside the implementation, so all
/// methods are async; callers never run them on the presentation thread.
#[async_trait]
pub trait RepoGateway: Send + Sync {
    /// Root directory of the working copy containing `path`, or `None` when
    /// the path is not inside any working copy.
    async fn working_copy_root(&self, path: &Path) -> Result<Option<PathBuf>, GatewayError>;

    /// Repository address corresponding to a local path, or `None` when the
    /// path is not version-controlled.
    async fn repo_location(&self, path: &Path) -> Result<Option<RepoUri>, GatewayError>;

    /// Immediate children of a repository directory. The listing excludes
    /// the directory itself.
    async fn list_directory(&self, uri: &RepoUri) -> Result<Vec<RepoEntry>, GatewayError>;

    /// Kind of a repository node, or `None` when the node does not exist at
    /// HEAD.
    async fn metadata(&self, uri: &RepoUri) -> Result<Option<NodeKind>, GatewayError>;

    /// Update `local_dir` from the repository according to `spec`. The
    /// materializer only ever calls this with [`UpdateSpec::default()`].
    async fn update(&self, local_dir: &Path, spec: &UpdateSpec) -> Result<(), GatewayError>;
}

/// Platform icon source. Infallible by contract: an implementation that
/// cannot resolve an icon returns [`IconHandle::PLACEHOLDER`] instead of
/// erroring, so icon trouble never disturbs reconciliation.
pub trait IconProvider: Send + Sync {
    fn icon_for(&self, path: &Path) -> IconHandle;
}

/// Icon provider that answers with the placeholder for every path. Useful
/// headless and in tests.
#[derive(Debug, Default)]
pub struct PlaceholderIcons;

impl IconProvider for PlaceholderIcons {
    fn icon_for(&self, _path: &Path) -> IconHandle {
        IconHandle::PLACEHOLDER
    }
}
