//! Error types for svnview.

use thiserror::Error;

/// Errors raised by a [`crate::gateway::RepoGateway`] implementation.
///
/// The reconciliation engine recovers from every variant by degrading the
/// affected node; only the materializer and the CLI surface these to callers.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Underlying I/O failure (spawn failure, broken pipe, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The client subprocess exited with a failure status.
    #[error("`{command}` failed with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// The client produced output the adapter could not interpret.
    #[error("unexpected client output: {0}")]
    MalformedOutput(String),
}

/// Errors raised by [`crate::tree::update_only_this_item`].
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// The target already has a local copy or has no repository location.
    #[error("node `{name}` is not a repository-only entry")]
    NotRepositoryOnly { name: String },

    /// The upward walk reached the top without finding a local path. The
    /// working-copy root always has one, so this means the tree invariants
    /// were broken; the call fails closed instead of guessing a path.
    #[error("no materialized ancestor found for `{name}`")]
    MissingLocalAncestor { name: String },

    /// An update step failed; ancestors materialized before it keep their state.
    #[error("update of `{name}` failed")]
    Step {
        name: String,
        #[source]
        source: GatewayError,
    },
}

/// Umbrella error for controller, configuration, and CLI paths.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("no tree has been built yet")]
    NoTree,

    #[error("unknown node id in event payload")]
    UnknownNode,
}
