//! Subprocess adapter around the `svn` command-line client.
//!
//! A small, explicit wrapper: every capability maps to one `svn` invocation
//! with line-based output parsing. The parsers are free functions so they
//! can be tested without the binary installed.

use crate::error::GatewayError;
use crate::gateway::RepoGateway;
use crate::types::{Depth, NodeKind, RepoEntry, RepoUri, Revision, UpdateSpec};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, warn};

pub struct SvnCliGateway {
    command: String,
}

impl SvnCliGateway {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Output, GatewayError> {
        debug!(command = %self.command, ?args, "running svn client");
        let output = Command::new(&self.command)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await?;
        Ok(output)
    }

    /// Run and require success; stdout is returned as trimmed UTF-8.
    async fn run_checked(&self, args: &[&str]) -> Result<String, GatewayError> {
        let output = self.run(args).await?;
        if !output.status.success() {
            return Err(GatewayError::CommandFailed {
                command: format!("{} {}", self.command, args.join(" ")),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// `svn info --show-item <item>` answering `None` on a failure exit,
    /// which is how the client reports "not a versioned resource".
    async fn info_item(&self, item: &str, target: &str) -> Result<Option<String>, GatewayError> {
        let output = self.run(&["info", "--show-item", item, target]).await?;
        if !output.status.success() {
            debug!(target, item, "svn info reported unversioned target");
            return Ok(None);
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!value.is_empty()).then_some(value))
    }
}

#[async_trait]
impl RepoGateway for SvnCliGateway {
    async fn working_copy_root(&self, path: &Path) -> Result<Option<PathBuf>, GatewayError> {
        let target = path.to_string_lossy();
        Ok(self
            .info_item("wc-root", &target)
            .await?
            .map(PathBuf::from))
    }

    async fn repo_location(&self, path: &Path) -> Result<Option<RepoUri>, GatewayError> {
        let target = path.to_string_lossy();
        Ok(self.info_item("url", &target).await?.map(RepoUri::new))
    }

    async fn list_directory(&self, uri: &RepoUri) -> Result<Vec<RepoEntry>, GatewayError> {
        let stdout = self.run_checked(&["list", uri.as_str()]).await?;
        Ok(parse_list_output(uri, &stdout))
    }

    async fn metadata(&self, uri: &RepoUri) -> Result<Option<NodeKind>, GatewayError> {
        match self.info_item("kind", uri.as_str()).await? {
            Some(kind) => parse_kind(&kind).map(Some),
            None => Ok(None),
        }
    }

    async fn update(&self, local_dir: &Path, spec: &UpdateSpec) -> Result<(), GatewayError> {
        let revision = revision_arg(spec.revision);
        let target = local_dir.to_string_lossy();
        let args: [&str; 6] = [
            "update",
            "--depth",
            depth_arg(spec.depth),
            "-r",
            &revision,
            &target,
        ];
        match self.run_checked(&args).await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(path = %local_dir.display(), error = %e, "svn update failed");
                Err(e)
            }
        }
    }
}

/// Map a listing line to an entry. `svn list` marks directories with a
/// trailing `/`; everything else is a file.
fn parse_list_line(base: &RepoUri, line: &str) -> Option<RepoEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (name, kind) = match line.strip_suffix('/') {
        Some(dir) => (dir, NodeKind::Directory),
        None => (line, NodeKind::File),
    };
    let uri = match kind {
        NodeKind::Directory => base.join(&format!("{}/", name)),
        NodeKind::File => base.join(name),
    };
    Some(RepoEntry {
        name: name.to_string(),
        kind,
        uri,
    })
}

fn parse_list_output(base: &RepoUri, stdout: &str) -> Vec<RepoEntry> {
    stdout
        .lines()
        .filter_map(|line| parse_list_line(base, line))
        .collect()
}

fn parse_kind(value: &str) -> Result<NodeKind, GatewayError> {
    match value {
        "file" => Ok(NodeKind::File),
        "dir" | "directory" => Ok(NodeKind::Directory),
        other => Err(GatewayError::MalformedOutput(format!(
            "unknown node kind `{}`",
            other
        ))),
    }
}

fn depth_arg(depth: Depth) -> &'static str {
    match depth {
        Depth::Empty => "empty",
        Depth::ImmediateChildren => "immediates",
        Depth::Infinity => "infinity",
    }
}

fn revision_arg(revision: Revision) -> String {
    match revision {
        Revision::Head => String::from("HEAD"),
        Revision::Number(n) => n.to_string(),
    }
}
