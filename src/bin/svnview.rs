//! Svnview CLI Binary
//!
//! Drop a path from the command line: prints the reconciled working-copy /
//! repository tree and optionally materializes one repository-only entry.

use anyhow::{bail, Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use svnview::config::ViewConfig;
use svnview::controller::{ViewController, ViewEvent, ERROR_TEXT, NOT_VERSIONED_TEXT};
use svnview::gateway::{PlaceholderIcons, SvnCliGateway};
use svnview::logging;
use svnview::tree::{NodeId, Tree};

#[derive(Parser)]
#[command(name = "svnview", about = "Unified working-copy and repository tree")]
struct Cli {
    /// Path inside (or at the root of) a working copy.
    path: PathBuf,

    /// Materialize this repository-only entry after reconciliation, given
    /// as a display path below the root, e.g. "docs/img/logo.png".
    #[arg(long)]
    materialize: Option<String>,

    /// Skip the confirmation prompt before materializing.
    #[arg(long)]
    yes: bool,

    /// Emit the tree as JSON instead of indented text.
    #[arg(long)]
    json: bool,

    /// Configuration file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = ViewConfig::load(cli.config.as_deref()).context("loading configuration")?;
    logging::init_logging(Some(&config.logging)).context("initializing logging")?;

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(run_async(cli, config))
}

async fn run_async(cli: Cli, config: ViewConfig) -> Result<()> {
    let gateway = Arc::new(SvnCliGateway::new(config.svn_command.clone()));
    let icons = Arc::new(PlaceholderIcons);
    let mut controller = ViewController::new(gateway, icons, config.metadata_dir.clone());

    controller
        .handle_event(ViewEvent::Drop(cli.path.clone()))
        .await?;

    match controller.repository_path_text() {
        NOT_VERSIONED_TEXT => bail!("{} is not inside an SVN working copy", cli.path.display()),
        ERROR_TEXT => bail!("could not classify {}", cli.path.display()),
        uri => println!("Repository: {}", uri),
    }

    if let Some(ref rel) = cli.materialize {
        let tree = controller.tree().context("no tree was built")?;
        let target = find_by_display_path(tree, rel)
            .with_context(|| format!("no entry named `{}` in the tree", rel))?;
        let name = tree.node(target).name().to_string();
        if !cli.yes {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(format!("Check out `{}` into the working copy?", name))
                .default(false)
                .interact()
                .context("reading confirmation")?;
            if !confirmed {
                bail!("materialization cancelled");
            }
        }
        controller
            .handle_event(ViewEvent::UpdateRequested(target))
            .await
            .with_context(|| format!("materializing `{}`", name))?;
        println!("Materialized {}", name);
    }

    let tree = controller.tree().context("no tree was built")?;
    if cli.json {
        println!("{}", render_json(tree)?);
    } else {
        print!("{}", render_text(tree));
    }
    Ok(())
}

/// Resolve a `/`-separated display path (as printed by the text renderer)
/// to a node, trying the directory spelling of each component first.
fn find_by_display_path(tree: &Tree, rel: &str) -> Option<NodeId> {
    let mut current = tree.top_level()?;
    for part in rel.split('/').filter(|p| !p.is_empty()) {
        let dir_name = format!("{}/", part);
        current = tree
            .child_by_name(current, &dir_name)
            .or_else(|| tree.child_by_name(current, part))?;
    }
    Some(current)
}

fn render_text(tree: &Tree) -> String {
    let mut out = String::new();
    for (depth, id) in tree.walk() {
        let node = tree.node(id);
        let presence = match (node.has_local_copy, node.has_repository_copy) {
            (true, true) => "LR",
            (true, false) => "L-",
            (false, true) => "-R",
            (false, false) => "--",
        };
        let marker = if node.is_selected { "*" } else { " " };
        let indent = "  ".repeat(depth);
        let name = if node.is_repository_only() {
            node.name().dimmed().to_string()
        } else {
            node.name().to_string()
        };
        out.push_str(&format!("{} {} {}{}\n", presence, marker, indent, name));
    }
    out
}

fn render_json(tree: &Tree) -> Result<String> {
    let entries: Vec<serde_json::Value> = tree
        .walk()
        .into_iter()
        .map(|(depth, id)| {
            let node = tree.node(id);
            serde_json::json!({
                "name": node.name(),
                "depth": depth,
                "kind": node.kind,
                "has_local_copy": node.has_local_copy,
                "has_repository_copy": node.has_repository_copy,
                "selected": node.is_selected,
            })
        })
        .collect();
    serde_json::to_string_pretty(&entries).context("serializing tree")
}
