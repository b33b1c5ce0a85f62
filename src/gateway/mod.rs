//! External capability boundary: version-control client and icon source.

mod contract;
mod icons;
mod svn_cli;

pub use contract::{IconProvider, PlaceholderIcons, RepoGateway};
pub use icons::{CachedIcons, IconResolver};
pub use svn_cli::SvnCliGateway;
