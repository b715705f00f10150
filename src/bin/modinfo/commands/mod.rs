//! Command implementations

pub mod check;
pub mod completions;
pub mod generate;
pub mod list;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;

use modinfo::core::Manifest;
use modinfo::util::{Config, GlobalContext};

/// Listing timeout: the command line wins over config, and zero disables it.
pub fn listing_timeout(flag: Option<u64>, config: &Config) -> Option<Duration> {
    match flag {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => config.timeout(),
    }
}

/// Load the manifest named on the command line, or search upward for one.
pub fn load_manifest(ctx: &GlobalContext, explicit: Option<&Path>) -> Result<Manifest> {
    let path = match explicit {
        Some(path) => ctx.resolve(path),
        None => ctx.find_manifest()?,
    };
    tracing::debug!("using manifest {}", path.display());
    Manifest::load(&path)
}
