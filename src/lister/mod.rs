//! Enumeration of the named modules on a module path.
//!
//! The [`ModuleLister`] trait is the seam between the core and the external
//! listing tool: generation only ever sees parsed [`ListedModule`] records,
//! so classification and rendering can be exercised without a JDK.

mod java;
mod parse;

use std::collections::BTreeSet;
use std::path::PathBuf;

pub use java::JavaModuleLister;
pub use parse::{parse_listing, ListedModule};

use crate::errors::GenerateError;

/// Something that can enumerate the named modules on a module path.
pub trait ModuleLister {
    /// List the modules on `classpath`, keeping only those with a location.
    fn list(&self, classpath: &[PathBuf]) -> Result<Vec<ListedModule>, GenerateError>;
}

/// Keep only the records that are backed by an artifact.
pub fn with_location(modules: Vec<ListedModule>) -> Vec<ListedModule> {
    modules.into_iter().filter(ListedModule::has_location).collect()
}

/// Collect the module names visible on `classpath`.
pub fn list_names(
    lister: &dyn ModuleLister,
    classpath: &[PathBuf],
) -> Result<BTreeSet<String>, GenerateError> {
    Ok(lister
        .list(classpath)?
        .into_iter()
        .map(|m| m.name)
        .collect())
}
