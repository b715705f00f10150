//! modinfo - generates `module-info.java` descriptors from classpaths
//!
//! This crate provides the core library functionality for modinfo:
//! module listing, requirement classification, and descriptor rendering.

pub mod classify;
pub mod core;
pub mod errors;
pub mod lister;
pub mod ops;
pub mod render;
pub mod util;

/// Test utilities and mocks for modinfo unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides an in-memory module lister.
#[cfg(test)]
pub mod test_support;

pub use classify::{classify, Classification, ConflictPolicy, RequirementBucket};
pub use crate::core::{
    manifest::Manifest, spec::ModuleDescriptorSpec, ClasspathRole, Classpaths, RequiresSpec,
};
pub use errors::GenerateError;
pub use lister::{JavaModuleLister, ListedModule, ModuleLister};
pub use render::render;
pub use util::context::GlobalContext;
