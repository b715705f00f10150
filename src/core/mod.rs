//! Core data structures for modinfo.
//!
//! This module contains the foundational types used throughout modinfo:
//! - The validated module descriptor specification and its builder
//! - Classpath roles
//! - ModInfo.toml manifests and source sets

pub mod classpath;
pub mod manifest;
pub mod spec;

pub use classpath::{ClasspathRole, Classpaths};
pub use manifest::{find_manifest, Manifest, SourceSet, MANIFEST_NAME};
pub use spec::{
    ModuleDescriptorBuilder, ModuleDescriptorSpec, PackageSpec, ProvidesSpec, RequiresSpec,
};
