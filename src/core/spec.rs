//! The user-facing description of the module being generated.
//!
//! A [`ModuleDescriptorSpec`] is built once through [`ModuleDescriptorBuilder`],
//! validated at `build()`, and then handed to generation by value.

use std::collections::HashMap;

use serde::Serialize;

use crate::errors::GenerateError;

/// An `exports` or `opens` entry.
///
/// An empty `modules` list means the package is visible to every module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSpec {
    pub package: String,
    #[serde(rename = "to", skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<String>,
}

impl PackageSpec {
    pub fn new(package: impl Into<String>) -> Self {
        PackageSpec {
            package: package.into(),
            modules: Vec::new(),
        }
    }

    /// Qualify the entry with one more target module.
    pub fn to(mut self, module: impl Into<String>) -> Self {
        self.modules.push(module.into());
        self
    }

    pub fn is_qualified(&self) -> bool {
        !self.modules.is_empty()
    }
}

/// A `provides <service> with <impls>` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvidesSpec {
    pub service: String,
    #[serde(rename = "with")]
    pub implementations: Vec<String>,
}

impl ProvidesSpec {
    pub fn new(service: impl Into<String>) -> Self {
        ProvidesSpec {
            service: service.into(),
            implementations: Vec::new(),
        }
    }

    /// Add one more implementation, kept in declaration order.
    pub fn with(mut self, implementation: impl Into<String>) -> Self {
        self.implementations.push(implementation.into());
        self
    }
}

/// An explicit `requires` declaration, overriding what the classpaths imply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RequiresSpec {
    pub module: String,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub transitive: bool,
}

impl RequiresSpec {
    pub fn new(module: impl Into<String>) -> Self {
        RequiresSpec {
            module: module.into(),
            is_static: false,
            transitive: false,
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_transitive(mut self, transitive: bool) -> Self {
        self.transitive = transitive;
        self
    }
}

/// A validated module specification.
///
/// Serializes to the `[module]` table layout of ModInfo.toml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleDescriptorSpec {
    name: String,
    open: bool,
    include_transitive: bool,
    exports: Vec<PackageSpec>,
    opens: Vec<PackageSpec>,
    uses: Vec<String>,
    provides: Vec<ProvidesSpec>,
    requires: Vec<RequiresSpec>,
}

impl ModuleDescriptorSpec {
    /// Start building a spec for the named module.
    pub fn builder(name: impl Into<String>) -> ModuleDescriptorBuilder {
        ModuleDescriptorBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the upstream resolver should traverse dependencies transitively
    /// when assembling the three classpaths.
    pub fn include_transitive(&self) -> bool {
        self.include_transitive
    }

    pub fn exports(&self) -> &[PackageSpec] {
        &self.exports
    }

    pub fn opens(&self) -> &[PackageSpec] {
        &self.opens
    }

    pub fn uses(&self) -> &[String] {
        &self.uses
    }

    pub fn provides(&self) -> &[ProvidesSpec] {
        &self.provides
    }

    pub fn requires(&self) -> &[RequiresSpec] {
        &self.requires
    }

    /// Check every invariant of the module spec.
    ///
    /// Called by the builder; generation calls it again before spawning any
    /// listing process.
    pub fn validate(&self) -> Result<(), GenerateError> {
        check_name("module name", &self.name)?;

        for export in &self.exports {
            check_package("exports", export)?;
        }
        for open in &self.opens {
            check_package("opens", open)?;
        }

        if self.open && !self.opens.is_empty() {
            return Err(GenerateError::config(format!(
                "open module `{}` cannot declare `opens`",
                self.name
            )));
        }

        for service in &self.uses {
            check_name("uses service", service)?;
        }

        for provides in &self.provides {
            check_name("provides service", &provides.service)?;
            if provides.implementations.is_empty() {
                return Err(GenerateError::config(format!(
                    "`provides {}` has no implementations",
                    provides.service
                )));
            }
            for implementation in &provides.implementations {
                check_name("provides implementation", implementation)?;
            }
        }

        let mut seen: HashMap<&str, &RequiresSpec> = HashMap::new();
        for requires in &self.requires {
            check_name("requires module", &requires.module)?;
            if let Some(previous) = seen.insert(&requires.module, requires) {
                if previous != requires {
                    return Err(GenerateError::config(format!(
                        "module `{}` is required twice with different modifiers",
                        requires.module
                    )));
                }
            }
        }

        Ok(())
    }
}

fn check_name(what: &str, value: &str) -> Result<(), GenerateError> {
    if value.trim().is_empty() {
        return Err(GenerateError::config(format!("{} must not be empty", what)));
    }
    if value.chars().any(char::is_whitespace) || value.contains('@') {
        return Err(GenerateError::config(format!(
            "{} `{}` must not contain whitespace or `@`",
            what, value
        )));
    }
    Ok(())
}

fn check_package(what: &str, spec: &PackageSpec) -> Result<(), GenerateError> {
    check_name(&format!("{} package", what), &spec.package)?;
    for module in &spec.modules {
        check_name(&format!("{} {} target", what, spec.package), module)?;
    }
    Ok(())
}

/// Fluent builder for [`ModuleDescriptorSpec`].
#[derive(Debug, Clone)]
pub struct ModuleDescriptorBuilder {
    spec: ModuleDescriptorSpec,
}

impl ModuleDescriptorBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        ModuleDescriptorBuilder {
            spec: ModuleDescriptorSpec {
                name: name.into(),
                open: false,
                include_transitive: false,
                exports: Vec::new(),
                opens: Vec::new(),
                uses: Vec::new(),
                provides: Vec::new(),
                requires: Vec::new(),
            },
        }
    }

    pub fn open(mut self, open: bool) -> Self {
        self.spec.open = open;
        self
    }

    pub fn include_transitive(mut self, include: bool) -> Self {
        self.spec.include_transitive = include;
        self
    }

    /// Export a package to every module.
    pub fn exports(self, package: impl Into<String>) -> Self {
        self.export(PackageSpec::new(package))
    }

    /// Export a package to the given modules only.
    pub fn exports_to<I, S>(self, package: impl Into<String>, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = modules
            .into_iter()
            .fold(PackageSpec::new(package), |spec, m| spec.to(m));
        self.export(spec)
    }

    pub fn export(mut self, spec: PackageSpec) -> Self {
        self.spec.exports.push(spec);
        self
    }

    /// Open a package to every module.
    pub fn opens(self, package: impl Into<String>) -> Self {
        self.open_package(PackageSpec::new(package))
    }

    /// Open a package to the given modules only.
    pub fn opens_to<I, S>(self, package: impl Into<String>, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = modules
            .into_iter()
            .fold(PackageSpec::new(package), |spec, m| spec.to(m));
        self.open_package(spec)
    }

    pub fn open_package(mut self, spec: PackageSpec) -> Self {
        self.spec.opens.push(spec);
        self
    }

    pub fn uses(mut self, service: impl Into<String>) -> Self {
        self.spec.uses.push(service.into());
        self
    }

    pub fn provides<I, S>(self, service: impl Into<String>, implementations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = implementations
            .into_iter()
            .fold(ProvidesSpec::new(service), |spec, i| spec.with(i));
        self.provide(spec)
    }

    pub fn provide(mut self, spec: ProvidesSpec) -> Self {
        self.spec.provides.push(spec);
        self
    }

    pub fn requires(mut self, spec: RequiresSpec) -> Self {
        self.spec.requires.push(spec);
        self
    }

    /// Validate and produce the module spec.
    pub fn build(self) -> Result<ModuleDescriptorSpec, GenerateError> {
        self.spec.validate()?;
        Ok(self.spec)
    }
}
