//! ModInfo.toml manifest parsing and schema.
//!
//! The manifest declares, per source set, the module spec, the three
//! resolved classpaths and where the descriptor goes. Top-level tables form
//! the `main` source set; further source sets live under
//! `[source-sets.<name>]`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::classpath::Classpaths;
use crate::core::spec::{
    ModuleDescriptorBuilder, ModuleDescriptorSpec, PackageSpec, ProvidesSpec, RequiresSpec,
};
use crate::errors::GenerateError;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "ModInfo.toml";

/// Source set formed by the top-level tables.
pub const MAIN_SOURCE_SET: &str = "main";

/// Output directory for a source set when none is configured.
pub fn default_output_dir(root: &Path, source_set: &str) -> PathBuf {
    root.join("build")
        .join("generated")
        .join("generatedModuleInfo")
        .join(source_set)
}

/// Find the manifest in `dir` (no upward search).
pub fn find_manifest(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(MANIFEST_NAME);
    path.is_file().then_some(path)
}

/// Render a spec as a `[module]` table that [`Manifest::parse`] accepts.
pub fn module_table(spec: &ModuleDescriptorSpec) -> Result<String> {
    #[derive(Serialize)]
    struct Table<'a> {
        module: &'a ModuleDescriptorSpec,
    }

    toml::to_string(&Table { module: spec }).context("failed to serialize module spec")
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawManifest {
    module: Option<RawModule>,
    #[serde(default)]
    classpath: RawClasspath,
    #[serde(default)]
    output: RawOutput,
    #[serde(default)]
    source_sets: BTreeMap<String, RawSourceSet>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawSourceSet {
    module: RawModule,
    #[serde(default)]
    classpath: RawClasspath,
    #[serde(default)]
    output: RawOutput,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawModule {
    name: Option<String>,
    #[serde(default)]
    open: bool,
    #[serde(default)]
    include_transitive: bool,
    #[serde(default)]
    uses: Vec<String>,
    #[serde(default)]
    exports: Vec<RawPackage>,
    #[serde(default)]
    opens: Vec<RawPackage>,
    #[serde(default)]
    provides: Vec<RawProvides>,
    #[serde(default)]
    requires: Vec<RawRequires>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPackage {
    package: String,
    #[serde(default)]
    to: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProvides {
    service: String,
    #[serde(default, rename = "with")]
    implementations: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRequires {
    module: String,
    #[serde(default, rename = "static")]
    is_static: bool,
    #[serde(default)]
    transitive: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClasspath {
    #[serde(default, rename = "static")]
    static_path: Vec<PathBuf>,
    #[serde(default)]
    transitive: Vec<PathBuf>,
    #[serde(default)]
    runtime: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutput {
    dir: Option<PathBuf>,
}

impl RawModule {
    fn into_spec(self) -> Result<ModuleDescriptorSpec, GenerateError> {
        let name = self
            .name
            .ok_or_else(|| GenerateError::config("`module.name` is required"))?;

        let mut builder = ModuleDescriptorBuilder::new(name)
            .open(self.open)
            .include_transitive(self.include_transitive);

        for service in self.uses {
            builder = builder.uses(service);
        }
        for export in self.exports {
            builder = builder.export(export.into_spec());
        }
        for open in self.opens {
            builder = builder.open_package(open.into_spec());
        }
        for provides in self.provides {
            builder = builder.provide(ProvidesSpec {
                service: provides.service,
                implementations: provides.implementations,
            });
        }
        for requires in self.requires {
            builder = builder.requires(
                RequiresSpec::new(requires.module)
                    .with_static(requires.is_static)
                    .with_transitive(requires.transitive),
            );
        }

        builder.build()
    }
}

impl RawPackage {
    fn into_spec(self) -> PackageSpec {
        PackageSpec {
            package: self.package,
            modules: self.to,
        }
    }
}

impl RawClasspath {
    fn resolve(self, root: &Path) -> Classpaths {
        let absolute = |paths: Vec<PathBuf>| -> Vec<PathBuf> {
            paths.into_iter().map(|p| root.join(p)).collect()
        };
        Classpaths {
            static_path: absolute(self.static_path),
            transitive: absolute(self.transitive),
            runtime: absolute(self.runtime),
        }
    }
}

/// One descriptor to generate.
#[derive(Debug, Clone)]
pub struct SourceSet {
    pub name: String,
    pub spec: ModuleDescriptorSpec,
    pub classpaths: Classpaths,
    pub output_dir: PathBuf,
}

/// A parsed ModInfo.toml.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    source_sets: Vec<SourceSet>,
}

impl Manifest {
    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        let root = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&contents, root)
            .with_context(|| format!("invalid manifest: {}", path.display()))
            .map(|mut m| {
                m.path = path.to_path_buf();
                m
            })
    }

    /// Parse manifest text; relative paths resolve against `root`.
    pub fn parse(contents: &str, root: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(contents).context("failed to parse manifest")?;

        let mut source_sets = Vec::new();
        let has_main = raw.module.is_some();

        if let Some(module) = raw.module {
            source_sets.push(build_source_set(
                MAIN_SOURCE_SET,
                module,
                raw.classpath,
                raw.output,
                root,
            )?);
        }

        for (name, set) in raw.source_sets {
            if name == MAIN_SOURCE_SET && has_main {
                bail!("source set `main` is declared both at top level and under [source-sets]");
            }
            source_sets.push(build_source_set(&name, set.module, set.classpath, set.output, root)?);
        }

        if source_sets.is_empty() {
            return Err(GenerateError::config("manifest declares no [module]").into());
        }

        Ok(Manifest {
            path: root.join(MANIFEST_NAME),
            source_sets,
        })
    }

    /// Path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the manifest.
    pub fn root(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn source_sets(&self) -> &[SourceSet] {
        &self.source_sets
    }

    pub fn source_set(&self, name: &str) -> Option<&SourceSet> {
        self.source_sets.iter().find(|s| s.name == name)
    }

    /// Select source sets by name; an empty filter selects all.
    pub fn select(&self, names: &[String]) -> Result<Vec<&SourceSet>> {
        if names.is_empty() {
            return Ok(self.source_sets.iter().collect());
        }

        names
            .iter()
            .map(|name| {
                self.source_set(name).with_context(|| {
                    format!(
                        "source set `{}` not found\navailable source sets: {}",
                        name,
                        self.source_sets
                            .iter()
                            .map(|s| s.name.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                })
            })
            .collect()
    }
}

fn build_source_set(
    name: &str,
    module: RawModule,
    classpath: RawClasspath,
    output: RawOutput,
    root: &Path,
) -> Result<SourceSet> {
    let spec = module
        .into_spec()
        .with_context(|| format!("in source set `{}`", name))?;

    let output_dir = match output.dir {
        Some(dir) => root.join(dir),
        None => default_output_dir(root, name),
    };

    Ok(SourceSet {
        name: name.to_string(),
        spec,
        classpaths: classpath.resolve(root),
        output_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FULL: &str = r#"
[module]
name = "com.example.app"
include-transitive = true
uses = ["com.example.spi.Codec"]

[[module.exports]]
package = "com.example.api"

[[module.exports]]
package = "com.example.internal"
to = ["z.mod", "a.mod"]

[[module.provides]]
service = "com.example.spi.Codec"
with = ["com.example.codec.Json"]

[[module.requires]]
module = "java.sql"
transitive = true

[classpath]
static = ["libs/a.jar", "/opt/b.jar"]
runtime = ["libs/a.jar"]

[source-sets.test.module]
name = "com.example.app.test"

[source-sets.test.classpath]
runtime = ["libs/junit.jar"]

[source-sets.test.output]
dir = "out/test"
"#;

    #[test]
    fn test_parse_full_manifest() {
        let manifest = Manifest::parse(FULL, Path::new("/project")).unwrap();

        let main = manifest.source_set("main").unwrap();
        assert_eq!(main.spec.name(), "com.example.app");
        assert!(main.spec.include_transitive());
        assert_eq!(main.spec.exports().len(), 2);
        assert_eq!(main.spec.exports()[1].modules, vec!["z.mod", "a.mod"]);
        assert_eq!(main.spec.provides()[0].implementations, vec!["com.example.codec.Json"]);
        assert!(main.spec.requires()[0].transitive);
        assert!(!main.spec.requires()[0].is_static);
        assert_eq!(
            main.classpaths.static_path,
            vec![PathBuf::from("/project/libs/a.jar"), PathBuf::from("/opt/b.jar")]
        );
        assert!(main.classpaths.transitive.is_empty());
        assert_eq!(
            main.output_dir,
            PathBuf::from("/project/build/generated/generatedModuleInfo/main")
        );

        let test = manifest.source_set("test").unwrap();
        assert_eq!(test.spec.name(), "com.example.app.test");
        assert_eq!(test.output_dir, PathBuf::from("/project/out/test"));
        assert_eq!(test.classpaths.runtime, vec![PathBuf::from("/project/libs/junit.jar")]);
    }

    #[test]
    fn test_missing_name_is_configuration_error() {
        let err = Manifest::parse("[module]\nopen = true\n", Path::new("/p")).unwrap_err();

        let root = err
            .chain()
            .find_map(|e| e.downcast_ref::<GenerateError>())
            .expect("configuration error in chain");
        assert!(matches!(root, GenerateError::Configuration { .. }));
    }

    #[test]
    fn test_provides_without_with_rejected() {
        let text = r#"
[module]
name = "app"

[[module.provides]]
service = "com.example.Spi"
"#;
        let err = Manifest::parse(text, Path::new("/p")).unwrap_err();
        assert!(format!("{:#}", err).contains("has no implementations"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(Manifest::parse("[module]\nname = \"app\"\nexport = []\n", Path::new("/p")).is_err());
    }

    #[test]
    fn test_empty_manifest_rejected() {
        let err = Manifest::parse("", Path::new("/p")).unwrap_err();
        assert!(format!("{:#}", err).contains("no [module]"));
    }

    #[test]
    fn test_select_unknown_source_set() {
        let manifest = Manifest::parse(FULL, Path::new("/project")).unwrap();
        let err = manifest.select(&["bench".to_string()]).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("source set `bench` not found"));
        assert!(message.contains("main, test"));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(MANIFEST_NAME);
        std::fs::write(&path, "[module]\nname = \"app\"\n").unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.path(), path);
        assert_eq!(manifest.root(), tmp.path());
        assert_eq!(find_manifest(tmp.path()), Some(path));
    }

    #[test]
    fn test_module_table_parses_back() {
        let manifest = Manifest::parse(FULL, Path::new("/project")).unwrap();
        let main = manifest.source_set("main").unwrap();

        let table = module_table(&main.spec).unwrap();
        let reparsed = Manifest::parse(&table, Path::new("/project")).unwrap();

        assert_eq!(reparsed.source_set("main").unwrap().spec, main.spec);
    }
}
