//! Implementation of `modinfo generate`.
//!
//! A run moves strictly forward through [`TaskState`]: the three listings,
//! classification, rendering, then a single write. The descriptor file is
//! only touched at the very end, so a failure never leaves a truncated file
//! behind.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::classify::{classify, Classification, ConflictPolicy, Override};
use crate::core::classpath::{ClasspathRole, Classpaths};
use crate::core::spec::ModuleDescriptorSpec;
use crate::errors::GenerateError;
use crate::lister::{list_names, ModuleLister};
use crate::render::render;
use crate::util::fs::{read_if_exists, remove_file_if_exists, write_atomic};

/// File name of the generated descriptor.
pub const DESCRIPTOR_FILE: &str = "module-info.java";

/// Progress of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Listing(ClasspathRole),
    Classifying,
    Rendering,
    Written,
    Failed,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskState::Idle => write!(f, "idle"),
            TaskState::Listing(role) => write!(f, "listing {} modules", role),
            TaskState::Classifying => write!(f, "classifying"),
            TaskState::Rendering => write!(f, "rendering"),
            TaskState::Written => write!(f, "written"),
            TaskState::Failed => write!(f, "failed"),
        }
    }
}

/// Options for a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// How explicit declarations that contradict the classpaths are handled.
    pub conflict_policy: ConflictPolicy,

    /// Render but do not touch the filesystem.
    pub dry_run: bool,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// Where the descriptor lives (or would live, on a dry run).
    pub path: PathBuf,

    /// The rendered descriptor.
    pub contents: String,

    /// Whether the file was (re)written; false if it was already up to date
    /// or this was a dry run.
    pub fresh: bool,

    pub classification: Classification,
}

impl GenerateResult {
    pub fn overrides(&self) -> &[Override] {
        &self.classification.overrides
    }
}

/// One descriptor generation: a spec, its classpaths and a destination.
#[derive(Debug, Clone)]
pub struct GenerateTask {
    spec: ModuleDescriptorSpec,
    classpaths: Classpaths,
    output_dir: PathBuf,
    options: GenerateOptions,
    state: TaskState,
}

impl GenerateTask {
    pub fn new(spec: ModuleDescriptorSpec, classpaths: Classpaths, output_dir: impl Into<PathBuf>) -> Self {
        GenerateTask {
            spec,
            classpaths,
            output_dir: output_dir.into(),
            options: GenerateOptions::default(),
            state: TaskState::Idle,
        }
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the descriptor this task writes.
    pub fn descriptor_path(&self) -> PathBuf {
        self.output_dir.join(DESCRIPTOR_FILE)
    }

    /// Run the task to completion.
    ///
    /// On failure the task ends in [`TaskState::Failed`] and any descriptor
    /// left by an earlier run is removed.
    pub fn run(&mut self, lister: &dyn ModuleLister) -> Result<GenerateResult, GenerateError> {
        match self.run_inner(lister) {
            Ok(result) => Ok(result),
            Err(err) => {
                tracing::debug!("generation failed while {}: {}", self.state, err);
                self.state = TaskState::Failed;
                if !self.options.dry_run {
                    if let Err(cleanup) = self.remove_stale() {
                        tracing::warn!("{}", cleanup);
                    }
                }
                Err(err)
            }
        }
    }

    fn run_inner(&mut self, lister: &dyn ModuleLister) -> Result<GenerateResult, GenerateError> {
        self.spec.validate()?;

        let static_names = self.list(lister, ClasspathRole::Static)?;
        let transitive_names = self.list(lister, ClasspathRole::Transitive)?;
        let runtime_names = self.list(lister, ClasspathRole::Runtime)?;

        self.transition(TaskState::Classifying);
        let classification = classify(
            &static_names,
            &transitive_names,
            &runtime_names,
            self.spec.requires(),
            self.options.conflict_policy,
        )?;

        self.transition(TaskState::Rendering);
        let contents = render(&self.spec, &classification);

        let path = self.descriptor_path();
        let fresh = if self.options.dry_run {
            false
        } else {
            self.write(&path, &contents)?
        };

        self.transition(TaskState::Written);
        Ok(GenerateResult {
            path,
            contents,
            fresh,
            classification,
        })
    }

    fn list(
        &mut self,
        lister: &dyn ModuleLister,
        role: ClasspathRole,
    ) -> Result<BTreeSet<String>, GenerateError> {
        self.transition(TaskState::Listing(role));
        let names = list_names(lister, self.classpaths.get(role))?;
        tracing::debug!("{} {} module(s): {:?}", names.len(), role, names);
        Ok(names)
    }

    /// Write the descriptor unless it already has these contents.
    fn write(&self, path: &Path, contents: &str) -> Result<bool, GenerateError> {
        let existing = read_if_exists(path).map_err(|e| GenerateError::io(path, e))?;
        if existing.as_deref() == Some(contents) {
            tracing::debug!("{} is up to date", path.display());
            return Ok(false);
        }

        write_atomic(path, contents).map_err(|e| GenerateError::io(path, e))?;
        Ok(true)
    }

    fn remove_stale(&self) -> Result<(), GenerateError> {
        let path = self.descriptor_path();
        let removed = remove_file_if_exists(&path).map_err(|e| GenerateError::io(&path, e))?;
        if removed {
            tracing::debug!("removed stale {}", path.display());
        }
        Ok(())
    }

    fn transition(&mut self, next: TaskState) {
        tracing::debug!("{}: {} -> {}", self.spec.name(), self.state, next);
        self.state = next;
    }
}

/// Generate a descriptor in one call.
pub fn generate(
    spec: ModuleDescriptorSpec,
    classpaths: Classpaths,
    output_dir: impl Into<PathBuf>,
    lister: &dyn ModuleLister,
    options: GenerateOptions,
) -> Result<GenerateResult, GenerateError> {
    GenerateTask::new(spec, classpaths, output_dir)
        .with_options(options)
        .run(lister)
}
