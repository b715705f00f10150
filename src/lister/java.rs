//! Module listing through `java -p <path> --list-modules`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::GenerateError;
use crate::util::process::ProcessBuilder;

use super::{parse_listing, with_location, ListedModule, ModuleLister};

/// Lists modules by running a java launcher.
#[derive(Debug, Clone)]
pub struct JavaModuleLister {
    java: PathBuf,
    timeout: Option<Duration>,
}

impl JavaModuleLister {
    pub fn new(java: impl Into<PathBuf>) -> Self {
        JavaModuleLister {
            java: java.into(),
            timeout: None,
        }
    }

    /// Bound each listing invocation; `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn java(&self) -> &Path {
        &self.java
    }

    /// Build the listing command for a module path.
    pub fn command(&self, classpath: &[PathBuf]) -> Result<ProcessBuilder, GenerateError> {
        let joined = std::env::join_paths(classpath).map_err(|e| {
            GenerateError::config(format!("classpath entry cannot be joined: {}", e))
        })?;

        Ok(ProcessBuilder::new(&self.java)
            .arg("-p")
            .arg(joined)
            .arg("--list-modules")
            .timeout(self.timeout))
    }

    /// Run the listing and return every record, including those without a
    /// location.
    pub fn list_all(&self, classpath: &[PathBuf]) -> Result<Vec<ListedModule>, GenerateError> {
        let process = self.command(classpath)?;
        let command = process.display_command();
        tracing::debug!("running `{}`", command);

        let output = process.exec().map_err(|e| GenerateError::Execution {
            command: command.clone(),
            exit_code: None,
            timed_out: false,
            stderr: format!("{:#}", e),
        })?;

        if !output.success() {
            return Err(GenerateError::Execution {
                command,
                exit_code: output.code(),
                timed_out: output.timed_out(),
                stderr: output.stderr_lossy(),
            });
        }

        parse_listing(&output.stdout_lossy()).map_err(|e| e.in_command(command))
    }
}

impl ModuleLister for JavaModuleLister {
    fn list(&self, classpath: &[PathBuf]) -> Result<Vec<ListedModule>, GenerateError> {
        // Nothing on an empty module path has a location.
        if classpath.is_empty() {
            tracing::debug!("empty module path, skipping listing");
            return Ok(Vec::new());
        }

        let modules = with_location(self.list_all(classpath)?);
        tracing::debug!("listed {} module(s) with a location", modules.len());
        Ok(modules)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    /// Write an executable script standing in for `java`.
    fn fake_java(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("java");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_list_filters_location_less_modules() {
        let tmp = TempDir::new().unwrap();
        let java = fake_java(
            tmp.path(),
            "echo 'java.base@21'\necho 'com.example@1.0 file:///libs/example.jar'",
        );

        let lister = JavaModuleLister::new(java);
        let modules = lister.list(&[tmp.path().join("example.jar")]).unwrap();

        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].name, "com.example");
        assert_eq!(modules[0].version.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_list_passes_module_path() {
        let tmp = TempDir::new().unwrap();
        // echo the arguments back as a location
        let java = fake_java(tmp.path(), "echo \"args file:///$1/$3\"");

        let lister = JavaModuleLister::new(java);
        let all = lister.list_all(&[PathBuf::from("a.jar")]).unwrap();

        assert_eq!(
            all[0].location.as_ref().unwrap().as_str(),
            "file:///-p/--list-modules"
        );
    }

    #[test]
    fn test_nonzero_exit_is_execution_error() {
        let tmp = TempDir::new().unwrap();
        let java = fake_java(tmp.path(), "echo 'bad module path' >&2\nexit 1");

        let err = JavaModuleLister::new(java)
            .list(&[PathBuf::from("a.jar")])
            .unwrap_err();

        match err {
            GenerateError::Execution {
                exit_code, stderr, ..
            } => {
                assert_eq!(exit_code, Some(1));
                assert!(stderr.contains("bad module path"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_timeout_is_execution_error() {
        let tmp = TempDir::new().unwrap();
        let java = fake_java(tmp.path(), "exec sleep 5");

        let err = JavaModuleLister::new(java)
            .with_timeout(Some(Duration::from_millis(200)))
            .list(&[PathBuf::from("a.jar")])
            .unwrap_err();

        assert!(matches!(err, GenerateError::Execution { timed_out: true, .. }));
    }

    #[test]
    fn test_malformed_output_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let java = fake_java(tmp.path(), "echo '@1.0 /some/path'");

        let err = JavaModuleLister::new(java)
            .list(&[PathBuf::from("a.jar")])
            .unwrap_err();

        match err {
            GenerateError::Parse {
                line_number,
                command: Some(command),
                ..
            } => {
                assert_eq!(line_number, 1);
                assert!(command.ends_with("-p a.jar --list-modules"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_timeout_with_wrapper_launcher() {
        let tmp = TempDir::new().unwrap();
        // A wrapper that forks instead of exec-ing keeps the pipes open after it is killed.
        let java = fake_java(tmp.path(), "sleep 4\necho 'com.example file:///a.jar'");

        let started = std::time::Instant::now();
        let err = JavaModuleLister::new(java)
            .with_timeout(Some(Duration::from_millis(200)))
            .list(&[PathBuf::from("a.jar")])
            .unwrap_err();

        assert!(matches!(err, GenerateError::Execution { timed_out: true, .. }));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_empty_classpath_does_not_spawn() {
        let lister = JavaModuleLister::new("/definitely/not/java");
        assert!(lister.list(&[]).unwrap().is_empty());
    }
}
