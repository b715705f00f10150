//! Test utilities and mocks for modinfo unit tests.
//!
//! [`MockLister`] stands in for the java launcher so that generation can be
//! exercised without a JDK.
//!
//! # Example
//!
//! ```rust,ignore
//! use modinfo::test_support::MockLister;
//!
//! let mut lister = MockLister::new();
//! lister
//!     .expect(&["libs/a.jar"], "com.a@1.0 file:///libs/a.jar\n")
//!     .fail(&["libs/broken.jar"], 1, "Error: boom");
//! ```

use std::cell::RefCell;
use std::path::PathBuf;

use crate::errors::GenerateError;
use crate::lister::{parse_listing, with_location, ListedModule, ModuleLister};

/// Mock process output for a listing invocation.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Check if the process succeeded.
    pub fn success_status(&self) -> bool {
        self.status == 0
    }
}

/// Mock module lister.
///
/// Answers listings for exact module paths and records every call in order.
/// A module path with no expectation is reported as a failed execution.
#[derive(Debug, Default)]
pub struct MockLister {
    expectations: Vec<(Vec<PathBuf>, MockProcessOutput)>,
    calls: RefCell<Vec<Vec<PathBuf>>>,
}

impl MockLister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer a listing of `classpath` with `stdout`.
    pub fn expect(&mut self, classpath: &[&str], stdout: &str) -> &mut Self {
        self.respond(classpath, MockProcessOutput::success(stdout))
    }

    /// Fail a listing of `classpath` with the given exit status.
    pub fn fail(&mut self, classpath: &[&str], status: i32, stderr: &str) -> &mut Self {
        self.respond(classpath, MockProcessOutput::failure(status, stderr))
    }

    pub fn respond(&mut self, classpath: &[&str], output: MockProcessOutput) -> &mut Self {
        let key = classpath.iter().map(PathBuf::from).collect();
        self.expectations.push((key, output));
        self
    }

    /// Module paths listed so far, in call order.
    pub fn calls(&self) -> Vec<Vec<PathBuf>> {
        self.calls.borrow().clone()
    }

    fn command(classpath: &[PathBuf]) -> String {
        let joined: Vec<String> = classpath.iter().map(|p| p.display().to_string()).collect();
        format!("java -p {} --list-modules", joined.join(":"))
    }
}

impl ModuleLister for MockLister {
    fn list(&self, classpath: &[PathBuf]) -> Result<Vec<ListedModule>, GenerateError> {
        self.calls.borrow_mut().push(classpath.to_vec());

        let output = self
            .expectations
            .iter()
            .find(|(key, _)| key.as_slice() == classpath)
            .map(|(_, output)| output)
            .ok_or_else(|| GenerateError::Execution {
                command: Self::command(classpath),
                exit_code: None,
                timed_out: false,
                stderr: "unexpected listing".to_string(),
            })?;

        if !output.success_status() {
            return Err(GenerateError::Execution {
                command: Self::command(classpath),
                exit_code: Some(output.status),
                timed_out: false,
                stderr: output.stderr.clone(),
            });
        }

        let listed =
            parse_listing(&output.stdout).map_err(|e| e.in_command(Self::command(classpath)))?;
        Ok(with_location(listed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_lister_records_calls() {
        let mut lister = MockLister::new();
        lister.expect(&["a.jar"], "com.a file:///a.jar\njava.base@21\n");

        let modules = lister.list(&[PathBuf::from("a.jar")]).unwrap();

        assert_eq!(modules.len(), 1);
        assert_eq!(lister.calls(), vec![vec![PathBuf::from("a.jar")]]);
    }

    #[test]
    fn test_mock_lister_unexpected() {
        let lister = MockLister::new();
        let err = lister.list(&[PathBuf::from("x.jar")]).unwrap_err();
        assert!(matches!(err, GenerateError::Execution { exit_code: None, .. }));
    }

    #[test]
    fn test_mock_lister_failure() {
        let mut lister = MockLister::new();
        lister.fail(&["a.jar"], 3, "Error: bad jar");

        let err = lister.list(&[PathBuf::from("a.jar")]).unwrap_err();
        assert!(err.to_string().ends_with("exited with code 3"));
    }
}
