//! Error types for descriptor generation.
//!
//! Every failure in the core surfaces as a [`GenerateError`]. Nothing is
//! retried; the orchestrating caller decides what to do with it.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::classify::RequirementBucket;
use crate::util::diagnostic::Diagnostic;

/// Error raised while listing, classifying, rendering or writing a descriptor.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum GenerateError {
    /// The module-listing process could not be run or exited unsuccessfully.
    #[error("module listing failed: `{command}`{}", exit_suffix(.exit_code, .timed_out))]
    #[diagnostic(
        code(modinfo::list::execution),
        help("Check that the configured java launcher works: `{command}`")
    )]
    Execution {
        command: String,
        exit_code: Option<i32>,
        timed_out: bool,
        stderr: String,
    },

    /// A line of listing output did not match `<name>[@<version>] [<uri>]`.
    #[error("invalid module listing at line {line_number}: {reason}")]
    #[diagnostic(
        code(modinfo::list::parse),
        help("Expected `<name>[@<version>] [<uri>]` on every line")
    )]
    Parse {
        line_number: usize,
        line: String,
        reason: String,
        /// Listing command whose output was rejected, once known.
        command: Option<String>,
    },

    /// The module specification is incomplete or contradictory.
    #[error("invalid module specification: {message}")]
    #[diagnostic(
        code(modinfo::spec::invalid),
        help("Run `modinfo check` to validate ModInfo.toml")
    )]
    Configuration { message: String },

    /// An explicit `requires` moved a module out of its inferred bucket
    /// while overrides are not allowed.
    #[error("conflicting requirement for `{module}`")]
    #[diagnostic(
        code(modinfo::classify::conflict),
        help("Drop the explicit `requires` or the classpath entry for `{module}`")
    )]
    Conflict {
        module: String,
        inferred: RequirementBucket,
        declared: RequirementBucket,
    },

    /// Reading, writing or removing the descriptor failed.
    #[error("I/O error on `{}`", .path.display())]
    #[diagnostic(code(modinfo::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn exit_suffix(exit_code: &Option<i32>, timed_out: &bool) -> String {
    if *timed_out {
        " timed out".to_string()
    } else {
        match exit_code {
            Some(code) => format!(" exited with code {}", code),
            None => " could not be run".to_string(),
        }
    }
}

impl GenerateError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        GenerateError::Configuration {
            message: message.into(),
        }
    }

    /// Create a parse error for a listing line (1-based line number).
    pub fn parse(line_number: usize, line: impl Into<String>, reason: impl Into<String>) -> Self {
        GenerateError::Parse {
            line_number,
            line: line.into(),
            reason: reason.into(),
            command: None,
        }
    }

    /// Record the listing command that produced a rejected line.
    pub fn in_command(self, command: impl Into<String>) -> Self {
        match self {
            GenerateError::Parse {
                line_number,
                line,
                reason,
                ..
            } => GenerateError::Parse {
                line_number,
                line,
                reason,
                command: Some(command.into()),
            },
            other => other,
        }
    }

    /// Create an I/O error for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }

    /// Convert to a user-friendly diagnostic.
    ///
    /// The miette code and help of the variant lead; variant-specific
    /// context and suggestions follow.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string());
        if let Some(code) = MietteDiagnostic::code(self) {
            diag = diag.with_code(code.to_string());
        }
        if let Some(help) = MietteDiagnostic::help(self) {
            diag = diag.with_suggestion(help.to_string());
        }

        match self {
            GenerateError::Execution {
                command,
                exit_code,
                timed_out,
                stderr,
            } => {
                diag = diag.with_context(format!("command: {}", command));
                if let Some(code) = exit_code {
                    diag = diag.with_context(format!("exit code: {}", code));
                }
                for line in stderr.lines().filter(|l| !l.trim().is_empty()).take(10) {
                    diag = diag.with_context(line.to_string());
                }

                if *timed_out {
                    diag.with_suggestion("Raise `listing.timeout-secs` in .modinfo/config.toml")
                } else {
                    diag.with_suggestion("Set `toolchain.java` or JAVA_HOME to a JDK 9+ launcher")
                        .with_suggestion("Run `modinfo list <paths>` to reproduce the listing")
                }
            }

            GenerateError::Parse {
                line_number,
                line,
                command,
                ..
            } => {
                if let Some(command) = command {
                    diag = diag.with_context(format!("command: {}", command));
                }
                diag.with_context(format!("line {}: `{}`", line_number, line))
            }

            GenerateError::Configuration { .. } => diag,

            GenerateError::Conflict {
                module,
                inferred,
                declared,
            } => diag
                .with_context(format!("classpaths imply `{} {}`", inferred.keyword(), module))
                .with_context(format!("module spec declares `{} {}`", declared.keyword(), module))
                .with_suggestion("Run without --strict to let the declaration win"),

            GenerateError::Io { path, source } => {
                diag.with_location(path).with_context(source.to_string())
            }
        }
    }
}
