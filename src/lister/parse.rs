//! Parsing of `--list-modules` output.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::errors::GenerateError;

/// `<name>[@<version>] [<location>]`, anything after the location is ignored.
static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^\s@]+)(?:@(\S+))?(?:\s+(\S+))?.*$").expect("valid listing pattern")
});

/// One named module visible on a module path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedModule {
    pub name: String,
    pub version: Option<String>,
    pub location: Option<Url>,
}

impl ListedModule {
    /// Parse a single non-blank listing line.
    ///
    /// `line_number` is 1-based and only used for error reporting.
    pub fn parse(line_number: usize, line: &str) -> Result<Self, GenerateError> {
        let caps = LINE_PATTERN.captures(line).ok_or_else(|| {
            let reason = if line.starts_with('@') {
                "missing module name"
            } else {
                "expected `<name>[@<version>] [<uri>]`"
            };
            GenerateError::parse(line_number, line, reason)
        })?;

        let name = caps[1].to_string();
        let version = caps.get(2).map(|m| m.as_str().to_string());
        let location = caps
            .get(3)
            .map(|m| {
                Url::parse(m.as_str()).map_err(|e| {
                    GenerateError::parse(
                        line_number,
                        line,
                        format!("invalid location `{}`: {}", m.as_str(), e),
                    )
                })
            })
            .transpose()?;

        Ok(ListedModule {
            name,
            version,
            location,
        })
    }

    /// Whether the module is backed by an artifact and can be required by name.
    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }
}

/// Parse every record of a listing, skipping blank lines.
///
/// Records without a location are kept; callers decide whether to filter.
pub fn parse_listing(output: &str) -> Result<Vec<ListedModule>, GenerateError> {
    output
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| ListedModule::parse(idx + 1, line))
        .collect()
}
