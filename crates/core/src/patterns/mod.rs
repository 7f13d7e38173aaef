//! Diagnostic patterns for scraping tool output
//!
//! Patterns are kept as data, keyed by the toolchain that produces them, and
//! handed to the host verbatim inside every `TargetDescriptor`. `ErrorMatcher`
//! compiles them for callers that want to scrape output themselves.

use regex::Regex;

use crate::error::Result;

/// Producer of a diagnostic format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toolchain {
    /// CMake's own configure/generate diagnostics
    CMake,
    /// `file:line:column: error: message`
    GccClang,
    /// `file(line): error C1234: message`
    Msvc,
}

pub const ERROR_PATTERNS: &[(Toolchain, &[&str])] = &[
    (
        Toolchain::CMake,
        &[r"CMake Error at (?<file>[\\/0-9a-zA-Z\._-]+):(?<line>\d+)"],
    ),
    (
        Toolchain::GccClang,
        &[r"(?<file>.+):(?<line>\d+):(?<column>\d+):\s+(.*\s+)?error:\s+(?<message>.+)"],
    ),
    (
        Toolchain::Msvc,
        &[r"(.*>)?(?<file>.+)\((?<line>\d+)\):\s+(.*\s+)?error\s+(C\d+):(?<message>.*)"],
    ),
];

/// Patterns registered for one toolchain
pub fn patterns_for(toolchain: Toolchain) -> &'static [&'static str] {
    ERROR_PATTERNS
        .iter()
        .find(|(t, _)| *t == toolchain)
        .map(|(_, patterns)| *patterns)
        .unwrap_or(&[])
}

/// Patterns attached to the configure target
pub fn generate_error_patterns() -> Vec<String> {
    collect(&[Toolchain::CMake])
}

/// Patterns attached to build targets. The compiler behind a generator
/// varies, so both compiler formats are included, followed by CMake's own.
pub fn build_error_patterns() -> Vec<String> {
    collect(&[Toolchain::GccClang, Toolchain::Msvc, Toolchain::CMake])
}

fn collect(toolchains: &[Toolchain]) -> Vec<String> {
    toolchains
        .iter()
        .flat_map(|t| patterns_for(*t).iter().map(|p| p.to_string()))
        .collect()
}

/// A diagnostic scraped from a line of tool output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub line: u32,
    pub column: Option<u32>,
    pub message: Option<String>,
}

/// Compiled form of a descriptor's `error_match` list
#[derive(Debug)]
pub struct ErrorMatcher {
    patterns: Vec<Regex>,
}

impl ErrorMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// First pattern that matches wins
    pub fn scan_line(&self, line: &str) -> Option<Diagnostic> {
        self.patterns.iter().find_map(|re| {
            let caps = re.captures(line)?;
            let file = caps.name("file")?.as_str().trim().to_string();
            let line = caps.name("line")?.as_str().parse().ok()?;
            let column = caps.name("column").and_then(|m| m.as_str().parse().ok());
            let message = caps
                .name("message")
                .map(|m| m.as_str().trim().to_string())
                .filter(|m| !m.is_empty());
            Some(Diagnostic {
                file,
                line,
                column,
                message,
            })
        })
    }

    pub fn scan(&self, output: &str) -> Vec<Diagnostic> {
        output.lines().filter_map(|l| self.scan_line(l)).collect()
    }
}
