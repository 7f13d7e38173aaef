//! Validation of user configuration before it reaches CMake

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use super::ToolConfig;

/// Makefile-style generators, by exact name
const MAKEFILE_GENERATORS: &[&str] = &[
    "Unix Makefiles",
    "MinGW Makefiles",
    "MSYS Makefiles",
    "NMake Makefiles",
    "NMake Makefiles JOM",
    "Borland Makefiles",
    "Watcom WMake",
];

/// A problem with the configuration, reported instead of letting the
/// subprocess fail opaquely
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    ExecutableNotFound(String),
    UnsupportedGenerator(String),
    InvalidBuildSuffix(String),
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigIssue::ExecutableNotFound(exe) => {
                write!(f, "executable `{exe}` was not found on PATH or on disk")
            }
            ConfigIssue::UnsupportedGenerator(name) => write!(
                f,
                "generator `{name}` is not a Makefile or Visual Studio generator"
            ),
            ConfigIssue::InvalidBuildSuffix(suffix) => {
                write!(f, "build suffix {suffix:?} contains a NUL byte")
            }
        }
    }
}

/// Trait for validating configurations
pub trait ConfigValidator {
    fn validate(&self, config: &ToolConfig) -> Vec<ConfigIssue>;
}

#[derive(Debug, Default)]
pub struct DefaultConfigValidator;

impl ConfigValidator for DefaultConfigValidator {
    fn validate(&self, config: &ToolConfig) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if resolve_executable(&config.executable).is_none() {
            issues.push(ConfigIssue::ExecutableNotFound(config.executable.clone()));
        }

        let generator = config.generator.trim();
        if !generator.is_empty() && !is_supported_generator(generator) {
            issues.push(ConfigIssue::UnsupportedGenerator(generator.to_string()));
        }

        if config.build_suffix.contains('\0') {
            issues.push(ConfigIssue::InvalidBuildSuffix(config.build_suffix.clone()));
        }

        issues
    }
}

pub fn is_supported_generator(name: &str) -> bool {
    MAKEFILE_GENERATORS.contains(&name) || is_visual_studio_generator(name)
}

/// `Visual Studio <version> [<year>]`
fn is_visual_studio_generator(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("Visual Studio ") else {
        return false;
    };
    rest.split_whitespace()
        .next()
        .is_some_and(|version| version.chars().all(|c| c.is_ascii_digit()))
}

/// Locate the executable the way a shell would
pub fn resolve_executable(executable: &str) -> Option<PathBuf> {
    if executable.trim().is_empty() {
        return None;
    }

    let candidate = Path::new(executable);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path = env::var_os("PATH")?;
    env::split_paths(&path).find_map(|dir| {
        executable_names(executable)
            .into_iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file())
    })
}

#[cfg(windows)]
fn executable_names(executable: &str) -> Vec<String> {
    if Path::new(executable).extension().is_some() {
        vec![executable.to_string()]
    } else {
        vec![format!("{executable}.exe"), executable.to_string()]
    }
}

#[cfg(not(windows))]
fn executable_names(executable: &str) -> Vec<String> {
    vec![executable.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_generators() {
        assert!(is_supported_generator("Unix Makefiles"));
        assert!(is_supported_generator("NMake Makefiles JOM"));
        assert!(is_supported_generator("Visual Studio 16 2019"));
        assert!(is_supported_generator("Visual Studio 17 2022"));
        assert!(!is_supported_generator("Ninja"));
        assert!(!is_supported_generator("Xcode"));
        assert!(!is_supported_generator("Visual Studio Code"));
        assert!(!is_supported_generator("Unix Makefile"));
    }

    #[test]
    fn test_absolute_executable() {
        let dir = tempfile::TempDir::new().unwrap();
        let exe = dir.path().join("my-cmake");
        std::fs::write(&exe, "").unwrap();
        assert_eq!(resolve_executable(exe.to_str().unwrap()), Some(exe.clone()));
        assert_eq!(
            resolve_executable(dir.path().join("missing").to_str().unwrap()),
            None
        );
    }

    #[test]
    fn test_validator_reports_every_issue() {
        let config = ToolConfig {
            build_suffix: "bad\0suffix".to_string(),
            generator: "  Ninja ".to_string(),
            executable: "/definitely/not/here/cmake".to_string(),
        };
        let issues = DefaultConfigValidator.validate(&config);
        assert_eq!(
            issues,
            vec![
                ConfigIssue::ExecutableNotFound("/definitely/not/here/cmake".to_string()),
                ConfigIssue::UnsupportedGenerator("Ninja".to_string()),
                ConfigIssue::InvalidBuildSuffix("bad\0suffix".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_generator_is_fine() {
        let dir = tempfile::TempDir::new().unwrap();
        let exe = dir.path().join("cmake");
        std::fs::write(&exe, "").unwrap();
        let config = ToolConfig {
            executable: exe.display().to_string(),
            ..Default::default()
        };
        assert!(DefaultConfigValidator.validate(&config).is_empty());
    }
}
