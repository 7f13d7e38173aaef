//! Resolving command-line arguments into a project and its configuration

use anyhow::{Context, Result};
use cmake_targets_core::ToolConfig;
use std::path::{Path, PathBuf};

use crate::cli::ProjectArgs;

/// A source directory with its fully merged configuration
#[derive(Debug, Clone)]
pub struct ResolvedProject {
    pub source_dir: PathBuf,
    pub config: ToolConfig,
    pub config_file: Option<PathBuf>,
}

/// Defaults < config file < command-line flags
pub fn resolve_project(args: &ProjectArgs) -> Result<ResolvedProject> {
    let source_dir = absolute(args.source.as_deref().unwrap_or(Path::new(".")))?;
    if !source_dir.is_dir() {
        anyhow::bail!("Source directory not found: {}", source_dir.display());
    }

    let config_file = match &args.config {
        Some(path) => Some(absolute(path)?),
        None => ToolConfig::find_config_file(&source_dir),
    };
    let config = load_config(config_file.as_deref(), args)?;

    Ok(ResolvedProject {
        source_dir,
        config,
        config_file,
    })
}

/// Read the config file (if any) and lay the flags over it
pub fn load_config(config_file: Option<&Path>, args: &ProjectArgs) -> Result<ToolConfig> {
    let mut config = match config_file {
        Some(path) => ToolConfig::load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => ToolConfig::default(),
    };
    apply_overrides(&mut config, args);
    Ok(config)
}

pub fn apply_overrides(config: &mut ToolConfig, args: &ProjectArgs) {
    if let Some(suffix) = &args.suffix {
        config.build_suffix = suffix.clone();
    }
    if let Some(generator) = &args.generator {
        config.generator = generator.clone();
    }
    if let Some(executable) = &args.executable {
        config.executable = executable.clone();
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    // Canonicalize when possible so `.` turns into a real directory name
    Ok(joined.canonicalize().unwrap_or(joined))
}
