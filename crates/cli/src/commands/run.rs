use anyhow::{Context, Result};
use cmake_targets_core::Error;
use tracing::{debug, info};

use super::discoverer_for;
use crate::cli::ProjectArgs;
use crate::config::resolve_project;
use crate::display::print_diagnostics;

pub fn run_command(target_name: &str, args: &ProjectArgs, dry_run: bool) -> Result<()> {
    let project = resolve_project(args)?;
    let (_provider, discoverer) = discoverer_for(&project);

    debug!("Looking up target {} in {:?}", target_name, project.source_dir);
    let targets = discoverer
        .targets()
        .context("Failed to discover CMake targets")?;
    let target = targets
        .into_iter()
        .find(|t| t.name == target_name)
        .ok_or_else(|| Error::TargetNotFound {
            name: target_name.to_string(),
            build_dir: discoverer.location().build_dir().to_path_buf(),
        })?;

    let shell_cmd = target.to_shell_command();
    if dry_run {
        println!("{}", shell_cmd);
        println!("Working directory: {}", target.cwd.display());
        return Ok(());
    }

    info!("Running: {}", shell_cmd);
    info!("Working directory: {}", target.cwd.display());

    let report = target
        .execute_with(|line| println!("{line}"))
        .with_context(|| format!("Failed to execute: {}", shell_cmd))?;

    print_diagnostics(&report.diagnostics);
    if !report.success() {
        std::process::exit(report.status.code().unwrap_or(1));
    }
    Ok(())
}
