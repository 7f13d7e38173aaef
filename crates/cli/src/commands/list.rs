use anyhow::{Context, Result};
use tracing::debug;

use super::{discoverer_for, is_configured};
use crate::cli::ProjectArgs;
use crate::config::resolve_project;
use crate::display::{print_targets, print_targets_json};

pub fn list_command(args: &ProjectArgs, json: bool) -> Result<()> {
    let project = resolve_project(args)?;
    debug!("Listing targets of {:?}", project.source_dir);

    let (_provider, discoverer) = discoverer_for(&project);
    if !discoverer.is_eligible() {
        anyhow::bail!(
            "Not a CMake project: no CMakeLists.txt in {} and no CMakeCache.txt in {}",
            project.source_dir.display(),
            discoverer.location().build_dir().display()
        );
    }

    let targets = discoverer
        .targets()
        .context("Failed to discover CMake targets")?;

    if json {
        print_targets_json(&targets)?;
    } else {
        let location = discoverer.location();
        print_targets(&location, &targets, is_configured(&location));
    }
    Ok(())
}
