use anyhow::Result;
use cmake_targets_core::{CacheSnapshot, GeneratorFamily};

use super::discoverer_for;
use crate::cli::ProjectArgs;
use crate::config::resolve_project;
use crate::display::print_issues;

pub fn check_command(args: &ProjectArgs) -> Result<()> {
    let project = resolve_project(args)?;
    let (_provider, discoverer) = discoverer_for(&project);
    let location = discoverer.location();

    println!("🔍 Source: {}", location.source_dir().display());
    println!("   📁 Build: {}", location.build_dir().display());
    match &project.config_file {
        Some(path) => println!("   ⚙️  Config: {}", path.display()),
        None => println!("   ⚙️  Config: defaults"),
    }

    let eligible = discoverer.is_eligible();
    println!(
        "   📦 CMake project: {}",
        if eligible { "yes" } else { "no" }
    );

    match CacheSnapshot::load(&location.cache_path()) {
        Ok(cache) => match cache.generator() {
            Some(generator) => println!(
                "   🏗️  Generator: {} ({})",
                generator,
                GeneratorFamily::from_generator(generator).name()
            ),
            None => println!("   🏗️  Generator: none recorded in cache"),
        },
        Err(_) => println!("   🏗️  Generator: not configured"),
    }

    let issues = discoverer.validate_config();
    if issues.is_empty() {
        println!("   ✅ Configuration OK");
    } else {
        print_issues(&issues);
    }

    if !eligible {
        anyhow::bail!("{} is not a CMake project", location.source_dir().display());
    }
    Ok(())
}
