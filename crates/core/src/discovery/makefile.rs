//! Targets of Makefile-style generators, read from CMake's `help` target

use std::collections::HashSet;

use crate::command::{DescriptorBuilder, DescriptorContext, TargetDescriptor, cpu_count};
use crate::error::Result;
use crate::tool::{ToolInvocation, ToolRunner};

/// Prefix CMake puts in front of every listed target
const HELP_TARGET_PREFIX: &str = "...";

/// `<exe> --build <build_dir> --target help`, run inside the build directory
pub fn help_invocation(ctx: &DescriptorContext<'_>) -> ToolInvocation {
    ToolInvocation::new(ctx.executable, ctx.build_dir)
        .arg("--build")
        .arg(ctx.build_dir.display().to_string())
        .arg("--target")
        .arg("help")
}

/// Target names listed in `help` output, in order, without duplicates.
///
/// Lines are split on `\r\n`, `\n` or `\r`; only lines starting with `...`
/// name a target, and only the first word after the prefix is the name.
pub fn parse_help_targets(output: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    output
        .split(['\r', '\n'])
        .filter_map(|line| line.strip_prefix(HELP_TARGET_PREFIX))
        .filter_map(|rest| rest.split_whitespace().next())
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}

pub fn makefile_targets(
    ctx: &DescriptorContext<'_>,
    runner: &dyn ToolRunner,
) -> Result<Vec<TargetDescriptor>> {
    let output = runner.run(&help_invocation(ctx))?;
    let names = parse_help_targets(&output.stdout);
    let jobs = cpu_count();
    tracing::debug!("help listed {} target(s), building with -j{}", names.len(), jobs);

    Ok(names
        .iter()
        .map(|name| DescriptorBuilder::makefile_target(ctx, name, jobs))
        .collect())
}
