//! Construction of target descriptors for each backend

use std::path::Path;

use crate::command::TargetDescriptor;
use crate::patterns::{build_error_patterns, generate_error_patterns};

pub const GENERATE_TARGET: &str = "generate";
pub const CLEAN_TARGET: &str = "clean";

/// MSBuild flags: parallel build, no summary noise
const MSBUILD_FLAGS: &[&str] = &["/maxcpucount", "/clp:NoSummary;ErrorsOnly;Verbosity=quiet"];

/// Values every descriptor of one discovery pass shares
#[derive(Debug, Clone, Copy)]
pub struct DescriptorContext<'a> {
    pub executable: &'a str,
    pub source_dir: &'a Path,
    pub build_dir: &'a Path,
}

pub struct DescriptorBuilder;

impl DescriptorBuilder {
    /// The configure step. Always offered, configured or not.
    /// Example: cmake -GNinja -B/src/build -H/src -DCMAKE_EXPORT_COMPILE_COMMANDS=ON
    pub fn configure(ctx: &DescriptorContext<'_>, generator: &str) -> TargetDescriptor {
        let mut args = Vec::with_capacity(4);
        let generator = generator.trim();
        if !generator.is_empty() {
            args.push(format!("-G{generator}"));
        }
        args.push(format!("-B{}", ctx.build_dir.display()));
        args.push(format!("-H{}", ctx.source_dir.display()));
        args.push("-DCMAKE_EXPORT_COMPILE_COMMANDS=ON".to_string());

        TargetDescriptor::new(GENERATE_TARGET, ctx.executable, ctx.source_dir)
            .with_args(args)
            .with_error_match(generate_error_patterns())
    }

    /// Example: cmake --build /src/build --target app -- -j8
    pub fn makefile_target(ctx: &DescriptorContext<'_>, name: &str, jobs: usize) -> TargetDescriptor {
        Self::build_target(ctx, name).with_args([format!("-j{jobs}")])
    }

    /// Example: cmake --build /src/build --target app -- /maxcpucount /clp:...
    pub fn visual_studio_target(ctx: &DescriptorContext<'_>, name: &str) -> TargetDescriptor {
        Self::build_target(ctx, name).with_args(MSBUILD_FLAGS.iter().copied())
    }

    /// `--build <dir> --target <name> --`, ready for backend flags
    fn build_target(ctx: &DescriptorContext<'_>, name: &str) -> TargetDescriptor {
        TargetDescriptor::new(name, ctx.executable, ctx.source_dir)
            .with_args([
                "--build".to_string(),
                ctx.build_dir.display().to_string(),
                "--target".to_string(),
                name.to_string(),
                "--".to_string(),
            ])
            .with_error_match(build_error_patterns())
    }
}

/// Logical processors available right now, at least one
pub fn cpu_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{Toolchain, patterns_for};
    use std::path::PathBuf;

    fn ctx<'a>(source: &'a Path, build: &'a Path) -> DescriptorContext<'a> {
        DescriptorContext {
            executable: "cmake",
            source_dir: source,
            build_dir: build,
        }
    }

    #[test]
    fn test_configure_without_generator() {
        let source = PathBuf::from("/work/proj");
        let build = PathBuf::from("/work/proj-build");
        let target = DescriptorBuilder::configure(&ctx(&source, &build), "   ");
        assert_eq!(target.name, "generate");
        assert_eq!(target.command_name, "cmake:generate");
        assert_eq!(target.cwd, source);
        insta::assert_snapshot!(
            target.to_shell_command(),
            @"cmake -B/work/proj-build -H/work/proj -DCMAKE_EXPORT_COMPILE_COMMANDS=ON"
        );
        assert_eq!(target.error_match, vec![patterns_for(Toolchain::CMake)[0]]);
    }

    #[test]
    fn test_configure_prefixes_generator() {
        let source = PathBuf::from("/p");
        let build = PathBuf::from("/p/build");
        let target = DescriptorBuilder::configure(&ctx(&source, &build), " Unix Makefiles ");
        assert_eq!(target.args[0], "-GUnix Makefiles");
        assert_eq!(target.args.len(), 4);
    }

    #[test]
    fn test_makefile_target_args() {
        let source = PathBuf::from("/p");
        let build = PathBuf::from("/p/build");
        let target = DescriptorBuilder::makefile_target(&ctx(&source, &build), "app", 6);
        assert_eq!(
            target.args,
            vec!["--build", "/p/build", "--target", "app", "--", "-j6"]
        );
        assert_eq!(target.error_match, build_error_patterns());
        assert!(!target.sh);
    }

    #[test]
    fn test_visual_studio_target_args() {
        let source = PathBuf::from("/p");
        let build = PathBuf::from("/p/build");
        let target = DescriptorBuilder::visual_studio_target(&ctx(&source, &build), "ALL_BUILD");
        assert_eq!(
            target.args,
            vec![
                "--build",
                "/p/build",
                "--target",
                "ALL_BUILD",
                "--",
                "/maxcpucount",
                "/clp:NoSummary;ErrorsOnly;Verbosity=quiet"
            ]
        );
        assert_eq!(target.cwd, source);
    }

    #[test]
    fn test_cpu_count_is_positive() {
        assert!(cpu_count() >= 1);
    }
}
