//! Targets of Visual Studio generators, read from the generated project files

use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

use crate::command::{CLEAN_TARGET, DescriptorBuilder, DescriptorContext, TargetDescriptor};

const PROJECT_EXTENSION: &str = "vcxproj";

/// CMake's own bookkeeping directory, never holds user targets
const CMAKE_FILES_DIR: &str = "CMakeFiles";

/// Project names under `build_dir`, deduplicated by file stem, in walk order
pub fn find_project_names(build_dir: &Path) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    let walker = WalkDir::new(build_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.depth() > 0 && e.file_type().is_dir() && e.file_name() == CMAKE_FILES_DIR));

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(PROJECT_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            if seen.insert(stem.to_string()) {
                names.push(stem.to_string());
            }
        }
    }

    names
}

/// One descriptor per project plus a synthetic `clean`
pub fn visual_studio_targets(ctx: &DescriptorContext<'_>) -> Vec<TargetDescriptor> {
    let names = find_project_names(ctx.build_dir);
    tracing::debug!("Found {} project file(s) in {:?}", names.len(), ctx.build_dir);

    names
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(CLEAN_TARGET))
        .map(|name| DescriptorBuilder::visual_studio_target(ctx, name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<Project/>").unwrap();
    }

    #[test]
    fn test_dedup_and_skip_cmake_files() {
        let temp_dir = TempDir::new().unwrap();
        let build = temp_dir.path();
        project(build, "ALL_BUILD.vcxproj");
        project(build, "app/app.vcxproj");
        project(build, "lib/core.vcxproj");
        project(build, "tests/core.vcxproj");
        project(build, "CMakeFiles/3.27.0/CompilerIdC/CompilerIdC.vcxproj");
        project(build, "lib/CMakeFiles/internal.vcxproj");
        project(build, "app/app.vcxproj.filters");
        fs::create_dir_all(build.join("weird.vcxproj")).unwrap();

        let names = find_project_names(build);
        assert_eq!(names, vec!["ALL_BUILD", "app", "core"]);
    }

    #[test]
    fn test_clean_is_always_present() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        let build = temp_dir.path().join("build");
        fs::create_dir_all(&build).unwrap();
        let ctx = DescriptorContext {
            executable: "cmake",
            source_dir: &source,
            build_dir: &build,
        };

        let targets = visual_studio_targets(&ctx);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "clean");
        assert_eq!(targets[0].args[5], "/maxcpucount");
    }

    #[test]
    fn test_missing_build_dir_yields_only_clean() {
        let temp_dir = TempDir::new().unwrap();
        assert!(find_project_names(&temp_dir.path().join("missing")).is_empty());
    }
}
