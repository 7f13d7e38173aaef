//! Integration tests running a stand-in cmake executable
#![cfg(unix)]

use cmake_targets::{Error, MemoryConfigProvider, ProcessRunner, TargetDiscoverer, ToolConfig};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn fake_cmake(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-cmake");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn configured_project(executable: &Path) -> (TempDir, Arc<MemoryConfigProvider>, TargetDiscoverer) {
    let temp_dir = TempDir::new().unwrap();
    let build_dir = temp_dir.path().join("build");
    fs::create_dir_all(&build_dir).unwrap();
    fs::write(
        build_dir.join("CMakeCache.txt"),
        "CMAKE_GENERATOR:INTERNAL=Unix Makefiles\n",
    )
    .unwrap();
    let provider = Arc::new(MemoryConfigProvider::from_config(&ToolConfig {
        build_suffix: "/build".to_string(),
        executable: executable.display().to_string(),
        ..Default::default()
    }));
    let discoverer = TargetDiscoverer::new(temp_dir.path(), provider.clone());
    (temp_dir, provider, discoverer)
}

#[test]
fn test_help_from_real_process() {
    let tools = TempDir::new().unwrap();
    let exe = fake_cmake(
        tools.path(),
        "printf 'The following are some of the valid targets:\\r\\n... all\\r\\n... app\\r\\n'",
    );
    let (_dir, _provider, discoverer) = configured_project(&exe);

    let names: Vec<_> = discoverer
        .targets()
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["generate", "all", "app"]);
}

#[test]
fn test_failing_help_propagates() {
    let tools = TempDir::new().unwrap();
    let exe = fake_cmake(tools.path(), "echo 'no Makefile here' >&2\nexit 3");
    let (_dir, _provider, discoverer) = configured_project(&exe);

    match discoverer.targets() {
        Err(Error::ToolFailed { stderr, .. }) => assert_eq!(stderr, "no Makefile here"),
        other => panic!("expected ToolFailed, got {other:?}"),
    }
}

#[test]
fn test_missing_executable_is_reported() {
    let tools = TempDir::new().unwrap();
    let (_dir, _provider, discoverer) = configured_project(&tools.path().join("fake-cmake"));
    match discoverer.targets() {
        Err(Error::ExecutableNotFound(exe)) => assert!(exe.ends_with("fake-cmake")),
        other => panic!("expected ExecutableNotFound, got {other:?}"),
    }

    fake_cmake(tools.path(), "echo '... all'");
    assert_eq!(discoverer.targets().unwrap().len(), 2);
}

#[test]
fn test_hanging_help_times_out() {
    let tools = TempDir::new().unwrap();
    let exe = fake_cmake(tools.path(), "exec sleep 10");
    let (_dir, _provider, discoverer) = configured_project(&exe);
    let discoverer = discoverer.with_tool_runner(Arc::new(ProcessRunner::with_timeout(
        Duration::from_millis(200),
    )));

    match discoverer.targets() {
        Err(Error::ToolTimeout { timeout, .. }) => {
            assert_eq!(timeout, Duration::from_millis(200))
        }
        other => panic!("expected ToolTimeout, got {other:?}"),
    }
}
