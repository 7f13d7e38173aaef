//! CMake target discovery for build-orchestration hosts.
//!
//! This package re-exports [`cmake_targets_core`] and carries the
//! workspace-level integration tests.

pub use cmake_targets_core::*;
