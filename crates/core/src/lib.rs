//! cmake-targets - CMake target discovery for editor build integrations
//!
//! This crate provides functionality to:
//! - Decide whether a directory is a CMake project
//! - Read the generator recorded in a build directory's `CMakeCache.txt`
//! - Enumerate buildable targets for Makefile and Visual Studio generators
//! - Describe each target as a command the host can execute
//! - Notify the host when configuration or the cache changes
pub mod build_system;
pub mod command;
pub mod config;
pub mod discovery;
pub mod error;
pub mod patterns;
pub mod tool;
pub mod types;
pub mod watch;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use build_system::{CacheSnapshot, GeneratorFamily, is_cmake_project};
pub use command::{ExecutionReport, TargetDescriptor};
pub use config::{ConfigKey, ConfigProvider, MemoryConfigProvider, ToolConfig};
pub use discovery::TargetDiscoverer;
pub use patterns::{Diagnostic, ErrorMatcher};
pub use tool::{ProcessRunner, ToolInvocation, ToolOutput, ToolRunner};
pub use watch::{RefreshHub, RefreshReason};
