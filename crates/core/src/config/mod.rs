//! Configuration management for cmake-targets

pub mod provider;
mod settings;
pub mod validation;

// Re-export main types
pub use provider::{ConfigKey, ConfigListener, ConfigProvider, MemoryConfigProvider};
pub use settings::{DEFAULT_EXECUTABLE, ToolConfig};
pub use validation::{ConfigIssue, ConfigValidator, DefaultConfigValidator, resolve_executable};
