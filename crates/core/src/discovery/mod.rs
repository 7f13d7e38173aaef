//! Target discovery across generator families

pub mod discoverer;
pub mod makefile;
pub mod visual_studio;

pub use discoverer::{NICE_NAME, TargetDiscoverer};
pub use makefile::{help_invocation, makefile_targets, parse_help_targets};
pub use visual_studio::{find_project_names, visual_studio_targets};
