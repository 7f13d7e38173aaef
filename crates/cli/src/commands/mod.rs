pub mod check;
pub mod list;
pub mod run;
pub mod watch;

pub use check::check_command;
pub use list::list_command;
pub use run::run_command;
pub use watch::watch_command;

use cmake_targets_core::{CacheSnapshot, MemoryConfigProvider, ProjectLocation, TargetDiscoverer};
use std::sync::Arc;

use crate::config::ResolvedProject;

/// Wire a discoverer to an in-memory store seeded with the resolved config
pub(crate) fn discoverer_for(project: &ResolvedProject) -> (Arc<MemoryConfigProvider>, TargetDiscoverer) {
    let provider = Arc::new(MemoryConfigProvider::from_config(&project.config));
    let discoverer = TargetDiscoverer::new(&project.source_dir, provider.clone());
    (provider, discoverer)
}

/// Whether the build directory's cache names a generator
pub(crate) fn is_configured(location: &ProjectLocation) -> bool {
    CacheSnapshot::load(&location.cache_path()).is_ok_and(|cache| cache.generator().is_some())
}
