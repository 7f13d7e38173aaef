use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::build_system::{CMakeProjectDetector, CacheSnapshot, GeneratorFamily, ProjectDetector};
use crate::command::{DescriptorBuilder, DescriptorContext, TargetDescriptor};
use crate::config::{
    ConfigIssue, ConfigKey, ConfigProvider, ConfigValidator, DefaultConfigValidator, ToolConfig,
};
use crate::error::Result;
use crate::tool::{ProcessRunner, ToolRunner};
use crate::types::ProjectLocation;
use crate::watch::{FileWatch, RefreshHub, RefreshReason};

use super::{makefile_targets, visual_studio_targets};

pub const NICE_NAME: &str = "cmake";

/// Configuration-derived state, shared with the config listeners
#[derive(Debug, Clone)]
struct AdapterState {
    location: ProjectLocation,
    build_suffix: String,
    generator: String,
    executable: String,
}

impl AdapterState {
    fn apply(&mut self, key: ConfigKey, value: &str) {
        match key {
            ConfigKey::BuildSuffix => {
                self.location.set_build_suffix(value);
                self.build_suffix = value.to_string();
            }
            ConfigKey::Generator => self.generator = value.trim().to_string(),
            ConfigKey::Executable => self.executable = value.to_string(),
        }
    }

    fn config(&self) -> ToolConfig {
        ToolConfig {
            build_suffix: self.build_suffix.clone(),
            generator: self.generator.clone(),
            executable: self.executable.clone(),
        }
    }
}

/// Discovers the CMake targets of one source directory.
///
/// Configuration comes from the injected `ConfigProvider`; every change to
/// one of its keys updates the derived state before the listener returns and
/// emits one `RefreshReason::ConfigChanged`. Every call to `targets` re-reads
/// the cache and re-arms the watch on the current cache path.
pub struct TargetDiscoverer {
    state: Arc<Mutex<AdapterState>>,
    hub: RefreshHub,
    runner: Arc<dyn ToolRunner>,
    watch: Mutex<Option<FileWatch>>,
}

impl TargetDiscoverer {
    pub fn new(source_dir: impl Into<PathBuf>, provider: Arc<dyn ConfigProvider>) -> Self {
        let defaults = ToolConfig::default();
        let value = |key: ConfigKey| provider.get(key).unwrap_or_else(|| key.read(&defaults));

        let build_suffix = value(ConfigKey::BuildSuffix);
        let mut state = AdapterState {
            location: ProjectLocation::new(source_dir, &build_suffix),
            build_suffix,
            generator: String::new(),
            executable: String::new(),
        };
        state.apply(ConfigKey::Generator, &value(ConfigKey::Generator));
        state.apply(ConfigKey::Executable, &value(ConfigKey::Executable));
        tracing::debug!(
            "cmake adapter for {:?}, build dir {:?}",
            state.location.source_dir(),
            state.location.build_dir()
        );

        let discoverer = Self {
            state: Arc::new(Mutex::new(state)),
            hub: RefreshHub::new(),
            runner: Arc::new(ProcessRunner::new()),
            watch: Mutex::new(None),
        };
        discoverer.observe(provider.as_ref());
        discoverer.report_issues();
        discoverer
    }

    /// Replace the subprocess runner, e.g. to change the help timeout
    pub fn with_tool_runner(mut self, runner: Arc<dyn ToolRunner>) -> Self {
        self.runner = runner;
        self
    }

    fn observe(&self, provider: &dyn ConfigProvider) {
        for key in ConfigKey::ALL {
            let state: Weak<Mutex<AdapterState>> = Arc::downgrade(&self.state);
            let hub = self.hub.clone();

            provider.on_change(
                key,
                Arc::new(move |value: &str| {
                    let Some(state) = state.upgrade() else {
                        return;
                    };
                    let config = {
                        let mut state = relock(&state);
                        state.apply(key, value);
                        state.config()
                    };
                    for issue in DefaultConfigValidator.validate(&config) {
                        tracing::warn!("{}", issue);
                    }
                    hub.emit(RefreshReason::ConfigChanged(key));
                }),
            );
        }
    }

    pub fn nice_name(&self) -> &'static str {
        NICE_NAME
    }

    pub fn is_eligible(&self) -> bool {
        CMakeProjectDetector::is_eligible(&self.location())
    }

    pub fn location(&self) -> ProjectLocation {
        relock(&self.state).location.clone()
    }

    pub fn config(&self) -> ToolConfig {
        relock(&self.state).config()
    }

    /// Receive a notification whenever the host should call `targets` again
    pub fn subscribe(&self) -> Receiver<RefreshReason> {
        self.hub.subscribe()
    }

    pub fn validate_config(&self) -> Vec<ConfigIssue> {
        DefaultConfigValidator.validate(&self.config())
    }

    /// Path of the cache file currently being watched
    pub fn watched_path(&self) -> Option<PathBuf> {
        relock(&self.watch).as_ref().map(|w| w.path().to_path_buf())
    }

    /// Produce the current targets: the configure target first, then the
    /// targets of the configured generator.
    ///
    /// An unconfigured build directory is not an error and yields only the
    /// configure target. A failing tool invocation is.
    pub fn targets(&self) -> Result<Vec<TargetDescriptor>> {
        let state = relock(&self.state).clone();
        let cache_path = state.location.cache_path();
        self.rewatch(&cache_path);

        let ctx = DescriptorContext {
            executable: &state.executable,
            source_dir: state.location.source_dir(),
            build_dir: state.location.build_dir(),
        };
        let mut targets = vec![DescriptorBuilder::configure(&ctx, &state.generator)];

        let cache = match CacheSnapshot::load(&cache_path) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::debug!("{:?} not readable ({}), offering configure only", cache_path, e);
                return Ok(targets);
            }
        };
        let Some(generator) = cache.generator() else {
            tracing::debug!("{:?} records no generator, offering configure only", cache_path);
            return Ok(targets);
        };

        let family = GeneratorFamily::from_generator(generator);
        tracing::debug!("Generator {:?} ({})", generator, family.name());
        match family {
            GeneratorFamily::VisualStudio => targets.extend(visual_studio_targets(&ctx)),
            GeneratorFamily::Makefile => targets.extend(makefile_targets(&ctx, self.runner.as_ref())?),
        }

        tracing::info!("Discovered {} target(s) in {:?}", targets.len(), ctx.build_dir);
        Ok(targets)
    }

    /// Drop the old watch before arming the new one
    fn rewatch(&self, cache_path: &Path) {
        let mut watch = relock(&self.watch);
        *watch = None;
        let hub = self.hub.clone();
        match FileWatch::new(cache_path, move || {
            hub.emit(RefreshReason::CacheModified);
        }) {
            Ok(new_watch) => *watch = Some(new_watch),
            Err(e) => tracing::warn!("Cannot watch {:?}: {}", cache_path, e),
        }
    }

    fn report_issues(&self) {
        for issue in self.validate_config() {
            tracing::warn!("{}", issue);
        }
    }
}

/// Lock, recovering the data if a previous holder panicked
fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
