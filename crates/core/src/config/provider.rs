//! Host configuration store seen by the adapter
//!
//! The adapter never reads process-wide state. It is handed a
//! `ConfigProvider`, reads the three keys it cares about and registers a
//! listener per key.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use super::ToolConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    BuildSuffix,
    Generator,
    Executable,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 3] = [
        ConfigKey::BuildSuffix,
        ConfigKey::Generator,
        ConfigKey::Executable,
    ];

    /// Key name in the host's configuration store
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::BuildSuffix => "cmake.build_suffix",
            ConfigKey::Generator => "cmake.generator",
            ConfigKey::Executable => "cmake.executable",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Value of this key in a `ToolConfig`
    pub fn read(&self, config: &ToolConfig) -> String {
        match self {
            ConfigKey::BuildSuffix => config.build_suffix.clone(),
            ConfigKey::Generator => config.generator.clone(),
            ConfigKey::Executable => config.executable.clone(),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Called synchronously with the new value after a key changes
pub type ConfigListener = Arc<dyn Fn(&str) + Send + Sync>;

pub trait ConfigProvider: Send + Sync {
    /// Current value, `None` when the store has no value for the key
    fn get(&self, key: ConfigKey) -> Option<String>;

    /// Register interest in changes to `key`
    fn on_change(&self, key: ConfigKey, listener: ConfigListener);
}

/// In-process configuration store with an explicit subscription list
#[derive(Default)]
pub struct MemoryConfigProvider {
    values: RwLock<HashMap<ConfigKey, String>>,
    listeners: Mutex<Vec<(ConfigKey, ConfigListener)>>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ToolConfig) -> Self {
        let provider = Self::new();
        if let Ok(mut values) = provider.values.write() {
            for key in ConfigKey::ALL {
                values.insert(key, key.read(config));
            }
        }
        provider
    }

    /// Store a value and notify the key's listeners if it changed.
    /// Returns whether a change happened.
    pub fn set(&self, key: ConfigKey, value: impl Into<String>) -> bool {
        let value = value.into();
        {
            let Ok(mut values) = self.values.write() else {
                return false;
            };
            if values.get(&key) == Some(&value) {
                return false;
            }
            values.insert(key, value.clone());
        }

        // Listeners run without any lock held so they may read back
        let listeners: Vec<ConfigListener> = match self.listeners.lock() {
            Ok(listeners) => listeners
                .iter()
                .filter(|(k, _)| *k == key)
                .map(|(_, l)| Arc::clone(l))
                .collect(),
            Err(_) => Vec::new(),
        };
        tracing::debug!("{} changed, notifying {} listener(s)", key, listeners.len());
        for listener in listeners {
            listener(value.as_str());
        }
        true
    }

    /// Set every key from `config`; each differing key notifies on its own
    pub fn apply(&self, config: &ToolConfig) -> usize {
        ConfigKey::ALL
            .into_iter()
            .filter(|key| self.set(*key, key.read(config)))
            .count()
    }

    pub fn snapshot(&self) -> ToolConfig {
        let defaults = ToolConfig::default();
        let value = |key: ConfigKey| self.get(key).unwrap_or_else(|| key.read(&defaults));
        ToolConfig {
            build_suffix: value(ConfigKey::BuildSuffix),
            generator: value(ConfigKey::Generator),
            executable: value(ConfigKey::Executable),
        }
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get(&self, key: ConfigKey) -> Option<String> {
        self.values.read().ok()?.get(&key).cloned()
    }

    fn on_change(&self, key: ConfigKey, listener: ConfigListener) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((key, listener));
        }
    }
}

impl fmt::Debug for MemoryConfigProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryConfigProvider")
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter(provider: &MemoryConfigProvider, key: ConfigKey) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        provider.on_change(
            key,
            Arc::new(move |_: &str| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        );
        count
    }

    #[test]
    fn test_key_names_round_trip() {
        for key in ConfigKey::ALL {
            assert_eq!(ConfigKey::from_name(key.as_str()), Some(key));
        }
        assert_eq!(ConfigKey::from_name("cmake.unknown"), None);
    }

    #[test]
    fn test_set_notifies_only_matching_key() {
        let provider = MemoryConfigProvider::new();
        let suffix = counter(&provider, ConfigKey::BuildSuffix);
        let generator = counter(&provider, ConfigKey::Generator);

        assert!(provider.set(ConfigKey::BuildSuffix, "-build"));
        assert_eq!(suffix.load(Ordering::SeqCst), 1);
        assert_eq!(generator.load(Ordering::SeqCst), 0);
        assert_eq!(provider.get(ConfigKey::BuildSuffix).as_deref(), Some("-build"));
    }

    #[test]
    fn test_unchanged_value_is_silent() {
        let provider = MemoryConfigProvider::from_config(&ToolConfig::default());
        let executable = counter(&provider, ConfigKey::Executable);
        assert!(!provider.set(ConfigKey::Executable, "cmake"));
        assert_eq!(executable.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_apply_counts_each_change() {
        let provider = MemoryConfigProvider::from_config(&ToolConfig::default());
        let changed = provider.apply(&ToolConfig {
            build_suffix: "/out".to_string(),
            generator: "Ninja".to_string(),
            ..Default::default()
        });
        assert_eq!(changed, 2);
        assert_eq!(provider.snapshot().generator, "Ninja");
        assert_eq!(provider.snapshot().executable, "cmake");
    }

    #[test]
    fn test_listener_may_read_back() {
        let provider = Arc::new(MemoryConfigProvider::new());
        let observed = Arc::new(Mutex::new(None));
        let (p, o) = (Arc::clone(&provider), Arc::clone(&observed));
        provider.on_change(
            ConfigKey::Generator,
            Arc::new(move |_: &str| {
                *o.lock().unwrap() = p.get(ConfigKey::Generator);
            }),
        );
        provider.set(ConfigKey::Generator, "Ninja");
        assert_eq!(observed.lock().unwrap().as_deref(), Some("Ninja"));
    }
}
