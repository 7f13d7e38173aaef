//! Reading `CMakeCache.txt`

use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::Result;

/// `KEY:TYPE=value`, where the key may be quoted to carry a colon
static CACHE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:"(?<qkey>[^"]*)"|(?<key>[^:=]+)):(?<type>[A-Za-z_]+)=(?<value>.*)$"#).unwrap()
});

pub const GENERATOR_KEY: &str = "CMAKE_GENERATOR";

/// One typed entry of the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub kind: String,
    pub value: String,
}

/// Entries of a build directory's cache file, read fresh on every pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    entries: BTreeMap<String, CacheEntry>,
}

impl CacheSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in contents.lines() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }
            let Some(caps) = CACHE_ENTRY.captures(line) else {
                continue;
            };
            let key = caps
                .name("qkey")
                .or_else(|| caps.name("key"))
                .map(|m| m.as_str().to_string());
            if let Some(key) = key {
                entries.insert(
                    key,
                    CacheEntry {
                        kind: caps["type"].to_string(),
                        value: caps["value"].to_string(),
                    },
                );
            }
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.value.as_str())
    }

    pub fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// The generator CMake recorded for this build directory.
    /// `None` means the directory has not been configured.
    pub fn generator(&self) -> Option<&str> {
        self.entries
            .get(GENERATOR_KEY)
            .filter(|e| e.kind == "INTERNAL")
            .map(|e| e.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
