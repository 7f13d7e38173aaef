pub mod cache;

use std::path::Path;

use crate::types::{CACHE_FILE_NAME, PROJECT_FILE_NAME, ProjectLocation};

pub use cache::CacheSnapshot;

/// Substring identifying the multi-config IDE generators
const VISUAL_STUDIO_MARKER: &str = "Visual Studio";

/// Backend build-file flavor, derived from the generator name in the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorFamily {
    Makefile,
    VisualStudio,
}

impl GeneratorFamily {
    pub fn from_generator(generator: &str) -> Self {
        if generator.contains(VISUAL_STUDIO_MARKER) {
            GeneratorFamily::VisualStudio
        } else {
            GeneratorFamily::Makefile
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GeneratorFamily::Makefile => "makefile",
            GeneratorFamily::VisualStudio => "visual-studio",
        }
    }
}

pub trait ProjectDetector {
    fn is_eligible(location: &ProjectLocation) -> bool;
}

pub struct CMakeProjectDetector;

impl ProjectDetector for CMakeProjectDetector {
    fn is_eligible(location: &ProjectLocation) -> bool {
        is_cmake_project(location.source_dir(), location.build_dir())
    }
}

/// True when the source root has a `CMakeLists.txt` or the build root
/// already carries a `CMakeCache.txt`
pub fn is_cmake_project(source_dir: &Path, build_dir: &Path) -> bool {
    source_dir.join(PROJECT_FILE_NAME).exists() || build_dir.join(CACHE_FILE_NAME).exists()
}
