use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Name of the cache file CMake writes into every build directory
pub const CACHE_FILE_NAME: &str = "CMakeCache.txt";

/// Name of the project description file at the source root
pub const PROJECT_FILE_NAME: &str = "CMakeLists.txt";

/// Source directory of a CMake project and the build directory derived from it.
///
/// The build directory is the source directory with the configured suffix
/// appended as a plain string, so a suffix of `-build` yields a sibling
/// directory and a suffix of `/build` yields a child directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    source_dir: PathBuf,
    build_dir: PathBuf,
}

impl ProjectLocation {
    pub fn new(source_dir: impl Into<PathBuf>, build_suffix: &str) -> Self {
        let source_dir = source_dir.into();
        let build_dir = derive_build_dir(&source_dir, build_suffix);
        Self {
            source_dir,
            build_dir,
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn cache_path(&self) -> PathBuf {
        self.build_dir.join(CACHE_FILE_NAME)
    }

    pub fn project_file(&self) -> PathBuf {
        self.source_dir.join(PROJECT_FILE_NAME)
    }

    /// Recompute the build directory for a new suffix
    pub fn set_build_suffix(&mut self, build_suffix: &str) {
        self.build_dir = derive_build_dir(&self.source_dir, build_suffix);
    }
}

fn derive_build_dir(source_dir: &Path, build_suffix: &str) -> PathBuf {
    let mut raw = OsString::from(source_dir.as_os_str());
    raw.push(build_suffix);
    PathBuf::from(raw)
}
