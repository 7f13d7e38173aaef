pub mod location;

pub use location::{CACHE_FILE_NAME, PROJECT_FILE_NAME, ProjectLocation};
