//! Target descriptors and their construction

pub mod builder;
pub mod descriptor;

pub use builder::{CLEAN_TARGET, DescriptorBuilder, DescriptorContext, GENERATE_TARGET, cpu_count};
pub use descriptor::{ExecutionReport, TargetDescriptor};
