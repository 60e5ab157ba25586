//! CLI subcommand implementations.

pub mod batch;
pub mod estimate;
pub mod presets;
pub mod util;
pub mod validate;
