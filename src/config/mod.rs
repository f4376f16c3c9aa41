//! Configuration — YAML schema and layered loading.

pub mod loader;
pub mod schema;

pub use loader::{apply_env, default_config_path, load_config};
pub use schema::OrgChartConfig;
