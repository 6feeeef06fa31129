pub mod build;
mod config;
mod error;

pub use build::{build_executable_schema, write_schema_artifact};
pub use config::{ArtifactsConfig, Config};
pub use error::Error;
