use std::path::{Path, PathBuf};

use execute::{ExecutableSchemaOptions, PaginationConfig, PolicyPlacement};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Settings of one schema build.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// Generate the CRUD schema of the content models. When off only
    /// extensions contribute to the schema.
    pub shadow_crud: bool,
    pub default_limit: u64,
    /// Upper bound of every list query. `None` also permits `limit: -1`.
    pub max_limit: Option<u64>,
    pub policy_placement: PolicyPlacement,
    /// Write the SDL of the built schema to `artifacts.schema`.
    pub generate_artifacts: bool,
    pub artifacts: ArtifactsConfig,
    pub prune_unused_types: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ArtifactsConfig {
    pub schema: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        ArtifactsConfig {
            schema: PathBuf::from("schema.graphql"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            shadow_crud: true,
            default_limit: PaginationConfig::default().default_limit,
            max_limit: None,
            policy_placement: PolicyPlacement::default(),
            generate_artifacts: false,
            artifacts: ArtifactsConfig::default(),
            prune_unused_types: true,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|error| Error::ReadConfig {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_json_str(&json)
    }

    pub fn executable_schema_options(&self) -> ExecutableSchemaOptions {
        ExecutableSchemaOptions {
            policy_placement: self.policy_placement,
            pagination: PaginationConfig {
                default_limit: self.default_limit,
                max_limit: self.max_limit,
            },
        }
    }
}
