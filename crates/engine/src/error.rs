use std::path::PathBuf;

use engine_types::{ErrorVisibility, TraceableError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid engine config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("could not read the engine config from {path}: {error}")]
    ReadConfig {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("unable to build schema: {0}")]
    Build(#[from] graphql_schema::Error),

    #[error("unable to attach resolvers: {0}")]
    Resolvers(#[from] execute::Error),

    #[error("could not write the schema artifact to {path}: {error}")]
    WriteArtifact {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl TraceableError for Error {
    fn visibility(&self) -> ErrorVisibility {
        match self {
            Error::Build(graphql_schema::Error::InternalBuildError { .. }) => {
                ErrorVisibility::Internal
            }
            Error::Config(_)
            | Error::ReadConfig { .. }
            | Error::Build(_)
            | Error::Resolvers(_)
            | Error::WriteArtifact { .. } => ErrorVisibility::User,
        }
    }
}
