use std::path::Path;
use std::sync::Arc;

use content_model::ContentModelSet;
use execute::{ExecutableSchema, Services};
use graphql_schema::{BuildOptions, ExtensionStore, ShadowCrudStore};

use crate::{Config, Error};

/// Compiles the content models and extensions into a schema and attaches
/// the wrapped resolvers. Shadow CRUD and extensions must be fully
/// configured before this is called; nothing is built on failure.
#[tracing::instrument(skip_all, fields(models = models.len()))]
pub fn build_executable_schema(
    config: &Config,
    models: ContentModelSet,
    shadow_crud: &ShadowCrudStore,
    extensions: &ExtensionStore,
    services: &Services,
) -> Result<ExecutableSchema, Error> {
    let compiled = graphql_schema::build_schema(
        &models,
        shadow_crud,
        extensions,
        &BuildOptions {
            shadow_crud: config.shadow_crud,
        },
    )?;
    let mut schema = ExecutableSchema::new(
        compiled,
        Arc::new(models),
        services,
        extensions.resolvers(),
        &config.executable_schema_options(),
    )?;

    if config.prune_unused_types {
        let removed = schema.prune_unused_types();
        tracing::debug!(removed = ?removed, "removed unused types");
    }
    if config.generate_artifacts {
        write_schema_artifact(&schema, &config.artifacts.schema)?;
    }
    tracing::info!(
        types = schema.schema().types.len(),
        "executable schema built"
    );
    Ok(schema)
}

/// Writes the SDL of `schema` to `path`, creating missing directories.
pub fn write_schema_artifact(schema: &ExecutableSchema, path: &Path) -> Result<(), Error> {
    let write_error = |error: std::io::Error| Error::WriteArtifact {
        path: path.to_path_buf(),
        error,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, schema.sdl()).map_err(write_error)?;
    tracing::debug!(path = %path.display(), "wrote schema artifact");
    Ok(())
}
