use crate::ModelUid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to parse content models: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unable to read content models from {path}: {error}")]
    Io {
        path: std::path::PathBuf,
        error: std::io::Error,
    },

    #[error("content model {0} is defined more than once")]
    DuplicateModel(ModelUid),

    #[error("attribute {attribute_name} of content model {model_uid} is invalid: {reason}")]
    InvalidAttribute {
        model_uid: ModelUid,
        attribute_name: String,
        reason: String,
    },
}
