//! The content models a schema is compiled from.
//!
//! Models are plain data: a uid, a kind, display metadata and an ordered map
//! of attributes. They are deserialized from JSON and never mutated during a
//! compilation pass.

mod attribute;
mod error;
mod model;

pub use attribute::{
    is_writable_attribute, Attribute, AttributeKind, RelationKind, RelationTarget, ScalarKind,
    NON_WRITABLE_ATTRIBUTES,
};
pub use error::Error;
pub use model::{
    ContentModel, ContentModelSet, ModelInfo, ModelKind, ModelOptions, ModelUid, FILE_MODEL_UID,
};
