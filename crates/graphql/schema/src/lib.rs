// we deliberately do not export these entire modules and instead explicitly export types below
mod build;
mod extension;
mod field_arguments;
mod model_filter_input;
mod mutation_root;
mod query_root;
mod registry;
mod shadow_crud;
mod types;

pub mod attributes;
pub mod naming;

use std::str::FromStr;

use content_model::ModelUid;
use lang_graphql::ast::common as ast;
use lang_graphql::schema as gql_schema;

pub use build::{build_schema, BuildOptions, CompiledSchema};
pub use extension::{Extension, ExtensionStore, ResolverConfig};
pub use model_filter_input::build_scalar_filter_input;
pub use registry::{Definition, EntryConfig, EntryConfigFactory, Kind, RegistryEntry, TypeRegistry};
pub use shadow_crud::{FieldShadowCrud, ModelShadowCrud, ShadowCrudStore};
pub use types::scalar_type::{graphql_scalar_for, FilterOperator, ScalarType};
pub use types::{
    Annotation, AttributeFieldKind, CrudAction, InputAnnotation, OutputAnnotation,
    RootFieldAnnotation,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("a schema artifact named {type_name} is already registered")]
    DuplicateTypeName { type_name: String },

    #[error("attribute {attribute_name} of {model_uid} has an unknown scalar type: {scalar_kind}")]
    UnknownScalarKind {
        model_uid: ModelUid,
        attribute_name: String,
        scalar_kind: String,
    },

    #[error("{name} is not a valid GraphQL name")]
    InvalidGraphQlName { name: String },

    #[error("the filter operator {operator} is not available for the scalar {scalar}")]
    InvalidFilterOperator {
        operator: FilterOperator,
        scalar: ScalarType,
    },

    #[error("the values {first} and {second} of enumeration {enum_name} map to the same GraphQL enum value")]
    ConflictingEnumValue {
        enum_name: String,
        first: String,
        second: String,
    },

    #[error("cannot add fields to {type_name}: no object type with that name exists")]
    UnknownExtendedType { type_name: ast::TypeName },

    #[error("field {field_name} is defined more than once on {type_name}")]
    DuplicateField {
        type_name: ast::TypeName,
        field_name: ast::Name,
    },

    #[error("no content model with uid {model_uid} exists")]
    UnknownModel { model_uid: ModelUid },

    #[error("internal error while building schema: {error}")]
    InternalBuildError {
        #[from]
        error: gql_schema::Error,
    },
}

impl From<ast::InvalidGraphQlName> for Error {
    fn from(error: ast::InvalidGraphQlName) -> Self {
        Error::InvalidGraphQlName { name: error.0 }
    }
}

pub fn mk_typename(name: &str) -> Result<ast::TypeName, Error> {
    match ast::Name::from_str(name) {
        Ok(name) => Ok(ast::TypeName(name)),
        Err(_) => Err(Error::InvalidGraphQlName {
            name: name.to_string(),
        }),
    }
}

pub fn mk_field_name(name: &str) -> Result<ast::Name, Error> {
    Ok(ast::Name::from_str(name)?)
}
