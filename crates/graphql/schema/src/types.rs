use std::collections::BTreeMap;

use content_model::ModelUid;
use lang_graphql::ast::common as ast;
use lang_graphql::ast::value::ConstValue;
use lang_graphql::schema as gql_schema;
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::Error;

pub mod enum_type;
pub mod inbuilt_type;
pub mod input_type;
pub mod output_type;
pub mod response_type;
pub mod scalar_type;
pub mod union_type;

/// The CRUD operations shadow CRUD can generate for a model. The string form
/// is the action name used in shadow CRUD and auth scopes.
#[derive(
    Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum CrudAction {
    Find,
    FindOne,
    Create,
    Update,
    Delete,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub enum RootFieldAnnotation {
    Crud { model: ModelUid, action: CrudAction },
    /// A root field added by an extension; its resolver comes from there too.
    Custom,
}

/// How an attribute field of a model's object type is resolved.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub enum AttributeFieldKind {
    Scalar,
    Enumeration,
    Relation { target: ModelUid, many: bool },
    Media { multiple: bool },
    MorphRelation { many: bool },
    Component { component: ModelUid, repeatable: bool },
    DynamicZone,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub enum OutputAnnotation {
    RootField(RootFieldAnnotation),
    Attribute {
        model: ModelUid,
        attribute_name: String,
        kind: AttributeFieldKind,
    },
    /// `{Entity}Response.data`, the single record of a response.
    ResponseData,
    /// `data` of a response collection or relation response collection.
    ResponseCollectionData,
    /// `{Entity}ResponseCollection.meta`
    ResponseCollectionMeta,
    /// `ResponseCollectionMeta.pagination`
    MetaPagination,
    /// A field read straight off its parent value.
    Field,
    /// A field added by an extension to an existing type.
    Custom,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub enum InputAnnotation {
    /// An argument of an output field.
    Argument,
    /// A field of an input object.
    InputField,
}

/// The information attached to every node of the compiled schema, read back
/// at execution time.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub enum Annotation {
    Output(OutputAnnotation),
    Input(InputAnnotation),
    Scalar,
    /// A dynamic zone input scalar: concrete component type name to the
    /// component uid stored with the value.
    DynamicZoneInput {
        components: BTreeMap<ast::TypeName, ModelUid>,
    },
    /// An enum value together with the value stored in the data layer.
    EnumValue { original: String },
    /// A union over model types, keyed by the uid a value is tagged with.
    Union {
        members_by_uid: BTreeMap<ModelUid, ast::TypeName>,
    },
}

impl Annotation {
    pub fn field() -> Self {
        Annotation::Output(OutputAnnotation::Field)
    }

    pub fn argument() -> Self {
        Annotation::Input(InputAnnotation::Argument)
    }

    pub fn input_field() -> Self {
        Annotation::Input(InputAnnotation::InputField)
    }

    pub fn custom() -> Self {
        Annotation::Output(OutputAnnotation::Custom)
    }
}

pub(crate) fn object_field(
    name: ast::Name,
    field_type: ast::Type,
    info: Annotation,
) -> (ast::Name, gql_schema::Field<Annotation>) {
    (
        name.clone(),
        gql_schema::Field::new(name, None, info, field_type, BTreeMap::new()),
    )
}

pub(crate) fn input_field(
    name: ast::Name,
    field_type: ast::Type,
    default_value: Option<ConstValue>,
) -> (ast::Name, gql_schema::InputField<Annotation>) {
    (
        name.clone(),
        gql_schema::InputField::new(
            name,
            None,
            Annotation::input_field(),
            field_type,
            default_value,
        ),
    )
}

/// Adds a field, failing on a second field of the same name.
pub(crate) fn insert_field<F>(
    fields: &mut BTreeMap<ast::Name, F>,
    type_name: &ast::TypeName,
    field_name: ast::Name,
    field: F,
) -> Result<(), Error> {
    if fields.contains_key(&field_name) {
        return Err(Error::DuplicateField {
            type_name: type_name.clone(),
            field_name,
        });
    }
    fields.insert(field_name, field);
    Ok(())
}
