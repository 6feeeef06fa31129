//! Types every compiled schema carries regardless of the content models.

use std::collections::BTreeMap;

use lang_graphql::ast::common as ast;
use lang_graphql::ast::value::ConstValue;
use lang_graphql::mk_name;
use lang_graphql::schema::{self as gql_schema, builtin};

use super::{input_field, object_field};
use crate::registry::{EntryConfig, Kind, TypeRegistry};
use crate::{Annotation, Error, OutputAnnotation};

pub const ERROR_TYPE_NAME: &str = "Error";
pub const PAGINATION_TYPE_NAME: &str = "Pagination";
pub const RESPONSE_COLLECTION_META_TYPE_NAME: &str = "ResponseCollectionMeta";
pub const PAGINATION_ARG_TYPE_NAME: &str = "PaginationArg";
pub const PUBLICATION_STATE_TYPE_NAME: &str = "PublicationState";
pub const GENERIC_MORPH_TYPE_NAME: &str = "GenericMorph";

pub fn error_type_name() -> ast::TypeName {
    ast::TypeName(mk_name!("Error"))
}

pub fn pagination_arg_type_name() -> ast::TypeName {
    ast::TypeName(mk_name!("PaginationArg"))
}

pub fn publication_state_type_name() -> ast::TypeName {
    ast::TypeName(mk_name!("PublicationState"))
}

pub fn response_collection_meta_type_name() -> ast::TypeName {
    ast::TypeName(mk_name!("ResponseCollectionMeta"))
}

pub fn generic_morph_type_name() -> ast::TypeName {
    ast::TypeName(mk_name!("GenericMorph"))
}

fn scalar(name: ast::TypeName, description: Option<&str>) -> gql_schema::TypeInfo<Annotation> {
    gql_schema::TypeInfo::Scalar(gql_schema::Scalar {
        name,
        description: description.map(ToString::to_string),
        info: Annotation::Scalar,
    })
}

fn scalars() -> Vec<gql_schema::TypeInfo<Annotation>> {
    vec![
        scalar(builtin::id(), None),
        scalar(builtin::string(), None),
        scalar(builtin::int(), None),
        scalar(builtin::float(), None),
        scalar(builtin::boolean(), None),
        scalar(
            ast::TypeName(mk_name!("JSON")),
            Some("The `JSON` scalar type represents JSON values as specified by ECMA-404"),
        ),
        scalar(
            ast::TypeName(mk_name!("DateTime")),
            Some("A date-time string at UTC, such as 2007-12-03T10:15:30Z, compliant with the `date-time` format outlined in section 5.6 of the RFC 3339 profile of the ISO 8601 standard for representation of dates and times using the Gregorian calendar."),
        ),
        scalar(
            ast::TypeName(mk_name!("Date")),
            Some("A date string, such as 2007-12-03, compliant with the `full-date` format outlined in section 5.6 of the RFC 3339 profile of the ISO 8601 standard for representation of dates and times using the Gregorian calendar."),
        ),
        scalar(
            ast::TypeName(mk_name!("Time")),
            Some("A time string with format HH:mm:ss.SSS"),
        ),
        scalar(
            ast::TypeName(mk_name!("Long")),
            Some("The `BigInt` scalar type represents non-fractional signed whole numeric values."),
        ),
        scalar(
            ast::TypeName(mk_name!("Upload")),
            Some("The `Upload` scalar type represents a file upload."),
        ),
    ]
}

fn error_type() -> gql_schema::TypeInfo<Annotation> {
    gql_schema::TypeInfo::Object(gql_schema::Object::new(
        error_type_name(),
        None,
        BTreeMap::from([
            object_field(
                mk_name!("code"),
                ast::Type::named_non_null(builtin::string()),
                Annotation::field(),
            ),
            object_field(
                mk_name!("message"),
                ast::Type::named_null(builtin::string()),
                Annotation::field(),
            ),
        ]),
    ))
}

fn pagination_type() -> gql_schema::TypeInfo<Annotation> {
    let int_field = |name: ast::Name| {
        object_field(
            name,
            ast::Type::named_non_null(builtin::int()),
            Annotation::field(),
        )
    };
    gql_schema::TypeInfo::Object(gql_schema::Object::new(
        ast::TypeName(mk_name!("Pagination")),
        None,
        BTreeMap::from([
            int_field(mk_name!("total")),
            int_field(mk_name!("page")),
            int_field(mk_name!("pageSize")),
            int_field(mk_name!("pageCount")),
        ]),
    ))
}

fn response_collection_meta_type() -> gql_schema::TypeInfo<Annotation> {
    gql_schema::TypeInfo::Object(gql_schema::Object::new(
        response_collection_meta_type_name(),
        None,
        BTreeMap::from([object_field(
            mk_name!("pagination"),
            ast::Type::named_non_null(ast::TypeName(mk_name!("Pagination"))),
            Annotation::Output(OutputAnnotation::MetaPagination),
        )]),
    ))
}

fn pagination_arg_type() -> gql_schema::TypeInfo<Annotation> {
    let int_field = |name: ast::Name| input_field(name, ast::Type::named_null(builtin::int()), None);
    gql_schema::TypeInfo::InputObject(gql_schema::InputObject::new(
        pagination_arg_type_name(),
        None,
        BTreeMap::from([
            int_field(mk_name!("page")),
            int_field(mk_name!("pageSize")),
            int_field(mk_name!("start")),
            int_field(mk_name!("limit")),
        ]),
    ))
}

fn publication_state_type() -> gql_schema::TypeInfo<Annotation> {
    let value = |name: ast::Name, original: &str| {
        (
            name.clone(),
            gql_schema::EnumValue {
                value: name,
                description: None,
                info: Annotation::EnumValue {
                    original: original.to_string(),
                },
            },
        )
    };
    gql_schema::TypeInfo::Enum(gql_schema::Enum {
        name: publication_state_type_name(),
        description: None,
        values: BTreeMap::from([
            value(mk_name!("LIVE"), "live"),
            value(mk_name!("PREVIEW"), "preview"),
        ]),
    })
}

/// The default of `publicationState` arguments.
pub fn publication_state_live() -> ConstValue {
    ConstValue::Enum(mk_name!("LIVE"))
}

pub fn register_internal_types(registry: &mut TypeRegistry) -> Result<(), Error> {
    for scalar in scalars() {
        registry.register_type(scalar, EntryConfig::new(Kind::Scalar))?;
    }
    for internal in [
        error_type(),
        pagination_type(),
        response_collection_meta_type(),
        pagination_arg_type(),
        publication_state_type(),
    ] {
        registry.register_type(internal, EntryConfig::new(Kind::Internal))?;
    }
    Ok(())
}
