//! Entity wrappers and responses of content types.

use std::collections::BTreeMap;

use content_model::ContentModel;
use lang_graphql::ast::common as ast;
use lang_graphql::mk_name;
use lang_graphql::schema::{self as gql_schema, builtin};

use super::inbuilt_type::response_collection_meta_type_name;
use super::object_field;
use crate::{mk_typename, naming, Annotation, Error, OutputAnnotation};

fn object(
    name: String,
    fields: impl IntoIterator<Item = (ast::Name, gql_schema::Field<Annotation>)>,
) -> Result<gql_schema::TypeInfo<Annotation>, Error> {
    Ok(gql_schema::TypeInfo::Object(gql_schema::Object::new(
        mk_typename(&name)?,
        None,
        BTreeMap::from_iter(fields),
    )))
}

fn entities_type(model: &ContentModel) -> Result<ast::Type, Error> {
    Ok(ast::Type::list_non_null(ast::Type::named_non_null(
        mk_typename(&naming::entity_name(model))?,
    )))
}

/// `{Type}Entity { id: ID, attributes: {Type} }`
pub(crate) fn build_entity(model: &ContentModel) -> Result<gql_schema::TypeInfo<Annotation>, Error> {
    object(
        naming::entity_name(model),
        [
            object_field(
                mk_name!("id"),
                ast::Type::named_null(builtin::id()),
                Annotation::field(),
            ),
            object_field(
                mk_name!("attributes"),
                ast::Type::named_null(mk_typename(&naming::type_name(model))?),
                Annotation::field(),
            ),
        ],
    )
}

/// `{Entity}Response { data: {Entity} }`
pub(crate) fn build_entity_response(
    model: &ContentModel,
) -> Result<gql_schema::TypeInfo<Annotation>, Error> {
    object(
        naming::entity_response_name(model),
        [object_field(
            mk_name!("data"),
            ast::Type::named_null(mk_typename(&naming::entity_name(model))?),
            Annotation::Output(OutputAnnotation::ResponseData),
        )],
    )
}

/// `{Entity}ResponseCollection { data: [{Entity}!]!, meta: ResponseCollectionMeta! }`
pub(crate) fn build_entity_response_collection(
    model: &ContentModel,
) -> Result<gql_schema::TypeInfo<Annotation>, Error> {
    object(
        naming::entity_response_collection_name(model),
        [
            object_field(
                mk_name!("data"),
                entities_type(model)?,
                Annotation::Output(OutputAnnotation::ResponseCollectionData),
            ),
            object_field(
                mk_name!("meta"),
                ast::Type::named_non_null(response_collection_meta_type_name()),
                Annotation::Output(OutputAnnotation::ResponseCollectionMeta),
            ),
        ],
    )
}

/// `{Type}RelationResponseCollection { data: [{Entity}!]! }`
pub(crate) fn build_relation_response_collection(
    model: &ContentModel,
) -> Result<gql_schema::TypeInfo<Annotation>, Error> {
    object(
        naming::relation_response_collection_name(model),
        [object_field(
            mk_name!("data"),
            entities_type(model)?,
            Annotation::Output(OutputAnnotation::ResponseCollectionData),
        )],
    )
}
