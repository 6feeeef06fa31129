//! Create and update payloads.

use std::collections::BTreeMap;

use content_model::{is_writable_attribute, ContentModel};
use lang_graphql::ast::common as ast;
use lang_graphql::mk_name;
use lang_graphql::schema::{self as gql_schema, builtin};

use super::input_field;
use super::scalar_type::{graphql_scalar_for, ScalarType};
use crate::attributes::{classify, ClassifiedAttribute};
use crate::build::BuildContext;
use crate::{mk_field_name, mk_typename, naming, Annotation, Error};

fn id_or_ids(many: bool) -> ast::Type {
    if many {
        ast::Type::list_null(ast::Type::named_null(builtin::id()))
    } else {
        ast::Type::named_null(builtin::id())
    }
}

/// `{Type}Input` for content types and `{Component}Input` for components.
///
/// Only writable attributes with input enabled are included. Every field is
/// nullable so the same input serves create and partial update, except for
/// dynamic zones which take a list of non-null members.
pub(crate) fn build_input_type(
    ctx: &BuildContext<'_>,
    model: &ContentModel,
) -> Result<gql_schema::TypeInfo<Annotation>, Error> {
    let type_name = mk_typename(&naming::input_name(model))?;
    let mut fields = BTreeMap::new();

    if model.is_component() {
        let (name, field) = input_field(mk_name!("id"), ast::Type::named_null(builtin::id()), None);
        fields.insert(name, field);
    }

    for (attribute_name, attribute) in &model.attributes {
        if !is_writable_attribute(attribute_name, attribute)
            || !ctx.field(model, attribute_name).has_input_enabled()
        {
            continue;
        }
        let field_type = match classify(attribute) {
            ClassifiedAttribute::Scalar { kind } => ast::Type::named_null(
                graphql_scalar_for(&model.uid, attribute_name, kind)?.type_name(),
            ),
            ClassifiedAttribute::Enumeration { .. } => ast::Type::named_null(mk_typename(
                &naming::enum_name(model, attribute_name),
            )?),
            ClassifiedAttribute::Media { multiple } => id_or_ids(multiple),
            ClassifiedAttribute::MorphRelation { .. } => continue,
            ClassifiedAttribute::Relation { relation, target } => {
                if target.and_then(|uid| ctx.enabled_model(uid)).is_none() {
                    continue;
                }
                id_or_ids(relation.is_many())
            }
            ClassifiedAttribute::Component {
                component,
                repeatable,
            } => {
                let Some(component) = ctx.enabled_model(component) else {
                    continue;
                };
                let input = ast::Type::named_null(mk_typename(&naming::component_input_name(
                    component,
                ))?);
                if repeatable {
                    ast::Type::list_null(input)
                } else {
                    input
                }
            }
            ClassifiedAttribute::DynamicZone { components } => {
                if !components
                    .iter()
                    .any(|uid| ctx.enabled_model(uid).is_some())
                {
                    continue;
                }
                ast::Type::list_null(ast::Type::named_non_null(mk_typename(
                    &naming::dynamic_zone_input_name(model, attribute_name),
                )?))
            }
        };
        let (name, field) = input_field(mk_field_name(attribute_name)?, field_type, None);
        fields.insert(name, field);
    }

    if model.has_draft_and_publish() {
        let (name, field) = input_field(
            mk_name!("publishedAt"),
            ast::Type::named_null(ScalarType::DateTime.type_name()),
            None,
        );
        fields.insert(name, field);
    }

    Ok(gql_schema::TypeInfo::InputObject(
        gql_schema::InputObject::new(type_name, None, fields),
    ))
}
