use std::collections::BTreeMap;

use content_model::{ContentModel, ModelUid, FILE_MODEL_UID};
use lang_graphql::ast::common as ast;
use lang_graphql::mk_name;
use lang_graphql::schema as gql_schema;
use strum::IntoEnumIterator;

use crate::attributes::{classify, ClassifiedAttribute};
use crate::build::BuildContext;
use crate::registry::{EntryConfig, Kind, TypeRegistry};
use crate::types::input_field;
use crate::types::scalar_type::{graphql_scalar_for, FilterOperator, ScalarType};
use crate::{mk_field_name, mk_typename, naming, Annotation, Error};

const LOGICAL_OPERATORS: [FilterOperator; 3] =
    [FilterOperator::And, FilterOperator::Or, FilterOperator::Not];

fn scalar_filter_input_type_name(scalar: ScalarType) -> Result<ast::TypeName, Error> {
    mk_typename(&naming::scalar_filter_input_name(&scalar.to_string()))
}

/// `{Scalar}FilterInput` with one field per operator. Operators not
/// applicable to `scalar` are rejected; `and`, `or` and `not` are always
/// present.
pub fn build_scalar_filter_input(
    scalar: ScalarType,
    operators: &[FilterOperator],
) -> Result<gql_schema::TypeInfo<Annotation>, Error> {
    let mut fields = BTreeMap::new();
    for operator in operators.iter().chain(LOGICAL_OPERATORS.iter()) {
        if !operator.is_logical() && !scalar.operators().contains(operator) {
            return Err(Error::InvalidFilterOperator {
                operator: *operator,
                scalar,
            });
        }
        let (name, field) = input_field(
            mk_field_name(&operator.to_string())?,
            operator.field_type(scalar)?,
            None,
        );
        fields.insert(name, field);
    }
    Ok(gql_schema::TypeInfo::InputObject(
        gql_schema::InputObject::new(scalar_filter_input_type_name(scalar)?, None, fields),
    ))
}

/// One scalar filter input per output scalar.
pub(crate) fn register_scalar_filter_inputs(registry: &mut TypeRegistry) -> Result<(), Error> {
    for scalar in ScalarType::iter() {
        registry.register_type(
            build_scalar_filter_input(scalar, scalar.operators())?,
            EntryConfig::new(Kind::ScalarFilterInput),
        )?;
    }
    Ok(())
}

/// `{Type}FiltersInput`: an `id` filter for collection types, a filter per
/// filterable attribute, and the `and`/`or`/`not` combinators over itself.
pub(crate) fn build_filters_input(
    ctx: &BuildContext<'_>,
    model: &ContentModel,
) -> Result<gql_schema::TypeInfo<Annotation>, Error> {
    let type_name = mk_typename(&naming::filters_input_name(model))?;
    let mut fields = BTreeMap::new();

    if model.is_collection_type() && ctx.field(model, "id").has_filters_enabled() {
        let (name, field) = input_field(
            mk_name!("id"),
            ast::Type::named_null(scalar_filter_input_type_name(ScalarType::Id)?),
            None,
        );
        fields.insert(name, field);
    }

    for (attribute_name, attribute) in &model.attributes {
        if attribute.private || !ctx.field(model, attribute_name).has_filters_enabled() {
            continue;
        }
        let filter_type_name = match classify(attribute) {
            ClassifiedAttribute::Scalar { kind } => scalar_filter_input_type_name(
                graphql_scalar_for(&model.uid, attribute_name, kind)?,
            )?,
            ClassifiedAttribute::Enumeration { .. } => {
                scalar_filter_input_type_name(ScalarType::String)?
            }
            ClassifiedAttribute::Relation { target, .. } => {
                match target.and_then(|uid| ctx.enabled_model(uid)) {
                    Some(target) => mk_typename(&naming::filters_input_name(target))?,
                    None => continue,
                }
            }
            ClassifiedAttribute::Media { .. } => {
                match ctx.enabled_model(&ModelUid::new(FILE_MODEL_UID)) {
                    Some(file_model) => mk_typename(&naming::filters_input_name(file_model))?,
                    None => continue,
                }
            }
            ClassifiedAttribute::Component { component, .. } => {
                match ctx.enabled_model(component) {
                    Some(component) => mk_typename(&naming::filters_input_name(component))?,
                    None => continue,
                }
            }
            ClassifiedAttribute::MorphRelation { .. }
            | ClassifiedAttribute::DynamicZone { .. } => continue,
        };
        let (name, field) = input_field(
            mk_field_name(attribute_name)?,
            ast::Type::named_null(filter_type_name),
            None,
        );
        fields.insert(name, field);
    }

    for (name, field_type) in [
        (
            mk_name!("and"),
            ast::Type::list_null(ast::Type::named_null(type_name.clone())),
        ),
        (
            mk_name!("or"),
            ast::Type::list_null(ast::Type::named_null(type_name.clone())),
        ),
        (mk_name!("not"), ast::Type::named_null(type_name.clone())),
    ] {
        let (name, field) = input_field(name, field_type, None);
        fields.insert(name, field);
    }

    Ok(gql_schema::TypeInfo::InputObject(
        gql_schema::InputObject::new(type_name, None, fields),
    ))
}
