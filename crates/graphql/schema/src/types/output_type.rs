//! Object types of content types and components.

use std::collections::BTreeMap;

use content_model::{ContentModel, ModelUid, RelationTarget, FILE_MODEL_UID};
use engine_types::AuthSpec;
use lang_graphql::ast::common as ast;
use lang_graphql::mk_name;
use lang_graphql::schema::{self as gql_schema, builtin};

use super::inbuilt_type::generic_morph_type_name;
use super::scalar_type::graphql_scalar_for;
use super::{insert_field, AttributeFieldKind, CrudAction, OutputAnnotation};
use crate::attributes::{classify, ClassifiedAttribute};
use crate::build::{BuildContext, ResolversConfig};
use crate::field_arguments::{collection_arguments, component_arguments, id_argument, Arguments};
use crate::{mk_field_name, mk_typename, naming, Annotation, Error, ResolverConfig};

/// An attribute field: its type, arguments and resolution kind. `None` is
/// returned by [`attribute_field`] for attributes left out of the type.
struct AttributeField {
    field_type: ast::Type,
    arguments: Arguments,
    kind: AttributeFieldKind,
    /// The model whose `find` scope guards reading the field.
    guarded_by: Option<ModelUid>,
}

impl AttributeField {
    fn new(field_type: ast::Type, kind: AttributeFieldKind) -> Self {
        AttributeField {
            field_type,
            arguments: BTreeMap::new(),
            kind,
            guarded_by: None,
        }
    }

    fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = arguments;
        self
    }

    fn guarded_by(mut self, model: &ModelUid) -> Self {
        self.guarded_by = Some(model.clone());
        self
    }
}

fn nullability(field_type: ast::Type, required: bool) -> ast::Type {
    field_type.with_nullability(!required)
}

/// `id` argument of to-one fields: only collection types are looked up by id.
fn to_one_arguments(target: &ContentModel) -> Arguments {
    if target.is_collection_type() {
        id_argument(false)
    } else {
        BTreeMap::new()
    }
}

fn list_of(type_name: ast::TypeName, required: bool) -> ast::Type {
    nullability(
        ast::Type::list_null(ast::Type::named_non_null(type_name)),
        required,
    )
}

fn attribute_field(
    ctx: &BuildContext<'_>,
    model: &ContentModel,
    attribute_name: &str,
    attribute: &content_model::Attribute,
) -> Result<Option<AttributeField>, Error> {
    let field = match classify(attribute) {
        ClassifiedAttribute::Scalar { kind } => {
            let scalar = graphql_scalar_for(&model.uid, attribute_name, kind)?;
            AttributeField::new(
                nullability(ast::Type::named_null(scalar.type_name()), attribute.required),
                AttributeFieldKind::Scalar,
            )
        }
        ClassifiedAttribute::Enumeration { .. } => AttributeField::new(
            nullability(
                ast::Type::named_null(mk_typename(&naming::enum_name(model, attribute_name))?),
                attribute.required,
            ),
            AttributeFieldKind::Enumeration,
        ),
        ClassifiedAttribute::Media { multiple } => {
            let file_uid = ModelUid::new(FILE_MODEL_UID);
            let Some(file_model) = ctx.enabled_model(&file_uid) else {
                return Ok(None);
            };
            let field = if multiple {
                AttributeField::new(
                    ast::Type::named_null(mk_typename(
                        &naming::relation_response_collection_name(file_model),
                    )?),
                    AttributeFieldKind::Media { multiple },
                )
                .with_arguments(collection_arguments(file_model)?)
            } else {
                AttributeField::new(
                    ast::Type::named_null(mk_typename(&naming::entity_response_name(
                        file_model,
                    ))?),
                    AttributeFieldKind::Media { multiple },
                )
                .with_arguments(to_one_arguments(file_model))
            };
            field.guarded_by(&file_uid)
        }
        ClassifiedAttribute::MorphRelation { relation, target } => {
            let type_name = match target {
                RelationTarget::None => generic_morph_type_name(),
                RelationTarget::One(uid) => match ctx.enabled_model(uid) {
                    Some(target) => mk_typename(&naming::type_name(target))?,
                    None => return Ok(None),
                },
                RelationTarget::Many(uids) => {
                    if !uids.iter().any(|uid| ctx.enabled_model(uid).is_some()) {
                        return Ok(None);
                    }
                    mk_typename(&naming::morph_relation_type_name(model, attribute_name))?
                }
            };
            let many = relation.is_many();
            let field_type = if many {
                list_of(type_name, false)
            } else {
                ast::Type::named_null(type_name)
            };
            AttributeField::new(field_type, AttributeFieldKind::MorphRelation { many })
        }
        ClassifiedAttribute::Relation { relation, target } => {
            let Some(target) = target.and_then(|uid| ctx.enabled_model(uid)) else {
                tracing::debug!(
                    model = %model.uid,
                    attribute = attribute_name,
                    "skipping relation to a missing or disabled model"
                );
                return Ok(None);
            };
            let many = relation.is_many();
            let kind = AttributeFieldKind::Relation {
                target: target.uid.clone(),
                many,
            };
            let field = if many {
                AttributeField::new(
                    ast::Type::named_null(mk_typename(
                        &naming::relation_response_collection_name(target),
                    )?),
                    kind,
                )
                .with_arguments(collection_arguments(target)?)
            } else {
                AttributeField::new(
                    ast::Type::named_null(mk_typename(&naming::entity_response_name(target))?),
                    kind,
                )
                .with_arguments(to_one_arguments(target))
            };
            field.guarded_by(&target.uid)
        }
        ClassifiedAttribute::Component {
            component,
            repeatable,
        } => {
            let Some(target) = ctx.enabled_model(component) else {
                tracing::debug!(
                    model = %model.uid,
                    attribute = attribute_name,
                    "skipping component that is missing or disabled"
                );
                return Ok(None);
            };
            let type_name = mk_typename(&naming::type_name(target))?;
            let kind = AttributeFieldKind::Component {
                component: component.clone(),
                repeatable,
            };
            if repeatable {
                AttributeField::new(list_of(type_name, attribute.required), kind)
                    .with_arguments(component_arguments(target)?)
            } else {
                AttributeField::new(
                    nullability(ast::Type::named_null(type_name), attribute.required),
                    kind,
                )
            }
        }
        ClassifiedAttribute::DynamicZone { components } => {
            if !components
                .iter()
                .any(|uid| ctx.enabled_model(uid).is_some())
            {
                return Ok(None);
            }
            let union_name = mk_typename(&naming::dynamic_zone_name(model, attribute_name))?;
            AttributeField::new(
                list_of(union_name, attribute.required),
                AttributeFieldKind::DynamicZone,
            )
        }
    };
    Ok(Some(field))
}

/// The object type of a content type or component. Relation fields are
/// recorded in `resolvers_config` with the `find` scope of their target.
pub(crate) fn build_type_definition(
    ctx: &BuildContext<'_>,
    model: &ContentModel,
    resolvers_config: &mut ResolversConfig,
) -> Result<gql_schema::TypeInfo<Annotation>, Error> {
    let type_name = mk_typename(&naming::type_name(model))?;
    let mut fields = BTreeMap::new();

    if model.is_component() {
        let (name, field) = super::object_field(
            mk_name!("id"),
            ast::Type::named_non_null(builtin::id()),
            Annotation::Output(OutputAnnotation::Attribute {
                model: model.uid.clone(),
                attribute_name: "id".to_string(),
                kind: AttributeFieldKind::Scalar,
            }),
        );
        fields.insert(name, field);
    }

    for (attribute_name, attribute) in &model.attributes {
        if attribute.private || !ctx.field(model, attribute_name).has_output_enabled() {
            continue;
        }
        let Some(attribute_field) = attribute_field(ctx, model, attribute_name, attribute)? else {
            continue;
        };
        let field_name = mk_field_name(attribute_name)?;
        if let Some(guard) = &attribute_field.guarded_by {
            resolvers_config.insert(
                ast::FieldCoordinate::new(type_name.clone(), field_name.clone()),
                ResolverConfig::default().with_auth(AuthSpec::Scope(vec![format!(
                    "{guard}.{}",
                    CrudAction::Find
                )])),
            );
        }
        let field = gql_schema::Field::new(
            field_name.clone(),
            None,
            Annotation::Output(OutputAnnotation::Attribute {
                model: model.uid.clone(),
                attribute_name: attribute_name.clone(),
                kind: attribute_field.kind,
            }),
            attribute_field.field_type,
            attribute_field.arguments,
        );
        insert_field(&mut fields, &type_name, field_name, field)?;
    }

    Ok(gql_schema::TypeInfo::Object(gql_schema::Object::new(
        type_name,
        model.info.description.clone(),
        fields,
    )))
}
