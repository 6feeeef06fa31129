//! Union types: dynamic zones, polymorphic relations and the generic morph.

use std::collections::{BTreeMap, BTreeSet};

use content_model::{ContentModel, ModelUid};
use lang_graphql::ast::common as ast;
use lang_graphql::schema as gql_schema;

use super::inbuilt_type::{error_type_name, generic_morph_type_name};
use crate::build::BuildContext;
use crate::registry::{Kind, TypeRegistry};
use crate::{mk_typename, naming, Annotation, Error};

fn union_of(
    name: ast::TypeName,
    members_by_uid: BTreeMap<ModelUid, ast::TypeName>,
    with_error: bool,
) -> gql_schema::TypeInfo<Annotation> {
    let mut members = members_by_uid.values().cloned().collect::<BTreeSet<_>>();
    if with_error {
        members.insert(error_type_name());
    }
    gql_schema::TypeInfo::Union(gql_schema::Union {
        name,
        description: None,
        info: Annotation::Union { members_by_uid },
        members,
    })
}

/// Type names of the enabled models among `uids`, keyed by uid.
fn enabled_members<'a>(
    ctx: &BuildContext<'_>,
    uids: impl IntoIterator<Item = &'a ModelUid>,
) -> Result<BTreeMap<ModelUid, ast::TypeName>, Error> {
    let mut members = BTreeMap::new();
    for uid in uids {
        if let Some(model) = ctx.enabled_model(uid) {
            members.insert(uid.clone(), mk_typename(&naming::type_name(model))?);
        }
    }
    Ok(members)
}

/// The output union and the input scalar of a dynamic zone. `None` when none
/// of its components is available.
pub(crate) fn build_dynamic_zone(
    ctx: &BuildContext<'_>,
    model: &ContentModel,
    attribute_name: &str,
    components: &[ModelUid],
) -> Result<Option<[gql_schema::TypeInfo<Annotation>; 2]>, Error> {
    let members = enabled_members(ctx, components)?;
    if members.is_empty() {
        return Ok(None);
    }
    let input = gql_schema::TypeInfo::Scalar(gql_schema::Scalar {
        name: mk_typename(&naming::dynamic_zone_input_name(model, attribute_name))?,
        description: Some(format!(
            "Input of the {attribute_name} dynamic zone: a component input tagged with its __typename"
        )),
        info: Annotation::DynamicZoneInput {
            components: members
                .iter()
                .map(|(uid, type_name)| (type_name.clone(), uid.clone()))
                .collect(),
        },
    });
    let union = union_of(
        mk_typename(&naming::dynamic_zone_name(model, attribute_name))?,
        members,
        true,
    );
    Ok(Some([union, input]))
}

/// The union of a polymorphic relation with an explicit target list. `None`
/// when none of the targets is available.
pub(crate) fn build_morph_union(
    ctx: &BuildContext<'_>,
    model: &ContentModel,
    attribute_name: &str,
    targets: &[ModelUid],
) -> Result<Option<gql_schema::TypeInfo<Annotation>>, Error> {
    let members = enabled_members(ctx, targets)?;
    if members.is_empty() {
        return Ok(None);
    }
    Ok(Some(union_of(
        mk_typename(&naming::morph_relation_type_name(model, attribute_name))?,
        members,
        true,
    )))
}

/// `GenericMorph`: every registered model and component type.
pub(crate) fn build_generic_morph(
    registry: &TypeRegistry,
) -> Result<Option<gql_schema::TypeInfo<Annotation>>, Error> {
    let mut members = BTreeMap::new();
    for entry in registry.entries_where(|config| matches!(config.kind, Kind::Type | Kind::Component))
    {
        if let Some(uid) = &entry.config.model {
            members.insert(uid.clone(), mk_typename(&entry.name)?);
        }
    }
    if members.is_empty() {
        return Ok(None);
    }
    Ok(Some(union_of(generic_morph_type_name(), members, false)))
}
