//! Schema for the mutation root type

use content_model::ContentModel;
use lang_graphql::ast::common::{self as ast, TypeName};
use lang_graphql::mk_name;
use lang_graphql::schema as gql_schema;

use crate::build::{BuildContext, ResolversConfig};
use crate::field_arguments::{data_argument, id_argument, Arguments};
use crate::query_root::crud_root_field;
use crate::types::CrudAction;
use crate::{mk_typename, naming, Annotation, Error};

pub(crate) fn mutation_root_type_name() -> TypeName {
    TypeName(mk_name!("Mutation"))
}

/// `create`, `update` and `delete` for collection types; `update` (an
/// upsert) and `delete` without an id for single types. Each is gated by the
/// model's mutation toggle and its own action.
pub(crate) fn mutation_fields(
    ctx: &BuildContext<'_>,
    model: &ContentModel,
    resolvers_config: &mut ResolversConfig,
) -> Result<Vec<gql_schema::Field<Annotation>>, Error> {
    let shadow_crud = ctx.shadow_crud.model(&model.uid);
    if !shadow_crud.are_mutations_enabled() {
        return Ok(Vec::new());
    }
    let root = mutation_root_type_name();
    let response = ast::Type::named_null(mk_typename(&naming::entity_response_name(model))?);
    let is_collection_type = model.is_collection_type();
    let mut fields = Vec::new();

    if is_collection_type && shadow_crud.is_action_enabled(CrudAction::Create) {
        fields.push(crud_root_field(
            &root,
            model,
            CrudAction::Create,
            &naming::create_mutation_name(model),
            response.clone(),
            data_argument(model)?,
            resolvers_config,
        )?);
    }

    if shadow_crud.is_action_enabled(CrudAction::Update) {
        let mut arguments = data_argument(model)?;
        if is_collection_type {
            arguments.extend(id_argument(true));
        }
        fields.push(crud_root_field(
            &root,
            model,
            CrudAction::Update,
            &naming::update_mutation_name(model),
            response.clone(),
            arguments,
            resolvers_config,
        )?);
    }

    if shadow_crud.is_action_enabled(CrudAction::Delete) {
        let arguments = if is_collection_type {
            id_argument(true)
        } else {
            Arguments::new()
        };
        fields.push(crud_root_field(
            &root,
            model,
            CrudAction::Delete,
            &naming::delete_mutation_name(model),
            response,
            arguments,
            resolvers_config,
        )?);
    }

    Ok(fields)
}
