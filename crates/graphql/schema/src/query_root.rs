//! Schema of the query root type

use content_model::ContentModel;
use engine_types::AuthSpec;
use lang_graphql::ast::common::{self as ast, TypeName};
use lang_graphql::mk_name;
use lang_graphql::schema as gql_schema;

use crate::build::{BuildContext, ResolversConfig};
use crate::field_arguments::{collection_arguments, id_argument, publication_state_argument, Arguments};
use crate::types::{CrudAction, OutputAnnotation, RootFieldAnnotation};
use crate::{mk_field_name, mk_typename, naming, Annotation, Error, ResolverConfig};

pub(crate) fn query_root_type_name() -> TypeName {
    TypeName(mk_name!("Query"))
}

/// A root field performing `action` on `model`. Its default resolver config
/// requires the `{uid}.{action}` scope.
pub(crate) fn crud_root_field(
    root_type_name: &TypeName,
    model: &ContentModel,
    action: CrudAction,
    field_name: &str,
    field_type: ast::Type,
    arguments: Arguments,
    resolvers_config: &mut ResolversConfig,
) -> Result<gql_schema::Field<Annotation>, Error> {
    let field_name = mk_field_name(field_name)?;
    resolvers_config.insert(
        ast::FieldCoordinate::new(root_type_name.clone(), field_name.clone()),
        ResolverConfig::default()
            .with_auth(AuthSpec::Scope(vec![format!("{}.{action}", model.uid)])),
    );
    Ok(gql_schema::Field::new(
        field_name,
        None,
        Annotation::Output(OutputAnnotation::RootField(RootFieldAnnotation::Crud {
            model: model.uid.clone(),
            action,
        })),
        field_type,
        arguments,
    ))
}

/// `findOne` and `find` for collection types; the single `find` field
/// for single types. Empty when queries are disabled for the model.
pub(crate) fn query_fields(
    ctx: &BuildContext<'_>,
    model: &ContentModel,
    resolvers_config: &mut ResolversConfig,
) -> Result<Vec<gql_schema::Field<Annotation>>, Error> {
    let shadow_crud = ctx.shadow_crud.model(&model.uid);
    if !shadow_crud.are_queries_enabled() {
        return Ok(Vec::new());
    }
    let root = query_root_type_name();
    let response = ast::Type::named_null(mk_typename(&naming::entity_response_name(model))?);
    let mut fields = Vec::new();

    if model.is_single_type() {
        if shadow_crud.is_action_enabled(CrudAction::Find) {
            fields.push(crud_root_field(
                &root,
                model,
                CrudAction::Find,
                &naming::find_one_query_name(model),
                response,
                publication_state_argument(model),
                resolvers_config,
            )?);
        }
        return Ok(fields);
    }

    if shadow_crud.is_action_enabled(CrudAction::FindOne) {
        fields.push(crud_root_field(
            &root,
            model,
            CrudAction::FindOne,
            &naming::find_one_query_name(model),
            response,
            id_argument(false),
            resolvers_config,
        )?);
    }
    if shadow_crud.is_action_enabled(CrudAction::Find) {
        fields.push(crud_root_field(
            &root,
            model,
            CrudAction::Find,
            &naming::find_query_name(model),
            ast::Type::named_null(mk_typename(&naming::entity_response_collection_name(
                model,
            ))?),
            collection_arguments(model)?,
            resolvers_config,
        )?);
    }
    Ok(fields)
}
