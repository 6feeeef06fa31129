//! Arguments of generated fields.

use std::collections::BTreeMap;

use content_model::ContentModel;
use lang_graphql::ast::common as ast;
use lang_graphql::ast::value::ConstValue;
use lang_graphql::mk_name;
use lang_graphql::schema::{self as gql_schema, builtin};

use crate::types::inbuilt_type::{
    pagination_arg_type_name, publication_state_live, publication_state_type_name,
};
use crate::{mk_typename, naming, Annotation, Error};

pub(crate) type Arguments = BTreeMap<ast::Name, gql_schema::InputField<Annotation>>;

fn argument(
    name: ast::Name,
    field_type: ast::Type,
    default_value: Option<ConstValue>,
) -> (ast::Name, gql_schema::InputField<Annotation>) {
    (
        name.clone(),
        gql_schema::InputField::new(
            name,
            None,
            Annotation::argument(),
            field_type,
            default_value,
        ),
    )
}

/// `filters`, `pagination` and `sort` over the records of `target`.
fn list_arguments(target: &ContentModel) -> Result<Arguments, Error> {
    Ok(BTreeMap::from([
        argument(
            mk_name!("filters"),
            ast::Type::named_null(mk_typename(&naming::filters_input_name(target))?),
            None,
        ),
        argument(
            mk_name!("pagination"),
            ast::Type::named_null(pagination_arg_type_name()),
            Some(ConstValue::empty_object()),
        ),
        argument(
            mk_name!("sort"),
            ast::Type::list_null(ast::Type::named_null(builtin::string())),
            Some(ConstValue::empty_list()),
        ),
    ]))
}

/// Arguments of `find` queries and to-many relations: list arguments plus
/// `publicationState` for draft-and-publish models.
pub(crate) fn collection_arguments(target: &ContentModel) -> Result<Arguments, Error> {
    let mut arguments = list_arguments(target)?;
    arguments.extend(publication_state_argument(target));
    Ok(arguments)
}

/// Arguments of repeatable component fields.
pub(crate) fn component_arguments(component: &ContentModel) -> Result<Arguments, Error> {
    list_arguments(component)
}

pub(crate) fn publication_state_argument(model: &ContentModel) -> Arguments {
    if model.has_draft_and_publish() {
        BTreeMap::from([argument(
            mk_name!("publicationState"),
            ast::Type::named_null(publication_state_type_name()),
            Some(publication_state_live()),
        )])
    } else {
        BTreeMap::new()
    }
}

pub(crate) fn id_argument(non_null: bool) -> Arguments {
    let id_type = if non_null {
        ast::Type::named_non_null(builtin::id())
    } else {
        ast::Type::named_null(builtin::id())
    };
    BTreeMap::from([argument(mk_name!("id"), id_type, None)])
}

/// `data: {Type}Input!`
pub(crate) fn data_argument(model: &ContentModel) -> Result<Arguments, Error> {
    Ok(BTreeMap::from([argument(
        mk_name!("data"),
        ast::Type::named_non_null(mk_typename(&naming::content_type_input_name(model))?),
        None,
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_model::ModelKind;

    #[test]
    fn test_collection_arguments() {
        let article = ContentModel::new("api::article.article", ModelKind::CollectionType)
            .with_names("article", "articles")
            .with_draft_and_publish();
        let arguments = collection_arguments(&article).unwrap();
        let names = arguments.keys().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(names, ["filters", "pagination", "publicationState", "sort"]);
        assert_eq!(
            arguments[&mk_name!("filters")].field_type.to_string(),
            "ArticleFiltersInput"
        );
        assert_eq!(
            arguments[&mk_name!("publicationState")]
                .default_value
                .as_ref()
                .map(ToString::to_string),
            Some("LIVE".to_string())
        );

        let tag = ContentModel::new("api::tag.tag", ModelKind::CollectionType)
            .with_names("tag", "tags");
        assert!(!collection_arguments(&tag)
            .unwrap()
            .contains_key(&mk_name!("publicationState")));
    }
}
