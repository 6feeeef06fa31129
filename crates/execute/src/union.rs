//! Runtime type resolution of union members.

use content_model::ModelUid;
use graphql_schema::Annotation;
use lang_graphql::ast::common as ast;
use lang_graphql::mk_name;
use lang_graphql::schema as gql_schema;
use serde_json::Value;

use crate::input::COMPONENT_KEY;

const TYPENAME_KEY: &str = "__typename";
const TYPE_KEY: &str = "__type";

/// The member of `union` a value belongs to: the one named by its
/// `__typename`, else the one of the model uid in `__type` or
/// `__component`. Values carrying no known tag resolve to `Error` when the
/// union has that member, and to nothing otherwise.
pub fn resolve_union_type(
    union: &gql_schema::Union<Annotation>,
    value: &Value,
) -> Option<ast::TypeName> {
    if let Some(type_name) = value
        .get(TYPENAME_KEY)
        .and_then(Value::as_str)
        .and_then(|typename| ast::TypeName::new(typename).ok())
        .filter(|type_name| union.members.contains(type_name))
    {
        return Some(type_name);
    }

    if let Annotation::Union { members_by_uid } = &union.info {
        let tagged_member = [TYPE_KEY, COMPONENT_KEY]
            .into_iter()
            .filter_map(|key| value.get(key).and_then(Value::as_str))
            .find_map(|uid| members_by_uid.get(&ModelUid::new(uid)));
        if let Some(type_name) = tagged_member {
            return Some(type_name.clone());
        }
    }

    tracing::debug!(union = %union.name, "value carries no known type tag");
    let error = ast::TypeName(mk_name!("Error"));
    union.members.contains(&error).then_some(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::{BTreeMap, BTreeSet};

    fn type_name(name: &str) -> ast::TypeName {
        ast::TypeName::new(name).unwrap()
    }

    fn comment_target() -> gql_schema::Union<Annotation> {
        gql_schema::Union {
            name: type_name("CommentTargetMorph"),
            description: None,
            info: Annotation::Union {
                members_by_uid: BTreeMap::from([
                    (ModelUid::new("api::post.post"), type_name("Post")),
                    (ModelUid::new("api::video.video"), type_name("Video")),
                ]),
            },
            members: BTreeSet::from([type_name("Error"), type_name("Post"), type_name("Video")]),
        }
    }

    #[test]
    fn test_resolves_by_tag() {
        let union = comment_target();
        assert_eq!(
            resolve_union_type(&union, &json!({"__typename": "Post", "id": 1})),
            Some(type_name("Post"))
        );
        assert_eq!(
            resolve_union_type(&union, &json!({"__type": "api::video.video", "id": 1})),
            Some(type_name("Video"))
        );
    }

    #[test]
    fn test_unknown_tags_resolve_to_error() {
        let union = comment_target();
        assert_eq!(
            resolve_union_type(&union, &json!({"__typename": "Article"})),
            Some(type_name("Error"))
        );
        assert_eq!(
            resolve_union_type(&union, &json!({"__type": "api::article.article"})),
            Some(type_name("Error"))
        );
        assert_eq!(
            resolve_union_type(&union, &json!({})),
            Some(type_name("Error"))
        );
    }

    #[test]
    fn test_untagged_value_without_error_member_is_unresolved() {
        let mut union = comment_target();
        union.members.remove(&type_name("Error"));
        assert_eq!(resolve_union_type(&union, &json!({"id": 4})), None);
        assert_eq!(
            resolve_union_type(&union, &json!({"__typename": "Error"})),
            None
        );
        assert_eq!(
            resolve_union_type(&union, &json!({"__typename": "Post"})),
            Some(type_name("Post"))
        );
    }
}
