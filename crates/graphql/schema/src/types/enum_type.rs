use std::collections::BTreeMap;

use content_model::ContentModel;
use lang_graphql::schema as gql_schema;

use crate::{mk_field_name, mk_typename, naming, Annotation, Error};

/// The enum type of an enumeration attribute. Each value is regressed into a
/// valid GraphQL name and keeps the stored value in its annotation.
pub(crate) fn build_enum_type(
    model: &ContentModel,
    attribute_name: &str,
    values: &[String],
) -> Result<gql_schema::TypeInfo<Annotation>, Error> {
    let enum_name = naming::enum_name(model, attribute_name);
    let mut enum_values = BTreeMap::new();
    for original in values {
        let value = mk_field_name(&naming::regressed_enum_value(original))?;
        let enum_value = gql_schema::EnumValue {
            value: value.clone(),
            description: None,
            info: Annotation::EnumValue {
                original: original.clone(),
            },
        };
        if let Some(previous) = enum_values.insert(value, enum_value) {
            let first = match previous.info {
                Annotation::EnumValue { original } => original,
                _ => String::new(),
            };
            return Err(Error::ConflictingEnumValue {
                enum_name,
                first,
                second: original.clone(),
            });
        }
    }
    Ok(gql_schema::TypeInfo::Enum(gql_schema::Enum {
        name: mk_typename(&enum_name)?,
        description: None,
        values: enum_values,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_model::ModelKind;
    use lang_graphql::mk_name;

    fn post() -> ContentModel {
        ContentModel::new("api::post.post", ModelKind::CollectionType).with_names("post", "posts")
    }

    #[test]
    fn test_enum_values_are_regressed() {
        let values = vec!["draft".to_string(), "in review".to_string()];
        let gql_schema::TypeInfo::Enum(enum_type) =
            build_enum_type(&post(), "status", &values).unwrap()
        else {
            panic!("expected an enum");
        };
        assert_eq!(enum_type.name.as_str(), "ENUM_POST_STATUS");
        assert_eq!(
            enum_type.values[&mk_name!("in_review")].info,
            Annotation::EnumValue {
                original: "in review".to_string()
            }
        );
    }

    #[test]
    fn test_conflicting_values() {
        let values = vec!["in review".to_string(), "in-review".to_string()];
        assert!(matches!(
            build_enum_type(&post(), "status", &values),
            Err(Error::ConflictingEnumValue { .. })
        ));
    }
}
