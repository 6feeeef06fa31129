//! Coercion of GraphQL argument values into the values the data layer
//! stores: enum names back to their stored values, dynamic zone members
//! re-tagged with their component uid.

use std::collections::BTreeMap;

use engine_types::FieldError;
use graphql_schema::Annotation;
use lang_graphql::ast::common as ast;
use lang_graphql::schema::{self as gql_schema, TypeInfo};
use serde_json::{Map, Value};

const TYPENAME_KEY: &str = "__typename";
pub(crate) const COMPONENT_KEY: &str = "__component";

/// The arguments of `field` with defaults filled in and every value coerced.
pub fn coerce_arguments(
    schema: &gql_schema::Schema<Annotation>,
    arguments: &BTreeMap<ast::Name, gql_schema::InputField<Annotation>>,
    args: &Value,
) -> Result<Value, FieldError> {
    let mut coerced = Map::new();
    for (name, argument) in arguments {
        let value = match args.get(name.as_str()) {
            Some(value) => value.clone(),
            None => match &argument.default_value {
                Some(default_value) => default_value.to_json(),
                None => continue,
            },
        };
        coerced.insert(
            name.to_string(),
            coerce_value(schema, &argument.field_type, value)?,
        );
    }
    Ok(Value::Object(coerced))
}

pub fn coerce_value(
    schema: &gql_schema::Schema<Annotation>,
    value_type: &ast::Type,
    value: Value,
) -> Result<Value, FieldError> {
    match (&value_type.base, value) {
        (_, Value::Null) => Ok(Value::Null),
        (ast::BaseTypeContainer::List(element_type), Value::Array(values)) => values
            .into_iter()
            .map(|value| coerce_value(schema, element_type, value))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        // a single value is accepted where a list is expected
        (ast::BaseTypeContainer::List(element_type), value) => {
            Ok(Value::Array(vec![coerce_value(schema, element_type, value)?]))
        }
        (ast::BaseTypeContainer::Named(type_name), value) => {
            coerce_named(schema, type_name, value)
        }
    }
}

fn coerce_named(
    schema: &gql_schema::Schema<Annotation>,
    type_name: &ast::TypeName,
    value: Value,
) -> Result<Value, FieldError> {
    match schema.get_type(type_name) {
        Some(TypeInfo::Enum(enum_type)) => coerce_enum(enum_type, value),
        Some(TypeInfo::InputObject(input)) => coerce_input_object(schema, input, value),
        Some(TypeInfo::Scalar(gql_schema::Scalar {
            info: Annotation::DynamicZoneInput { components },
            ..
        })) => coerce_dynamic_zone_member(schema, components, value),
        _ => Ok(value),
    }
}

fn coerce_enum(enum_type: &gql_schema::Enum<Annotation>, value: Value) -> Result<Value, FieldError> {
    let Value::String(name) = &value else {
        return Err(FieldError::validation(format!(
            "{} expects an enum value",
            enum_type.name
        )));
    };
    let enum_value = ast::Name::new(name)
        .ok()
        .and_then(|name| enum_type.values.get(&name))
        .ok_or_else(|| {
            FieldError::validation(format!("{name} is not a value of {}", enum_type.name))
        })?;
    match &enum_value.info {
        Annotation::EnumValue { original } => Ok(Value::String(original.clone())),
        _ => Ok(value),
    }
}

fn coerce_input_object(
    schema: &gql_schema::Schema<Annotation>,
    input: &gql_schema::InputObject<Annotation>,
    value: Value,
) -> Result<Value, FieldError> {
    let Value::Object(fields) = value else {
        return Err(FieldError::validation(format!(
            "{} expects an object",
            input.name
        )));
    };
    let mut coerced = Map::new();
    for (key, value) in fields {
        let value = match ast::Name::new(&key)
            .ok()
            .and_then(|name| input.fields.get(&name))
        {
            Some(field) => coerce_value(schema, &field.field_type, value)?,
            None => value,
        };
        coerced.insert(key, value);
    }
    Ok(Value::Object(coerced))
}

/// A dynamic zone member names its concrete component in `__typename`; the
/// stored value names the component uid in `__component` instead.
fn coerce_dynamic_zone_member(
    schema: &gql_schema::Schema<Annotation>,
    components: &BTreeMap<ast::TypeName, content_model::ModelUid>,
    value: Value,
) -> Result<Value, FieldError> {
    let Value::Object(mut fields) = value else {
        return Err(FieldError::validation("a dynamic zone member must be an object"));
    };
    let typename = fields.remove(TYPENAME_KEY);
    let component = typename
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|typename| ast::TypeName::new(typename).ok())
        .and_then(|typename| components.get_key_value(&typename));
    let Some((type_name, uid)) = component else {
        let expected = components
            .keys()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        return Err(FieldError::Validation {
            message: format!(
                "Component not found. expected one of: {}",
                expected.join(", ")
            ),
            details: Some(serde_json::json!({ "received": typename })),
        });
    };

    let input_name = ast::TypeName::new(&format!("{type_name}Input"))
        .map_err(|error| FieldError::internal(error.to_string()))?;
    let mut coerced = match schema.get_type(&input_name) {
        Some(TypeInfo::InputObject(input)) => {
            match coerce_input_object(schema, input, Value::Object(fields))? {
                Value::Object(coerced) => coerced,
                _ => Map::new(),
            }
        }
        _ => fields,
    };
    coerced.insert(
        COMPONENT_KEY.to_string(),
        Value::String(uid.as_str().to_string()),
    );
    Ok(Value::Object(coerced))
}
