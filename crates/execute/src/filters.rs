//! Translation of GraphQL filter arguments into data-access filters.

use std::str::FromStr;

use content_model::{AttributeKind, ContentModel, ContentModelSet, ModelUid, FILE_MODEL_UID};
use graphql_schema::FilterOperator;
use serde_json::{Map, Value};

/// Rewrites a `{Type}FiltersInput` value for `model`: every operator key
/// becomes its `$`-prefixed data-access operator, recursively through
/// lists, `and`/`or`/`not` and the filters of relations, media and
/// components. Keys that are not operators are kept as they are.
pub fn graphql_filters_to_query(
    filters: &Value,
    model: &ContentModel,
    models: &ContentModelSet,
) -> Value {
    match filters {
        Value::Null => Value::Object(Map::new()),
        Value::Array(filters) => Value::Array(
            filters
                .iter()
                .map(|filter| graphql_filters_to_query(filter, model, models))
                .collect(),
        ),
        Value::Object(filters) => {
            let mut query = Map::new();
            for (key, value) in filters {
                let (key, value) = translate_entry(key, value, model, models);
                query.insert(key, value);
            }
            Value::Object(query)
        }
        other => other.clone(),
    }
}

fn translate_entry(
    key: &str,
    value: &Value,
    model: &ContentModel,
    models: &ContentModelSet,
) -> (String, Value) {
    if key == "id" && !model.attributes.contains_key(key) {
        return (key.to_string(), scalar_filter_to_query(value));
    }
    if let Some(attribute) = model.attributes.get(key) {
        let nested_model = match &attribute.kind {
            AttributeKind::Relation { relation, .. } if relation.is_morph() => None,
            AttributeKind::Relation { .. } | AttributeKind::Component { .. } => {
                attribute.single_target()
            }
            AttributeKind::Media { .. } => Some(ModelUid::new(FILE_MODEL_UID)),
            AttributeKind::Scalar(_) | AttributeKind::Enumeration { .. } => {
                return (key.to_string(), scalar_filter_to_query(value));
            }
            AttributeKind::DynamicZone { .. } => None,
        };
        let value = match nested_model.as_ref().and_then(|uid| models.get(uid)) {
            Some(target) => graphql_filters_to_query(value, target, models),
            None => value.clone(),
        };
        return (key.to_string(), value);
    }
    match root_level_operator(key) {
        Some(operator) => (
            operator.query_operator(),
            graphql_filters_to_query(value, model, models),
        ),
        None => (key.to_string(), value.clone()),
    }
}

fn root_level_operator(key: &str) -> Option<FilterOperator> {
    FilterOperator::from_str(key)
        .ok()
        .filter(|operator| operator.is_logical())
}

/// Operators of a `{Scalar}FilterInput`. `not` nests another scalar filter;
/// the other operators carry plain values.
fn scalar_filter_to_query(value: &Value) -> Value {
    let Value::Object(operators) = value else {
        return value.clone();
    };
    let mut query = Map::new();
    for (key, value) in operators {
        match FilterOperator::from_str(key) {
            Ok(FilterOperator::Not) => {
                query.insert(
                    FilterOperator::Not.query_operator(),
                    scalar_filter_to_query(value),
                );
            }
            Ok(operator) => {
                query.insert(operator.query_operator(), value.clone());
            }
            Err(_) => {
                query.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(query)
}
