use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::Serialize;

use super::common::Name;

/// A constant GraphQL input value, as written in default values.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Input-Values)
#[derive(Serialize, Clone, Debug, PartialEq)]
pub enum ConstValue {
    Null,
    Boolean(bool),
    Number(serde_json::Number),
    String(String),
    /// An enum. These are typically in `SCREAMING_SNAKE_CASE`.
    Enum(Name),
    List(Vec<ConstValue>),
    Object(IndexMap<Name, ConstValue>),
}

impl ConstValue {
    pub fn empty_object() -> Self {
        ConstValue::Object(IndexMap::new())
    }

    pub fn empty_list() -> Self {
        ConstValue::List(Vec::new())
    }

    /// The JSON a resolver sees when the argument is left out
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ConstValue::Null => serde_json::Value::Null,
            ConstValue::Boolean(b) => serde_json::Value::Bool(*b),
            ConstValue::Number(n) => serde_json::Value::Number(n.clone()),
            ConstValue::String(s) => serde_json::Value::String(s.clone()),
            ConstValue::Enum(e) => serde_json::Value::String(e.to_string()),
            ConstValue::List(values) => {
                serde_json::Value::Array(values.iter().map(ConstValue::to_json).collect())
            }
            ConstValue::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl Display for ConstValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Null => f.write_str("null"),
            ConstValue::Boolean(b) => write!(f, "{b}"),
            ConstValue::Number(n) => write!(f, "{n}"),
            // serde_json escapes exactly like a GraphQL block-less string
            ConstValue::String(s) => write!(f, "{}", serde_json::Value::String(s.clone())),
            ConstValue::Enum(e) => write!(f, "{e}"),
            ConstValue::List(values) => {
                f.write_str("[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    value.fmt(f)?;
                }
                f.write_str("]")
            }
            ConstValue::Object(fields) => {
                f.write_str("{")?;
                for (index, (key, value)) in fields.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mk_name;

    #[test]
    fn test_const_value_display() {
        assert_eq!(ConstValue::empty_object().to_string(), "{}");
        assert_eq!(ConstValue::empty_list().to_string(), "[]");
        assert_eq!(ConstValue::Enum(mk_name!("LIVE")).to_string(), "LIVE");
        assert_eq!(
            ConstValue::List(vec![
                ConstValue::String("a\"b".to_string()),
                ConstValue::Number(3.into())
            ])
            .to_string(),
            r#"["a\"b", 3]"#
        );
    }

    #[test]
    fn test_const_value_to_json() {
        let mut fields = IndexMap::new();
        fields.insert(mk_name!("page"), ConstValue::Number(1.into()));
        assert_eq!(
            ConstValue::Object(fields).to_json(),
            serde_json::json!({"page": 1})
        );
        assert_eq!(
            ConstValue::Enum(mk_name!("LIVE")).to_json(),
            serde_json::json!("LIVE")
        );
    }
}
