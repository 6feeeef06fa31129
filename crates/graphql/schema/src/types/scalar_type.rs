//! Output scalars of model attributes and the filter operators each accepts.

use content_model::{ModelUid, ScalarKind};
use lang_graphql::ast::common as ast;
use lang_graphql::mk_name;
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{mk_typename, Error};

/// The scalars attributes map to, built-in and custom alike.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum ScalarType {
    #[strum(serialize = "ID")]
    Id,
    String,
    Int,
    Long,
    Float,
    Boolean,
    Date,
    Time,
    DateTime,
    #[strum(serialize = "JSON")]
    Json,
}

impl ScalarType {
    pub fn type_name(self) -> ast::TypeName {
        ast::TypeName(match self {
            ScalarType::Id => mk_name!("ID"),
            ScalarType::String => mk_name!("String"),
            ScalarType::Int => mk_name!("Int"),
            ScalarType::Long => mk_name!("Long"),
            ScalarType::Float => mk_name!("Float"),
            ScalarType::Boolean => mk_name!("Boolean"),
            ScalarType::Date => mk_name!("Date"),
            ScalarType::Time => mk_name!("Time"),
            ScalarType::DateTime => mk_name!("DateTime"),
            ScalarType::Json => mk_name!("JSON"),
        })
    }

    pub fn is_builtin(self) -> bool {
        matches!(
            self,
            ScalarType::Id
                | ScalarType::String
                | ScalarType::Int
                | ScalarType::Float
                | ScalarType::Boolean
        )
    }

    /// The comparison operators of this scalar's filter input.
    pub fn operators(self) -> &'static [FilterOperator] {
        use FilterOperator::*;
        match self {
            ScalarType::Id | ScalarType::String => &[
                Eq,
                Eqi,
                Ne,
                StartsWith,
                EndsWith,
                Contains,
                NotContains,
                Containsi,
                NotContainsi,
                Gt,
                Gte,
                Lt,
                Lte,
                Null,
                NotNull,
                In,
                NotIn,
                Between,
            ],
            ScalarType::Int
            | ScalarType::Long
            | ScalarType::Float
            | ScalarType::Date
            | ScalarType::Time
            | ScalarType::DateTime => &[
                Eq, Ne, Gt, Gte, Lt, Lte, Null, NotNull, In, NotIn, Between,
            ],
            ScalarType::Boolean => &[Eq, Ne, Null, NotNull],
            ScalarType::Json => &[
                Eq,
                Ne,
                Contains,
                NotContains,
                Containsi,
                NotContainsi,
                Null,
                NotNull,
                In,
                NotIn,
            ],
        }
    }
}

/// The fixed association between model scalar kinds and output scalars.
pub fn scalar_type_for(kind: &ScalarKind) -> Option<ScalarType> {
    match kind {
        ScalarKind::String
        | ScalarKind::Text
        | ScalarKind::RichText
        | ScalarKind::Email
        | ScalarKind::Password
        | ScalarKind::Uid => Some(ScalarType::String),
        ScalarKind::Integer => Some(ScalarType::Int),
        ScalarKind::BigInteger => Some(ScalarType::Long),
        ScalarKind::Float | ScalarKind::Decimal => Some(ScalarType::Float),
        ScalarKind::Date => Some(ScalarType::Date),
        ScalarKind::Time => Some(ScalarType::Time),
        ScalarKind::DateTime | ScalarKind::Timestamp => Some(ScalarType::DateTime),
        ScalarKind::Boolean => Some(ScalarType::Boolean),
        ScalarKind::Json | ScalarKind::Blocks => Some(ScalarType::Json),
        ScalarKind::Other(_) => None,
    }
}

/// Like [`scalar_type_for`], failing the build for unknown kinds.
pub fn graphql_scalar_for(
    model_uid: &ModelUid,
    attribute_name: &str,
    kind: &ScalarKind,
) -> Result<ScalarType, Error> {
    scalar_type_for(kind).ok_or_else(|| Error::UnknownScalarKind {
        model_uid: model_uid.clone(),
        attribute_name: attribute_name.to_string(),
        scalar_kind: kind.to_string(),
    })
}

/// Filter operators as they appear in filter inputs. Each translates to the
/// data-access operator of the same name prefixed with `$`.
#[derive(
    Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "camelCase")]
pub enum FilterOperator {
    Eq,
    Eqi,
    Ne,
    StartsWith,
    EndsWith,
    Contains,
    NotContains,
    Containsi,
    NotContainsi,
    Gt,
    Gte,
    Lt,
    Lte,
    Null,
    NotNull,
    In,
    NotIn,
    Between,
    And,
    Or,
    Not,
}

impl FilterOperator {
    /// `and`, `or` and `not` combine whole filters rather than compare a value.
    pub fn is_logical(self) -> bool {
        matches!(
            self,
            FilterOperator::And | FilterOperator::Or | FilterOperator::Not
        )
    }

    /// The data-access operator, e.g. `$eq`.
    pub fn query_operator(self) -> String {
        format!("${self}")
    }

    /// The input type of this operator's field in the filter input of
    /// `scalar`.
    pub fn field_type(self, scalar: ScalarType) -> Result<ast::Type, Error> {
        let scalar_name = scalar.type_name();
        Ok(match self {
            FilterOperator::Null | FilterOperator::NotNull => {
                ast::Type::named_null(lang_graphql::schema::builtin::boolean())
            }
            FilterOperator::In
            | FilterOperator::NotIn
            | FilterOperator::Between
            | FilterOperator::And
            | FilterOperator::Or => ast::Type::list_null(ast::Type::named_null(scalar_name)),
            FilterOperator::Not => ast::Type::named_null(mk_typename(
                &crate::naming::scalar_filter_input_name(&scalar.to_string()),
            )?),
            FilterOperator::Eq
            | FilterOperator::Eqi
            | FilterOperator::Ne
            | FilterOperator::StartsWith
            | FilterOperator::EndsWith
            | FilterOperator::Contains
            | FilterOperator::NotContains
            | FilterOperator::Containsi
            | FilterOperator::NotContainsi
            | FilterOperator::Gt
            | FilterOperator::Gte
            | FilterOperator::Lt
            | FilterOperator::Lte => ast::Type::named_null(scalar_name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_scalar_association() {
        assert_eq!(scalar_type_for(&ScalarKind::Integer), Some(ScalarType::Int));
        assert_eq!(scalar_type_for(&ScalarKind::Text), Some(ScalarType::String));
        assert_eq!(
            scalar_type_for(&ScalarKind::Timestamp),
            Some(ScalarType::DateTime)
        );
        assert_eq!(
            scalar_type_for(&ScalarKind::BigInteger),
            Some(ScalarType::Long)
        );
        let error = graphql_scalar_for(
            &ModelUid::new("api::place.place"),
            "location",
            &ScalarKind::Other("geopoint".to_string()),
        )
        .unwrap_err();
        assert!(matches!(
            error,
            Error::UnknownScalarKind { scalar_kind, .. } if scalar_kind == "geopoint"
        ));
    }

    #[test]
    fn test_operator_names() {
        assert_eq!(FilterOperator::NotContainsi.to_string(), "notContainsi");
        assert_eq!(FilterOperator::StartsWith.query_operator(), "$startsWith");
        assert_eq!(
            FilterOperator::from_str("between").ok(),
            Some(FilterOperator::Between)
        );
        assert!(FilterOperator::from_str("title").is_err());
        assert_eq!(ScalarType::Json.to_string(), "JSON");
        assert_eq!(ScalarType::Id.to_string(), "ID");
    }

    #[test]
    fn test_operator_field_types() {
        assert_eq!(
            FilterOperator::In
                .field_type(ScalarType::Int)
                .unwrap()
                .to_string(),
            "[Int]"
        );
        assert_eq!(
            FilterOperator::Null
                .field_type(ScalarType::Int)
                .unwrap()
                .to_string(),
            "Boolean"
        );
        assert_eq!(
            FilterOperator::Not
                .field_type(ScalarType::DateTime)
                .unwrap()
                .to_string(),
            "DateTimeFilterInput"
        );
    }
}
