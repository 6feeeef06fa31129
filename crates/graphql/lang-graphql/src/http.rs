use serde::Serialize;

use crate::ast::common as ast;

/// A list of path segments starting at the root of the response and
/// ending with the field associated with the error.
/// <https://spec.graphql.org/October2021/#sel-HAPHRPHABABC3vT>
pub type Path = Vec<PathSegment>;

/// A path segment is either a field name or an index into a list.
/// <https://spec.graphql.org/October2021/#sel-HAPHRPJABABEyoB>
#[derive(Serialize, Debug, PartialEq, Clone)]
#[serde(untagged)]
pub enum PathSegment {
    /// Path segment that represent a field.
    Field(ast::Name),
    /// Path segment that represent list indices as 0-indexed integer.
    Index(usize),
}

impl PathSegment {
    /// Returns the path segment for a field name.
    pub fn field(name: ast::Name) -> Self {
        Self::Field(name)
    }

    /// Returns the path segment for an index into a list.
    pub fn index(index: usize) -> Self {
        Self::Index(index)
    }
}

#[derive(Serialize, Debug, PartialEq, Clone)]
pub struct Extensions {
    /// Machine readable error code, e.g. `FORBIDDEN`
    pub code: String,
    /// Details of any error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// A GraphQL error as defined by the spec.
/// <https://spec.graphql.org/October2021/#sec-Errors.Error-result-format>
#[derive(Serialize, Debug, PartialEq, Clone)]
pub struct GraphQLError {
    /// A string describing the error
    pub message: String,
    /// The path of the response field which experienced the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Path>,
    /// Extensions to the error with additional information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
    /// Is the error an internal error? Are we interested in monitoring it?
    #[serde(skip_serializing)]
    pub is_internal: bool,
}
