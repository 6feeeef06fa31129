use serde::{Deserialize, Deserializer, Serialize};
use smol_str::SmolStr;
use std::fmt::{self, Display, Formatter, Write};
use std::hash::Hash;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct InvalidGraphQlName(pub String);

#[derive(Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(SmolStr);

impl Name {
    pub fn get(&self) -> &SmolStr {
        &self.0
    }
    pub fn new(s: &str) -> Result<Name, InvalidGraphQlName> {
        Name::from_str(s)
    }
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for Name {
    type Err = InvalidGraphQlName;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if is_valid_graphql_name(s) {
            Ok(Name(SmolStr::new(s)))
        } else {
            Err(InvalidGraphQlName(s.into()))
        }
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if !is_valid_graphql_name(&s) {
            return Err(serde::de::Error::custom(format!(
                "{s} is not a valid graphql name"
            )));
        }
        Ok(Name(SmolStr::new(&s)))
    }
}

fn match_first(c: char) -> bool {
    c == '_' || c.is_ascii_uppercase() || c.is_ascii_lowercase()
}

fn match_body(c: char) -> bool {
    c == '_' || c.is_ascii_uppercase() || c.is_ascii_lowercase() || c.is_ascii_digit()
}

pub fn is_valid_graphql_name(text: &str) -> bool {
    if let Some(first) = text.chars().next() {
        let body = &text[first.len_utf8()..];
        match_first(first) && body.chars().all(match_body)
    } else {
        false
    }
}

// Macro to build a valid graphql name
#[macro_export]
macro_rules! mk_name {
    ($name:literal) => {
        $crate::ast::common::Name::new($name).unwrap()
    };
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName(pub Name);

impl TypeName {
    pub fn new(s: &str) -> Result<TypeName, InvalidGraphQlName> {
        Name::new(s).map(TypeName)
    }
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The type of a root operation; `query` or `mutation`.
#[derive(Serialize, Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub enum OperationType {
    /// A query.
    Query,
    /// A mutation.
    Mutation,
}

impl Display for OperationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        })
    }
}

/// The coordinate of a field on an object type, written `Type.field`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldCoordinate {
    pub type_name: TypeName,
    pub field_name: Name,
}

#[derive(Debug, thiserror::Error)]
#[error("'{0}' is not a valid field coordinate, expected 'Type.field'")]
pub struct InvalidFieldCoordinate(pub String);

impl FieldCoordinate {
    pub fn new(type_name: TypeName, field_name: Name) -> Self {
        FieldCoordinate {
            type_name,
            field_name,
        }
    }
}

impl FromStr for FieldCoordinate {
    type Err = InvalidFieldCoordinate;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (type_name, field_name) = s
            .split_once('.')
            .ok_or_else(|| InvalidFieldCoordinate(s.to_string()))?;
        match (TypeName::new(type_name), Name::new(field_name)) {
            (Ok(type_name), Ok(field_name)) => Ok(FieldCoordinate::new(type_name, field_name)),
            _ => Err(InvalidFieldCoordinate(s.to_string())),
        }
    }
}

impl Display for FieldCoordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.field_name)
    }
}

/// A GraphQL type, for example `String` or `[String!]!`.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Types).
#[derive(Serialize, Deserialize, Hash, Debug, PartialEq, Eq, Clone)]
pub struct TypeContainer<T> {
    /// The base type.
    pub base: BaseTypeContainer<T>,
    /// Whether the type is nullable.
    pub nullable: bool,
}

pub type Type = TypeContainer<TypeName>;

impl<T> TypeContainer<T> {
    pub fn named_non_null(named: T) -> TypeContainer<T> {
        TypeContainer {
            base: BaseTypeContainer::Named(named),
            nullable: false,
        }
    }
    pub fn named_null(named: T) -> TypeContainer<T> {
        TypeContainer {
            base: BaseTypeContainer::Named(named),
            nullable: true,
        }
    }
    pub fn list_null(element_type: TypeContainer<T>) -> TypeContainer<T> {
        TypeContainer {
            base: BaseTypeContainer::List(Box::new(element_type)),
            nullable: true,
        }
    }
    pub fn list_non_null(element_type: TypeContainer<T>) -> TypeContainer<T> {
        TypeContainer {
            base: BaseTypeContainer::List(Box::new(element_type)),
            nullable: false,
        }
    }
    pub fn underlying_type(&self) -> &T {
        match &self.base {
            BaseTypeContainer::Named(n) => n,
            BaseTypeContainer::List(ty) => ty.underlying_type(),
        }
    }

    pub fn is_list(&self) -> bool {
        match &self.base {
            BaseTypeContainer::Named(_) => false,
            BaseTypeContainer::List(_) => true,
        }
    }

    /// Same type, with the outermost nullability replaced
    #[must_use]
    pub fn with_nullability(self, nullable: bool) -> TypeContainer<T> {
        TypeContainer {
            base: self.base,
            nullable,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.base.fmt(f)?;
        if !self.nullable {
            f.write_char('!')?;
        }
        Ok(())
    }
}

/// A GraphQL base type, for example `String` or `[String!]`. This does not include whether the
/// type is nullable; for that see [Type](struct.Type.html).
#[derive(Serialize, Deserialize, Hash, Debug, PartialEq, Eq, Clone)]
pub enum BaseTypeContainer<T> {
    /// A named type, such as `String`.
    Named(T),
    /// A list type, such as `[String]`.
    List(Box<TypeContainer<T>>),
}

pub type BaseType = BaseTypeContainer<TypeName>;

impl Display for BaseType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => name.fmt(f),
            Self::List(ty) => write!(f, "[{ty}]"),
        }
    }
}

#[test]
fn test_graphql_compliant_name() -> anyhow::Result<()> {
    // Positive tests
    let name: Name = serde_json::from_str("\"foo\"")?;
    assert_eq!(name.get(), "foo");

    let name: Name = serde_json::from_str("\"_Foo\"")?;
    assert_eq!(name.get(), "_Foo");

    let name: Name = serde_json::from_str("\"foo_1\"")?;
    assert_eq!(name.get(), "foo_1");

    // Negative tests
    let name: Result<Name, _> = serde_json::from_str("\"1foo\"");
    assert!(name.is_err());

    let name: Result<Name, _> = serde_json::from_str("\"foo-bar\"");
    assert!(name.is_err());

    let name: Result<Name, _> = serde_json::from_str("\"\"");
    assert!(name.is_err());

    Ok(())
}

#[test]
fn test_field_coordinate_round_trip() {
    let coordinate: FieldCoordinate = "Query.blogPosts".parse().unwrap();
    assert_eq!(coordinate.type_name.as_str(), "Query");
    assert_eq!(coordinate.field_name.as_str(), "blogPosts");
    assert_eq!(coordinate.to_string(), "Query.blogPosts");

    assert!("Query".parse::<FieldCoordinate>().is_err());
    assert!("Query.blog-posts".parse::<FieldCoordinate>().is_err());
}

#[test]
fn test_type_display() {
    let ty = Type::list_non_null(Type::named_non_null(TypeName(mk_name!("String"))));
    assert_eq!(ty.to_string(), "[String!]!");
    let ty = Type::named_null(TypeName(mk_name!("ID")));
    assert_eq!(ty.to_string(), "ID");
}
