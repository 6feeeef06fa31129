use crate::ast::common as ast;
use crate::ast::value::ConstValue;
use crate::mk_name;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

pub mod prune;
pub mod sdl;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("multiple definitions of graphql type: {0:}")]
    ConflictingGraphQlType(ast::TypeName),

    #[error("root type {0:} must be defined as an object type")]
    InvalidRootType(ast::TypeName),
}

pub type Result<T> = core::result::Result<T, Error>;

/// The scalars every GraphQL schema has without declaring them.
pub mod builtin {
    use super::ast;
    use crate::mk_name;

    pub fn string() -> ast::TypeName {
        ast::TypeName(mk_name!("String"))
    }
    pub fn int() -> ast::TypeName {
        ast::TypeName(mk_name!("Int"))
    }
    pub fn float() -> ast::TypeName {
        ast::TypeName(mk_name!("Float"))
    }
    pub fn boolean() -> ast::TypeName {
        ast::TypeName(mk_name!("Boolean"))
    }
    pub fn id() -> ast::TypeName {
        ast::TypeName(mk_name!("ID"))
    }

    pub fn is_builtin(type_name: &ast::TypeName) -> bool {
        matches!(
            type_name.as_str(),
            "String" | "Int" | "Float" | "Boolean" | "ID"
        )
    }
}

#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct Object<A> {
    pub name: ast::TypeName,
    pub description: Option<String>,
    pub fields: BTreeMap<ast::Name, Field<A>>,
}

impl<A> Object<A> {
    pub fn new(
        name: ast::TypeName,
        description: Option<String>,
        fields: BTreeMap<ast::Name, Field<A>>,
    ) -> Self {
        Object {
            name,
            description,
            fields,
        }
    }
}

#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct Field<A> {
    pub name: ast::Name,
    pub description: Option<String>,
    pub info: A,
    pub field_type: ast::Type,
    pub arguments: BTreeMap<ast::Name, InputField<A>>,
}

impl<A> Field<A> {
    pub fn new(
        name: ast::Name,
        description: Option<String>,
        info: A,
        field_type: ast::Type,
        arguments: BTreeMap<ast::Name, InputField<A>>,
    ) -> Self {
        Field {
            name,
            description,
            info,
            field_type,
            arguments,
        }
    }
}

#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct InputObject<A> {
    pub name: ast::TypeName,
    pub description: Option<String>,
    pub fields: BTreeMap<ast::Name, InputField<A>>,
}

impl<A> InputObject<A> {
    pub fn new(
        name: ast::TypeName,
        description: Option<String>,
        fields: BTreeMap<ast::Name, InputField<A>>,
    ) -> Self {
        InputObject {
            name,
            description,
            fields,
        }
    }
}

#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct InputField<A> {
    pub name: ast::Name,
    pub description: Option<String>,
    pub info: A,
    pub field_type: ast::Type,
    pub default_value: Option<ConstValue>,
}

impl<A> InputField<A> {
    pub fn new(
        name: ast::Name,
        description: Option<String>,
        info: A,
        field_type: ast::Type,
        default_value: Option<ConstValue>,
    ) -> Self {
        InputField {
            name,
            description,
            info,
            field_type,
            default_value,
        }
    }
}

#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct Scalar<A> {
    pub name: ast::TypeName,
    pub description: Option<String>,
    pub info: A,
}

#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct EnumValue<A> {
    pub value: ast::Name,
    pub description: Option<String>,
    pub info: A,
}

#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct Enum<A> {
    pub name: ast::TypeName,
    pub description: Option<String>,
    pub values: BTreeMap<ast::Name, EnumValue<A>>,
}

#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct Union<A> {
    pub name: ast::TypeName,
    pub description: Option<String>,
    pub info: A,
    pub members: BTreeSet<ast::TypeName>,
}

impl<A> Union<A> {
    pub fn possible_types(&self) -> &BTreeSet<ast::TypeName> {
        &self.members
    }
}

#[derive(Serialize, PartialEq, Debug, Clone)]
pub enum TypeInfo<A> {
    Scalar(Scalar<A>),
    Enum(Enum<A>),
    Object(Object<A>),
    Union(Union<A>),
    InputObject(InputObject<A>),
}

impl<A> TypeInfo<A> {
    pub fn kind(&self) -> &'static str {
        match self {
            TypeInfo::Scalar(_) => "SCALAR",
            TypeInfo::Enum(_) => "ENUM",
            TypeInfo::Object(_) => "OBJECT",
            TypeInfo::Union(_) => "UNION",
            TypeInfo::InputObject(_) => "INPUT_OBJECT",
        }
    }

    pub fn name(&self) -> &ast::TypeName {
        match self {
            TypeInfo::Scalar(scalar) => &scalar.name,
            TypeInfo::Enum(e) => &e.name,
            TypeInfo::Object(object) => &object.name,
            TypeInfo::Union(union) => &union.name,
            TypeInfo::InputObject(input_object) => &input_object.name,
        }
    }

    pub fn is_input_type(&self) -> bool {
        match self {
            TypeInfo::Scalar(_) | TypeInfo::Enum(_) | TypeInfo::InputObject(_) => true,
            TypeInfo::Object(_) | TypeInfo::Union(_) => false,
        }
    }
}

#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct Schema<A> {
    pub types: BTreeMap<ast::TypeName, TypeInfo<A>>,
    pub query_type: ast::TypeName,
    pub mutation_type: Option<ast::TypeName>,
}

impl<A> Schema<A> {
    /// Assembles a schema out of its type definitions. Two definitions sharing a
    /// name is an error, as is a root type that isn't an object.
    pub fn new(
        query_type: ast::TypeName,
        mutation_type: Option<ast::TypeName>,
        definitions: impl IntoIterator<Item = TypeInfo<A>>,
    ) -> Result<Self> {
        let mut types = BTreeMap::new();
        for definition in definitions {
            let type_name = definition.name().clone();
            if types.insert(type_name.clone(), definition).is_some() {
                return Err(Error::ConflictingGraphQlType(type_name));
            }
        }
        for root in std::iter::once(&query_type).chain(mutation_type.iter()) {
            if !matches!(types.get(root), Some(TypeInfo::Object(_))) {
                return Err(Error::InvalidRootType(root.clone()));
            }
        }
        Ok(Schema {
            types,
            query_type,
            mutation_type,
        })
    }

    pub fn get_type(&self, type_name: &ast::TypeName) -> Option<&TypeInfo<A>> {
        self.types.get(type_name)
    }

    pub fn get_object(&self, type_name: &ast::TypeName) -> Option<&Object<A>> {
        match self.types.get(type_name) {
            Some(TypeInfo::Object(object)) => Some(object),
            _ => None,
        }
    }

    pub fn get_field(&self, coordinate: &ast::FieldCoordinate) -> Option<&Field<A>> {
        self.get_object(&coordinate.type_name)
            .and_then(|object| object.fields.get(&coordinate.field_name))
    }

    pub fn objects(&self) -> impl Iterator<Item = &Object<A>> {
        self.types.values().filter_map(|type_info| match type_info {
            TypeInfo::Object(object) => Some(object),
            _ => None,
        })
    }

    pub fn root_types(&self) -> impl Iterator<Item = &ast::TypeName> {
        std::iter::once(&self.query_type).chain(self.mutation_type.iter())
    }
}

pub fn typename_field_name() -> ast::Name {
    mk_name!("__typename")
}
