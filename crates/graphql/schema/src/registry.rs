//! The name → definition table filled by one compilation pass.

use content_model::ModelUid;
use indexmap::IndexMap;
use lang_graphql::ast::common as ast;
use lang_graphql::schema as gql_schema;

use crate::{Annotation, Error};

/// What produced a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "camelCase")]
pub enum Kind {
    Scalar,
    Internal,
    Type,
    Component,
    Entity,
    EntityResponse,
    EntityResponseCollection,
    RelationResponseCollection,
    Enum,
    DynamicZone,
    DynamicZoneInput,
    Morph,
    Input,
    FiltersInput,
    ScalarFilterInput,
    Queries,
    Mutations,
    Extension,
}

/// Provenance of a registry entry, used to query the registry afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryConfig {
    pub kind: Kind,
    pub model: Option<ModelUid>,
    pub attribute: Option<String>,
}

impl EntryConfig {
    pub fn new(kind: Kind) -> Self {
        EntryConfig {
            kind,
            model: None,
            attribute: None,
        }
    }

    pub fn for_model(kind: Kind, model: &ModelUid) -> Self {
        EntryConfig {
            kind,
            model: Some(model.clone()),
            attribute: None,
        }
    }

    pub fn for_attribute(kind: Kind, model: &ModelUid, attribute: &str) -> Self {
        EntryConfig {
            kind,
            model: Some(model.clone()),
            attribute: Some(attribute.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Type(gql_schema::TypeInfo<Annotation>),
    /// Fields contributed to a root operation type.
    RootFields {
        root: ast::OperationType,
        fields: Vec<gql_schema::Field<Annotation>>,
    },
}

impl Definition {
    pub fn as_type(&self) -> Option<&gql_schema::TypeInfo<Annotation>> {
        match self {
            Definition::Type(type_info) => Some(type_info),
            Definition::RootFields { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub name: String,
    pub definition: Definition,
    pub config: EntryConfig,
}

/// Computes the config of each entry passed to [`TypeRegistry::register_many`].
pub trait EntryConfigFactory {
    fn config_for(&mut self, name: &str, definition: &Definition) -> EntryConfig;
}

impl EntryConfigFactory for EntryConfig {
    fn config_for(&mut self, _name: &str, _definition: &Definition) -> EntryConfig {
        self.clone()
    }
}

impl<F> EntryConfigFactory for F
where
    F: FnMut(&str, &Definition) -> EntryConfig,
{
    fn config_for(&mut self, name: &str, definition: &Definition) -> EntryConfig {
        self(name, definition)
    }
}

/// Entries keep their registration order. A name can be registered once;
/// entries are never replaced or removed.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: IndexMap<String, RegistryEntry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        definition: Definition,
        config: EntryConfig,
    ) -> Result<(), Error> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(Error::DuplicateTypeName { type_name: name });
        }
        tracing::trace!(name = %name, kind = %config.kind, "registering schema artifact");
        self.entries.insert(
            name.clone(),
            RegistryEntry {
                name,
                definition,
                config,
            },
        );
        Ok(())
    }

    pub fn register_many<I, N>(
        &mut self,
        definitions: I,
        mut config: impl EntryConfigFactory,
    ) -> Result<(), Error>
    where
        I: IntoIterator<Item = (N, Definition)>,
        N: Into<String>,
    {
        for (name, definition) in definitions {
            let name = name.into();
            let entry_config = config.config_for(&name, &definition);
            self.register(name, definition, entry_config)?;
        }
        Ok(())
    }

    /// Registers a type definition under its own name.
    pub fn register_type(
        &mut self,
        type_info: gql_schema::TypeInfo<Annotation>,
        config: EntryConfig,
    ) -> Result<(), Error> {
        let name = type_info.name().to_string();
        self.register(name, Definition::Type(type_info), config)
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    pub fn entries_where<'a>(
        &'a self,
        predicate: impl Fn(&EntryConfig) -> bool + 'a,
    ) -> impl Iterator<Item = &'a RegistryEntry> + 'a {
        self.entries
            .values()
            .filter(move |entry| predicate(&entry.config))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> impl Iterator<Item = RegistryEntry> {
        self.entries.into_values()
    }
}
