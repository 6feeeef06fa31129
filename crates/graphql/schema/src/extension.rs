//! Schema fragments and resolver configuration supplied from outside the
//! content models.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use engine_types::{AuthSpec, MiddlewareRef, PolicyRef, Resolver};
use lang_graphql::ast::common as ast;
use lang_graphql::schema as gql_schema;

use crate::Annotation;

/// Auth, middlewares and policies of one `Type.field`. Unset keys leave the
/// value of earlier configs in place when merged.
#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    pub auth: Option<AuthSpec>,
    pub middlewares: Option<Vec<MiddlewareRef>>,
    pub policies: Option<Vec<PolicyRef>>,
}

impl ResolverConfig {
    #[must_use]
    pub fn with_auth(mut self, auth: AuthSpec) -> Self {
        self.auth = Some(auth);
        self
    }

    #[must_use]
    pub fn with_middlewares(mut self, middlewares: Vec<MiddlewareRef>) -> Self {
        self.middlewares = Some(middlewares);
        self
    }

    #[must_use]
    pub fn with_policies(mut self, policies: Vec<PolicyRef>) -> Self {
        self.policies = Some(policies);
        self
    }

    /// Merges a later config into this one: every key the later config sets
    /// wins.
    pub fn merge(&mut self, later: ResolverConfig) {
        if let Some(auth) = later.auth {
            self.auth = Some(auth);
        }
        if let Some(middlewares) = later.middlewares {
            self.middlewares = Some(middlewares);
        }
        if let Some(policies) = later.policies {
            self.policies = Some(policies);
        }
    }
}

/// One schema fragment.
#[derive(Clone, Default)]
pub struct Extension {
    /// New type definitions.
    pub types: Vec<gql_schema::TypeInfo<Annotation>>,
    /// Fields added to existing object types, including the root types.
    pub fields: Vec<(ast::TypeName, gql_schema::Field<Annotation>)>,
    pub resolvers: BTreeMap<ast::FieldCoordinate, Arc<dyn Resolver>>,
    pub resolvers_config: BTreeMap<ast::FieldCoordinate, ResolverConfig>,
    /// Types removed from the compiled schema.
    pub types_to_remove: BTreeSet<ast::TypeName>,
}

impl Extension {
    pub fn new() -> Self {
        Extension::default()
    }

    #[must_use]
    pub fn with_type(mut self, type_info: gql_schema::TypeInfo<Annotation>) -> Self {
        self.types.push(type_info);
        self
    }

    #[must_use]
    pub fn with_field(
        mut self,
        type_name: ast::TypeName,
        field: gql_schema::Field<Annotation>,
    ) -> Self {
        self.fields.push((type_name, field));
        self
    }

    #[must_use]
    pub fn with_resolver(
        mut self,
        coordinate: ast::FieldCoordinate,
        resolver: impl Resolver + 'static,
    ) -> Self {
        self.resolvers.insert(coordinate, Arc::new(resolver));
        self
    }

    #[must_use]
    pub fn with_resolver_config(
        mut self,
        coordinate: ast::FieldCoordinate,
        config: ResolverConfig,
    ) -> Self {
        self.resolvers_config.insert(coordinate, config);
        self
    }

    #[must_use]
    pub fn without_type(mut self, type_name: ast::TypeName) -> Self {
        self.types_to_remove.insert(type_name);
        self
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("types", &self.types)
            .field("fields", &self.fields)
            .field("resolvers", &self.resolvers.keys().collect::<Vec<_>>())
            .field("resolvers_config", &self.resolvers_config)
            .field("types_to_remove", &self.types_to_remove)
            .finish()
    }
}

/// Every extension registered for one compilation pass, in registration
/// order.
#[derive(Debug, Clone, Default)]
pub struct ExtensionStore {
    extensions: Vec<Extension>,
}

impl ExtensionStore {
    pub fn new() -> Self {
        ExtensionStore::default()
    }

    pub fn use_extension(&mut self, extension: Extension) -> &mut Self {
        self.extensions.push(extension);
        self
    }

    pub fn types(&self) -> impl Iterator<Item = &gql_schema::TypeInfo<Annotation>> {
        self.extensions
            .iter()
            .flat_map(|extension| extension.types.iter())
    }

    pub fn fields(&self) -> impl Iterator<Item = &(ast::TypeName, gql_schema::Field<Annotation>)> {
        self.extensions
            .iter()
            .flat_map(|extension| extension.fields.iter())
    }

    /// Resolver implementations; a later extension replaces the resolver of
    /// an earlier one for the same field.
    pub fn resolvers(&self) -> BTreeMap<ast::FieldCoordinate, Arc<dyn Resolver>> {
        let mut resolvers = BTreeMap::new();
        for extension in &self.extensions {
            for (coordinate, resolver) in &extension.resolvers {
                resolvers.insert(coordinate.clone(), resolver.clone());
            }
        }
        resolvers
    }

    pub fn types_to_remove(&self) -> BTreeSet<ast::TypeName> {
        self.extensions
            .iter()
            .flat_map(|extension| extension.types_to_remove.iter().cloned())
            .collect()
    }

    /// Layers every extension's resolver configs over `defaults`, in
    /// registration order.
    pub fn resolvers_config(
        &self,
        defaults: BTreeMap<ast::FieldCoordinate, ResolverConfig>,
    ) -> BTreeMap<ast::FieldCoordinate, ResolverConfig> {
        let mut merged = defaults;
        for extension in &self.extensions {
            for (coordinate, config) in &extension.resolvers_config {
                merged
                    .entry(coordinate.clone())
                    .or_default()
                    .merge(config.clone());
            }
        }
        merged
    }
}
