//! The compiled schema together with the resolver of each of its fields.

use std::collections::BTreeMap;
use std::sync::Arc;

use content_model::ContentModelSet;
use engine_types::{
    ExposeInternalErrors, FieldError, RequestContext, ResolveInfo, ResolveParams, Resolver,
};
use graphql_schema::{Annotation, CompiledSchema};
use lang_graphql::ast::common as ast;
use lang_graphql::http::{GraphQLError, PathSegment};
use lang_graphql::schema::{self as gql_schema, TypeInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::pagination::PaginationConfig;
use crate::resolvers::{base_resolver, PropertyResolver, ResolverContext};
use crate::services::Services;
use crate::union::resolve_union_type;
use crate::wrap::{wrap_resolvers, PolicyPlacement};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableSchemaOptions {
    #[serde(default)]
    pub policy_placement: PolicyPlacement,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

pub struct ExecutableSchema {
    schema: Arc<gql_schema::Schema<Annotation>>,
    resolvers: BTreeMap<ast::FieldCoordinate, Arc<dyn Resolver>>,
}

impl ExecutableSchema {
    /// Attaches a resolver to every object field of `compiled`: the one an
    /// extension supplies, or else the generated one, wrapped with the
    /// field's auth, policies and middlewares.
    #[tracing::instrument(skip_all)]
    pub fn new(
        compiled: CompiledSchema,
        models: Arc<ContentModelSet>,
        services: &Services,
        extension_resolvers: BTreeMap<ast::FieldCoordinate, Arc<dyn Resolver>>,
        options: &ExecutableSchemaOptions,
    ) -> Result<Self, Error> {
        let CompiledSchema {
            schema,
            resolvers_config,
        } = compiled;
        let schema = Arc::new(schema);
        let ctx = Arc::new(ResolverContext {
            schema: schema.clone(),
            models,
            entities: services.entities.clone(),
            pagination: options.pagination,
        });

        let mut resolvers = BTreeMap::new();
        for object in schema.objects() {
            for field in object.fields.values() {
                let coordinate = ast::FieldCoordinate::new(object.name.clone(), field.name.clone());
                resolvers.insert(coordinate, base_resolver(&ctx, field));
            }
        }
        for (coordinate, resolver) in extension_resolvers {
            match resolvers.get_mut(&coordinate) {
                Some(slot) => *slot = resolver,
                None => return Err(Error::UnknownResolverField { coordinate }),
            }
        }

        let root_types: Vec<ast::TypeName> = schema.root_types().cloned().collect();
        let resolvers = wrap_resolvers(
            resolvers,
            &resolvers_config,
            &root_types,
            services,
            options.policy_placement,
        )?;
        tracing::debug!(resolvers = resolvers.len(), "executable schema ready");
        Ok(ExecutableSchema { schema, resolvers })
    }

    pub fn schema(&self) -> &gql_schema::Schema<Annotation> {
        &self.schema
    }

    pub fn resolver(&self, coordinate: &ast::FieldCoordinate) -> Option<&Arc<dyn Resolver>> {
        self.resolvers.get(coordinate)
    }

    /// Resolves `type_name.field_name` against `parent`. Fields without a
    /// resolver of their own read the property of the same name.
    pub async fn resolve_field(
        &self,
        type_name: &ast::TypeName,
        field_name: &ast::Name,
        parent: Value,
        args: Value,
        context: Arc<RequestContext>,
    ) -> Result<Value, FieldError> {
        let params = ResolveParams {
            parent,
            args,
            context,
            info: ResolveInfo {
                parent_type: type_name.clone(),
                field_name: field_name.clone(),
            },
        };
        match self.resolvers.get(&params.info.coordinate()) {
            Some(resolver) => resolver.resolve(params).await,
            None => PropertyResolver.resolve(params).await,
        }
    }

    /// The member of union `union_name` that `value` belongs to. `None` when
    /// `union_name` is not a union or no member matches.
    pub fn resolve_type(&self, union_name: &ast::TypeName, value: &Value) -> Option<ast::TypeName> {
        match self.schema.get_type(union_name) {
            Some(TypeInfo::Union(union)) => resolve_union_type(union, value),
            _ => None,
        }
    }

    pub fn sdl(&self) -> String {
        self.schema.generate_sdl()
    }

    /// Drops the types no root field reaches, together with the resolvers
    /// of their fields.
    pub fn prune_unused_types(&mut self) -> Vec<ast::TypeName> {
        let mut schema = gql_schema::Schema::clone(&self.schema);
        let removed = schema.prune_unreachable();
        if !removed.is_empty() {
            self.resolvers
                .retain(|coordinate, _| !removed.contains(&coordinate.type_name));
            tracing::debug!(removed = removed.len(), "pruned unreachable types");
        }
        self.schema = Arc::new(schema);
        removed
    }
}

/// The error entry a failed field contributes to the response.
pub fn field_error_response(
    error: &FieldError,
    coordinate: &ast::FieldCoordinate,
    expose_internal_errors: ExposeInternalErrors,
) -> GraphQLError {
    if let FieldError::Internal { description } = error {
        tracing::error!(field = %coordinate, description = %description, "internal error while resolving");
    }
    error.to_graphql_error(
        expose_internal_errors,
        Some(vec![PathSegment::field(coordinate.field_name.clone())]),
    )
}
