//! Wraps resolvers with authorization, policies and middlewares.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use engine_types::{
    AuthSpec, FieldError, Middleware, Next, PolicyHandler, ResolveParams, Resolver,
};
use graphql_schema::ResolverConfig;
use lang_graphql::ast::common as ast;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::services::{AuthVerifier, Services};

/// Where the policy check sits in a field's chain.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PolicyPlacement {
    /// auth, policies, middlewares, resolver
    #[default]
    BeforeMiddlewares,
    /// auth, middlewares, policies, resolver
    AfterMiddlewares,
}

/// Evaluates policies in order. A policy answering neither `true` nor
/// nothing stops the chain with a policy error.
pub struct PolicyMiddleware {
    policies: Vec<(Arc<dyn PolicyHandler>, Value)>,
}

impl PolicyMiddleware {
    pub fn new(policies: Vec<(Arc<dyn PolicyHandler>, Value)>) -> Self {
        PolicyMiddleware { policies }
    }
}

#[async_trait]
impl Middleware for PolicyMiddleware {
    async fn call(&self, params: ResolveParams, next: Next<'_>) -> Result<Value, FieldError> {
        for (handler, config) in &self.policies {
            match handler.check(&params, config).await? {
                Some(true) | None => {}
                Some(false) => {
                    tracing::debug!(field = %params.info.coordinate(), "policy rejected the request");
                    return Err(FieldError::policy_failed());
                }
            }
        }
        next.run(params).await
    }
}

/// A resolver behind its auth check and middleware chain.
pub struct WrappedResolver {
    auth: Option<AuthSpec>,
    verifier: Arc<dyn AuthVerifier>,
    chain: Vec<Arc<dyn Middleware>>,
    resolver: Arc<dyn Resolver>,
}

#[async_trait]
impl Resolver for WrappedResolver {
    async fn resolve(&self, params: ResolveParams) -> Result<Value, FieldError> {
        if let Some(spec) = &self.auth {
            if let Err(error) = self.verifier.verify(params.context.auth.as_ref(), spec).await {
                tracing::debug!(
                    field = %params.info.coordinate(),
                    error = %error,
                    "authorization failed"
                );
                return Err(FieldError::forbidden());
            }
        }
        Next::new(&self.chain, self.resolver.as_ref())
            .run(params)
            .await
    }
}

/// The auth requirement a field is verified against, if any. Root fields
/// are always verified unless auth is disabled; other fields only when
/// their config names a requirement.
fn auth_requirement(config: Option<&ResolverConfig>, is_root_field: bool) -> Option<AuthSpec> {
    match config.and_then(|config| config.auth.clone()) {
        Some(AuthSpec::Disabled) => None,
        Some(spec) => Some(spec),
        None if is_root_field => Some(AuthSpec::default()),
        None => None,
    }
}

/// Wraps one resolver. Named middlewares and policies are looked up here,
/// so a missing name fails the build rather than a request.
pub fn wrap_resolver(
    resolver: Arc<dyn Resolver>,
    config: Option<&ResolverConfig>,
    is_root_field: bool,
    services: &Services,
    placement: PolicyPlacement,
) -> Result<Arc<dyn Resolver>, Error> {
    let auth = auth_requirement(config, is_root_field);
    let middlewares = match config.and_then(|config| config.middlewares.as_deref()) {
        Some(middlewares) => services.middlewares.resolve(middlewares)?,
        None => Vec::new(),
    };
    let policies = match config.and_then(|config| config.policies.as_deref()) {
        Some(policies) => services.policies.resolve(policies)?,
        None => Vec::new(),
    };

    let mut chain = middlewares;
    if !policies.is_empty() {
        let policy: Arc<dyn Middleware> = Arc::new(PolicyMiddleware::new(policies));
        match placement {
            PolicyPlacement::BeforeMiddlewares => chain.insert(0, policy),
            PolicyPlacement::AfterMiddlewares => chain.push(policy),
        }
    }

    if auth.is_none() && chain.is_empty() {
        return Ok(resolver);
    }
    Ok(Arc::new(WrappedResolver {
        auth,
        verifier: services.auth.clone(),
        chain,
        resolver,
    }))
}

/// Wraps every resolver with the config of its field.
#[tracing::instrument(skip_all, fields(fields = resolvers.len()))]
pub fn wrap_resolvers(
    resolvers: BTreeMap<ast::FieldCoordinate, Arc<dyn Resolver>>,
    resolvers_config: &BTreeMap<ast::FieldCoordinate, ResolverConfig>,
    root_types: &[ast::TypeName],
    services: &Services,
    placement: PolicyPlacement,
) -> Result<BTreeMap<ast::FieldCoordinate, Arc<dyn Resolver>>, Error> {
    for coordinate in resolvers_config.keys() {
        if !resolvers.contains_key(coordinate) {
            tracing::warn!(field = %coordinate, "resolver config for a field that is not in the schema");
        }
    }
    resolvers
        .into_iter()
        .map(|(coordinate, resolver)| {
            let is_root_field = root_types.contains(&coordinate.type_name);
            let wrapped = wrap_resolver(
                resolver,
                resolvers_config.get(&coordinate),
                is_root_field,
                services,
                placement,
            )
            .map_err(|error| Error::WrapResolver {
                coordinate: coordinate.clone(),
                error: Box::new(error),
            })?;
            Ok((coordinate, wrapped))
        })
        .collect()
}
