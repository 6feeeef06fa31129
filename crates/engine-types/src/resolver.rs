use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use lang_graphql::ast::common as ast;
use serde::{Deserialize, Serialize};

use crate::{FieldError, RequestContext};

/// Where in the schema a field is being resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveInfo {
    pub parent_type: ast::TypeName,
    pub field_name: ast::Name,
}

impl ResolveInfo {
    pub fn coordinate(&self) -> ast::FieldCoordinate {
        ast::FieldCoordinate::new(self.parent_type.clone(), self.field_name.clone())
    }
}

/// Everything a resolver sees: the parent value, the field arguments, the
/// request context and the field's position in the schema.
#[derive(Debug, Clone)]
pub struct ResolveParams {
    pub parent: serde_json::Value,
    pub args: serde_json::Value,
    pub context: Arc<RequestContext>,
    pub info: ResolveInfo,
}

impl ResolveParams {
    pub fn arg(&self, name: &str) -> Option<&serde_json::Value> {
        self.args.get(name).filter(|value| !value.is_null())
    }
}

/// Produces the value of one field.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, params: ResolveParams) -> Result<serde_json::Value, FieldError>;
}

/// One link of a resolver chain. It may inspect or rewrite the params, hand
/// them on with [`Next::run`], or fail and stop the chain.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn call(
        &self,
        params: ResolveParams,
        next: Next<'_>,
    ) -> Result<serde_json::Value, FieldError>;
}

/// A policy check. `Some(true)` and `None` let the request through, anything
/// else rejects it.
#[async_trait]
pub trait PolicyHandler: Send + Sync {
    async fn check(
        &self,
        params: &ResolveParams,
        config: &serde_json::Value,
    ) -> Result<Option<bool>, FieldError>;
}

/// The remainder of a resolver chain: the middlewares not yet run, then the
/// resolver that ends the chain.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    middlewares: &'a [Arc<dyn Middleware>],
    resolver: &'a dyn Resolver,
}

impl<'a> Next<'a> {
    pub fn new(middlewares: &'a [Arc<dyn Middleware>], resolver: &'a dyn Resolver) -> Self {
        Next {
            middlewares,
            resolver,
        }
    }

    /// Runs the next middleware, or the resolver once none are left.
    pub async fn run(self, params: ResolveParams) -> Result<serde_json::Value, FieldError> {
        match self.middlewares.split_first() {
            Some((middleware, rest)) => {
                middleware
                    .call(
                        params,
                        Next {
                            middlewares: rest,
                            resolver: self.resolver,
                        },
                    )
                    .await
            }
            None => self.resolver.resolve(params).await,
        }
    }

    pub fn remaining(&self) -> usize {
        self.middlewares.len()
    }
}

pub struct ResolverFn<F>(F);

/// Turns an async closure into a [`Resolver`].
pub fn resolver_fn<F, Fut>(f: F) -> ResolverFn<F>
where
    F: Fn(ResolveParams) -> Fut + Send + Sync,
    Fut: Future<Output = Result<serde_json::Value, FieldError>> + Send,
{
    ResolverFn(f)
}

#[async_trait]
impl<F, Fut> Resolver for ResolverFn<F>
where
    F: Fn(ResolveParams) -> Fut + Send + Sync,
    Fut: Future<Output = Result<serde_json::Value, FieldError>> + Send,
{
    async fn resolve(&self, params: ResolveParams) -> Result<serde_json::Value, FieldError> {
        (self.0)(params).await
    }
}

pub struct MiddlewareFn<F>(F);

/// Turns a closure returning a boxed future into a [`Middleware`].
pub fn middleware_fn<F>(f: F) -> MiddlewareFn<F>
where
    F: for<'a> Fn(ResolveParams, Next<'a>) -> BoxFuture<'a, Result<serde_json::Value, FieldError>>
        + Send
        + Sync,
{
    MiddlewareFn(f)
}

#[async_trait]
impl<F> Middleware for MiddlewareFn<F>
where
    F: for<'a> Fn(ResolveParams, Next<'a>) -> BoxFuture<'a, Result<serde_json::Value, FieldError>>
        + Send
        + Sync,
{
    async fn call(
        &self,
        params: ResolveParams,
        next: Next<'_>,
    ) -> Result<serde_json::Value, FieldError> {
        (self.0)(params, next).await
    }
}

pub struct PolicyFn<F>(F);

/// Turns a synchronous check into a [`PolicyHandler`].
pub fn policy_fn<F>(f: F) -> PolicyFn<F>
where
    F: Fn(&ResolveParams, &serde_json::Value) -> Result<Option<bool>, FieldError> + Send + Sync,
{
    PolicyFn(f)
}

#[async_trait]
impl<F> PolicyHandler for PolicyFn<F>
where
    F: Fn(&ResolveParams, &serde_json::Value) -> Result<Option<bool>, FieldError> + Send + Sync,
{
    async fn check(
        &self,
        params: &ResolveParams,
        config: &serde_json::Value,
    ) -> Result<Option<bool>, FieldError> {
        (self.0)(params, config)
    }
}

/// The authorization requirement of a field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum AuthSpec {
    /// No verification at all, the field is public.
    Disabled,
    /// Any authenticated request may resolve the field.
    #[default]
    Authenticated,
    /// The request's credentials must grant one of these scopes.
    Scope(Vec<String>),
}

/// A middleware in a resolver config, either looked up by name when the
/// schema is built or given directly.
#[derive(Clone)]
pub enum MiddlewareRef {
    Named {
        name: String,
        config: serde_json::Value,
    },
    Inline(Arc<dyn Middleware>),
}

impl MiddlewareRef {
    pub fn named(name: impl Into<String>) -> Self {
        MiddlewareRef::Named {
            name: name.into(),
            config: serde_json::Value::Null,
        }
    }

    pub fn inline(middleware: impl Middleware + 'static) -> Self {
        MiddlewareRef::Inline(Arc::new(middleware))
    }

    /// Sets the config a named middleware is built with. Inline middlewares
    /// are left as they are.
    #[must_use]
    pub fn with_config(self, config: serde_json::Value) -> Self {
        match self {
            MiddlewareRef::Named { name, .. } => MiddlewareRef::Named { name, config },
            inline @ MiddlewareRef::Inline(_) => inline,
        }
    }
}

impl fmt::Debug for MiddlewareRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiddlewareRef::Named { name, config } => f
                .debug_struct("Named")
                .field("name", name)
                .field("config", config)
                .finish(),
            MiddlewareRef::Inline(_) => f.write_str("Inline(<middleware>)"),
        }
    }
}

/// A policy in a resolver config with the config value handed to its handler.
#[derive(Clone)]
pub enum PolicyRef {
    Named {
        name: String,
        config: serde_json::Value,
    },
    Inline {
        handler: Arc<dyn PolicyHandler>,
        config: serde_json::Value,
    },
}

impl PolicyRef {
    pub fn named(name: impl Into<String>) -> Self {
        PolicyRef::Named {
            name: name.into(),
            config: serde_json::Value::Null,
        }
    }

    pub fn inline(handler: impl PolicyHandler + 'static) -> Self {
        PolicyRef::Inline {
            handler: Arc::new(handler),
            config: serde_json::Value::Null,
        }
    }
}

impl fmt::Debug for PolicyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyRef::Named { name, config } => f
                .debug_struct("Named")
                .field("name", name)
                .field("config", config)
                .finish(),
            PolicyRef::Inline { config, .. } => f
                .debug_struct("Inline")
                .field("config", config)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lang_graphql::mk_name;
    use std::sync::Mutex;

    fn params() -> ResolveParams {
        ResolveParams {
            parent: serde_json::Value::Null,
            args: serde_json::json!({}),
            context: Arc::new(RequestContext::anonymous()),
            info: ResolveInfo {
                parent_type: ast::TypeName(mk_name!("Query")),
                field_name: mk_name!("posts"),
            },
        }
    }

    fn recording(label: &'static str, log: Arc<Mutex<Vec<&'static str>>>) -> Arc<dyn Middleware> {
        Arc::new(middleware_fn(move |params, next| {
            let log = log.clone();
            Box::pin(async move {
                log.lock().unwrap().push(label);
                next.run(params).await
            })
        }))
    }

    #[tokio::test]
    async fn test_next_runs_middlewares_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let middlewares = vec![recording("a", log.clone()), recording("b", log.clone())];
        let base_log = log.clone();
        let resolver = resolver_fn(move |_params| {
            let log = base_log.clone();
            async move {
                log.lock().unwrap().push("resolver");
                Ok(serde_json::json!("done"))
            }
        });

        let next = Next::new(&middlewares, &resolver);
        assert_eq!(next.remaining(), 2);
        let value = next.run(params()).await.unwrap();
        assert_eq!(value, serde_json::json!("done"));
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "resolver"]);
    }

    #[tokio::test]
    async fn test_middleware_can_short_circuit() {
        let stop: Arc<dyn Middleware> = Arc::new(middleware_fn(|_params, _next| {
            Box::pin(async { Err(FieldError::validation("stopped")) })
        }));
        let middlewares = vec![stop];
        let resolver = resolver_fn(|_params| async { Ok(serde_json::json!("unreachable")) });
        let result = Next::new(&middlewares, &resolver).run(params()).await;
        assert!(matches!(result, Err(FieldError::Validation { .. })));
    }

    #[test]
    fn test_auth_spec_serialization() {
        let spec: AuthSpec =
            serde_json::from_value(serde_json::json!({"scope": ["api::post.post.find"]})).unwrap();
        assert_eq!(
            spec,
            AuthSpec::Scope(vec!["api::post.post.find".to_string()])
        );
        let spec: AuthSpec = serde_json::from_value(serde_json::json!("disabled")).unwrap();
        assert_eq!(spec, AuthSpec::Disabled);
    }
}
