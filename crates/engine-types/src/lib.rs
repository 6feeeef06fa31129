mod context;
mod error;
mod resolver;

pub use context::{AuthContext, ExposeInternalErrors, RequestContext};
pub use error::{BoxError, ErrorVisibility, FieldError, TraceableError};
pub use resolver::{
    middleware_fn, policy_fn, resolver_fn, AuthSpec, Middleware, MiddlewareFn, MiddlewareRef,
    Next, PolicyFn, PolicyHandler, PolicyRef, ResolveInfo, ResolveParams, Resolver, ResolverFn,
};
