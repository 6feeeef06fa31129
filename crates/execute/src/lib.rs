//! Turns a compiled schema into an executable one: generated resolvers for
//! the shadow CRUD fields, translation of GraphQL arguments to data-access
//! parameters, and the auth, policy and middleware chain around each field.

mod error;
mod filters;
mod input;
mod pagination;
mod resolvers;
mod response;
mod schema;
mod services;
mod union;
mod wrap;

pub use error::Error;
pub use filters::graphql_filters_to_query;
pub use input::{coerce_arguments, coerce_value};
pub use pagination::{PaginationArg, PaginationConfig, PaginationMeta, Window};
pub use response::{to_entity, to_entity_response, to_entity_response_collection};
pub use schema::{field_error_response, ExecutableSchema, ExecutableSchemaOptions};
pub use services::{
    AuthVerifier, EntityId, EntityService, MiddlewareFactory, MiddlewareRegistry, PolicyRegistry,
    PublicationState, QueryParams, Services,
};
pub use union::resolve_union_type;
pub use wrap::{wrap_resolver, wrap_resolvers, PolicyMiddleware, PolicyPlacement, WrappedResolver};
