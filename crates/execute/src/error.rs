use lang_graphql::ast::common as ast;

/// Errors raised while turning a compiled schema into an executable one.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no policy named {name} is registered")]
    UnknownPolicy { name: String },

    #[error("no middleware named {name} is registered")]
    UnknownMiddleware { name: String },

    #[error("while wrapping the resolver of {coordinate}: {error}")]
    WrapResolver {
        coordinate: ast::FieldCoordinate,
        #[source]
        error: Box<Error>,
    },

    #[error("a resolver is configured for {coordinate}, which is not a field of the schema")]
    UnknownResolverField { coordinate: ast::FieldCoordinate },
}
