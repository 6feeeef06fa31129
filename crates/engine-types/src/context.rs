use serde::{Deserialize, Serialize};

/// Whether internal error messages reach the API response
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExposeInternalErrors {
    Expose,
    Censor,
}

/// The authenticated principal of a request, as produced by the transport
/// layer's authentication step.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuthContext {
    /// Name of the strategy that authenticated the request, e.g. `api-token`
    pub strategy: String,
    pub credentials: serde_json::Value,
}

/// Per-request state shared by every resolver of one operation.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub auth: Option<AuthContext>,
    /// Free-form values middlewares can hand to the resolvers behind them.
    pub state: serde_json::Map<String, serde_json::Value>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        RequestContext::default()
    }

    pub fn authenticated(auth: AuthContext) -> Self {
        RequestContext {
            auth: Some(auth),
            state: serde_json::Map::new(),
        }
    }
}
