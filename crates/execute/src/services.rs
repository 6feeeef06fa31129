//! The collaborators resolvers delegate to.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use content_model::ModelUid;
use engine_types::{AuthContext, AuthSpec, BoxError, Middleware, MiddlewareRef, PolicyHandler, PolicyRef};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The id of a record. GraphQL `ID`s arrive as strings or integers and are
/// compared in their string form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn from_value(value: &serde_json::Value) -> Option<EntityId> {
        match value {
            serde_json::Value::String(id) => Some(EntityId(id.clone())),
            serde_json::Value::Number(id) => Some(EntityId(id.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PublicationState {
    #[default]
    Live,
    Preview,
}

/// Parameters of a data-access call, already translated from GraphQL
/// arguments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    /// Filters with data-access operators (`$eq`, `$and`, ...).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub filters: serde_json::Value,
    #[serde(default)]
    pub start: u64,
    /// `None` returns every matching record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_state: Option<PublicationState>,
    /// Payload of create and update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// The data-access layer. Errors are passed to the caller untouched.
#[async_trait]
pub trait EntityService: Send + Sync {
    async fn find_many(
        &self,
        uid: &ModelUid,
        params: &QueryParams,
    ) -> Result<Vec<serde_json::Value>, BoxError>;

    async fn find_one(
        &self,
        uid: &ModelUid,
        id: &EntityId,
        params: &QueryParams,
    ) -> Result<Option<serde_json::Value>, BoxError>;

    async fn create(&self, uid: &ModelUid, params: &QueryParams)
        -> Result<serde_json::Value, BoxError>;

    async fn update(
        &self,
        uid: &ModelUid,
        id: &EntityId,
        params: &QueryParams,
    ) -> Result<serde_json::Value, BoxError>;

    async fn delete(
        &self,
        uid: &ModelUid,
        id: &EntityId,
        params: &QueryParams,
    ) -> Result<serde_json::Value, BoxError>;

    /// The value of `attribute` on `parent`, a record of `uid`: a record or
    /// list of records for relations and media, the stored value for
    /// components and dynamic zones.
    async fn load(
        &self,
        uid: &ModelUid,
        parent: &serde_json::Value,
        attribute: &str,
        params: &QueryParams,
    ) -> Result<serde_json::Value, BoxError>;

    async fn count(&self, uid: &ModelUid, params: &QueryParams) -> Result<u64, BoxError>;
}

/// Checks a request's auth context against a field's requirement.
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    async fn verify(&self, auth: Option<&AuthContext>, spec: &AuthSpec) -> Result<(), BoxError>;
}

/// Named policy handlers.
pub trait PolicyRegistry: Send + Sync {
    fn handler(&self, name: &str) -> Option<Arc<dyn PolicyHandler>>;

    /// Handlers with their configs, in the order given.
    fn resolve(
        &self,
        policies: &[PolicyRef],
    ) -> Result<Vec<(Arc<dyn PolicyHandler>, serde_json::Value)>, Error> {
        policies
            .iter()
            .map(|policy| match policy {
                PolicyRef::Named { name, config } => self
                    .handler(name)
                    .map(|handler| (handler, config.clone()))
                    .ok_or_else(|| Error::UnknownPolicy { name: name.clone() }),
                PolicyRef::Inline { handler, config } => Ok((handler.clone(), config.clone())),
            })
            .collect()
    }
}

/// Builds a named middleware from the config of the field referencing it.
pub type MiddlewareFactory =
    Arc<dyn Fn(&serde_json::Value) -> Arc<dyn Middleware> + Send + Sync>;

/// Named middlewares.
pub trait MiddlewareRegistry: Send + Sync {
    /// The middleware `name`, built with `config`.
    fn middleware(&self, name: &str, config: &serde_json::Value) -> Option<Arc<dyn Middleware>>;

    fn resolve(&self, middlewares: &[MiddlewareRef]) -> Result<Vec<Arc<dyn Middleware>>, Error> {
        middlewares
            .iter()
            .map(|middleware| match middleware {
                MiddlewareRef::Named { name, config } => self
                    .middleware(name, config)
                    .ok_or_else(|| Error::UnknownMiddleware { name: name.clone() }),
                MiddlewareRef::Inline(middleware) => Ok(middleware.clone()),
            })
            .collect()
    }
}

impl PolicyRegistry for BTreeMap<String, Arc<dyn PolicyHandler>> {
    fn handler(&self, name: &str) -> Option<Arc<dyn PolicyHandler>> {
        self.get(name).cloned()
    }
}

impl MiddlewareRegistry for BTreeMap<String, MiddlewareFactory> {
    fn middleware(&self, name: &str, config: &serde_json::Value) -> Option<Arc<dyn Middleware>> {
        self.get(name).map(|factory| factory(config))
    }
}

/// Every collaborator of the executable schema.
#[derive(Clone)]
pub struct Services {
    pub entities: Arc<dyn EntityService>,
    pub auth: Arc<dyn AuthVerifier>,
    pub policies: Arc<dyn PolicyRegistry>,
    pub middlewares: Arc<dyn MiddlewareRegistry>,
}

impl Services {
    /// Services without named policies or middlewares.
    pub fn new(entities: Arc<dyn EntityService>, auth: Arc<dyn AuthVerifier>) -> Self {
        Services {
            entities,
            auth,
            policies: Arc::new(BTreeMap::<String, Arc<dyn PolicyHandler>>::new()),
            middlewares: Arc::new(BTreeMap::<String, MiddlewareFactory>::new()),
        }
    }

    #[must_use]
    pub fn with_policies(mut self, policies: impl PolicyRegistry + 'static) -> Self {
        self.policies = Arc::new(policies);
        self
    }

    #[must_use]
    pub fn with_middlewares(mut self, middlewares: impl MiddlewareRegistry + 'static) -> Self {
        self.middlewares = Arc::new(middlewares);
        self
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
