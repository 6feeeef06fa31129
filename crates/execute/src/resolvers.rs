//! The resolvers generated for each field of the compiled schema, before any
//! auth, policy or middleware is wrapped around them.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use content_model::{ContentModel, ContentModelSet, ModelUid, FILE_MODEL_UID};
use engine_types::{FieldError, ResolveParams, Resolver};
use graphql_schema::{
    naming, Annotation, AttributeFieldKind, CrudAction, OutputAnnotation, RootFieldAnnotation,
};
use lang_graphql::ast::common as ast;
use lang_graphql::schema::{self as gql_schema, TypeInfo};
use serde_json::{json, Value};

use crate::filters::graphql_filters_to_query;
use crate::input::coerce_arguments;
use crate::pagination::{PaginationArg, PaginationConfig, PaginationMeta, Window};
use crate::response::{
    collection_info, entities, to_entity, to_entity_response, to_entity_response_collection,
    INFO_KEY, NODES_KEY, VALUE_KEY,
};
use crate::services::{EntityId, EntityService, PublicationState, QueryParams};

type Arguments = BTreeMap<ast::Name, gql_schema::InputField<Annotation>>;

/// State shared by every generated resolver.
pub(crate) struct ResolverContext {
    pub schema: Arc<gql_schema::Schema<Annotation>>,
    pub models: Arc<ContentModelSet>,
    pub entities: Arc<dyn EntityService>,
    pub pagination: PaginationConfig,
}

impl ResolverContext {
    fn model(&self, uid: &ModelUid) -> Result<&ContentModel, FieldError> {
        self.models
            .get(uid)
            .ok_or_else(|| FieldError::internal(format!("unknown content model {uid}")))
    }

    fn coerce(&self, arguments: &Arguments, params: &ResolveParams) -> Result<Value, FieldError> {
        coerce_arguments(&self.schema, arguments, &params.args)
    }

    /// Filters, pagination, sort and publication state of a list field.
    fn list_params(&self, model: &ContentModel, args: &Value) -> Result<QueryParams, FieldError> {
        let pagination = match args.get("pagination") {
            Some(pagination) if !pagination.is_null() => {
                serde_json::from_value::<PaginationArg>(pagination.clone())
                    .map_err(|error| FieldError::validation(error.to_string()))?
            }
            _ => PaginationArg::default(),
        };
        let window = self.pagination.window(&pagination)?;
        let filters = match args.get("filters") {
            Some(filters) if !filters.is_null() => {
                graphql_filters_to_query(filters, model, &self.models)
            }
            _ => Value::Null,
        };
        let sort = match args.get("sort") {
            Some(Value::Array(sort)) => sort
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect(),
            Some(Value::String(sort)) => vec![sort.clone()],
            _ => Vec::new(),
        };
        Ok(QueryParams {
            filters,
            start: window.start,
            limit: window.limit,
            sort,
            publication_state: publication_state(args)?,
            data: None,
        })
    }
}

fn publication_state(args: &Value) -> Result<Option<PublicationState>, FieldError> {
    match args.get("publicationState") {
        Some(state) if !state.is_null() => serde_json::from_value(state.clone())
            .map(Some)
            .map_err(|error| FieldError::validation(error.to_string())),
        _ => Ok(None),
    }
}

fn data_access(error: engine_types::BoxError) -> FieldError {
    FieldError::data_access(error)
}

fn record_id(record: &Value) -> Result<EntityId, FieldError> {
    record
        .get("id")
        .and_then(EntityId::from_value)
        .ok_or_else(|| FieldError::internal("record without an id"))
}

/// The resolver of a field, chosen by its annotation.
pub(crate) fn base_resolver(
    ctx: &Arc<ResolverContext>,
    field: &gql_schema::Field<Annotation>,
) -> Arc<dyn Resolver> {
    match &field.info {
        Annotation::Output(OutputAnnotation::RootField(RootFieldAnnotation::Crud {
            model,
            action,
        })) => Arc::new(CrudResolver {
            ctx: ctx.clone(),
            model: model.clone(),
            action: *action,
            arguments: field.arguments.clone(),
        }),
        Annotation::Output(OutputAnnotation::Attribute {
            model,
            attribute_name,
            kind,
        }) => Arc::new(AttributeResolver {
            ctx: ctx.clone(),
            model: model.clone(),
            attribute_name: attribute_name.clone(),
            kind: kind.clone(),
            arguments: field.arguments.clone(),
            enum_names: enum_names(&ctx.schema, &field.field_type),
        }),
        Annotation::Output(OutputAnnotation::ResponseData) => Arc::new(ResponseResolver::Data),
        Annotation::Output(OutputAnnotation::ResponseCollectionData) => {
            Arc::new(ResponseResolver::CollectionData)
        }
        Annotation::Output(OutputAnnotation::ResponseCollectionMeta) => {
            Arc::new(ResponseResolver::CollectionMeta)
        }
        Annotation::Output(OutputAnnotation::MetaPagination) => {
            Arc::new(PaginationResolver { ctx: ctx.clone() })
        }
        _ => Arc::new(PropertyResolver),
    }
}

/// Stored value to GraphQL enum value, for enum typed fields.
fn enum_names(schema: &gql_schema::Schema<Annotation>, field_type: &ast::Type) -> BTreeMap<String, String> {
    match schema.get_type(field_type.underlying_type()) {
        Some(TypeInfo::Enum(enum_type)) => enum_type
            .values
            .values()
            .filter_map(|value| match &value.info {
                Annotation::EnumValue { original } => {
                    Some((original.clone(), value.value.to_string()))
                }
                _ => None,
            })
            .collect(),
        _ => BTreeMap::new(),
    }
}

/// Reads the field's own name off the parent value.
pub(crate) struct PropertyResolver;

#[async_trait]
impl Resolver for PropertyResolver {
    async fn resolve(&self, params: ResolveParams) -> Result<Value, FieldError> {
        Ok(params
            .parent
            .get(params.info.field_name.as_str())
            .cloned()
            .unwrap_or(Value::Null))
    }
}

struct CrudResolver {
    ctx: Arc<ResolverContext>,
    model: ModelUid,
    action: CrudAction,
    arguments: Arguments,
}

impl CrudResolver {
    fn id(args: &Value) -> Result<EntityId, FieldError> {
        args.get("id")
            .and_then(EntityId::from_value)
            .ok_or_else(|| FieldError::validation("an id is required"))
    }

    fn data_params(args: &Value) -> QueryParams {
        QueryParams {
            data: Some(args.get("data").cloned().unwrap_or(Value::Null)),
            ..QueryParams::default()
        }
    }

    /// The one record of a single type, if it exists.
    async fn single_record(&self, params: &QueryParams) -> Result<Option<Value>, FieldError> {
        let records = self
            .ctx
            .entities
            .find_many(&self.model, params)
            .await
            .map_err(data_access)?;
        Ok(records.into_iter().next())
    }
}

#[async_trait]
impl Resolver for CrudResolver {
    async fn resolve(&self, params: ResolveParams) -> Result<Value, FieldError> {
        let model = self.ctx.model(&self.model)?;
        let args = self.ctx.coerce(&self.arguments, &params)?;
        let entities = &self.ctx.entities;
        let uid = &self.model;
        tracing::debug!(model = %uid, action = %self.action, "resolving CRUD field");

        match (self.action, model.is_single_type()) {
            (CrudAction::Find, false) => {
                let query = self.ctx.list_params(model, &args)?;
                let nodes = entities.find_many(uid, &query).await.map_err(data_access)?;
                Ok(to_entity_response_collection(nodes, uid, &query))
            }
            (CrudAction::Find, true) => {
                let query = QueryParams {
                    publication_state: publication_state(&args)?,
                    ..QueryParams::default()
                };
                let record = self.single_record(&query).await?;
                Ok(to_entity_response(record.unwrap_or(Value::Null), uid, &query))
            }
            (CrudAction::FindOne, _) => {
                let query = QueryParams::default();
                let record = match args.get("id").and_then(EntityId::from_value) {
                    Some(id) => entities
                        .find_one(uid, &id, &query)
                        .await
                        .map_err(data_access)?,
                    None => None,
                };
                Ok(to_entity_response(record.unwrap_or(Value::Null), uid, &query))
            }
            (CrudAction::Create, _) => {
                let query = Self::data_params(&args);
                let record = entities.create(uid, &query).await.map_err(data_access)?;
                Ok(to_entity_response(record, uid, &query))
            }
            (CrudAction::Update, false) => {
                let query = Self::data_params(&args);
                let record = entities
                    .update(uid, &Self::id(&args)?, &query)
                    .await
                    .map_err(data_access)?;
                Ok(to_entity_response(record, uid, &query))
            }
            (CrudAction::Update, true) => {
                let query = Self::data_params(&args);
                let record = match self.single_record(&QueryParams::default()).await? {
                    Some(existing) => entities
                        .update(uid, &record_id(&existing)?, &query)
                        .await
                        .map_err(data_access)?,
                    None => entities.create(uid, &query).await.map_err(data_access)?,
                };
                Ok(to_entity_response(record, uid, &query))
            }
            (CrudAction::Delete, false) => {
                let query = QueryParams::default();
                let record = entities
                    .delete(uid, &Self::id(&args)?, &query)
                    .await
                    .map_err(data_access)?;
                Ok(to_entity_response(record, uid, &query))
            }
            (CrudAction::Delete, true) => {
                let query = QueryParams::default();
                let Some(existing) = self.single_record(&query).await? else {
                    return Err(FieldError::not_found(format!(
                        "no {} entry to delete",
                        naming::type_name(model)
                    )));
                };
                let record = entities
                    .delete(uid, &record_id(&existing)?, &query)
                    .await
                    .map_err(data_access)?;
                Ok(to_entity_response(record, uid, &query))
            }
        }
    }
}

struct AttributeResolver {
    ctx: Arc<ResolverContext>,
    model: ModelUid,
    attribute_name: String,
    kind: AttributeFieldKind,
    arguments: Arguments,
    enum_names: BTreeMap<String, String>,
}

impl AttributeResolver {
    fn own_value(&self, parent: &Value) -> Value {
        parent
            .get(&self.attribute_name)
            .cloned()
            .unwrap_or(Value::Null)
    }

    async fn load(&self, parent: &Value, query: &QueryParams) -> Result<Value, FieldError> {
        self.ctx
            .entities
            .load(&self.model, parent, &self.attribute_name, query)
            .await
            .map_err(data_access)
    }

    /// To-one and to-many relations, media included.
    async fn resolve_relation(
        &self,
        params: &ResolveParams,
        target: &ModelUid,
        many: bool,
    ) -> Result<Value, FieldError> {
        if many {
            let args = self.ctx.coerce(&self.arguments, params)?;
            let query = self.ctx.list_params(self.ctx.model(target)?, &args)?;
            let nodes = match self.load(&params.parent, &query).await? {
                Value::Array(nodes) => nodes,
                Value::Null => Vec::new(),
                node => vec![node],
            };
            Ok(to_entity_response_collection(nodes, target, &query))
        } else {
            let args = self.ctx.coerce(&self.arguments, params)?;
            let query = QueryParams {
                filters: match args.get("id") {
                    Some(id) if !id.is_null() => json!({"id": {"$eq": id}}),
                    _ => Value::Null,
                },
                ..QueryParams::default()
            };
            let value = self.load(&params.parent, &query).await?;
            Ok(to_entity_response(value, target, &query))
        }
    }
}

#[async_trait]
impl Resolver for AttributeResolver {
    async fn resolve(&self, params: ResolveParams) -> Result<Value, FieldError> {
        match &self.kind {
            AttributeFieldKind::Scalar => Ok(self.own_value(&params.parent)),
            AttributeFieldKind::Enumeration => Ok(match self.own_value(&params.parent) {
                Value::String(stored) => self
                    .enum_names
                    .get(&stored)
                    .map_or(Value::String(stored), |name| Value::String(name.clone())),
                other => other,
            }),
            AttributeFieldKind::Relation { target, many } => {
                self.resolve_relation(&params, target, *many).await
            }
            AttributeFieldKind::Media { multiple } => {
                self.resolve_relation(&params, &ModelUid::new(FILE_MODEL_UID), *multiple)
                    .await
            }
            AttributeFieldKind::Component {
                component,
                repeatable: true,
            } => {
                let args = self.ctx.coerce(&self.arguments, &params)?;
                let query = self.ctx.list_params(self.ctx.model(component)?, &args)?;
                self.load(&params.parent, &query).await
            }
            AttributeFieldKind::MorphRelation { .. }
            | AttributeFieldKind::Component { .. }
            | AttributeFieldKind::DynamicZone => {
                self.load(&params.parent, &QueryParams::default()).await
            }
        }
    }
}

enum ResponseResolver {
    Data,
    CollectionData,
    CollectionMeta,
}

#[async_trait]
impl Resolver for ResponseResolver {
    async fn resolve(&self, params: ResolveParams) -> Result<Value, FieldError> {
        let parent = &params.parent;
        Ok(match self {
            ResponseResolver::Data => to_entity(parent.get(VALUE_KEY).unwrap_or(&Value::Null)),
            ResponseResolver::CollectionData => {
                entities(parent.get(NODES_KEY).unwrap_or(&Value::Null))
            }
            ResponseResolver::CollectionMeta => {
                parent.get(INFO_KEY).cloned().unwrap_or(Value::Null)
            }
        })
    }
}

/// `ResponseCollectionMeta.pagination`: counts the records matching the
/// collection's filters.
struct PaginationResolver {
    ctx: Arc<ResolverContext>,
}

#[async_trait]
impl Resolver for PaginationResolver {
    async fn resolve(&self, params: ResolveParams) -> Result<Value, FieldError> {
        let (uid, query) = collection_info(&params.parent)
            .ok_or_else(|| FieldError::internal("pagination requested outside of a collection"))?;
        let count_query = QueryParams {
            filters: query.filters.clone(),
            publication_state: query.publication_state,
            ..QueryParams::default()
        };
        let total = self
            .ctx
            .entities
            .count(&uid, &count_query)
            .await
            .map_err(data_access)?;
        let meta = PaginationMeta::new(
            Window {
                start: query.start,
                limit: query.limit,
            },
            total,
        );
        serde_json::to_value(meta).map_err(|error| FieldError::internal(error.to_string()))
    }
}
