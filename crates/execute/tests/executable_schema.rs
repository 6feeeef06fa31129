use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use content_model::{
    Attribute, ContentModel, ContentModelSet, ModelKind, ModelUid, RelationKind, RelationTarget,
    ScalarKind,
};
use engine_types::{
    resolver_fn, AuthContext, AuthSpec, BoxError, FieldError, RequestContext,
};
use execute::{
    AuthVerifier, EntityId, EntityService, Error, ExecutableSchema, ExecutableSchemaOptions,
    QueryParams, Services,
};
use graphql_schema::{build_schema, BuildOptions, Extension, ExtensionStore, ShadowCrudStore};
use lang_graphql::ast::common::{self as ast, FieldCoordinate};
use serde_json::{json, Value};

/// Records kept in memory, keyed by model uid. Relations are stored inline.
#[derive(Default)]
struct InMemoryEntities {
    records: Mutex<BTreeMap<ModelUid, Vec<Value>>>,
    next_id: Mutex<u64>,
    last_query: Mutex<Option<QueryParams>>,
}

impl InMemoryEntities {
    fn with_records(uid: &str, records: Vec<Value>) -> Self {
        let entities = InMemoryEntities::default();
        *entities.next_id.lock().unwrap() = records.len() as u64;
        entities
            .records
            .lock()
            .unwrap()
            .insert(ModelUid::new(uid), records);
        entities
    }

    fn records(&self, uid: &str) -> Vec<Value> {
        self.records
            .lock()
            .unwrap()
            .get(&ModelUid::new(uid))
            .cloned()
            .unwrap_or_default()
    }

    fn last_query(&self) -> Option<QueryParams> {
        self.last_query.lock().unwrap().clone()
    }
}

fn same_id(record: &Value, id: &EntityId) -> bool {
    record.get("id").and_then(EntityId::from_value).as_ref() == Some(id)
}

fn merge(record: &mut Value, data: Option<&Value>) {
    if let (Value::Object(record), Some(Value::Object(data))) = (record, data) {
        for (key, value) in data {
            record.insert(key.clone(), value.clone());
        }
    }
}

#[async_trait]
impl EntityService for InMemoryEntities {
    async fn find_many(&self, uid: &ModelUid, params: &QueryParams) -> Result<Vec<Value>, BoxError> {
        *self.last_query.lock().unwrap() = Some(params.clone());
        let records = self.records(uid.as_str());
        let start = usize::try_from(params.start)?;
        let limit = params
            .limit
            .map_or(Ok(usize::MAX), usize::try_from)?;
        Ok(records.into_iter().skip(start).take(limit).collect())
    }

    async fn find_one(
        &self,
        uid: &ModelUid,
        id: &EntityId,
        _params: &QueryParams,
    ) -> Result<Option<Value>, BoxError> {
        Ok(self
            .records(uid.as_str())
            .into_iter()
            .find(|record| same_id(record, id)))
    }

    async fn create(&self, uid: &ModelUid, params: &QueryParams) -> Result<Value, BoxError> {
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            *next_id
        };
        let mut record = json!({ "id": id });
        merge(&mut record, params.data.as_ref());
        self.records
            .lock()
            .unwrap()
            .entry(uid.clone())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        uid: &ModelUid,
        id: &EntityId,
        params: &QueryParams,
    ) -> Result<Value, BoxError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(uid)
            .and_then(|records| records.iter_mut().find(|record| same_id(record, id)))
            .ok_or_else(|| format!("no {uid} with id {id}"))?;
        merge(record, params.data.as_ref());
        Ok(record.clone())
    }

    async fn delete(
        &self,
        uid: &ModelUid,
        id: &EntityId,
        _params: &QueryParams,
    ) -> Result<Value, BoxError> {
        let mut records = self.records.lock().unwrap();
        let records = records.entry(uid.clone()).or_default();
        let index = records
            .iter()
            .position(|record| same_id(record, id))
            .ok_or_else(|| format!("no {uid} with id {id}"))?;
        Ok(records.remove(index))
    }

    async fn load(
        &self,
        _uid: &ModelUid,
        parent: &Value,
        attribute: &str,
        params: &QueryParams,
    ) -> Result<Value, BoxError> {
        *self.last_query.lock().unwrap() = Some(params.clone());
        Ok(parent.get(attribute).cloned().unwrap_or(Value::Null))
    }

    async fn count(&self, uid: &ModelUid, _params: &QueryParams) -> Result<u64, BoxError> {
        Ok(self.records(uid.as_str()).len() as u64)
    }
}

/// Authenticated requests carry their granted scopes in `credentials.scopes`.
struct ScopeVerifier;

#[async_trait]
impl AuthVerifier for ScopeVerifier {
    async fn verify(&self, auth: Option<&AuthContext>, spec: &AuthSpec) -> Result<(), BoxError> {
        let auth = auth.ok_or("unauthenticated")?;
        match spec {
            AuthSpec::Disabled | AuthSpec::Authenticated => Ok(()),
            AuthSpec::Scope(scopes) => {
                let granted = auth.credentials["scopes"]
                    .as_array()
                    .into_iter()
                    .flatten()
                    .filter_map(Value::as_str)
                    .any(|granted| scopes.iter().any(|scope| scope == granted));
                if granted {
                    Ok(())
                } else {
                    Err("missing scope".into())
                }
            }
        }
    }
}

fn post() -> ContentModel {
    ContentModel::new("api::post.post", ModelKind::CollectionType)
        .with_names("post", "posts")
        .with_attribute("title", Attribute::scalar(ScalarKind::String).required())
        .with_attribute("views", Attribute::scalar(ScalarKind::Integer))
}

fn video() -> ContentModel {
    ContentModel::new("api::video.video", ModelKind::CollectionType)
        .with_names("video", "videos")
        .with_attribute("url", Attribute::scalar(ScalarKind::String))
}

fn comment() -> ContentModel {
    ContentModel::new("api::comment.comment", ModelKind::CollectionType)
        .with_names("comment", "comments")
        .with_attribute(
            "target",
            Attribute::relation(
                RelationKind::MorphToOne,
                RelationTarget::Many(vec![
                    ModelUid::new("api::post.post"),
                    ModelUid::new("api::video.video"),
                ]),
            ),
        )
}

fn page_models() -> ContentModelSet {
    let seo = ContentModel::new("shared.seo", ModelKind::Component)
        .with_attribute("metaTitle", Attribute::scalar(ScalarKind::String));
    let quote = ContentModel::new("blocks.quote", ModelKind::Component)
        .with_attribute("text", Attribute::scalar(ScalarKind::Text));
    let page = ContentModel::new("api::page.page", ModelKind::SingleType)
        .with_names("page", "pages")
        .with_attribute("layout", Attribute::enumeration(["full-width", "sidebar"]))
        .with_attribute(
            "blocks",
            Attribute::dynamic_zone(vec![ModelUid::new("blocks.quote"), ModelUid::new("shared.seo")]),
        );
    ContentModelSet::new([seo, quote, page]).unwrap()
}

fn executable(
    models: ContentModelSet,
    entities: Arc<InMemoryEntities>,
    extensions: &ExtensionStore,
) -> Result<ExecutableSchema, Error> {
    let compiled = build_schema(
        &models,
        &ShadowCrudStore::new(&models),
        extensions,
        &BuildOptions::default(),
    )
    .unwrap();
    let services = Services::new(entities, Arc::new(ScopeVerifier));
    ExecutableSchema::new(
        compiled,
        Arc::new(models),
        &services,
        extensions.resolvers(),
        &ExecutableSchemaOptions::default(),
    )
}

fn type_name(name: &str) -> ast::TypeName {
    ast::TypeName::new(name).unwrap()
}

fn name(name: &str) -> ast::Name {
    ast::Name::new(name).unwrap()
}

fn with_scopes(scopes: &[&str]) -> Arc<RequestContext> {
    Arc::new(RequestContext::authenticated(AuthContext {
        strategy: "api-token".to_string(),
        credentials: json!({ "scopes": scopes }),
    }))
}

#[tokio::test]
async fn test_collection_type_queries() -> anyhow::Result<()> {
    let entities = Arc::new(InMemoryEntities::with_records(
        "api::post.post",
        vec![
            json!({"id": 1, "title": "Hello", "views": 3}),
            json!({"id": 2, "title": "World", "views": 5}),
        ],
    ));
    let schema = executable(ContentModelSet::new([post()])?, entities.clone(), &ExtensionStore::new())?;
    let context = with_scopes(&["api::post.post.find"]);

    let collection = schema
        .resolve_field(
            &type_name("Query"),
            &name("posts"),
            Value::Null,
            json!({"filters": {"title": {"eq": "Hello"}}, "sort": "title:asc"}),
            context.clone(),
        )
        .await?;
    let query = entities.last_query().unwrap();
    assert_eq!(query.filters, json!({"title": {"$eq": "Hello"}}));
    assert_eq!(query.sort, vec!["title:asc".to_string()]);
    assert_eq!((query.start, query.limit), (0, Some(10)));

    let data = schema
        .resolve_field(
            &type_name("PostEntityResponseCollection"),
            &name("data"),
            collection.clone(),
            json!({}),
            context.clone(),
        )
        .await?;
    assert_eq!(
        data,
        json!([
            {"id": 1, "attributes": {"id": 1, "title": "Hello", "views": 3}},
            {"id": 2, "attributes": {"id": 2, "title": "World", "views": 5}},
        ])
    );

    let meta = schema
        .resolve_field(
            &type_name("PostEntityResponseCollection"),
            &name("meta"),
            collection,
            json!({}),
            context.clone(),
        )
        .await?;
    let pagination = schema
        .resolve_field(
            &type_name("ResponseCollectionMeta"),
            &name("pagination"),
            meta,
            json!({}),
            context.clone(),
        )
        .await?;
    assert_eq!(
        pagination,
        json!({"total": 2, "page": 1, "pageSize": 10, "pageCount": 1})
    );

    let title = schema
        .resolve_field(
            &type_name("Post"),
            &name("title"),
            json!({"id": 1, "title": "Hello"}),
            json!({}),
            context,
        )
        .await?;
    assert_eq!(title, json!("Hello"));
    Ok(())
}

#[tokio::test]
async fn test_mutations_of_collection_type() -> anyhow::Result<()> {
    let entities = Arc::new(InMemoryEntities::default());
    let schema = executable(ContentModelSet::new([post()])?, entities.clone(), &ExtensionStore::new())?;
    let context = with_scopes(&[
        "api::post.post.create",
        "api::post.post.update",
        "api::post.post.delete",
    ]);

    let created = schema
        .resolve_field(
            &type_name("Mutation"),
            &name("createPost"),
            Value::Null,
            json!({"data": {"title": "Draft"}}),
            context.clone(),
        )
        .await?;
    assert_eq!(created["value"], json!({"id": 1, "title": "Draft"}));
    assert_eq!(created["info"]["modelUid"], json!("api::post.post"));

    schema
        .resolve_field(
            &type_name("Mutation"),
            &name("updatePost"),
            Value::Null,
            json!({"id": "1", "data": {"views": 7}}),
            context.clone(),
        )
        .await?;
    assert_eq!(
        entities.records("api::post.post"),
        vec![json!({"id": 1, "title": "Draft", "views": 7})]
    );

    schema
        .resolve_field(
            &type_name("Mutation"),
            &name("deletePost"),
            Value::Null,
            json!({"id": 1}),
            context,
        )
        .await?;
    assert!(entities.records("api::post.post").is_empty());
    Ok(())
}

#[tokio::test]
async fn test_root_fields_check_their_scope() -> anyhow::Result<()> {
    let entities = Arc::new(InMemoryEntities::default());
    let schema = executable(ContentModelSet::new([post()])?, entities, &ExtensionStore::new())?;

    let anonymous = schema
        .resolve_field(
            &type_name("Query"),
            &name("posts"),
            Value::Null,
            json!({}),
            Arc::new(RequestContext::anonymous()),
        )
        .await;
    assert!(matches!(anonymous, Err(FieldError::Forbidden { .. })));

    let other_scope = schema
        .resolve_field(
            &type_name("Mutation"),
            &name("createPost"),
            Value::Null,
            json!({"data": {"title": "x"}}),
            with_scopes(&["api::post.post.find"]),
        )
        .await;
    assert!(matches!(other_scope, Err(FieldError::Forbidden { .. })));
    Ok(())
}

#[tokio::test]
async fn test_invalid_pagination_is_rejected() -> anyhow::Result<()> {
    let entities = Arc::new(InMemoryEntities::default());
    let schema = executable(ContentModelSet::new([post()])?, entities, &ExtensionStore::new())?;
    let result = schema
        .resolve_field(
            &type_name("Query"),
            &name("posts"),
            Value::Null,
            json!({"pagination": {"page": 2, "limit": 5}}),
            with_scopes(&["api::post.post.find"]),
        )
        .await;
    assert!(matches!(result, Err(FieldError::Pagination { .. })));
    Ok(())
}

#[tokio::test]
async fn test_single_type_update_creates_missing_record() -> anyhow::Result<()> {
    let entities = Arc::new(InMemoryEntities::default());
    let schema = executable(page_models(), entities.clone(), &ExtensionStore::new())?;
    let context = with_scopes(&["api::page.page.update", "api::page.page.delete"]);

    let deleted = schema
        .resolve_field(
            &type_name("Mutation"),
            &name("deletePage"),
            Value::Null,
            json!({}),
            context.clone(),
        )
        .await;
    assert!(matches!(deleted, Err(FieldError::NotFound { .. })));

    schema
        .resolve_field(
            &type_name("Mutation"),
            &name("updatePage"),
            Value::Null,
            json!({"data": {
                "layout": "full_width",
                "blocks": [{"__typename": "ComponentBlocksQuote", "text": "Be kind"}]
            }}),
            context.clone(),
        )
        .await?;
    let records = entities.records("api::page.page");
    assert_eq!(
        records,
        vec![json!({
            "id": 1,
            "layout": "full-width",
            "blocks": [{"__component": "blocks.quote", "text": "Be kind"}]
        })]
    );

    let layout = schema
        .resolve_field(
            &type_name("Page"),
            &name("layout"),
            records[0].clone(),
            json!({}),
            context.clone(),
        )
        .await?;
    assert_eq!(layout, json!("full_width"));

    let updated = schema
        .resolve_field(
            &type_name("Mutation"),
            &name("updatePage"),
            Value::Null,
            json!({"data": {"layout": "sidebar"}}),
            context,
        )
        .await?;
    assert_eq!(updated["value"]["id"], json!(1));
    assert_eq!(entities.records("api::page.page").len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_unknown_dynamic_zone_component_is_rejected() -> anyhow::Result<()> {
    let entities = Arc::new(InMemoryEntities::default());
    let schema = executable(page_models(), entities.clone(), &ExtensionStore::new())?;
    let result = schema
        .resolve_field(
            &type_name("Mutation"),
            &name("updatePage"),
            Value::Null,
            json!({"data": {"blocks": [{"__typename": "ComponentBlocksVideo"}]}}),
            with_scopes(&["api::page.page.update"]),
        )
        .await;
    match result {
        Err(FieldError::Validation { message, details }) => {
            assert_eq!(
                message,
                "Component not found. expected one of: ComponentBlocksQuote, ComponentSharedSeo"
            );
            assert_eq!(details, Some(json!({"received": "ComponentBlocksVideo"})));
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert!(entities.records("api::page.page").is_empty());
    Ok(())
}

#[tokio::test]
async fn test_morph_union_resolves_stored_model() -> anyhow::Result<()> {
    let models = ContentModelSet::new([post(), video(), comment()])?;
    let schema = executable(models, Arc::new(InMemoryEntities::default()), &ExtensionStore::new())?;
    assert_eq!(
        schema.resolve_type(
            &type_name("GenericMorph"),
            &json!({"__type": "api::video.video", "id": 4})
        ),
        Some(type_name("Video"))
    );
    // GenericMorph has no Error member, so an untagged value stays unresolved
    assert_eq!(
        schema.resolve_type(&type_name("GenericMorph"), &json!({"id": 4})),
        None
    );
    assert_eq!(
        schema.resolve_type(&type_name("CommentTargetMorph"), &json!({"id": 4})),
        Some(type_name("Error"))
    );
    assert_eq!(schema.resolve_type(&type_name("Post"), &json!({})), None);
    Ok(())
}

#[tokio::test]
async fn test_extension_resolver_replaces_generated_one() -> anyhow::Result<()> {
    let mut extensions = ExtensionStore::new();
    extensions.use_extension(
        Extension::new()
            .with_resolver(
                FieldCoordinate::from_str("Query.posts")?,
                resolver_fn(|_params| async { Ok(json!({"nodes": [], "info": {}})) }),
            )
            .with_resolver_config(
                FieldCoordinate::from_str("Query.posts")?,
                graphql_schema::ResolverConfig::default().with_auth(AuthSpec::Disabled),
            ),
    );
    let schema = executable(
        ContentModelSet::new([post()])?,
        Arc::new(InMemoryEntities::default()),
        &extensions,
    )?;
    let value = schema
        .resolve_field(
            &type_name("Query"),
            &name("posts"),
            Value::Null,
            json!({}),
            Arc::new(RequestContext::anonymous()),
        )
        .await?;
    assert_eq!(value, json!({"nodes": [], "info": {}}));
    Ok(())
}

#[test]
fn test_resolver_for_missing_field_is_an_error() {
    let mut extensions = ExtensionStore::new();
    extensions.use_extension(Extension::new().with_resolver(
        FieldCoordinate::from_str("Query.missing").unwrap(),
        resolver_fn(|_params| async { Ok(Value::Null) }),
    ));
    let result = executable(
        ContentModelSet::new([post()]).unwrap(),
        Arc::new(InMemoryEntities::default()),
        &extensions,
    );
    assert!(matches!(
        result,
        Err(Error::UnknownResolverField { coordinate }) if coordinate.to_string() == "Query.missing"
    ));
}

#[test]
fn test_pruning_drops_unreachable_types() {
    let mut schema = executable(
        ContentModelSet::new([post()]).unwrap(),
        Arc::new(InMemoryEntities::default()),
        &ExtensionStore::new(),
    )
    .unwrap();
    let removed = schema.prune_unused_types();
    assert!(removed.contains(&type_name("TimeFilterInput")));
    assert!(schema.schema().get_type(&type_name("TimeFilterInput")).is_none());
    assert!(schema
        .resolver(&FieldCoordinate::from_str("Query.posts").unwrap())
        .is_some());
    assert!(schema.sdl().contains("posts"));
}

fn media_models() -> ContentModelSet {
    let file = ContentModel::new("plugin::upload.file", ModelKind::CollectionType)
        .with_plugin("upload")
        .with_names("file", "files")
        .with_attribute("url", Attribute::scalar(ScalarKind::String));
    let author = ContentModel::new("api::author.author", ModelKind::CollectionType)
        .with_names("author", "authors")
        .with_attribute("name", Attribute::scalar(ScalarKind::String));
    let article = ContentModel::new("api::article.article", ModelKind::CollectionType)
        .with_names("article", "articles")
        .with_attribute("cover", Attribute::media(false))
        .with_attribute("gallery", Attribute::media(true))
        .with_attribute(
            "author",
            Attribute::relation(
                RelationKind::ManyToOne,
                RelationTarget::One(ModelUid::new("api::author.author")),
            ),
        );
    ContentModelSet::new([file, author, article]).unwrap()
}

#[tokio::test]
async fn test_media_and_to_one_relation_fields() -> anyhow::Result<()> {
    let entities = Arc::new(InMemoryEntities::default());
    let schema = executable(media_models(), entities.clone(), &ExtensionStore::new())?;
    let context = with_scopes(&["plugin::upload.file.find", "api::author.author.find"]);
    let article = json!({
        "id": 1,
        "cover": {"id": 9, "url": "/cover.png"},
        "gallery": [{"id": 10, "url": "/a.png"}, {"id": 11, "url": "/b.png"}],
        "author": {"id": 3, "name": "Ada"},
    });

    let cover = schema
        .resolve_field(
            &type_name("Article"),
            &name("cover"),
            article.clone(),
            json!({}),
            context.clone(),
        )
        .await?;
    assert_eq!(cover["value"], json!({"id": 9, "url": "/cover.png"}));
    assert_eq!(cover["info"]["modelUid"], json!("plugin::upload.file"));
    let data = schema
        .resolve_field(
            &type_name("UploadFileEntityResponse"),
            &name("data"),
            cover,
            json!({}),
            context.clone(),
        )
        .await?;
    assert_eq!(
        data,
        json!({"id": 9, "attributes": {"id": 9, "url": "/cover.png"}})
    );

    let gallery = schema
        .resolve_field(
            &type_name("Article"),
            &name("gallery"),
            article.clone(),
            json!({"filters": {"url": {"endsWith": ".png"}}}),
            context.clone(),
        )
        .await?;
    assert_eq!(gallery["nodes"].as_array().map(Vec::len), Some(2));
    assert_eq!(gallery["info"]["modelUid"], json!("plugin::upload.file"));
    assert_eq!(
        entities.last_query().unwrap().filters,
        json!({"url": {"$endsWith": ".png"}})
    );

    let author = schema
        .resolve_field(
            &type_name("Article"),
            &name("author"),
            article.clone(),
            json!({"id": "3"}),
            context.clone(),
        )
        .await?;
    assert_eq!(author["value"]["name"], json!("Ada"));
    assert_eq!(
        entities.last_query().unwrap().filters,
        json!({"id": {"$eq": "3"}})
    );

    let denied = schema
        .resolve_field(
            &type_name("Article"),
            &name("cover"),
            article,
            json!({}),
            with_scopes(&["api::author.author.find"]),
        )
        .await;
    assert!(matches!(denied, Err(FieldError::Forbidden { .. })));
    Ok(())
}

#[test]
fn test_media_filters_reach_the_file_model() {
    let models = media_models();
    let article = models
        .get(&ModelUid::new("api::article.article"))
        .unwrap()
        .clone();
    let query = execute::graphql_filters_to_query(
        &json!({"cover": {"url": {"contains": "cover"}}, "or": [{"gallery": {"id": {"in": [1, 2]}}}]}),
        &article,
        &models,
    );
    assert_eq!(
        query,
        json!({
            "cover": {"url": {"$contains": "cover"}},
            "$or": [{"gallery": {"id": {"$in": [1, 2]}}}],
        })
    );
}
