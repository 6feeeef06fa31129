use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use content_model::{
    Attribute, ContentModel, ContentModelSet, ModelKind, ModelUid, RelationKind, RelationTarget,
    ScalarKind,
};
use engine::{build_executable_schema, Config, Error};
use engine_types::{
    middleware_fn, policy_fn, AuthContext, AuthSpec, BoxError, FieldError, Middleware,
    MiddlewareRef, PolicyHandler, PolicyRef, RequestContext,
};
use execute::{
    AuthVerifier, EntityId, EntityService, MiddlewareFactory, PolicyPlacement, QueryParams,
    Services,
};
use graphql_schema::{Extension, ExtensionStore, ResolverConfig, ShadowCrudStore};
use lang_graphql::ast::common::{self as ast, FieldCoordinate};
use serde_json::{json, Value};

type Log = Arc<Mutex<Vec<&'static str>>>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Answers every read with the same records and logs the calls it gets.
struct FixedEntities {
    records: Vec<Value>,
    log: Log,
}

#[async_trait]
impl EntityService for FixedEntities {
    async fn find_many(&self, _: &ModelUid, _: &QueryParams) -> Result<Vec<Value>, BoxError> {
        self.log.lock().unwrap().push("find_many");
        Ok(self.records.clone())
    }
    async fn find_one(
        &self,
        _: &ModelUid,
        id: &EntityId,
        _: &QueryParams,
    ) -> Result<Option<Value>, BoxError> {
        Ok(self
            .records
            .iter()
            .find(|record| record.get("id").and_then(EntityId::from_value).as_ref() == Some(id))
            .cloned())
    }
    async fn create(&self, _: &ModelUid, params: &QueryParams) -> Result<Value, BoxError> {
        Ok(params.data.clone().unwrap_or(Value::Null))
    }
    async fn update(&self, _: &ModelUid, _: &EntityId, params: &QueryParams) -> Result<Value, BoxError> {
        Ok(params.data.clone().unwrap_or(Value::Null))
    }
    async fn delete(&self, _: &ModelUid, _: &EntityId, _: &QueryParams) -> Result<Value, BoxError> {
        Err("records are read only".into())
    }
    async fn load(
        &self,
        _: &ModelUid,
        parent: &Value,
        attribute: &str,
        _: &QueryParams,
    ) -> Result<Value, BoxError> {
        Ok(parent.get(attribute).cloned().unwrap_or(Value::Null))
    }
    async fn count(&self, _: &ModelUid, _: &QueryParams) -> Result<u64, BoxError> {
        Ok(self.records.len() as u64)
    }
}

/// Lets any authenticated request through.
struct AuthenticatedOnly;

#[async_trait]
impl AuthVerifier for AuthenticatedOnly {
    async fn verify(&self, auth: Option<&AuthContext>, _spec: &AuthSpec) -> Result<(), BoxError> {
        auth.map(|_| ()).ok_or_else(|| "unauthenticated".into())
    }
}

fn services(log: &Log) -> Services {
    Services::new(
        Arc::new(FixedEntities {
            records: vec![json!({"id": 1, "title": "Hello"})],
            log: log.clone(),
        }),
        Arc::new(AuthenticatedOnly),
    )
}

fn blog_post() -> ContentModel {
    ContentModel::new("plugin::blog.post", ModelKind::CollectionType)
        .with_plugin("blog")
        .with_names("post", "posts")
        .with_attribute("title", Attribute::scalar(ScalarKind::String))
        .with_attribute(
            "author",
            Attribute::relation(
                RelationKind::ManyToOne,
                RelationTarget::One(ModelUid::new("api::author.author")),
            ),
        )
}

fn post() -> ContentModel {
    ContentModel::new("api::post.post", ModelKind::CollectionType)
        .with_names("post", "posts")
        .with_attribute("title", Attribute::scalar(ScalarKind::String))
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

fn type_name(name: &str) -> ast::TypeName {
    ast::TypeName::new(name).unwrap()
}

fn coordinate(coordinate: &str) -> FieldCoordinate {
    FieldCoordinate::from_str(coordinate).unwrap()
}

fn signed_in() -> Arc<RequestContext> {
    Arc::new(RequestContext::authenticated(AuthContext {
        strategy: "users-permissions".to_string(),
        credentials: json!({"id": 1}),
    }))
}

#[test]
fn test_plugin_model_names_and_missing_relation_target() -> anyhow::Result<()> {
    init_tracing();
    let models = ContentModelSet::new([blog_post()])?;
    let shadow_crud = ShadowCrudStore::new(&models);
    let schema = build_executable_schema(
        &Config::default(),
        models,
        &shadow_crud,
        &ExtensionStore::new(),
        &services(&Log::default()),
    )?;

    let blog_post = schema
        .schema()
        .get_object(&type_name("BlogPost"))
        .expect("BlogPost is generated");
    assert!(blog_post.fields.contains_key(&ast::Name::new("title")?));
    assert!(!blog_post.fields.contains_key(&ast::Name::new("author")?));
    assert!(schema.schema().get_field(&coordinate("Query.blogPosts")).is_some());
    assert!(schema
        .schema()
        .get_field(&coordinate("Mutation.createBlogPost"))
        .is_some());
    Ok(())
}

#[test]
fn test_disabled_delete_action() -> anyhow::Result<()> {
    let models = ContentModelSet::new([post()])?;
    let mut shadow_crud = ShadowCrudStore::new(&models);
    shadow_crud
        .model_mut(&ModelUid::new("api::post.post"))?
        .disable_action("delete");
    let schema = build_executable_schema(
        &Config::default(),
        models,
        &shadow_crud,
        &ExtensionStore::new(),
        &services(&Log::default()),
    )?;
    let sdl = schema.sdl();
    assert!(!sdl.contains("deletePost"));
    assert!(sdl.contains("createPost"));
    assert!(sdl.contains("updatePost"));
    assert!(schema.resolver(&coordinate("Query.posts")).is_some());
    assert!(schema.resolver(&coordinate("Mutation.deletePost")).is_none());
    Ok(())
}

#[test]
fn test_morph_union_members_and_resolution() -> anyhow::Result<()> {
    let models = ContentModelSet::new([post(), video(), comment()])?;
    let shadow_crud = ShadowCrudStore::new(&models);
    let schema = build_executable_schema(
        &Config::default(),
        models,
        &shadow_crud,
        &ExtensionStore::new(),
        &services(&Log::default()),
    )?;
    let union_name = type_name("CommentTargetMorph");
    match schema.schema().get_type(&union_name) {
        Some(lang_graphql::schema::TypeInfo::Union(union)) => {
            let members: Vec<&str> = union.members.iter().map(ast::TypeName::as_str).collect();
            assert_eq!(members, ["Error", "Post", "Video"]);
        }
        other => panic!("expected a union, got {other:?}"),
    }
    assert_eq!(
        schema.resolve_type(&union_name, &json!({"__typename": "Post", "id": 1})),
        Some(type_name("Post"))
    );
    assert_eq!(
        schema.resolve_type(&union_name, &json!({"__type": "api::video.video", "id": 1})),
        Some(type_name("Video"))
    );
    Ok(())
}

fn recording_middleware(log: &Log, name: &'static str, reject: bool) -> Arc<dyn Middleware> {
    let log = log.clone();
    Arc::new(middleware_fn(move |params, next| {
        let log = log.clone();
        Box::pin(async move {
            log.lock().unwrap().push(name);
            if reject {
                return Err(FieldError::validation(format!("{name} rejected the request")));
            }
            next.run(params).await
        })
    }))
}

fn chain_services(log: &Log, reject_in_b: bool) -> Services {
    let policy_log = log.clone();
    let policies: BTreeMap<String, Arc<dyn PolicyHandler>> = BTreeMap::from([(
        "P".to_string(),
        Arc::new(policy_fn(move |_, _| {
            policy_log.lock().unwrap().push("P");
            Ok(Some(true))
        })) as Arc<dyn PolicyHandler>,
    )]);
    let (log_a, log_b) = (log.clone(), log.clone());
    let middlewares: BTreeMap<String, MiddlewareFactory> = BTreeMap::from([
        (
            "A".to_string(),
            Arc::new(move |_: &Value| recording_middleware(&log_a, "A", false)) as MiddlewareFactory,
        ),
        (
            "B".to_string(),
            Arc::new(move |_: &Value| recording_middleware(&log_b, "B", reject_in_b))
                as MiddlewareFactory,
        ),
    ]);
    services(log)
        .with_policies(policies)
        .with_middlewares(middlewares)
}

fn chained_posts() -> ExtensionStore {
    let mut extensions = ExtensionStore::new();
    extensions.use_extension(Extension::new().with_resolver_config(
        coordinate("Query.posts"),
        ResolverConfig::default()
            .with_middlewares(vec![MiddlewareRef::named("A"), MiddlewareRef::named("B")])
            .with_policies(vec![PolicyRef::named("P")]),
    ));
    extensions
}

async fn run_chain(
    placement: PolicyPlacement,
    reject_in_b: bool,
) -> (Result<Value, FieldError>, Vec<&'static str>) {
    let log = Log::default();
    let models = ContentModelSet::new([post()]).unwrap();
    let shadow_crud = ShadowCrudStore::new(&models);
    let config = Config {
        policy_placement: placement,
        ..Config::default()
    };
    let schema = build_executable_schema(
        &config,
        models,
        &shadow_crud,
        &chained_posts(),
        &chain_services(&log, reject_in_b),
    )
    .unwrap();
    let result = schema
        .resolve_field(
            &type_name("Query"),
            &ast::Name::new("posts").unwrap(),
            Value::Null,
            json!({}),
            signed_in(),
        )
        .await;
    let calls = log.lock().unwrap().clone();
    (result, calls)
}

#[tokio::test]
async fn test_chain_runs_policies_after_middlewares() {
    let (result, calls) = run_chain(PolicyPlacement::AfterMiddlewares, false).await;
    assert!(result.is_ok());
    assert_eq!(calls, ["A", "B", "P", "find_many"]);
}

#[tokio::test]
async fn test_chain_runs_policies_first_by_default() {
    let (result, calls) = run_chain(PolicyPlacement::default(), false).await;
    assert!(result.is_ok());
    assert_eq!(calls, ["P", "A", "B", "find_many"]);
}

#[tokio::test]
async fn test_rejection_stops_the_chain() {
    let (result, calls) = run_chain(PolicyPlacement::AfterMiddlewares, true).await;
    assert!(matches!(result, Err(FieldError::Validation { .. })));
    assert_eq!(calls, ["A", "B"]);
}

#[test]
fn test_unknown_named_middleware_aborts_the_build() {
    let models = ContentModelSet::new([post()]).unwrap();
    let shadow_crud = ShadowCrudStore::new(&models);
    let result = build_executable_schema(
        &Config::default(),
        models,
        &shadow_crud,
        &chained_posts(),
        &services(&Log::default()),
    );
    assert!(matches!(result, Err(Error::Resolvers(_))));
}

#[tokio::test]
async fn test_named_middleware_is_built_with_its_config() -> anyhow::Result<()> {
    let seen = Arc::new(Mutex::new(Vec::<Value>::new()));
    let factory_seen = seen.clone();
    let middlewares: BTreeMap<String, MiddlewareFactory> = BTreeMap::from([(
        "tag".to_string(),
        Arc::new(move |config: &Value| {
            let seen = factory_seen.clone();
            let config = config.clone();
            Arc::new(middleware_fn(move |params, next| {
                seen.lock().unwrap().push(config.clone());
                Box::pin(async move { next.run(params).await })
            })) as Arc<dyn Middleware>
        }) as MiddlewareFactory,
    )]);
    let mut extensions = ExtensionStore::new();
    extensions.use_extension(Extension::new().with_resolver_config(
        coordinate("Query.posts"),
        ResolverConfig::default().with_middlewares(vec![
            MiddlewareRef::named("tag").with_config(json!({"label": "first"})),
            MiddlewareRef::named("tag").with_config(json!({"label": "second"})),
        ]),
    ));
    let models = ContentModelSet::new([post()])?;
    let shadow_crud = ShadowCrudStore::new(&models);
    let schema = build_executable_schema(
        &Config::default(),
        models,
        &shadow_crud,
        &extensions,
        &services(&Log::default()).with_middlewares(middlewares),
    )?;
    schema
        .resolve_field(
            &type_name("Query"),
            &ast::Name::new("posts")?,
            Value::Null,
            json!({}),
            signed_in(),
        )
        .await?;
    assert_eq!(
        *seen.lock().unwrap(),
        [json!({"label": "first"}), json!({"label": "second"})]
    );
    Ok(())
}

#[test]
fn test_duplicate_type_aborts_the_build() {
    let models = ContentModelSet::new([post()]).unwrap();
    let shadow_crud = ShadowCrudStore::new(&models);
    let mut extensions = ExtensionStore::new();
    extensions.use_extension(Extension::new().with_type(lang_graphql::schema::TypeInfo::Scalar(
        lang_graphql::schema::Scalar {
            name: type_name("PostEntity"),
            description: None,
            info: graphql_schema::Annotation::Scalar,
        },
    )));
    let result = build_executable_schema(
        &Config::default(),
        models,
        &shadow_crud,
        &extensions,
        &services(&Log::default()),
    );
    assert!(matches!(
        result,
        Err(Error::Build(graphql_schema::Error::DuplicateTypeName { .. }))
    ));
}

#[test]
fn test_schema_artifact_is_written() -> anyhow::Result<()> {
    let directory = std::env::temp_dir().join(format!("schema-artifact-{}", std::process::id()));
    let path = directory.join("generated").join("schema.graphql");
    let config = Config {
        generate_artifacts: true,
        artifacts: engine::ArtifactsConfig {
            schema: path.clone(),
        },
        ..Config::default()
    };
    let models = ContentModelSet::new([post()])?;
    let shadow_crud = ShadowCrudStore::new(&models);
    let schema = build_executable_schema(
        &config,
        models,
        &shadow_crud,
        &ExtensionStore::new(),
        &services(&Log::default()),
    )?;
    assert_eq!(std::fs::read_to_string(&path)?, schema.sdl());
    std::fs::remove_dir_all(directory)?;
    Ok(())
}

#[tokio::test]
async fn test_root_fields_require_authentication() -> anyhow::Result<()> {
    let models = ContentModelSet::new([post()])?;
    let shadow_crud = ShadowCrudStore::new(&models);
    let schema = build_executable_schema(
        &Config::default(),
        models,
        &shadow_crud,
        &ExtensionStore::new(),
        &services(&Log::default()),
    )?;
    let result = schema
        .resolve_field(
            &type_name("Query"),
            &ast::Name::new("post")?,
            Value::Null,
            json!({"id": "1"}),
            Arc::new(RequestContext::anonymous()),
        )
        .await;
    let error = result.expect_err("anonymous requests are rejected");
    let response = execute::field_error_response(
        &error,
        &coordinate("Query.post"),
        engine_types::ExposeInternalErrors::Censor,
    );
    assert_eq!(response.message, "Forbidden access");

    let found = schema
        .resolve_field(
            &type_name("Query"),
            &ast::Name::new("post")?,
            Value::Null,
            json!({"id": "1"}),
            signed_in(),
        )
        .await?;
    assert_eq!(found["value"], json!({"id": 1, "title": "Hello"}));
    Ok(())
}
