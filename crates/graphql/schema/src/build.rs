//! One compilation pass: content models and extensions in, schema out.

use std::collections::BTreeMap;

use content_model::{ContentModel, ContentModelSet, ModelUid, RelationTarget};
use lang_graphql::ast::common::{self as ast, OperationType};
use lang_graphql::schema as gql_schema;

use crate::attributes::{classify, ClassifiedAttribute};
use crate::model_filter_input::{build_filters_input, register_scalar_filter_inputs};
use crate::mutation_root::{mutation_fields, mutation_root_type_name};
use crate::query_root::{query_fields, query_root_type_name};
use crate::registry::{Definition, EntryConfig, Kind, TypeRegistry};
use crate::types::{
    enum_type, inbuilt_type, input_type, insert_field, output_type, response_type, union_type,
};
use crate::{naming, Annotation, Error, ExtensionStore, FieldShadowCrud, ResolverConfig, ShadowCrudStore};

pub(crate) type ResolversConfig = BTreeMap<ast::FieldCoordinate, ResolverConfig>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// When false no CRUD schema is generated; only the built-in types and
    /// the extensions end up in the schema.
    pub shadow_crud: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions { shadow_crud: true }
    }
}

/// The outcome of a compilation pass.
#[derive(Debug)]
pub struct CompiledSchema {
    pub schema: gql_schema::Schema<Annotation>,
    /// Auth, middlewares and policies per `Type.field`: the CRUD defaults
    /// with every extension layered on top.
    pub resolvers_config: ResolversConfig,
}

/// What the builders read while compiling.
pub(crate) struct BuildContext<'a> {
    pub models: &'a ContentModelSet,
    pub shadow_crud: &'a ShadowCrudStore,
}

impl<'a> BuildContext<'a> {
    /// The model with this uid, unless it is missing or disabled.
    pub fn enabled_model(&self, uid: &ModelUid) -> Option<&'a ContentModel> {
        self.models
            .get(uid)
            .filter(|model| self.shadow_crud.is_model_enabled(&model.uid))
    }

    pub fn enabled_models(&self) -> impl Iterator<Item = &'a ContentModel> + '_ {
        self.models
            .iter()
            .filter(|model| self.shadow_crud.is_model_enabled(&model.uid))
    }

    pub fn field(&self, model: &ContentModel, field_name: &str) -> FieldShadowCrud {
        self.shadow_crud.model(&model.uid).field(field_name)
    }
}

/// Compiles the schema. Any error aborts the whole pass.
#[tracing::instrument(skip_all, fields(models = models.len()))]
pub fn build_schema(
    models: &ContentModelSet,
    shadow_crud: &ShadowCrudStore,
    extensions: &ExtensionStore,
    options: &BuildOptions,
) -> Result<CompiledSchema, Error> {
    let ctx = BuildContext {
        models,
        shadow_crud,
    };
    let mut registry = TypeRegistry::new();
    let mut defaults = ResolversConfig::new();

    inbuilt_type::register_internal_types(&mut registry)?;
    register_scalar_filter_inputs(&mut registry)?;

    if options.shadow_crud {
        for model in ctx.enabled_models() {
            register_model(&ctx, &mut registry, model, &mut defaults)?;
        }
        if let Some(generic_morph) = union_type::build_generic_morph(&registry)? {
            registry.register_type(generic_morph, EntryConfig::new(Kind::Morph))?;
        }
    }

    register_extension_types(&mut registry, extensions)?;

    let schema = assemble(registry, extensions)?;
    let resolvers_config = extensions.resolvers_config(defaults);

    tracing::info!(
        types = schema.types.len(),
        configured_fields = resolvers_config.len(),
        "compiled schema"
    );
    Ok(CompiledSchema {
        schema,
        resolvers_config,
    })
}

#[tracing::instrument(skip_all, fields(model = %model.uid))]
fn register_model(
    ctx: &BuildContext<'_>,
    registry: &mut TypeRegistry,
    model: &ContentModel,
    defaults: &mut ResolversConfig,
) -> Result<(), Error> {
    let uid = &model.uid;
    let type_kind = if model.is_component() {
        Kind::Component
    } else {
        Kind::Type
    };
    registry.register_type(
        output_type::build_type_definition(ctx, model, defaults)?,
        EntryConfig::for_model(type_kind, uid),
    )?;

    for (attribute_name, attribute) in &model.attributes {
        match classify(attribute) {
            ClassifiedAttribute::Enumeration { values } => {
                registry.register_type(
                    enum_type::build_enum_type(model, attribute_name, values)?,
                    EntryConfig::for_attribute(Kind::Enum, uid, attribute_name),
                )?;
            }
            ClassifiedAttribute::DynamicZone { components } => {
                if let Some([union, input]) =
                    union_type::build_dynamic_zone(ctx, model, attribute_name, components)?
                {
                    registry.register_type(
                        union,
                        EntryConfig::for_attribute(Kind::DynamicZone, uid, attribute_name),
                    )?;
                    registry.register_type(
                        input,
                        EntryConfig::for_attribute(Kind::DynamicZoneInput, uid, attribute_name),
                    )?;
                }
            }
            ClassifiedAttribute::MorphRelation {
                target: RelationTarget::Many(targets),
                ..
            } => {
                if let Some(union) =
                    union_type::build_morph_union(ctx, model, attribute_name, targets)?
                {
                    registry.register_type(
                        union,
                        EntryConfig::for_attribute(Kind::Morph, uid, attribute_name),
                    )?;
                }
            }
            ClassifiedAttribute::Scalar { .. }
            | ClassifiedAttribute::Media { .. }
            | ClassifiedAttribute::MorphRelation { .. }
            | ClassifiedAttribute::Relation { .. }
            | ClassifiedAttribute::Component { .. } => {}
        }
    }

    registry.register_type(
        input_type::build_input_type(ctx, model)?,
        EntryConfig::for_model(Kind::Input, uid),
    )?;
    registry.register_type(
        build_filters_input(ctx, model)?,
        EntryConfig::for_model(Kind::FiltersInput, uid),
    )?;

    if model.is_component() {
        return Ok(());
    }

    registry.register_type(
        response_type::build_entity(model)?,
        EntryConfig::for_model(Kind::Entity, uid),
    )?;
    registry.register_type(
        response_type::build_entity_response(model)?,
        EntryConfig::for_model(Kind::EntityResponse, uid),
    )?;
    registry.register_type(
        response_type::build_relation_response_collection(model)?,
        EntryConfig::for_model(Kind::RelationResponseCollection, uid),
    )?;
    if model.is_collection_type() {
        registry.register_type(
            response_type::build_entity_response_collection(model)?,
            EntryConfig::for_model(Kind::EntityResponseCollection, uid),
        )?;
    }

    registry.register(
        naming::entity_queries_type_name(model),
        Definition::RootFields {
            root: OperationType::Query,
            fields: query_fields(ctx, model, defaults)?,
        },
        EntryConfig::for_model(Kind::Queries, uid),
    )?;
    registry.register(
        naming::entity_mutations_type_name(model),
        Definition::RootFields {
            root: OperationType::Mutation,
            fields: mutation_fields(ctx, model, defaults)?,
        },
        EntryConfig::for_model(Kind::Mutations, uid),
    )?;
    Ok(())
}

#[tracing::instrument(skip_all)]
fn register_extension_types(
    registry: &mut TypeRegistry,
    extensions: &ExtensionStore,
) -> Result<(), Error> {
    for type_info in extensions.types() {
        registry.register_type(type_info.clone(), EntryConfig::new(Kind::Extension))?;
    }
    Ok(())
}

/// Turns the registry into a schema: root fields are gathered into `Query`
/// and `Mutation`, extension fields are added to their types, and removed
/// types are dropped.
fn assemble(
    registry: TypeRegistry,
    extensions: &ExtensionStore,
) -> Result<gql_schema::Schema<Annotation>, Error> {
    let query_type_name = query_root_type_name();
    let mutation_type_name = mutation_root_type_name();
    let mut query_fields = BTreeMap::new();
    let mut mutation_fields = BTreeMap::new();
    let mut types = BTreeMap::new();

    for entry in registry.into_entries() {
        match entry.definition {
            Definition::Type(type_info) => {
                types.insert(type_info.name().clone(), type_info);
            }
            Definition::RootFields { root, fields } => {
                let (type_name, root_fields) = match root {
                    OperationType::Query => (&query_type_name, &mut query_fields),
                    OperationType::Mutation => (&mutation_type_name, &mut mutation_fields),
                };
                for field in fields {
                    insert_field(root_fields, type_name, field.name.clone(), field)?;
                }
            }
        }
    }

    for (type_name, field) in extensions.fields() {
        let target = if *type_name == query_type_name {
            &mut query_fields
        } else if *type_name == mutation_type_name {
            &mut mutation_fields
        } else {
            match types.get_mut(type_name) {
                Some(gql_schema::TypeInfo::Object(object)) => &mut object.fields,
                _ => {
                    return Err(Error::UnknownExtendedType {
                        type_name: type_name.clone(),
                    })
                }
            }
        };
        insert_field(target, type_name, field.name.clone(), field.clone())?;
    }

    for root in [&query_type_name, &mutation_type_name] {
        if types.contains_key(root) {
            return Err(Error::DuplicateTypeName {
                type_name: root.to_string(),
            });
        }
    }
    types.insert(
        query_type_name.clone(),
        gql_schema::TypeInfo::Object(gql_schema::Object::new(
            query_type_name.clone(),
            None,
            query_fields,
        )),
    );
    let mutation_type = if mutation_fields.is_empty() {
        None
    } else {
        types.insert(
            mutation_type_name.clone(),
            gql_schema::TypeInfo::Object(gql_schema::Object::new(
                mutation_type_name.clone(),
                None,
                mutation_fields,
            )),
        );
        Some(mutation_type_name)
    };

    for type_name in extensions.types_to_remove() {
        if types.remove(&type_name).is_none() {
            tracing::warn!(type_name = %type_name, "cannot remove unknown type");
        }
    }
    let mutation_type = mutation_type.filter(|name| types.contains_key(name));

    Ok(gql_schema::Schema::new(
        query_type_name,
        mutation_type,
        types.into_values(),
    )?)
}
