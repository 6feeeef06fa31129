use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeKind};
use crate::Error;

/// The model every media attribute relates to.
pub const FILE_MODEL_UID: &str = "plugin::upload.file";

/// Unique id of a content model, e.g. `api::post.post` or `shared.seo`.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct ModelUid(pub String);

impl ModelUid {
    pub fn new(uid: impl Into<String>) -> Self {
        ModelUid(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last dotted segment, `post` for `api::post.post`.
    pub fn local_name(&self) -> &str {
        let without_namespace = self
            .0
            .split_once("::")
            .map_or(self.0.as_str(), |(_, rest)| rest);
        without_namespace
            .rsplit_once('.')
            .map_or(without_namespace, |(_, name)| name)
    }

    /// The segment before the last dot, `shared` for `shared.seo`.
    pub fn category(&self) -> Option<&str> {
        let without_namespace = self
            .0
            .split_once("::")
            .map_or(self.0.as_str(), |(_, rest)| rest);
        without_namespace
            .rsplit_once('.')
            .map(|(category, _)| category)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ModelKind {
    CollectionType,
    SingleType,
    Component,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    #[serde(default)]
    pub singular_name: String,
    #[serde(default)]
    pub plural_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModelOptions {
    #[serde(default)]
    pub draft_and_publish: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentModel {
    pub uid: ModelUid,
    pub kind: ModelKind,
    /// Namespace of the plugin that owns the model, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    /// Component category, `shared` for `shared.seo`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub info: ModelInfo,
    #[serde(default)]
    pub options: ModelOptions,
    #[serde(default)]
    pub attributes: IndexMap<String, Attribute>,
}

impl ContentModel {
    pub fn new(uid: impl Into<String>, kind: ModelKind) -> Self {
        ContentModel {
            uid: ModelUid::new(uid),
            kind,
            plugin: None,
            category: None,
            info: ModelInfo::default(),
            options: ModelOptions::default(),
            attributes: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = Some(plugin.into());
        self
    }

    #[must_use]
    pub fn with_names(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.info.singular_name = singular.into();
        self.info.plural_name = plural.into();
        self
    }

    #[must_use]
    pub fn with_draft_and_publish(mut self) -> Self {
        self.options.draft_and_publish = true;
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn is_component(&self) -> bool {
        self.kind == ModelKind::Component
    }

    pub fn is_collection_type(&self) -> bool {
        self.kind == ModelKind::CollectionType
    }

    pub fn is_single_type(&self) -> bool {
        self.kind == ModelKind::SingleType
    }

    pub fn has_draft_and_publish(&self) -> bool {
        self.options.draft_and_publish && !self.is_component()
    }

    /// Derives names left out of the definition from the uid.
    fn fill_defaults(&mut self) {
        if self.info.singular_name.is_empty() {
            self.info.singular_name = self.uid.local_name().to_string();
        }
        if self.info.plural_name.is_empty() {
            self.info.plural_name = format!("{}s", self.info.singular_name);
        }
        if self.info.display_name.is_empty() {
            self.info.display_name.clone_from(&self.info.singular_name);
        }
        if self.is_component() && self.category.is_none() {
            self.category = self.uid.category().map(ToString::to_string);
        }
    }

    fn validate(&self) -> Result<(), Error> {
        for (attribute_name, attribute) in &self.attributes {
            let reason = match &attribute.kind {
                AttributeKind::Enumeration { values } if values.is_empty() => {
                    Some("an enumeration needs at least one value")
                }
                AttributeKind::DynamicZone { components } if components.is_empty() => {
                    Some("a dynamic zone needs at least one component")
                }
                _ => None,
            };
            if let Some(reason) = reason {
                return Err(Error::InvalidAttribute {
                    model_uid: self.uid.clone(),
                    attribute_name: attribute_name.clone(),
                    reason: reason.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Every content model taking part in one compilation pass, in declaration
/// order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentModelSet {
    models: IndexMap<ModelUid, ContentModel>,
}

impl ContentModelSet {
    pub fn new(models: impl IntoIterator<Item = ContentModel>) -> Result<Self, Error> {
        let mut set = IndexMap::new();
        for mut model in models {
            model.fill_defaults();
            model.validate()?;
            let uid = model.uid.clone();
            if set.insert(uid.clone(), model).is_some() {
                return Err(Error::DuplicateModel(uid));
            }
        }
        Ok(ContentModelSet { models: set })
    }

    /// Parses a JSON array of content models.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let models: Vec<ContentModel> = serde_json::from_str(json)?;
        Self::new(models)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|error| Error::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, uid: &ModelUid) -> Option<&ContentModel> {
        self.models.get(uid)
    }

    pub fn contains(&self, uid: &ModelUid) -> bool {
        self.models.contains_key(uid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentModel> {
        self.models.values()
    }

    pub fn uids(&self) -> impl Iterator<Item = &ModelUid> {
        self.models.keys()
    }

    /// Collection and single types, the models that get root fields.
    pub fn content_types(&self) -> impl Iterator<Item = &ContentModel> {
        self.models.values().filter(|model| !model.is_component())
    }

    pub fn components(&self) -> impl Iterator<Item = &ContentModel> {
        self.models.values().filter(|model| model.is_component())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
