//! Shadow CRUD: which models, operations and fields the compiled schema
//! exposes.
//!
//! The store is created from the model set before anything is built, so
//! every model has an entry from the start. It is configured during the build
//! phase only and read-only once the schema is compiled.

use std::collections::{BTreeMap, BTreeSet};

use content_model::{ContentModelSet, ModelUid};

use crate::Error;

const ALL_ACTIONS: &str = "*";

/// Per-field toggles; every field starts fully enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldShadowCrud {
    enabled: bool,
    input_enabled: bool,
    output_enabled: bool,
    filters_enabled: bool,
}

impl Default for FieldShadowCrud {
    fn default() -> Self {
        FieldShadowCrud {
            enabled: true,
            input_enabled: true,
            output_enabled: true,
            filters_enabled: true,
        }
    }
}

impl FieldShadowCrud {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn disable(&mut self) -> &mut Self {
        self.enabled = false;
        self
    }

    pub fn has_input_enabled(&self) -> bool {
        self.enabled && self.input_enabled
    }

    pub fn disable_input(&mut self) -> &mut Self {
        self.input_enabled = false;
        self
    }

    pub fn has_output_enabled(&self) -> bool {
        self.enabled && self.output_enabled
    }

    pub fn disable_output(&mut self) -> &mut Self {
        self.output_enabled = false;
        self
    }

    pub fn has_filters_enabled(&self) -> bool {
        self.enabled && self.filters_enabled
    }

    pub fn disable_filters(&mut self) -> &mut Self {
        self.filters_enabled = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelShadowCrud {
    enabled: bool,
    queries_enabled: bool,
    mutations_enabled: bool,
    disabled_actions: BTreeSet<String>,
    fields: BTreeMap<String, FieldShadowCrud>,
}

impl Default for ModelShadowCrud {
    fn default() -> Self {
        ModelShadowCrud {
            enabled: true,
            queries_enabled: true,
            mutations_enabled: true,
            disabled_actions: BTreeSet::new(),
            fields: BTreeMap::new(),
        }
    }
}

impl ModelShadowCrud {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_disabled(&self) -> bool {
        !self.enabled
    }

    pub fn disable(&mut self) -> &mut Self {
        self.enabled = false;
        self
    }

    pub fn are_queries_enabled(&self) -> bool {
        self.enabled && self.queries_enabled
    }

    pub fn disable_queries(&mut self) -> &mut Self {
        self.queries_enabled = false;
        self
    }

    pub fn are_mutations_enabled(&self) -> bool {
        self.enabled && self.mutations_enabled
    }

    pub fn disable_mutations(&mut self) -> &mut Self {
        self.mutations_enabled = false;
        self
    }

    pub fn is_action_enabled(&self, action: impl AsRef<str>) -> bool {
        !self.disabled_actions.contains(ALL_ACTIONS)
            && !self.disabled_actions.contains(action.as_ref())
    }

    /// `*` disables every action.
    pub fn disable_action(&mut self, action: impl AsRef<str>) -> &mut Self {
        self.disabled_actions.insert(action.as_ref().to_string());
        self
    }

    pub fn disable_actions<I, S>(&mut self, actions: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for action in actions {
            self.disable_action(action);
        }
        self
    }

    /// The toggles of one field. Fields never configured are fully enabled.
    pub fn field(&self, field_name: &str) -> FieldShadowCrud {
        self.fields.get(field_name).copied().unwrap_or_default()
    }

    pub fn field_mut(&mut self, field_name: &str) -> &mut FieldShadowCrud {
        self.fields.entry(field_name.to_string()).or_default()
    }
}

static UNKNOWN_MODEL: ModelShadowCrud = ModelShadowCrud {
    enabled: false,
    queries_enabled: true,
    mutations_enabled: true,
    disabled_actions: BTreeSet::new(),
    fields: BTreeMap::new(),
};

#[derive(Debug, Clone, Default)]
pub struct ShadowCrudStore {
    models: BTreeMap<ModelUid, ModelShadowCrud>,
}

impl ShadowCrudStore {
    pub fn new(models: &ContentModelSet) -> Self {
        ShadowCrudStore {
            models: models
                .uids()
                .map(|uid| (uid.clone(), ModelShadowCrud::default()))
                .collect(),
        }
    }

    /// The config of a model. Unknown uids read as disabled, since no such
    /// model can be exposed.
    pub fn model(&self, uid: &ModelUid) -> &ModelShadowCrud {
        self.models.get(uid).unwrap_or(&UNKNOWN_MODEL)
    }

    pub fn model_mut(&mut self, uid: &ModelUid) -> Result<&mut ModelShadowCrud, Error> {
        self.models.get_mut(uid).ok_or_else(|| Error::UnknownModel {
            model_uid: uid.clone(),
        })
    }

    pub fn is_model_enabled(&self, uid: &ModelUid) -> bool {
        self.models.get(uid).is_some_and(ModelShadowCrud::is_enabled)
    }
}
