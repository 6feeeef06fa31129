use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::model::{ModelUid, FILE_MODEL_UID};

/// Attributes managed by the data layer. They appear in output types but
/// can never be written through the API.
pub const NON_WRITABLE_ATTRIBUTES: [&str; 6] = [
    "id",
    "createdAt",
    "updatedAt",
    "publishedAt",
    "createdBy",
    "updatedBy",
];

/// One typed field of a content model.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "RawAttribute", into = "RawAttribute")]
pub struct Attribute {
    pub kind: AttributeKind,
    pub required: bool,
    pub private: bool,
    pub unique: bool,
    pub writable: bool,
    pub default: Option<serde_json::Value>,
}

impl Attribute {
    pub fn new(kind: AttributeKind) -> Self {
        Attribute {
            kind,
            required: false,
            private: false,
            unique: false,
            writable: true,
            default: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn scalar(kind: ScalarKind) -> Self {
        Attribute::new(AttributeKind::Scalar(kind))
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Attribute::new(AttributeKind::Enumeration {
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn relation(relation: RelationKind, target: RelationTarget) -> Self {
        Attribute::new(AttributeKind::Relation {
            relation,
            target,
            mapped_by: None,
            inversed_by: None,
        })
    }

    pub fn media(multiple: bool) -> Self {
        Attribute::new(AttributeKind::Media { multiple })
    }

    pub fn component(component: ModelUid, repeatable: bool) -> Self {
        Attribute::new(AttributeKind::Component {
            component,
            repeatable,
        })
    }

    pub fn dynamic_zone(components: Vec<ModelUid>) -> Self {
        Attribute::new(AttributeKind::DynamicZone { components })
    }

    /// The model this attribute points at, when it points at exactly one.
    /// Media always points at the upload file model.
    pub fn single_target(&self) -> Option<ModelUid> {
        match &self.kind {
            AttributeKind::Relation {
                target: RelationTarget::One(target),
                ..
            }
            | AttributeKind::Component {
                component: target, ..
            } => Some(target.clone()),
            AttributeKind::Media { .. } => Some(ModelUid::new(FILE_MODEL_UID)),
            AttributeKind::Scalar(_)
            | AttributeKind::Enumeration { .. }
            | AttributeKind::Relation { .. }
            | AttributeKind::DynamicZone { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AttributeKind {
    Scalar(ScalarKind),
    Enumeration {
        values: Vec<String>,
    },
    Relation {
        relation: RelationKind,
        target: RelationTarget,
        mapped_by: Option<String>,
        inversed_by: Option<String>,
    },
    Media {
        multiple: bool,
    },
    Component {
        component: ModelUid,
        repeatable: bool,
    },
    DynamicZone {
        components: Vec<ModelUid>,
    },
}

/// The scalar kinds a content model may declare. Kinds outside the known set
/// are kept verbatim so the schema compiler can report them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Text,
    RichText,
    Blocks,
    Email,
    Password,
    Uid,
    Integer,
    BigInteger,
    Float,
    Decimal,
    Date,
    Time,
    DateTime,
    Timestamp,
    Boolean,
    Json,
    Other(String),
}

impl ScalarKind {
    pub fn as_str(&self) -> &str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Text => "text",
            ScalarKind::RichText => "richtext",
            ScalarKind::Blocks => "blocks",
            ScalarKind::Email => "email",
            ScalarKind::Password => "password",
            ScalarKind::Uid => "uid",
            ScalarKind::Integer => "integer",
            ScalarKind::BigInteger => "biginteger",
            ScalarKind::Float => "float",
            ScalarKind::Decimal => "decimal",
            ScalarKind::Date => "date",
            ScalarKind::Time => "time",
            ScalarKind::DateTime => "datetime",
            ScalarKind::Timestamp => "timestamp",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Json => "json",
            ScalarKind::Other(other) => other,
        }
    }
}

impl From<&str> for ScalarKind {
    fn from(s: &str) -> Self {
        match s {
            "string" => ScalarKind::String,
            "text" => ScalarKind::Text,
            "richtext" => ScalarKind::RichText,
            "blocks" => ScalarKind::Blocks,
            "email" => ScalarKind::Email,
            "password" => ScalarKind::Password,
            "uid" => ScalarKind::Uid,
            "integer" => ScalarKind::Integer,
            "biginteger" => ScalarKind::BigInteger,
            "float" => ScalarKind::Float,
            "decimal" => ScalarKind::Decimal,
            "date" => ScalarKind::Date,
            "time" => ScalarKind::Time,
            "datetime" => ScalarKind::DateTime,
            "timestamp" => ScalarKind::Timestamp,
            "boolean" => ScalarKind::Boolean,
            "json" => ScalarKind::Json,
            other => ScalarKind::Other(other.to_string()),
        }
    }
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
    MorphToOne,
    MorphToMany,
    MorphOne,
    MorphMany,
}

impl RelationKind {
    /// Whether the relation resolves to a list of records.
    pub fn is_many(self) -> bool {
        matches!(
            self,
            RelationKind::OneToMany
                | RelationKind::ManyToMany
                | RelationKind::MorphToMany
                | RelationKind::MorphMany
        )
    }

    /// Whether the concrete target type is only known at runtime.
    pub fn is_morph(self) -> bool {
        matches!(
            self,
            RelationKind::MorphToOne
                | RelationKind::MorphToMany
                | RelationKind::MorphOne
                | RelationKind::MorphMany
        )
    }
}

/// Where a relation points. Polymorphic relations may carry no target at all
/// or an explicit list of candidate models.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(untagged)]
pub enum RelationTarget {
    #[default]
    None,
    One(ModelUid),
    Many(Vec<ModelUid>),
}

/// Whether an attribute may appear in create and update payloads.
pub fn is_writable_attribute(attribute_name: &str, attribute: &Attribute) -> bool {
    attribute.writable && !NON_WRITABLE_ATTRIBUTES.contains(&attribute_name)
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawAttribute {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "is_false")]
    required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    private: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    writable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<serde_json::Value>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    relation: Option<RelationKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<RelationTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mapped_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inversed_by: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    multiple: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component: Option<ModelUid>,
    #[serde(default, skip_serializing_if = "is_false")]
    repeatable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    components: Option<Vec<ModelUid>>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

impl TryFrom<RawAttribute> for Attribute {
    type Error = String;

    fn try_from(raw: RawAttribute) -> Result<Self, Self::Error> {
        let kind = match raw.kind.as_str() {
            "enumeration" => AttributeKind::Enumeration {
                values: raw
                    .values
                    .ok_or("enumeration attributes need an 'enum' list of values")?,
            },
            "relation" => AttributeKind::Relation {
                relation: raw
                    .relation
                    .ok_or("relation attributes need a 'relation' cardinality")?,
                target: raw.target.unwrap_or_default(),
                mapped_by: raw.mapped_by,
                inversed_by: raw.inversed_by,
            },
            "media" => AttributeKind::Media {
                multiple: raw.multiple,
            },
            "component" => AttributeKind::Component {
                component: raw
                    .component
                    .ok_or("component attributes need a 'component' uid")?,
                repeatable: raw.repeatable,
            },
            "dynamiczone" => AttributeKind::DynamicZone {
                components: raw
                    .components
                    .ok_or("dynamiczone attributes need a 'components' list")?,
            },
            scalar => AttributeKind::Scalar(ScalarKind::from(scalar)),
        };
        Ok(Attribute {
            kind,
            required: raw.required,
            private: raw.private,
            unique: raw.unique,
            writable: raw.writable.unwrap_or(true),
            default: raw.default,
        })
    }
}

impl From<Attribute> for RawAttribute {
    fn from(attribute: Attribute) -> Self {
        let mut raw = RawAttribute {
            required: attribute.required,
            private: attribute.private,
            unique: attribute.unique,
            writable: (!attribute.writable).then_some(false),
            default: attribute.default,
            ..RawAttribute::default()
        };
        match attribute.kind {
            AttributeKind::Scalar(scalar) => raw.kind = scalar.to_string(),
            AttributeKind::Enumeration { values } => {
                raw.kind = "enumeration".to_string();
                raw.values = Some(values);
            }
            AttributeKind::Relation {
                relation,
                target,
                mapped_by,
                inversed_by,
            } => {
                raw.kind = "relation".to_string();
                raw.relation = Some(relation);
                raw.target = (target != RelationTarget::None).then_some(target);
                raw.mapped_by = mapped_by;
                raw.inversed_by = inversed_by;
            }
            AttributeKind::Media { multiple } => {
                raw.kind = "media".to_string();
                raw.multiple = multiple;
            }
            AttributeKind::Component {
                component,
                repeatable,
            } => {
                raw.kind = "component".to_string();
                raw.component = Some(component);
                raw.repeatable = repeatable;
            }
            AttributeKind::DynamicZone { components } => {
                raw.kind = "dynamiczone".to_string();
                raw.components = Some(components);
            }
        }
        raw
    }
}
