//! Classification of attributes into the shapes the builders handle.

use content_model::{Attribute, AttributeKind, ModelUid, RelationKind, RelationTarget, ScalarKind};

/// Every attribute falls into exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "camelCase")]
pub enum AttributeClass {
    Enumeration,
    Scalar,
    Media,
    MorphRelation,
    Relation,
    Component,
    DynamicZone,
}

/// The classified view of an attribute, borrowing its payload.
#[derive(Debug, Clone, Copy)]
pub enum ClassifiedAttribute<'a> {
    Enumeration {
        values: &'a [String],
    },
    Scalar {
        kind: &'a ScalarKind,
    },
    Media {
        multiple: bool,
    },
    MorphRelation {
        relation: RelationKind,
        target: &'a RelationTarget,
    },
    Relation {
        relation: RelationKind,
        target: Option<&'a ModelUid>,
    },
    Component {
        component: &'a ModelUid,
        repeatable: bool,
    },
    DynamicZone {
        components: &'a [ModelUid],
    },
}

impl ClassifiedAttribute<'_> {
    pub fn class(&self) -> AttributeClass {
        match self {
            ClassifiedAttribute::Enumeration { .. } => AttributeClass::Enumeration,
            ClassifiedAttribute::Scalar { .. } => AttributeClass::Scalar,
            ClassifiedAttribute::Media { .. } => AttributeClass::Media,
            ClassifiedAttribute::MorphRelation { .. } => AttributeClass::MorphRelation,
            ClassifiedAttribute::Relation { .. } => AttributeClass::Relation,
            ClassifiedAttribute::Component { .. } => AttributeClass::Component,
            ClassifiedAttribute::DynamicZone { .. } => AttributeClass::DynamicZone,
        }
    }
}

/// Polymorphic relations are relations too, so they are told apart before
/// the regular relation case.
pub fn classify(attribute: &Attribute) -> ClassifiedAttribute<'_> {
    match &attribute.kind {
        AttributeKind::Enumeration { values } => ClassifiedAttribute::Enumeration { values },
        AttributeKind::Scalar(kind) => ClassifiedAttribute::Scalar { kind },
        AttributeKind::Media { multiple } => ClassifiedAttribute::Media {
            multiple: *multiple,
        },
        AttributeKind::Relation {
            relation, target, ..
        } if relation.is_morph() => ClassifiedAttribute::MorphRelation {
            relation: *relation,
            target,
        },
        AttributeKind::Relation {
            relation, target, ..
        } => ClassifiedAttribute::Relation {
            relation: *relation,
            target: match target {
                RelationTarget::One(target) => Some(target),
                RelationTarget::None | RelationTarget::Many(_) => None,
            },
        },
        AttributeKind::Component {
            component,
            repeatable,
        } => ClassifiedAttribute::Component {
            component,
            repeatable: *repeatable,
        },
        AttributeKind::DynamicZone { components } => {
            ClassifiedAttribute::DynamicZone { components }
        }
    }
}

pub fn is_scalar(attribute: &Attribute) -> bool {
    classify(attribute).class() == AttributeClass::Scalar
}

pub fn is_enumeration(attribute: &Attribute) -> bool {
    classify(attribute).class() == AttributeClass::Enumeration
}

pub fn is_media(attribute: &Attribute) -> bool {
    classify(attribute).class() == AttributeClass::Media
}

pub fn is_morph_relation(attribute: &Attribute) -> bool {
    classify(attribute).class() == AttributeClass::MorphRelation
}

/// Regular relations only; see [`is_morph_relation`].
pub fn is_relation(attribute: &Attribute) -> bool {
    classify(attribute).class() == AttributeClass::Relation
}

pub fn is_component(attribute: &Attribute) -> bool {
    classify(attribute).class() == AttributeClass::Component
}

pub fn is_dynamic_zone(attribute: &Attribute) -> bool {
    classify(attribute).class() == AttributeClass::DynamicZone
}
