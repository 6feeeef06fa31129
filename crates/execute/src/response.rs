//! The intermediate values flowing between response wrapper types.
//!
//! An entity response is `{ value, info }`, a response collection is
//! `{ nodes, info }` where `info` is `{ args, modelUid }`. The `data`
//! fields turn records into entities, `{ id, attributes }`.

use content_model::ModelUid;
use serde_json::{json, Value};

use crate::services::QueryParams;

pub(crate) const VALUE_KEY: &str = "value";
pub(crate) const NODES_KEY: &str = "nodes";
pub(crate) const INFO_KEY: &str = "info";
pub(crate) const ARGS_KEY: &str = "args";
pub(crate) const MODEL_UID_KEY: &str = "modelUid";

fn info(uid: &ModelUid, params: &QueryParams) -> Value {
    json!({
        ARGS_KEY: params,
        MODEL_UID_KEY: uid.as_str(),
    })
}

pub fn to_entity_response(value: Value, uid: &ModelUid, params: &QueryParams) -> Value {
    json!({
        VALUE_KEY: value,
        INFO_KEY: info(uid, params),
    })
}

pub fn to_entity_response_collection(
    nodes: Vec<Value>,
    uid: &ModelUid,
    params: &QueryParams,
) -> Value {
    json!({
        NODES_KEY: nodes,
        INFO_KEY: info(uid, params),
    })
}

/// `{ id, attributes }` of a record; `null` stays `null`.
pub fn to_entity(record: &Value) -> Value {
    if record.is_null() {
        return Value::Null;
    }
    json!({
        "id": record.get("id").cloned().unwrap_or(Value::Null),
        "attributes": record,
    })
}

pub(crate) fn entities(nodes: &Value) -> Value {
    match nodes {
        Value::Array(nodes) => Value::Array(nodes.iter().map(to_entity).collect()),
        _ => Value::Array(Vec::new()),
    }
}

/// The data-access params and model a response collection was read with.
pub(crate) fn collection_info(parent: &Value) -> Option<(ModelUid, QueryParams)> {
    let info = parent.get(INFO_KEY).unwrap_or(parent);
    let uid = info.get(MODEL_UID_KEY)?.as_str()?;
    let params = serde_json::from_value(info.get(ARGS_KEY)?.clone()).ok()?;
    Some((ModelUid::new(uid), params))
}
