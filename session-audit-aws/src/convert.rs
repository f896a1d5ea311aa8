use aws_sdk_dynamodb::types::AttributeValue;
use data_encoding::BASE64;
use serde_json::{json, Map, Value};
use session_audit_common::{AttrValue, Row};

pub(crate) fn row_from_item(item: std::collections::HashMap<String, AttributeValue>) -> Row {
    item.into_iter()
        .map(|(name, value)| (name, attr_value(value)))
        .collect()
}

pub(crate) fn attr_value(value: AttributeValue) -> AttrValue {
    match value {
        AttributeValue::S(s) => AttrValue::S(s),
        AttributeValue::N(n) => AttrValue::N(n),
        other => AttrValue::Other(to_json(other)),
    }
}

/// DynamoDB JSON form of an attribute, binary encoded as base64.
fn to_json(value: AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => json!({ "S": s }),
        AttributeValue::N(n) => json!({ "N": n }),
        AttributeValue::Bool(b) => json!({ "BOOL": b }),
        AttributeValue::Null(b) => json!({ "NULL": b }),
        AttributeValue::B(blob) => json!({ "B": BASE64.encode(blob.as_ref()) }),
        AttributeValue::Ss(items) => json!({ "SS": items }),
        AttributeValue::Ns(items) => json!({ "NS": items }),
        AttributeValue::Bs(items) => json!({
            "BS": items.iter().map(|b| BASE64.encode(b.as_ref())).collect::<Vec<_>>()
        }),
        AttributeValue::L(items) => json!({
            "L": items.into_iter().map(to_json).collect::<Vec<_>>()
        }),
        AttributeValue::M(fields) => json!({
            "M": fields
                .into_iter()
                .map(|(k, v)| (k, to_json(v)))
                .collect::<Map<_, _>>()
        }),
        _ => json!({ "UNKNOWN": null }),
    }
}
