use crate::node::{ChildRef, FolderListing, Node, TableDescriptor};
use crate::transport::Payload;
use crate::{Result, StatError};
use serde_json::Value;
use url::Url;

/// Decodes a GET payload into a node
///
/// An HTTP 204 yields an empty folder listing.
pub fn decode_payload(url: &Url, payload: &Payload) -> Result<Node> {
    match payload {
        Payload::NoContent => Ok(Node::Folder(FolderListing::default())),
        Payload::Body(bytes) => {
            let value: Value = serde_json::from_slice(bytes)
                .map_err(|e| malformed(url, format!("invalid JSON: {}", e)))?;
            decode_node(url, value)
        }
    }
}

/// Classifies a parsed JSON body as a folder listing or a table descriptor
///
/// # Classification Rules
///
/// - An array is a folder listing. Each element's id is its `id` field,
///   else its `dbid` field; elements with neither are kept but unnavigable.
/// - An object with a `title` is a table descriptor.
/// - Anything else is a malformed response.
pub fn decode_node(url: &Url, value: Value) -> Result<Node> {
    match value {
        Value::Array(entries) => Ok(Node::Folder(FolderListing::new(
            entries.iter().map(decode_child).collect(),
        ))),
        Value::Object(object) if object.contains_key("title") => {
            let table: TableDescriptor = serde_json::from_value(Value::Object(object))
                .map_err(|e| malformed(url, format!("invalid table descriptor: {}", e)))?;

            if let Some(variable) = table
                .variables
                .iter()
                .find(|v| v.values.len() != v.value_texts.len())
            {
                return Err(malformed(
                    url,
                    format!(
                        "variable '{}' has {} values but {} value texts",
                        variable.code,
                        variable.values.len(),
                        variable.value_texts.len()
                    ),
                ));
            }

            Ok(Node::Table(table))
        }
        Value::Object(_) => Err(malformed(url, "object without a title".to_string())),
        other => Err(malformed(url, format!("unexpected JSON value: {}", other))),
    }
}

fn decode_child(entry: &Value) -> ChildRef {
    let field = |name: &str| entry.get(name).and_then(Value::as_str).map(str::to_string);

    ChildRef {
        id: field("id").or_else(|| field("dbid")),
        text: field("text"),
        kind: field("type"),
    }
}

fn malformed(url: &Url, message: String) -> StatError {
    StatError::MalformedResponse {
        url: url.to_string(),
        message,
    }
}
