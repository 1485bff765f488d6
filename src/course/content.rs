//! Conversion between persisted lesson content JSON and [`ContentBlock`]s.
//!
//! Persisted content is expected to be `[{id, type, content}]`, but older
//! rows hold plain strings or partial objects. Loading never fails: every
//! entry becomes some block.

use serde_json::{Map, Value};
use tracing::debug;

use crate::course::{BlockKind, ContentBlock, ContentBlocks};
use crate::utils::ids;

/// Shape of one persisted content entry.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBlock {
    Wellformed {
        id: String,
        kind: Option<BlockKind>,
        content: String,
    },
    Bare(String),
    Unrecognized(Value),
}

impl RawBlock {
    pub fn classify(entry: &Value) -> Self {
        match entry {
            Value::String(s) => Self::Bare(s.clone()),
            Value::Object(map) => match wellformed_fields(map) {
                Some((id, kind, content)) => Self::Wellformed {
                    id,
                    kind: BlockKind::parse(&kind),
                    content,
                },
                None => Self::Unrecognized(entry.clone()),
            },
            other => Self::Unrecognized(other.clone()),
        }
    }

    pub fn into_block(self) -> ContentBlock {
        match self {
            Self::Wellformed { id, kind, content } => {
                if kind.is_none() {
                    debug!("content block {id} has an unknown type, treating it as text");
                }
                ContentBlock {
                    id,
                    kind: kind.unwrap_or(BlockKind::Text),
                    content,
                }
            }
            Self::Bare(text) => ContentBlock {
                id: ids::block_id(),
                kind: BlockKind::Text,
                content: text,
            },
            Self::Unrecognized(value) => {
                debug!("coercing malformed content entry into a text block");
                ContentBlock {
                    id: ids::block_id(),
                    kind: BlockKind::Text,
                    content: value.to_string(),
                }
            }
        }
    }
}

fn wellformed_fields(map: &Map<String, Value>) -> Option<(String, String, String)> {
    let id = scalar_to_string(map.get("id")?)?;
    let kind = scalar_to_string(map.get("type")?)?;
    let content = match map.get("content")? {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    Some((id, kind, content))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Turns persisted content into blocks. Non-array input yields no blocks.
pub fn transform_content(content: Option<&Value>) -> Vec<ContentBlock> {
    match content {
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| RawBlock::classify(entry).into_block())
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            debug!("lesson content is not an array, ignoring it");
            Vec::new()
        }
    }
}

pub fn content_to_json(blocks: &ContentBlocks) -> Value {
    Value::Array(
        blocks
            .iter()
            .map(|block| {
                serde_json::json!({
                    "id": block.id,
                    "type": block.kind.as_str(),
                    "content": block.content,
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn wellformed_entries_are_kept() {
        let raw = json!([
            {"id": "b1", "type": "text", "content": "Hello"},
            {"id": "b2", "type": "image", "content": "https://img.example/a.png"},
        ]);
        let blocks = transform_content(Some(&raw));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].id, "b1");
        assert_eq!(blocks[1].kind, BlockKind::Image);
        assert_eq!(blocks[1].content, "https://img.example/a.png");
    }

    #[test]
    fn missing_field_becomes_serialized_text() {
        let raw = json!([{"id": "b1", "foo": "bar"}]);
        let blocks = transform_content(Some(&raw));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Text);
        assert_eq!(blocks[0].content, json!({"id": "b1", "foo": "bar"}).to_string());
        assert_ne!(blocks[0].id, "b1");
    }

    #[test]
    fn bare_strings_and_scalars() {
        let raw = json!(["just text", 42, null, [1, 2]]);
        let blocks = transform_content(Some(&raw));
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0].content, "just text");
        assert_eq!(blocks[1].content, "42");
        assert_eq!(blocks[2].content, "null");
        assert_eq!(blocks[3].content, "[1,2]");
        assert!(blocks.iter().all(|b| b.kind == BlockKind::Text));
    }

    #[test]
    fn numeric_ids_and_unknown_types() {
        let raw = json!([{"id": 7, "type": "quiz", "content": "Q?"}]);
        let blocks = transform_content(Some(&raw));
        assert_eq!(blocks[0].id, "7");
        assert_eq!(blocks[0].kind, BlockKind::Text);
        assert_eq!(blocks[0].content, "Q?");
    }

    #[test]
    fn non_array_content_is_empty() {
        assert!(transform_content(None).is_empty());
        assert!(transform_content(Some(&Value::Null)).is_empty());
        assert!(transform_content(Some(&json!({"id": "b1"}))).is_empty());
        assert!(transform_content(Some(&json!("text"))).is_empty());
    }

    #[test]
    fn content_json_shape() {
        let blocks = ContentBlocks::from(vec![ContentBlock {
            id: "b1".into(),
            kind: BlockKind::Link,
            content: "https://x.dev - X".into(),
        }]);
        assert_eq!(
            content_to_json(&blocks),
            json!([{"id": "b1", "type": "link", "content": "https://x.dev - X"}])
        );
        let back = transform_content(Some(&content_to_json(&blocks)));
        assert_eq!(back, blocks.as_slice());
    }
}
