use serde::{Deserialize, Serialize};

use crate::utils::ids;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Image,
    Video,
    Link,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Link => "link",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "link" => Some(Self::Link),
            _ => None,
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Smallest addressable unit of lesson content. The meaning of `content`
/// depends on `kind`: free text, image url, embeddable video url or link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub content: String,
}

impl ContentBlock {
    pub fn new(kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id: ids::block_id(),
            kind,
            content: content.into(),
        }
    }

    pub fn empty_text() -> Self {
        Self::new(BlockKind::Text, "")
    }

    /// Splits a link block written as `"<url> - <description>"`.
    pub fn link_parts(&self) -> (&str, Option<&str>) {
        match self.content.split_once(" - ") {
            Some((url, description)) if !description.trim().is_empty() => {
                (url.trim(), Some(description.trim()))
            }
            Some((url, _)) => (url.trim(), None),
            None => (self.content.trim(), None),
        }
    }
}

/// Ordered blocks of a single lesson. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ContentBlock>", into = "Vec<ContentBlock>")]
pub struct ContentBlocks {
    blocks: Vec<ContentBlock>,
}

impl Default for ContentBlocks {
    fn default() -> Self {
        Self {
            blocks: vec![ContentBlock::empty_text()],
        }
    }
}

impl From<Vec<ContentBlock>> for ContentBlocks {
    fn from(blocks: Vec<ContentBlock>) -> Self {
        if blocks.is_empty() {
            return Self::default();
        }
        Self { blocks }
    }
}

impl From<ContentBlocks> for Vec<ContentBlock> {
    fn from(value: ContentBlocks) -> Self {
        value.blocks
    }
}

impl ContentBlocks {
    pub fn as_slice(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentBlock> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn get(&self, id: &str) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn add_block(&mut self, kind: BlockKind) -> &ContentBlock {
        self.blocks.push(ContentBlock::new(kind, ""));
        let last = self.blocks.len() - 1;
        &self.blocks[last]
    }

    /// Returns `false` if no block has this id.
    pub fn update_block(&mut self, id: &str, content: impl Into<String>) -> bool {
        match self.blocks.iter_mut().find(|b| b.id == id) {
            Some(block) => {
                block.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Removes a block. The last remaining block is cleared (and reset to
    /// text) instead of removed.
    pub fn delete_block(&mut self, id: &str) -> bool {
        let Some(pos) = self.blocks.iter().position(|b| b.id == id) else {
            return false;
        };

        if self.blocks.len() == 1 {
            let block = &mut self.blocks[pos];
            block.kind = BlockKind::Text;
            block.content.clear();
        } else {
            self.blocks.remove(pos);
        }
        true
    }
}

impl<'a> IntoIterator for &'a ContentBlocks {
    type Item = &'a ContentBlock;
    type IntoIter = std::slice::Iter<'a, ContentBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_vec_becomes_single_text_block() {
        let blocks = ContentBlocks::from(Vec::new());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks.as_slice()[0].kind, BlockKind::Text);
        assert_eq!(blocks.as_slice()[0].content, "");
    }

    #[test]
    fn add_and_update_block() {
        let mut blocks = ContentBlocks::default();
        let id = blocks.add_block(BlockKind::Video).id.clone();
        assert_eq!(blocks.len(), 2);

        assert!(blocks.update_block(&id, "https://www.youtube.com/embed/abc"));
        assert_eq!(
            blocks.get(&id).map(|b| b.content.as_str()),
            Some("https://www.youtube.com/embed/abc")
        );
        assert!(!blocks.update_block("missing", "ignored"));
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn deleting_last_block_clears_it() {
        let mut blocks = ContentBlocks::from(vec![ContentBlock::new(
            BlockKind::Image,
            "https://img.example/cat.png",
        )]);
        let id = blocks.as_slice()[0].id.clone();

        assert!(blocks.delete_block(&id));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks.as_slice()[0].id, id);
        assert_eq!(blocks.as_slice()[0].content, "");
        assert_eq!(blocks.as_slice()[0].kind, BlockKind::Text);

        // repeated deletes never empty the collection
        assert!(blocks.delete_block(&id));
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn delete_removes_one_of_many() {
        let mut blocks = ContentBlocks::default();
        let first = blocks.as_slice()[0].id.clone();
        let second = blocks.add_block(BlockKind::Link).id.clone();

        assert!(blocks.delete_block(&first));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks.as_slice()[0].id, second);
        assert!(!blocks.delete_block("nope"));
    }

    #[test]
    fn link_parts_split_description() {
        let link = ContentBlock::new(BlockKind::Link, "https://rust-lang.org - The Rust site");
        assert_eq!(link.link_parts(), ("https://rust-lang.org", Some("The Rust site")));

        let bare = ContentBlock::new(BlockKind::Link, "https://docs.rs");
        assert_eq!(bare.link_parts(), ("https://docs.rs", None));
    }

    #[test]
    fn serializes_with_type_key() {
        let block = ContentBlock {
            id: "b1".into(),
            kind: BlockKind::Text,
            content: "hello".into(),
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json, serde_json::json!({"id": "b1", "type": "text", "content": "hello"}));
    }
}
