//! Loaded content collections.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field map of one directory-backed item
pub type ContentItem = Map<String, Value>;

/// A named category of items, backed by a directory or a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentType {
    /// Directory name, or JSON file name without `.json`
    #[serde(rename = "type")]
    pub name: String,

    /// Items in load order. Directory-backed items are always objects;
    /// file-backed items are whatever the JSON file holds.
    pub items: Vec<Value>,
}

impl ContentType {
    /// Create a content type
    pub fn new(name: impl Into<String>, items: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    /// Find a directory-backed item by its slug
    pub fn item(&self, slug: &str) -> Option<&ContentItem> {
        self.items.iter().find_map(|item| {
            let fields = item.as_object()?;
            (fields.get("slug").and_then(Value::as_str) == Some(slug)).then_some(fields)
        })
    }

    /// Slugs of all items that carry one, in item order
    pub fn slugs(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| item.get("slug").and_then(Value::as_str))
            .collect()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the type has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
