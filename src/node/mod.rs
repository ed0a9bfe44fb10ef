//! Nodes of the remote directory tree
//!
//! A GET against any path of the API answers with one of two shapes:
//!
//! - a JSON array of child entries (a folder listing)
//! - a JSON object with `title` and `variables` (a table descriptor)
//!
//! The shape is decided once, in [`decode_node`], and carried as a [`Node`].

mod decoder;

pub use decoder::{decode_node, decode_payload};

use serde::Deserialize;

/// One vertex of the remote directory tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Folder(FolderListing),
    Table(TableDescriptor),
}

impl Node {
    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table(_))
    }

    pub fn as_folder(&self) -> Option<&FolderListing> {
        match self {
            Self::Folder(listing) => Some(listing),
            Self::Table(_) => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableDescriptor> {
        match self {
            Self::Folder(_) => None,
            Self::Table(table) => Some(table),
        }
    }
}

/// Ordered children of a folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderListing {
    pub children: Vec<ChildRef>,
}

impl FolderListing {
    pub fn new(children: Vec<ChildRef>) -> Self {
        Self { children }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Navigable id per child, `None` where the entry carried neither `id` nor `dbid`
    pub fn ids(&self) -> Vec<Option<&str>> {
        self.children.iter().map(|child| child.id.as_deref()).collect()
    }

    /// Navigable id of the child at `index`
    pub fn id_at(&self, index: usize) -> Option<&str> {
        self.children.get(index).and_then(|child| child.id.as_deref())
    }

    /// True if some navigable child has exactly this id
    pub fn contains_id(&self, id: &str) -> bool {
        self.children
            .iter()
            .any(|child| child.id.as_deref() == Some(id))
    }

    /// Indices of children that can be selected
    pub fn navigable_indices(&self) -> Vec<usize> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, child)| child.id.is_some())
            .map(|(index, _)| index)
            .collect()
    }
}

/// Reference to a child node inside a folder listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildRef {
    /// Path segment used to navigate to the child
    pub id: Option<String>,
    /// Human readable label, when the listing provides one
    pub text: Option<String>,
    /// Entry type as reported by the listing (`l` folder, `t` table)
    pub kind: Option<String>,
}

impl ChildRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Terminal node describing a queryable table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableDescriptor {
    pub title: String,
    pub variables: Vec<VariableDomain>,
}

/// The selectable values of one dimension of a table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDomain {
    /// Machine key
    pub code: String,
    /// Human label
    pub text: String,
    /// Machine codes
    pub values: Vec<String>,
    /// Human labels, index-aligned with `values`
    pub value_texts: Vec<String>,
}

impl VariableDomain {
    pub fn contains_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Position of the first label equal to `text`
    pub fn position_of_text(&self, text: &str) -> Option<usize> {
        self.value_texts.iter().position(|t| t == text)
    }
}
