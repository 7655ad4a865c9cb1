// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Arena node storage

use std::collections::BTreeMap;

/// Index of a node in the document arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

/// Node type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Document,
    DocumentType,
    Element,
    Text,
    Comment,
}

/// Stored node data
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub node_type: NodeType,
    /// Lowercase tag name for element nodes
    pub tag_name: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
}

impl NodeData {
    pub fn document() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
            tag_name: None,
            attributes: BTreeMap::new(),
            text: None,
        }
    }

    pub fn element(tag_name: &str) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Element,
            tag_name: Some(tag_name.to_ascii_lowercase()),
            attributes: BTreeMap::new(),
            text: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Text,
            tag_name: None,
            attributes: BTreeMap::new(),
            text: Some(content.into()),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Comment,
            tag_name: None,
            attributes: BTreeMap::new(),
            text: Some(content.into()),
        }
    }
}
