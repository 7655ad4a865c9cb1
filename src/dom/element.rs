// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Element accessor type

use std::collections::BTreeMap;
use std::sync::Arc;

use super::node::{NodeData, NodeId, NodeType};
use super::selector::Selector;

/// A handle to an element node of a parsed document
#[derive(Debug, Clone)]
pub struct Element {
    nodes: Arc<Vec<NodeData>>,
    id: NodeId,
}

impl Element {
    pub(crate) fn new(nodes: Arc<Vec<NodeData>>, id: NodeId) -> Self {
        Self { nodes, id }
    }

    pub(crate) fn node_id(&self) -> NodeId {
        self.id
    }

    fn data(&self) -> &NodeData {
        &self.nodes[self.id.0]
    }

    /// Lowercase tag name
    pub fn local_name(&self) -> &str {
        self.data().tag_name.as_deref().unwrap_or_default()
    }

    /// The `id` attribute
    pub fn id(&self) -> Option<String> {
        self.get_attribute("id")
    }

    /// Get an attribute value
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.data().attributes.get(name).cloned()
    }

    /// Check if the element carries an attribute
    pub fn has_attribute(&self, name: &str) -> bool {
        self.data().attributes.contains_key(name)
    }

    /// All attributes
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.data().attributes
    }

    /// Concatenated text of the subtree
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(self.id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let data = &self.nodes[id.0];
        if data.node_type == NodeType::Text {
            if let Some(ref text) = data.text {
                out.push_str(text);
            }
        }
        for &child in &data.children {
            self.collect_text(child, out);
        }
    }

    /// Parent element, if any
    pub fn parent_element(&self) -> Option<Element> {
        let mut current = self.data().parent;
        while let Some(id) = current {
            let data = &self.nodes[id.0];
            if data.node_type == NodeType::Element {
                return Some(Element::new(self.nodes.clone(), id));
            }
            current = data.parent;
        }
        None
    }

    /// Child elements
    pub fn children(&self) -> Vec<Element> {
        self.data()
            .children
            .iter()
            .filter(|&&child| self.nodes[child.0].node_type == NodeType::Element)
            .map(|&child| Element::new(self.nodes.clone(), child))
            .collect()
    }

    /// All descendant elements in document order
    pub fn descendants(&self) -> Vec<Element> {
        let mut ids = Vec::new();
        self.collect_descendants(self.id, &mut ids);
        ids.into_iter()
            .map(|id| Element::new(self.nodes.clone(), id))
            .collect()
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[id.0].children {
            if self.nodes[child.0].node_type == NodeType::Element {
                out.push(child);
            }
            self.collect_descendants(child, out);
        }
    }

    /// Find all matching elements in the subtree
    pub fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.descendants()
            .into_iter()
            .filter(|element| selector.matches(element))
            .collect()
    }

    /// Find the first matching element in the subtree
    pub fn query_selector(&self, selector: &str) -> Option<Element> {
        self.query_selector_all(selector).into_iter().next()
    }
}
