// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Document representation

use std::sync::Arc;

use super::element::Element;
use super::node::{NodeData, NodeId, NodeType};
use super::selector::Selector;

/// A parsed, immutable HTML document
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Arc<Vec<NodeData>>,
    root: NodeId,
    document_element: Option<NodeId>,
    head: Option<NodeId>,
    body: Option<NodeId>,
    title: String,
}

impl Document {
    pub(crate) fn from_parts(
        nodes: Vec<NodeData>,
        root: NodeId,
        document_element: Option<NodeId>,
        head: Option<NodeId>,
        body: Option<NodeId>,
    ) -> Self {
        let mut doc = Self {
            nodes: Arc::new(nodes),
            root,
            document_element,
            head,
            body,
            title: String::new(),
        };
        if let Some(title) = doc.query_selector("title") {
            doc.title = title.text_content().trim().to_string();
        }
        doc
    }

    /// Document title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The `<html>` element
    pub fn document_element(&self) -> Option<Element> {
        self.document_element.map(|id| self.element(id))
    }

    /// The `<head>` element
    pub fn head(&self) -> Option<Element> {
        self.head.map(|id| self.element(id))
    }

    /// The `<body>` element
    pub fn body(&self) -> Option<Element> {
        self.body.map(|id| self.element(id))
    }

    /// Find the first element matching a selector
    pub fn query_selector(&self, selector: &str) -> Option<Element> {
        let selector = Selector::parse(selector).ok()?;
        self.find_matching(&selector, false).into_iter().next()
    }

    /// Find all elements matching a selector, in document order
    pub fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        Selector::parse(selector)
            .map(|selector| self.find_matching(&selector, true))
            .unwrap_or_default()
    }

    /// Get an element by its `id` attribute
    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        self.descendant_ids(self.root)
            .into_iter()
            .map(|node_id| self.element(node_id))
            .find(|element| element.get_attribute("id").as_deref() == Some(id))
    }

    /// All `<a>` elements carrying an `href`
    pub fn links(&self) -> Vec<Element> {
        self.query_selector_all("a[href]")
    }

    /// All `<form>` elements
    pub fn forms(&self) -> Vec<Element> {
        self.query_selector_all("form")
    }

    fn find_matching(&self, selector: &Selector, find_all: bool) -> Vec<Element> {
        let mut results = Vec::new();
        for id in self.descendant_ids(self.root) {
            let element = self.element(id);
            if selector.matches(&element) {
                results.push(element);
                if !find_all {
                    break;
                }
            }
        }
        results
    }

    /// Element-node ids of the subtree below `start`, in document order.
    fn descendant_ids(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements(start, &mut out);
        out
    }

    fn collect_elements(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[id.0].children {
            if self.nodes[child.0].node_type == NodeType::Element {
                out.push(child);
            }
            self.collect_elements(child, out);
        }
    }

    pub(crate) fn element(&self, id: NodeId) -> Element {
        Element::new(self.nodes.clone(), id)
    }
}
