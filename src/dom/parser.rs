// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML parser using html5ever

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use super::document::Document;
use super::node::{NodeData, NodeId};

/// Parse an HTML string into a Document.
///
/// html5ever is lossy and never fails; malformed markup produces a
/// best-effort tree.
pub fn parse_html(html: &str) -> Document {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            // parse <noscript> content as elements, not raw text
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .unwrap();

    let mut builder = DomBuilder::new();
    let root = builder.push(NodeData::document());
    for child in dom.document.children.borrow().iter() {
        builder.convert(child, root);
    }

    builder.finish(root)
}

/// Converts the html5ever DOM into the arena
struct DomBuilder {
    nodes: Vec<NodeData>,
}

impl DomBuilder {
    fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(data);
        id
    }

    fn convert(&mut self, handle: &Handle, parent: NodeId) {
        let data = match handle.data {
            RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => return,
            RcNodeData::Doctype { .. } => {
                let mut data = NodeData::document();
                data.node_type = super::node::NodeType::DocumentType;
                data
            }
            RcNodeData::Text { ref contents } => {
                let text = contents.borrow().to_string();
                // skip whitespace-only text nodes
                if text.trim().is_empty() {
                    return;
                }
                NodeData::text(text)
            }
            RcNodeData::Comment { ref contents } => NodeData::comment(contents.to_string()),
            RcNodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let mut data = NodeData::element(&name.local.to_string());
                for attr in attrs.borrow().iter() {
                    data.attributes
                        .insert(attr.name.local.to_string(), attr.value.to_string());
                }
                data
            }
        };

        let mut data = data;
        data.parent = Some(parent);
        let id = self.push(data);
        self.nodes[parent.0].children.push(id);

        for child in handle.children.borrow().iter() {
            self.convert(child, id);
        }
    }

    fn finish(self, root: NodeId) -> Document {
        let mut document_element = None;
        let mut head = None;
        let mut body = None;

        for &child in &self.nodes[root.0].children {
            if self.nodes[child.0].tag_name.as_deref() == Some("html") {
                document_element = Some(child);
                for &grandchild in &self.nodes[child.0].children {
                    match self.nodes[grandchild.0].tag_name.as_deref() {
                        Some("head") => head = Some(grandchild),
                        Some("body") => body = Some(grandchild),
                        _ => {}
                    }
                }
            }
        }

        Document::from_parts(self.nodes, root, document_element, head, body)
    }
}
