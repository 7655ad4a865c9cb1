// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Read-only DOM for HTML query support
//!
//! A lightweight document model built on top of html5ever. The browser
//! only queries parsed documents (links, forms, meta tags); there is no
//! mutation API.

mod document;
mod element;
mod node;
mod parser;
mod selector;

pub use document::Document;
pub use element::Element;
pub use node::{NodeId, NodeType};
pub use parser::parse_html;
pub use selector::Selector;
