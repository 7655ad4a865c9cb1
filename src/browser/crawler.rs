// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Read-only query facade over a response body
//!
//! Exposes links and forms by text or selector, and the meta-refresh
//! target the browser uses for HTML-level navigation.

use regex::Regex;

use super::form::Form;
use crate::dom::{parse_html, Document, Element};
use crate::http::Response;
use crate::uri;

/// A link located in a document, with its target resolved against the
/// document URI
#[derive(Debug, Clone)]
pub struct Link {
    uri: String,
}

impl Link {
    fn from_element(element: &Element, base_uri: &str) -> Self {
        let href = element.get_attribute("href").unwrap_or_default();
        Self {
            uri: uri::resolve(&href, base_uri),
        }
    }

    /// Absolute target URI
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Method used when clicking the link
    pub fn method(&self) -> &str {
        "GET"
    }
}

/// Query facade over one response body
#[derive(Debug, Clone)]
pub struct Crawler {
    uri: String,
    content_type: Option<String>,
    document: Document,
}

impl Crawler {
    /// Build a crawler for a response received from `uri`
    pub(crate) fn from_response(uri: &str, response: &Response) -> Self {
        Self {
            uri: uri.to_string(),
            content_type: response.content_type().map(str::to_string),
            document: parse_html(&response.text_lossy()),
        }
    }

    /// URI of the document
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The parsed document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Check if the response declared an HTML content type
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains("text/html") || ct.contains("application/xhtml"))
            .unwrap_or(false)
    }

    /// All elements matching a selector
    pub fn filter(&self, selector: &str) -> Vec<Element> {
        self.document.query_selector_all(selector)
    }

    /// All links, targets resolved against the document URI
    pub fn links(&self) -> Vec<Link> {
        self.document
            .links()
            .iter()
            .map(|element| Link::from_element(element, &self.uri))
            .collect()
    }

    /// Locate the first link whose id matches exactly, or whose text or
    /// image alt contains the given text
    pub fn select_link(&self, text: &str) -> Option<Link> {
        let needle = text.trim();
        self.document
            .links()
            .iter()
            .find(|element| link_matches(element, needle))
            .map(|element| Link::from_element(element, &self.uri))
    }

    /// All forms in the document
    pub fn forms(&self) -> Vec<Form> {
        self.document
            .forms()
            .iter()
            .map(|element| Form::from_element(element, &self.uri, None))
            .collect()
    }

    /// Locate the form owning the first submit control whose value, id,
    /// name or text matches the given text
    pub fn select_form(&self, button_text: &str) -> Option<Form> {
        let needle = button_text.trim();
        let buttons = self.document.query_selector_all(
            "input[type=submit], input[type=button], input[type=image], button",
        );
        for button in &buttons {
            if !button_matches(button, needle) {
                continue;
            }
            let mut ancestor = button.parent_element();
            while let Some(element) = ancestor {
                if element.local_name() == "form" {
                    return Some(Form::from_element(&element, &self.uri, Some(button)));
                }
                ancestor = element.parent_element();
            }
        }
        None
    }

    /// The target of a zero-timeout meta refresh in the document `<head>`,
    /// unresolved. `<noscript>` content inside the head counts as head.
    pub fn meta_refresh_uri(&self) -> Option<String> {
        let head = self.document.head()?;
        for meta in head.query_selector_all("meta[http-equiv=refresh i]") {
            if let Some(content) = meta.get_attribute("content") {
                if let Some(target) = parse_refresh_content(&content) {
                    return Some(target);
                }
            }
        }
        None
    }

    /// Document text content
    pub fn text(&self) -> String {
        self.document
            .body()
            .map(|body| body.text_content())
            .unwrap_or_default()
    }
}

fn link_matches(element: &Element, needle: &str) -> bool {
    if element.id().as_deref() == Some(needle) {
        return true;
    }
    if element.text_content().contains(needle) {
        return true;
    }
    element.query_selector_all("img").iter().any(|img| {
        img.get_attribute("alt")
            .map(|alt| alt.contains(needle))
            .unwrap_or(false)
    })
}

fn button_matches(element: &Element, needle: &str) -> bool {
    if element.get_attribute("value").as_deref() == Some(needle)
        || element.id().as_deref() == Some(needle)
        || element.get_attribute("name").as_deref() == Some(needle)
    {
        return true;
    }
    element.local_name() == "button" && element.text_content().contains(needle)
}

/// Parse a meta-refresh `content` attribute. Only a zero timeout
/// navigates; the target may be unquoted, single- or double-quoted, with
/// whitespace tolerated around `;` and `=`.
fn parse_refresh_content(content: &str) -> Option<String> {
    let pattern = Regex::new(
        r#"(?i)^\s*0\s*;\s*url\s*=\s*(?:'([^']+)'|"([^"]+)"|([^'"].*))"#,
    )
    .unwrap();
    let captures = pattern.captures(content)?;
    let target = captures
        .get(1)
        .or_else(|| captures.get(2))
        .or_else(|| captures.get(3))?
        .as_str()
        .trim_end();
    if target.is_empty() {
        None
    } else {
        Some(target.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;

    fn crawler(html: &str) -> Crawler {
        let response = Response::new(200, vec![("Content-Type", "text/html")], html.to_string());
        Crawler::from_response("http://www.example.com/app/page", &response)
    }

    #[test]
    fn test_links_are_resolved() {
        let c = crawler("<a href='next'>Next</a><a href='/root'>Root</a>");
        let links = c.links();
        assert_eq!(links[0].uri(), "http://www.example.com/app/next");
        assert_eq!(links[1].uri(), "http://www.example.com/root");
        assert_eq!(links[0].method(), "GET");
    }

    #[test]
    fn test_select_link_by_text_alt_and_id() {
        let c = crawler(
            "<a href='/a'>Sign in</a>\
             <a href='/b'><img alt='Company logo'></a>\
             <a href='/c' id='help-link'>?</a>",
        );
        assert_eq!(c.select_link("Sign in").unwrap().uri(), "http://www.example.com/a");
        assert_eq!(c.select_link("logo").unwrap().uri(), "http://www.example.com/b");
        assert_eq!(c.select_link("help-link").unwrap().uri(), "http://www.example.com/c");
        assert!(c.select_link("missing").is_none());
    }

    #[test]
    fn test_select_link_takes_first_match() {
        let c = crawler("<a href='/first'>Read more</a><a href='/second'>Read more</a>");
        assert_eq!(c.select_link("Read more").unwrap().uri(), "http://www.example.com/first");
    }

    #[test]
    fn test_select_form_by_button() {
        let c = crawler(
            "<form action='/login' method='post'>\
             <input type='text' name='user'>\
             <button type='submit' name='op' value='go'>Log in</button>\
             </form>",
        );
        let form = c.select_form("Log in").unwrap();
        assert_eq!(form.method(), "POST");
        assert_eq!(form.value("op"), Some("go"));
        assert!(c.select_form("Sign up").is_none());
    }

    #[test]
    fn test_select_form_by_input_value() {
        let c = crawler(
            "<form action='/x'><input type='submit' name='go' value='Search'></form>",
        );
        let form = c.select_form("Search").unwrap();
        assert_eq!(form.value("go"), Some("Search"));
    }

    #[test]
    fn test_meta_refresh_zero_timeout() {
        let c = crawler(
            "<html><head><meta http-equiv=\"refresh\" content=\"0;URL=http://www.example.com/redirected\"/></head></html>",
        );
        assert_eq!(
            c.meta_refresh_uri().as_deref(),
            Some("http://www.example.com/redirected")
        );
    }

    #[test]
    fn test_meta_refresh_quoting_and_whitespace() {
        for content in [
            "0; URL='/single'",
            "0 ;url = \"/single\"",
            "  0;  Url=/single",
        ] {
            let html = format!(
                "<head><meta http-equiv='Refresh' content=\"{}\"></head>",
                content.replace('"', "&quot;")
            );
            let c = crawler(&html);
            assert_eq!(c.meta_refresh_uri().as_deref(), Some("/single"), "{}", content);
        }
    }

    #[test]
    fn test_meta_refresh_nonzero_timeout_is_ignored() {
        let c = crawler(
            "<head><meta http-equiv='refresh' content='4; URL=/later'></head>",
        );
        assert!(c.meta_refresh_uri().is_none());
    }

    #[test]
    fn test_meta_refresh_in_body_is_ignored() {
        let c = crawler(
            "<html><head></head><body><meta http-equiv='refresh' content='0; URL=/x'></body></html>",
        );
        assert!(c.meta_refresh_uri().is_none());
    }

    #[test]
    fn test_meta_refresh_inside_noscript_in_head() {
        let c = crawler(
            "<html><head><noscript><meta http-equiv='refresh' content='0; URL=/fallback'></noscript></head></html>",
        );
        assert_eq!(c.meta_refresh_uri().as_deref(), Some("/fallback"));
    }

    #[test]
    fn test_parse_refresh_content_grammar() {
        assert_eq!(parse_refresh_content("0;URL=/x"), Some("/x".to_string()));
        assert_eq!(parse_refresh_content("0; url = '/x'"), Some("/x".to_string()));
        assert_eq!(parse_refresh_content("0;URL=\"/x\""), Some("/x".to_string()));
        assert_eq!(parse_refresh_content("5;URL=/x"), None);
        assert_eq!(parse_refresh_content("0"), None);
        assert_eq!(parse_refresh_content("0;"), None);
        assert_eq!(parse_refresh_content("0;URL="), None);
    }
}
