// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Form extraction and value handling

use serde_json::Value;

use crate::dom::Element;
use crate::http::{Files, Params, UploadedFile};
use crate::uri;

/// A form located in a document, ready to be filled in and submitted
#[derive(Debug, Clone)]
pub struct Form {
    /// Form ID
    id: Option<String>,
    /// Form name
    name: Option<String>,
    /// HTTP method, uppercased
    method: String,
    /// Raw `action` attribute
    action: Option<String>,
    /// URI of the document the form was found in
    base_uri: String,
    fields: Vec<FormField>,
    files: Files,
}

/// A single form field
#[derive(Debug, Clone)]
pub struct FormField {
    /// Field name
    pub name: String,
    /// Field type (text, hidden, textarea, ...)
    pub field_type: String,
    /// Current value
    pub value: String,
}

impl Form {
    /// Extract a form from a `<form>` element. When `button` names the
    /// submit control used, its name/value pair is part of the submission.
    pub(crate) fn from_element(
        element: &Element,
        base_uri: &str,
        button: Option<&Element>,
    ) -> Self {
        let mut fields = Vec::new();

        for input in element.query_selector_all("input, textarea, select") {
            if input.has_attribute("disabled") {
                continue;
            }
            let Some(name) = input.get_attribute("name").filter(|n| !n.is_empty()) else {
                continue;
            };

            let field_type = input
                .get_attribute("type")
                .unwrap_or_else(|| match input.local_name() {
                    "textarea" => "textarea".to_string(),
                    "select" => "select".to_string(),
                    _ => "text".to_string(),
                })
                .to_lowercase();

            let value = match field_type.as_str() {
                "checkbox" | "radio" => {
                    if !input.has_attribute("checked") {
                        continue;
                    }
                    input.get_attribute("value").unwrap_or_else(|| "on".to_string())
                }
                "submit" | "button" | "image" | "reset" => {
                    // only the clicked control participates in the submission
                    match button {
                        Some(button) if button.node_id() == input.node_id() => {
                            input.get_attribute("value").unwrap_or_default()
                        }
                        _ => continue,
                    }
                }
                "file" => continue,
                "textarea" => input.text_content(),
                "select" => selected_option_value(&input),
                _ => input.get_attribute("value").unwrap_or_default(),
            };

            fields.push(FormField {
                name,
                field_type,
                value,
            });
        }

        // a clicked <button> contributes its name/value too
        if let Some(button) = button {
            if button.local_name() == "button" {
                if let Some(name) = button.get_attribute("name").filter(|n| !n.is_empty()) {
                    fields.push(FormField {
                        name,
                        field_type: "submit".to_string(),
                        value: button.get_attribute("value").unwrap_or_default(),
                    });
                }
            }
        }

        Self {
            id: element.id(),
            name: element.get_attribute("name"),
            method: element
                .get_attribute("method")
                .unwrap_or_else(|| "GET".to_string())
                .to_uppercase(),
            action: element.get_attribute("action"),
            base_uri: base_uri.to_string(),
            fields,
            files: Files::new(),
        }
    }

    /// Form ID
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Form name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Uppercased HTTP method
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Override the HTTP method
    pub fn set_method(&mut self, method: &str) {
        self.method = method.to_ascii_uppercase();
    }

    /// Raw `action` attribute
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// All fields in document order
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Current value of a field
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    /// Set a field value; unknown names are added as text fields
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(FormField {
                name: name.to_string(),
                field_type: "text".to_string(),
                value,
            }),
        }
    }

    /// Attach a file to a file input
    pub fn set_file(&mut self, name: &str, file: UploadedFile) {
        self.files.insert(name.to_string(), file);
    }

    /// Attached files
    pub fn files(&self) -> &Files {
        &self.files
    }

    /// The URI this form submits to. For non-body methods the field values
    /// are serialized into the query string.
    pub fn uri(&self) -> String {
        let uri = uri::resolve(self.action.as_deref().unwrap_or(""), &self.base_uri);
        if matches!(self.method.as_str(), "POST" | "PUT" | "DELETE" | "PATCH") {
            return uri;
        }

        let pairs: Vec<(String, String)> = self
            .fields
            .iter()
            .map(|field| (field.name.clone(), field.value.clone()))
            .collect();
        if pairs.is_empty() {
            return uri;
        }
        let query = crate::http::encode_pairs(&pairs);
        let separator = if uri.contains('?') { '&' } else { '?' };
        format!("{}{}{}", uri, separator, query)
    }

    /// Field values as request parameters (body methods)
    pub fn parameters(&self) -> Params {
        let mut params = Params::new();
        for field in &self.fields {
            params.insert(field.name.clone(), Value::String(field.value.clone()));
        }
        params
    }
}

fn selected_option_value(select: &Element) -> String {
    let options = select.query_selector_all("option");
    let chosen = options
        .iter()
        .find(|option| option.has_attribute("selected"))
        .or_else(|| options.first());
    match chosen {
        Some(option) => option
            .get_attribute("value")
            .unwrap_or_else(|| option.text_content().trim().to_string()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn form_from(html: &str) -> Form {
        let doc = parse_html(html);
        let element = doc.query_selector("form").unwrap();
        Form::from_element(&element, "http://www.example.com/app/page", None)
    }

    #[test]
    fn test_field_extraction() {
        let form = form_from(
            r#"
            <form action="/login" method="post">
                <input type="hidden" name="_token" value="abc123">
                <input type="text" name="username" value="kala">
                <input type="password" name="password">
                <input type="checkbox" name="remember" checked>
                <input type="checkbox" name="newsletter">
                <input type="radio" name="plan" value="free">
                <input type="radio" name="plan" value="pro" checked>
                <input type="text" name="ignored" disabled value="x">
                <textarea name="bio">hello</textarea>
                <select name="lang">
                    <option value="fi">Finnish</option>
                    <option value="en" selected>English</option>
                </select>
                <button type="submit">Log in</button>
            </form>
        "#,
        );

        assert_eq!(form.method(), "POST");
        assert_eq!(form.value("_token"), Some("abc123"));
        assert_eq!(form.value("username"), Some("kala"));
        assert_eq!(form.value("password"), Some(""));
        assert_eq!(form.value("remember"), Some("on"));
        assert_eq!(form.value("newsletter"), None);
        assert_eq!(form.value("plan"), Some("pro"));
        assert_eq!(form.value("ignored"), None);
        assert_eq!(form.value("bio"), Some("hello"));
        assert_eq!(form.value("lang"), Some("en"));
    }

    #[test]
    fn test_select_defaults_to_first_option() {
        let form = form_from(
            "<form><select name='x'><option value='a'>A</option><option value='b'>B</option></select></form>",
        );
        assert_eq!(form.value("x"), Some("a"));
    }

    #[test]
    fn test_submit_buttons_are_excluded_unless_clicked() {
        let doc = parse_html(
            "<form action='/go'>\
             <input type='submit' name='which' value='left'>\
             <input type='submit' name='which' value='right'>\
             </form>",
        );
        let element = doc.query_selector("form").unwrap();

        let form = Form::from_element(&element, "http://x/", None);
        assert_eq!(form.value("which"), None);

        let buttons = doc.query_selector_all("input[type=submit]");
        let form = Form::from_element(&element, "http://x/", Some(&buttons[1]));
        assert_eq!(form.value("which"), Some("right"));
    }

    #[test]
    fn test_set_value_merges_and_adds() {
        let mut form = form_from("<form><input type='text' name='a' value='1'></form>");
        form.set_value("a", "2");
        form.set_value("extra", "3");
        assert_eq!(form.value("a"), Some("2"));
        assert_eq!(form.value("extra"), Some("3"));
    }

    #[test]
    fn test_get_form_uri_carries_query() {
        let form = form_from(
            "<form action='/search'><input type='text' name='q' value='kala mari'></form>",
        );
        assert_eq!(form.method(), "GET");
        assert_eq!(form.uri(), "http://www.example.com/search?q=kala+mari");
    }

    #[test]
    fn test_empty_action_submits_to_document_uri() {
        let form = form_from("<form method='post'><input name='a' value='1'></form>");
        assert_eq!(form.uri(), "http://www.example.com/app/page");
    }

    #[test]
    fn test_post_parameters() {
        let form = form_from(
            "<form method='post'><input name='a' value='1'><input name='b' value='2'></form>",
        );
        let params = form.parameters();
        assert_eq!(params.get("a").and_then(|v| v.as_str()), Some("1"));
        assert_eq!(params.get("b").and_then(|v| v.as_str()), Some("2"));
    }
}
