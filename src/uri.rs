// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Absolute URI resolution
//!
//! Resolves a reference against a base URI the way a browser address bar
//! does. Works on the string level: an already-absolute reference is
//! returned verbatim, without any normalisation.

/// Resolve a reference against an absolute base URI.
///
/// Handles the four relative reference kinds: scheme-relative (`//host/x`),
/// fragment-only (`#x`), query-only (`?x`), path-absolute (`/x`) and
/// path-relative (`x`, `x/y`). An empty reference yields the base itself.
pub fn resolve(reference: &str, base: &str) -> String {
    if reference.is_empty() {
        return base.to_string();
    }

    if is_absolute(reference) {
        return reference.to_string();
    }

    // protocol-relative: inherit the base scheme only
    if reference.starts_with("//") && !reference.trim_matches('/').is_empty() {
        return format!("{}:{}", scheme(base).unwrap_or("http"), reference);
    }

    if reference.starts_with('#') {
        return format!("{}{}", strip_fragment(base), reference);
    }

    if reference.starts_with('?') {
        return format!("{}{}", strip_query(base), reference);
    }

    let authority = scheme_and_authority(base);

    if reference.starts_with('/') {
        return format!("{}{}", authority, reference);
    }

    // merge against the directory of the base path: everything after the
    // last slash of the base path is dropped
    let path = base_path(base);
    let directory = match path.rfind('/') {
        Some(idx) => &path[..=idx],
        None => "/",
    };

    format!("{}{}{}", authority, directory, reference)
}

/// Check whether a URI carries an RFC-3986 scheme followed by an authority.
pub fn is_absolute(uri: &str) -> bool {
    match uri.find("://") {
        Some(idx) if idx > 0 => {
            let scheme = &uri[..idx];
            let mut chars = scheme.chars();
            chars
                .next()
                .map(|c| c.is_ascii_alphabetic())
                .unwrap_or(false)
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// Extract the scheme of an absolute URI.
pub fn scheme(uri: &str) -> Option<&str> {
    if is_absolute(uri) {
        uri.find("://").map(|idx| &uri[..idx])
    } else {
        None
    }
}

/// Extract `host[:port]` from an absolute URI, without userinfo.
pub fn host_with_port(uri: &str) -> Option<&str> {
    let start = uri.find("://")? + 3;
    let rest = &uri[start..];
    let end = rest
        .find(|c| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let authority = &rest[..end];
    let host = match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    };
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// The `scheme://authority` prefix of an absolute URI.
fn scheme_and_authority(uri: &str) -> &str {
    match uri.find("://") {
        Some(idx) => {
            let rest = &uri[idx + 3..];
            let end = rest
                .find(|c| matches!(c, '/' | '?' | '#'))
                .unwrap_or(rest.len());
            &uri[..idx + 3 + end]
        }
        None => uri,
    }
}

/// The path component of an absolute URI, `/` when empty.
fn base_path(uri: &str) -> &str {
    let prefix = scheme_and_authority(uri);
    let rest = &uri[prefix.len()..];
    let end = rest
        .find(|c| matches!(c, '?' | '#'))
        .unwrap_or(rest.len());
    let path = &rest[..end];
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

fn strip_fragment(uri: &str) -> &str {
    match uri.find('#') {
        Some(idx) => &uri[..idx],
        None => uri,
    }
}

fn strip_query(uri: &str) -> &str {
    match uri.find(|c| matches!(c, '?' | '#')) {
        Some(idx) => &uri[..idx],
        None => uri,
    }
}
