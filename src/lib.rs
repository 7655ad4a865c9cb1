// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Mustekala - Scripted HTTP Browser
//!
//! A headless, render-free browser for integration testing and scripted
//! navigation. Drives an HTTP-level dialogue against a server while
//! emulating the browser behaviours that matter to test suites and
//! crawlers; no JavaScript engine, no layout, no rendering.
//!
//! ## Features
//!
//! - URL resolution against the current page (absolute, scheme-relative,
//!   path-relative, fragment-only, query-only)
//! - Cookie jar with RFC 6265 scoping, expiry and secure-only gating
//! - Redirect following with method-demotion rules and a redirect limit
//! - Meta-refresh navigation (zero-timeout, head-scoped)
//! - Back/forward history that skips internally generated redirect hops
//! - Link clicking and form submission straight from parsed HTML
//! - Injectable transport: swap the reqwest adapter for a test double
//!
//! ## Example
//!
//! ```rust,no_run
//! use mustekala::{Browser, ServerParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut browser = Browser::new()?;
//!
//!     browser.get("https://example.com/login").await?;
//!     browser
//!         .submit_form(
//!             "Log in",
//!             &[("username", "kala"), ("password", "hunter2")],
//!             None,
//!             ServerParams::new(),
//!         )
//!         .await?;
//!
//!     browser.click_link("My account").await?;
//!     println!("landed on {}", browser.current_uri().unwrap_or("nowhere"));
//!
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod dom;
pub mod error;
pub mod http;
pub mod uri;

// Re-exports for convenience

// Browser
pub use browser::{Browser, BrowserConfig, Crawler, Form, FormField, History, Link};

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{
    Cookie, CookieJar, Files, HttpTransport, Params, Request, Response, SameSite, ServerParams,
    Transport, TransportConfig, UploadedFile, DEFAULT_USER_AGENT,
};

// DOM
pub use dom::{Document, Element};

/// Mustekala version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
