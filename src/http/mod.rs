// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for the Mustekala browser
//!
//! Value types for requests and responses, the cookie jar, and the
//! transport adapter that turns an internal request into a wire call.

mod cookie;
mod request;
mod response;
mod transport;

pub use cookie::{Cookie, CookieJar, SameSite};
pub(crate) use request::encode_pairs;
pub use request::{Files, Params, Request, ServerParams, UploadedFile};
pub use response::Response;
pub use transport::{HttpTransport, Transport, TransportConfig};

/// Default user agent product token
pub const DEFAULT_USER_AGENT: &str = "Mustekala/0.3";
