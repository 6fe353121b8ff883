//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network — the host (browser shell, native app, test
//! harness) is responsible for executing the actual I/O, and for side effects
//! such as navigating to the login page.
//!
//! All fields use owned types (`String`, `Vec`) so values can be handed to
//! any host without lifetime concerns.

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
}

/// An HTTP request described as plain data.
///
/// Built by `ProfileClient::build_*` methods. The host is responsible for
/// executing this request against the network and returning the
/// corresponding `HttpResponse`.
///
/// `credentials` marks requests that must carry the caller's session —
/// the host attaches its session cookie when set, the equivalent of a
/// browser fetch with `credentials: 'include'`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub credentials: bool,
}

/// An HTTP response described as plain data.
///
/// Constructed by the host after executing an `HttpRequest`, then passed
/// to `ProfileClient::parse_*` methods for deserialization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
