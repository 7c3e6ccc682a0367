//! Per-endpoint CORS headers and method dispatch

use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue, Method,
    },
    response::Response,
};

/// The four task endpoints, each bound to exactly one verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Add,
    Fetch,
    Update,
    Delete,
}

/// What an endpoint should do with an incoming verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Preflight,
    Execute,
    Reject,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Add => "/add",
            Endpoint::Fetch => "/fetch",
            Endpoint::Update => "/update",
            Endpoint::Delete => "/delete",
        }
    }

    /// The verb this endpoint executes
    pub fn method(self) -> Method {
        match self {
            Endpoint::Add => Method::POST,
            Endpoint::Fetch => Method::GET,
            Endpoint::Update => Method::PUT,
            Endpoint::Delete => Method::DELETE,
        }
    }

    fn allowed_methods(self) -> HeaderValue {
        HeaderValue::from_static(match self {
            Endpoint::Add => "POST",
            Endpoint::Fetch => "GET",
            Endpoint::Update => "PUT",
            Endpoint::Delete => "DELETE",
        })
    }

    /// Decide how to handle `method`
    pub fn dispatch(self, method: &Method) -> Dispatch {
        if method == Method::OPTIONS {
            Dispatch::Preflight
        } else if *method == self.method() {
            Dispatch::Execute
        } else {
            Dispatch::Reject
        }
    }

    /// Stamp the CORS headers onto a finished response
    pub fn with_cors(self, mut response: Response) -> Response {
        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allowed_methods());
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
        response
    }
}
