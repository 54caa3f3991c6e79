//! Permissive CORS for the browser-side contact form.
//!
//! The relay is called straight from the portfolio page, so every response
//! (preflight, success and error alike) carries the same fixed headers.

use axum::{
    extract::Request,
    http::{
        HeaderValue,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
    middleware::Next,
    response::Response,
};

/// Origins allowed to call the relay.
pub const ALLOW_ORIGIN: &str = "*";

/// Request headers the browser may send.
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type, \
    x-supabase-client-platform, x-supabase-client-platform-version, \
    x-supabase-client-runtime, x-supabase-client-runtime-version";

/// Methods the relay answers.
pub const ALLOW_METHODS: &str = "POST, OPTIONS";

/// Add the CORS headers to every response.
pub async fn cors_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_headers_is_one_line() {
        // Continuation escapes must not leave newlines in the header value
        assert!(!ALLOW_HEADERS.contains('\n'));
        assert!(ALLOW_HEADERS.starts_with("authorization, x-client-info, apikey, content-type"));
        assert!(ALLOW_HEADERS.ends_with("x-supabase-client-runtime-version"));
        assert!(HeaderValue::from_str(ALLOW_HEADERS).is_ok());
    }
}
