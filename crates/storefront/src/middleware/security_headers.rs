//! Security headers middleware.
//!
//! Everything is locked down except the two third-party origins the site
//! shows: the Unsplash hero image and the Google Maps embed on the contact
//! page. `Cross-Origin-Embedder-Policy` is left unset because neither origin
//! sends CORP headers.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

/// Content Security Policy applied to every response.
pub const CONTENT_SECURITY_POLICY_VALUE: &str = "default-src 'none'; \
     script-src 'self'; \
     style-src 'self'; \
     font-src 'self'; \
     img-src 'self' https://images.unsplash.com; \
     connect-src 'self'; \
     frame-src https://www.google.com; \
     object-src 'none'; \
     base-uri 'self'; \
     form-action 'self'; \
     frame-ancestors 'none'";

const PERMISSIONS_POLICY_VALUE: &str = "camera=(), \
     microphone=(), \
     geolocation=(), \
     payment=(), \
     usb=(), \
     interest-cohort=()";

/// Cache policy for responses that did not set one.
///
/// Hashed stylesheets under `/static/css/derived/` never change, other
/// static files are revalidated, and pages are never stored.
#[must_use]
pub fn default_cache_control(path: &str) -> HeaderValue {
    if path.starts_with("/static/css/derived/") {
        HeaderValue::from_static("public, max-age=31536000, immutable")
    } else if path.starts_with("/static/") {
        HeaderValue::from_static("no-cache")
    } else {
        HeaderValue::from_static("no-store")
    }
}

/// Add security headers to all responses.
///
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: strict-origin-when-cross-origin` (the map embed needs an origin)
/// - `Content-Security-Policy` (see [`CONTENT_SECURITY_POLICY_VALUE`])
/// - `Permissions-Policy`
/// - `Cache-Control` from [`default_cache_control`] unless already set
/// - `Cross-Origin-Opener-Policy: same-origin`
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let cache_control = default_cache_control(request.uri().path());
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY_VALUE),
    );
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(PERMISSIONS_POLICY_VALUE),
    );
    headers
        .entry(CACHE_CONTROL)
        .or_insert(cache_control);
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_are_not_stored() {
        assert_eq!(default_cache_control("/"), "no-store");
        assert_eq!(default_cache_control("/cart"), "no-store");
        assert_eq!(default_cache_control("/staticky"), "no-store");
    }

    #[test]
    fn test_hashed_stylesheets_are_immutable() {
        assert_eq!(
            default_cache_control("/static/css/derived/main.0123abcd.css"),
            "public, max-age=31536000, immutable"
        );
        assert_eq!(default_cache_control("/static/css/main.css"), "no-cache");
    }
}
