use axum::{
    body::Body,
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// HTTP header name carrying the session ID
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Extension type identifying the caller's cart session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Creates a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the UUID as a string
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Middleware that resolves the caller's session ID and makes it available to
/// handlers through request extensions. The resolved ID is echoed back on the
/// response so new clients can keep their session on subsequent requests.
///
/// If the incoming request carries a valid `x-session-id` header, it is used.
/// Otherwise a new UUID v4 session is started.
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let session_id = request
        .headers()
        .get(SESSION_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(SessionId)
        .unwrap_or_else(SessionId::new);

    request.extensions_mut().insert(session_id);

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&session_id.as_str()) {
        response
            .headers_mut()
            .insert(SESSION_ID_HEADER, header_value);
    }

    response
}

/// Helper function to create a tracing span carrying the session ID
pub fn make_span_with_session_id(request: &Request<Body>) -> tracing::Span {
    let session_id = request
        .extensions()
        .get::<SessionId>()
        .map(|id| id.as_str())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        session_id = %session_id,
    )
}
