use super::jwt::JwtAuth;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

/// Extract the bearer token from the Authorization header
fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
}

/// State for the role-gate middleware: the token verifier plus the
/// allowed-role set declared for a route group.
#[derive(Clone)]
pub struct RoleGate {
    auth: JwtAuth,
    allowed: &'static [&'static str],
}

impl RoleGate {
    pub fn new(auth: JwtAuth, allowed: &'static [&'static str]) -> Self {
        Self { auth, allowed }
    }
}

/// Authorization gate middleware.
///
/// Per request: no bearer token -> 401; token verification failure ->
/// 401 carrying the verifier's message; role outside the allowed set ->
/// 403. On success the decoded claims are attached to request
/// extensions and the request passes through. Never touches persisted
/// state.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware, routing::get};
/// use axum_helpers::{RoleGate, role_gate};
///
/// let admin_routes = Router::new()
///     .route("/", get(list_users))
///     .route_layer(middleware::from_fn_with_state(
///         RoleGate::new(jwt_auth, &["admin"]),
///         role_gate,
///     ));
/// ```
pub async fn role_gate(
    State(gate): State<RoleGate>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let token = match extract_bearer(&headers) {
        Some(t) => t,
        None => {
            tracing::debug!("No bearer token in Authorization header");
            return Err((
                StatusCode::UNAUTHORIZED,
                "Token is not provided".to_string(),
            ));
        }
    };

    let claims = match gate.auth.verify_token(&token) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("Token verification failed: {}", e);
            return Err((StatusCode::UNAUTHORIZED, format!("Invalid token: {}", e)));
        }
    };

    if !gate.allowed.contains(&claims.role.as_str()) {
        tracing::debug!(role = %claims.role, "Role not permitted for this route");
        return Err((StatusCode::FORBIDDEN, "Role not permitted".to_string()));
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::config::JwtConfig;
    use crate::auth::jwt::JwtClaims;
    use axum::{Extension, Router, body::Body, http, middleware, routing::get};
    use tower::ServiceExt;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("unit-test-secret-of-at-least-32-chars"))
    }

    async fn whoami(Extension(claims): Extension<JwtClaims>) -> String {
        format!("{}:{}", claims.sub, claims.role)
    }

    fn app(allowed: &'static [&'static str]) -> Router {
        Router::new()
            .route("/", get(whoami))
            .route_layer(middleware::from_fn_with_state(
                RoleGate::new(auth(), allowed),
                role_gate,
            ))
    }

    fn request(token: Option<&str>) -> http::Request<Body> {
        let mut builder = http::Request::builder().uri("/");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_token_is_401() {
        let response = app(&["admin"]).oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_is_401() {
        let response = app(&["admin"])
            .oneshot(request(Some("not.a.jwt")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_role_is_403() {
        let token = auth().create_access_token("1", "user").unwrap();
        let response = app(&["admin"])
            .oneshot(request(Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_allowed_role_passes_with_claims_attached() {
        let token = auth().create_access_token("1", "admin").unwrap();
        let response = app(&["admin", "super-admin"])
            .oneshot(request(Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"1:admin");
    }
}
