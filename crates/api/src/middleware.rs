use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use worksphere_auth::{AccessError, JwtValidator, RequestContext};
use worksphere_infra::WorkspaceService;

use crate::app::errors::ApiError;
use crate::context::{workspace_selector, CurrentUser};

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
    pub service: WorkspaceService,
}

/// Bearer authentication for every protected route.
///
/// A token is accepted only if it verifies, is inside its validity window and
/// names a user that still exists. The request then carries an explicit
/// `RequestContext` (user + requested workspace) for the handlers.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers()).ok_or(AccessError::Unauthenticated)?;

    let claims = state.jwt.validate(token, Utc::now()).map_err(|e| {
        tracing::debug!(error = %e, "bearer token rejected");
        AccessError::Unauthenticated
    })?;
    let user = state.service.authenticate(claims.sub).await?;

    let ctx = RequestContext::new(Some(user.id), workspace_selector(req.headers(), req.uri()));
    req.extensions_mut().insert(ctx);
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Log one line per request with its outcome.
pub async fn request_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = std::time::Instant::now();

    let response = next.run(req).await;
    tracing::info!(
        %method,
        path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
