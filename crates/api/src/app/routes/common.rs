use core::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use worksphere_auth::RequestContext;
use worksphere_infra::WorkspaceService;

use crate::app::errors::ApiError;

/// Unwrap a JSON body, turning a rejection into `BAD_REQUEST`.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(ApiError::from)
}

/// Parse a path id inside the active workspace.
///
/// A malformed id is reported as a missing `kind`, but only once the
/// workspace context itself has resolved.
pub async fn scoped_id<T: FromStr>(
    service: &WorkspaceService,
    ctx: &RequestContext,
    raw: &str,
    kind: &'static str,
) -> Result<T, ApiError> {
    match raw.parse::<T>() {
        Ok(id) => Ok(id),
        Err(_) => {
            service.active_workspace(ctx).await?;
            Err(ApiError::not_found(kind))
        }
    }
}
