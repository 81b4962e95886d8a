use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;

use worksphere_auth::RequestContext;
use worksphere_core::WorkspaceId;

use crate::app::dto::{self, MembershipView, WorkspaceView};
use crate::app::errors::ApiError;
use crate::app::routes::common::body;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_workspaces).post(create_workspace))
        .route("/switch", post(switch_workspace))
        .route("/:id", delete(delete_workspace))
}

pub async fn list_workspaces(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, ApiError> {
    let workspaces = services.workspace.list_workspaces(&ctx).await?;
    let workspaces: Vec<MembershipView> = workspaces.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "workspaces": workspaces })).into_response())
}

pub async fn create_workspace(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<dto::CreateWorkspaceRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = body(payload)?;
    let workspace = services.workspace.create_workspace(&ctx, &req.name).await?;
    Ok(Json(json!({ "workspace": WorkspaceView::from(workspace) })).into_response())
}

/// Validates the requested workspace and echoes it back.
pub async fn switch_workspace(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, ApiError> {
    let active = services.workspace.switch_workspace(&ctx).await?;
    Ok(Json(json!({ "activeWorkspace": MembershipView::from(active) })).into_response())
}

pub async fn delete_workspace(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: WorkspaceId = id.parse().map_err(|_| ApiError::not_found("workspace"))?;
    let workspace = services.workspace.delete_workspace(&ctx, id).await?;
    Ok(Json(json!({ "workspace": WorkspaceView::from(workspace) })).into_response())
}
