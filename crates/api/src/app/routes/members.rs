use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;

use worksphere_auth::RequestContext;
use worksphere_core::UserId;

use crate::app::dto::{self, MemberView};
use crate::app::errors::ApiError;
use crate::app::routes::common::{body, scoped_id};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_members))
        .route("/invite", post(invite_member))
        .route("/decision", post(decide_invitation))
        .route("/:user_id", delete(remove_member))
}

pub async fn list_members(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, ApiError> {
    let members = services.workspace.list_members(&ctx).await?;
    let members: Vec<MemberView> = members.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "members": members })).into_response())
}

pub async fn invite_member(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<dto::InviteRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = body(payload)?;
    let member = services
        .workspace
        .invite_member(&ctx, &req.email, req.role.as_deref())
        .await?;
    Ok(Json(json!({ "member": MemberView::from(member) })).into_response())
}

pub async fn decide_invitation(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<dto::DecisionRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = body(payload)?;
    let user_id: UserId = scoped_id(&services.workspace, &ctx, &req.user_id, "member").await?;
    let member = services.workspace.decide_invitation(&ctx, user_id, &req.decision).await?;
    Ok(Json(json!({ "member": MemberView::from(member) })).into_response())
}

pub async fn remove_member(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    let user_id: UserId = scoped_id(&services.workspace, &ctx, &user_id, "member").await?;
    let member = services.workspace.remove_member(&ctx, user_id).await?;
    Ok(Json(json!({ "member": MemberView::from(member) })).into_response())
}
