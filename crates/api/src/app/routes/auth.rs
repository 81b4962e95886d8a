use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;

use worksphere_core::UserId;
use worksphere_workspace::{normalize_email, Signup};

use crate::app::dto::{self, UserView, WorkspaceView};
use crate::app::errors::ApiError;
use crate::app::routes::common::body;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub async fn signup(
    Extension(services): Extension<AppServices>,
    payload: Result<Json<dto::SignupRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = body(payload)?;
    let input = Signup::new(&req.email, &req.password, req.workspace_name.as_deref())?;
    let account = services.workspace.signup(input).await?;
    let token = issue(&services, account.user.id)?;

    Ok(Json(json!({
        "token": token,
        "user": UserView::from(&account.user),
        "defaultWorkspace": WorkspaceView::from(account.workspace),
    }))
    .into_response())
}

pub async fn login(
    Extension(services): Extension<AppServices>,
    payload: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = body(payload)?;
    let email = normalize_email(&req.email)?;
    let user = services.workspace.login(&email, &req.password).await?;
    let token = issue(&services, user.id)?;

    Ok(Json(json!({
        "token": token,
        "user": UserView::from(&user),
    }))
    .into_response())
}

fn issue(services: &AppServices, user: UserId) -> Result<String, ApiError> {
    services.tokens.issue(user, Utc::now()).map_err(ApiError::TokenSigning)
}
