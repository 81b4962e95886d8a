use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;

use worksphere_auth::RequestContext;
use worksphere_core::ExpenseId;

use crate::app::dto::{self, ExpenseView};
use crate::app::errors::ApiError;
use crate::app::routes::common::{body, scoped_id};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/:id", put(update_expense).delete(delete_expense))
}

pub async fn list_expenses(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, ApiError> {
    let expenses = services.workspace.list_expenses(&ctx).await?;
    let expenses: Vec<ExpenseView> = expenses.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "expenses": expenses })).into_response())
}

pub async fn create_expense(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<dto::CreateExpenseRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let draft = body(payload)?.into_draft(Utc::now());
    let expense = services.workspace.create_expense(&ctx, draft).await?;
    Ok(Json(json!({ "expense": ExpenseView::from(expense) })).into_response())
}

pub async fn update_expense(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    payload: Result<Json<dto::UpdateExpenseRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id: ExpenseId = scoped_id(&services.workspace, &ctx, &id, "expense").await?;
    let patch = body(payload)?.into();
    let expense = services.workspace.update_expense(&ctx, id, patch).await?;
    Ok(Json(json!({ "expense": ExpenseView::from(expense) })).into_response())
}

pub async fn delete_expense(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: ExpenseId = scoped_id(&services.workspace, &ctx, &id, "expense").await?;
    let expense = services.workspace.delete_expense(&ctx, id).await?;
    Ok(Json(json!({ "expense": ExpenseView::from(expense) })).into_response())
}
