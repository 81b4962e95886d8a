use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use worksphere_auth::RequestContext;
use worksphere_core::NoteId;

use crate::app::dto::{self, NoteView};
use crate::app::errors::ApiError;
use crate::app::routes::common::{body, scoped_id};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route("/:id", get(get_note).put(update_note).delete(delete_note))
}

pub async fn list_notes(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, ApiError> {
    let notes = services.workspace.list_notes(&ctx).await?;
    let notes: Vec<NoteView> = notes.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "notes": notes })).into_response())
}

pub async fn get_note(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: NoteId = scoped_id(&services.workspace, &ctx, &id, "note").await?;
    let note = services.workspace.get_note(&ctx, id).await?;
    Ok(Json(json!({ "note": NoteView::from(note) })).into_response())
}

pub async fn create_note(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<dto::CreateNoteRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let draft = body(payload)?.into();
    let note = services.workspace.create_note(&ctx, draft).await?;
    Ok((StatusCode::CREATED, Json(json!({ "note": NoteView::from(note) }))).into_response())
}

pub async fn update_note(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    payload: Result<Json<dto::UpdateNoteRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id: NoteId = scoped_id(&services.workspace, &ctx, &id, "note").await?;
    let edit = body(payload)?.into();
    let note = services.workspace.update_note(&ctx, id, edit).await?;
    Ok(Json(json!({ "note": NoteView::from(note) })).into_response())
}

pub async fn delete_note(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: NoteId = scoped_id(&services.workspace, &ctx, &id, "note").await?;
    let note = services.workspace.delete_note(&ctx, id).await?;
    Ok(Json(json!({ "note": NoteView::from(note) })).into_response())
}
