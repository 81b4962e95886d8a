use axum::{
    extract::{Extension, Path},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use worksphere_core::NoteId;

use crate::app::dto::PublicNoteView;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/notes/:id", get(public_note))
}

/// Anonymous read of a PUBLIC note. Every other case is `NOT_FOUND`.
pub async fn public_note(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: NoteId = id.parse().map_err(|_| ApiError::not_found("note"))?;
    let note = services.workspace.public_note(id).await?;
    Ok(Json(json!({ "note": PublicNoteView::from(note) })).into_response())
}
