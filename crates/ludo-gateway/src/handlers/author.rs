use crate::error::Result;
use crate::model::AuthorResponse;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;

pub async fn all_authors_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<AuthorResponse>>> {
    let authors = state.catalog().all_authors().await?;
    let authors = authors
        .into_iter()
        .map(AuthorResponse::try_from)
        .collect::<Result<Vec<_>>>()?;
    Ok(Json(authors))
}
