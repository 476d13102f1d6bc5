use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::Pagination;
use crate::core::AppState;
use crate::db::{NewPrompt, Prompt, PromptUpdate};
use crate::error::Result;

/// POST /prompts
pub async fn create_prompt(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewPrompt>,
) -> Result<(StatusCode, Json<Prompt>)> {
    let prompt = state.prompts.create(req).await?;
    Ok((StatusCode::CREATED, Json(prompt)))
}

/// GET /prompts?skip=&limit=
pub async fn list_prompts(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Prompt>>> {
    let (skip, limit) = page.checked()?;
    Ok(Json(state.prompts.list(skip, limit).await?))
}

/// GET /prompts/{prompt_id}
pub async fn get_prompt(
    State(state): State<Arc<AppState>>,
    Path(prompt_id): Path<i64>,
) -> Result<Json<Prompt>> {
    Ok(Json(state.prompts.get(prompt_id).await?))
}

/// PUT /prompts/{prompt_id}: partial update
pub async fn update_prompt(
    State(state): State<Arc<AppState>>,
    Path(prompt_id): Path<i64>,
    Json(req): Json<PromptUpdate>,
) -> Result<Json<Prompt>> {
    Ok(Json(state.prompts.update(prompt_id, req).await?))
}

/// DELETE /prompts/{prompt_id}: returns the deleted prompt
pub async fn delete_prompt(
    State(state): State<Arc<AppState>>,
    Path(prompt_id): Path<i64>,
) -> Result<Json<Prompt>> {
    Ok(Json(state.prompts.delete(prompt_id).await?))
}
