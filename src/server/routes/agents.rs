use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::Pagination;
use crate::core::AppState;
use crate::db::{Agent, AgentUpdate, NewAgent, Prompt};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    #[serde(default)]
    pub filename: Option<String>,
}

/// POST /agents: create an agent under a caller-supplied ID
pub async fn create_agent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewAgent>,
) -> Result<(StatusCode, Json<Agent>)> {
    let agent = state.agents.create(req).await?;
    Ok((StatusCode::CREATED, Json(agent)))
}

/// GET /agents?skip=&limit=
pub async fn list_agents(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Agent>>> {
    let (skip, limit) = page.checked()?;
    Ok(Json(state.agents.list(skip, limit).await?))
}

/// GET /agents/{agent_id}
pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(agent_id): Path<String>,
) -> Result<Json<Agent>> {
    Ok(Json(state.agents.get(&agent_id).await?))
}

/// PUT /agents/{agent_id}: partial update of name, about, photo_url
pub async fn update_agent(
    State(state): State<Arc<AppState>>,
    Path(agent_id): Path<String>,
    Json(req): Json<AgentUpdate>,
) -> Result<Json<Agent>> {
    Ok(Json(state.agents.update(&agent_id, req).await?))
}

/// DELETE /agents/{agent_id}: returns the deleted agent
pub async fn delete_agent(
    State(state): State<Arc<AppState>>,
    Path(agent_id): Path<String>,
) -> Result<Json<Agent>> {
    Ok(Json(state.agents.delete(&agent_id).await?))
}

/// POST /agents/{agent_id}/assign-prompt/{prompt_id}
pub async fn assign_prompt(
    State(state): State<Arc<AppState>>,
    Path((agent_id, prompt_id)): Path<(String, i64)>,
) -> Result<Json<Agent>> {
    Ok(Json(state.assignments.assign(&agent_id, prompt_id).await?))
}

/// DELETE /agents/{agent_id}/remove-prompt/{prompt_id}
pub async fn remove_prompt(
    State(state): State<Arc<AppState>>,
    Path((agent_id, prompt_id)): Path<(String, i64)>,
) -> Result<Json<Agent>> {
    Ok(Json(state.assignments.unassign(&agent_id, prompt_id).await?))
}

/// GET /agents/{agent_id}/unassigned-prompts
pub async fn unassigned_prompts(
    State(state): State<Arc<AppState>>,
    Path(agent_id): Path<String>,
) -> Result<Json<Vec<Prompt>>> {
    Ok(Json(state.assignments.list_unassigned(&agent_id).await?))
}

/// POST /agents/{agent_id}/upload-photo?filename=: raw image body
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    Path(agent_id): Path<String>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<Agent>> {
    // Fail on a missing agent before anything is written to storage
    state.agents.get(&agent_id).await?;
    store_photo(&state, &agent_id, params, body).await.map(Json)
}

/// Upload `body` and point the agent's `photo_url` at it
pub(super) async fn store_photo(
    state: &AppState,
    agent_id: &str,
    params: UploadParams,
    body: Bytes,
) -> Result<Agent> {
    if body.is_empty() {
        return Err(Error::Validation("Uploaded photo is empty".into()));
    }

    let file_name = params.filename.unwrap_or_else(|| "photo".to_string());
    let url = state.photos.put(&file_name, body.to_vec()).await?;
    tracing::info!("Uploaded photo for {}: {}", agent_id, url);

    state.agents.update(agent_id, AgentUpdate::photo_url(url)).await
}
