//! Routes for the global profile (`/sukhi`, `/sukhi-profile`).
//! Every handler first makes sure the profile row exists.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;

use super::agents::{store_photo, UploadParams};
use crate::core::AppState;
use crate::db::{Agent, AgentUpdate, Prompt, GLOBAL_PROFILE_ID};
use crate::error::Result;

/// GET /sukhi
pub async fn get_profile(State(state): State<Arc<AppState>>) -> Result<Json<Agent>> {
    Ok(Json(state.agents.get_or_create_global().await?))
}

/// PUT /sukhi
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AgentUpdate>,
) -> Result<Json<Agent>> {
    state.agents.get_or_create_global().await?;
    Ok(Json(state.agents.update(GLOBAL_PROFILE_ID, req).await?))
}

/// POST /sukhi/assign-prompt/{prompt_id}
pub async fn assign_prompt(
    State(state): State<Arc<AppState>>,
    Path(prompt_id): Path<i64>,
) -> Result<Json<Agent>> {
    state.agents.get_or_create_global().await?;
    Ok(Json(
        state.assignments.assign(GLOBAL_PROFILE_ID, prompt_id).await?,
    ))
}

/// DELETE /sukhi/remove-prompt/{prompt_id}
pub async fn remove_prompt(
    State(state): State<Arc<AppState>>,
    Path(prompt_id): Path<i64>,
) -> Result<Json<Agent>> {
    state.agents.get_or_create_global().await?;
    Ok(Json(
        state.assignments.unassign(GLOBAL_PROFILE_ID, prompt_id).await?,
    ))
}

/// GET /sukhi/unassigned-prompts
pub async fn unassigned_prompts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Prompt>>> {
    state.agents.get_or_create_global().await?;
    Ok(Json(
        state.assignments.list_unassigned(GLOBAL_PROFILE_ID).await?,
    ))
}

/// POST /sukhi/upload-photo?filename=
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<Agent>> {
    state.agents.get_or_create_global().await?;
    store_photo(&state, GLOBAL_PROFILE_ID, params, body)
        .await
        .map(Json)
}
