pub mod agents;
pub mod auth;
pub mod profile;
pub mod prompts;
pub mod root;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use serde::Deserialize;

use super::middleware::require_admin;
use crate::core::AppState;
use crate::error::{Error, Result};

/// `?skip=&limit=` paging for list endpoints
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl Pagination {
    pub fn checked(&self) -> Result<(i64, i64)> {
        if self.skip < 0 || self.limit < 0 {
            return Err(Error::Validation(
                "skip and limit must not be negative".into(),
            ));
        }
        Ok((self.skip, self.limit))
    }
}

/// Build the application router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let prompt_collection = post(prompts::create_prompt).get(prompts::list_prompts);
    let agent_collection = post(agents::create_agent).get(agents::list_agents);
    let profile = get(profile::get_profile).put(profile::update_profile);

    let protected = Router::new()
        .route("/me", get(auth::me))
        // Prompts
        .route("/prompts", prompt_collection.clone())
        .route("/prompts/", prompt_collection)
        .route(
            "/prompts/{prompt_id}",
            get(prompts::get_prompt)
                .put(prompts::update_prompt)
                .delete(prompts::delete_prompt),
        )
        // Agents
        .route("/agents", agent_collection.clone())
        .route("/agents/", agent_collection)
        .route(
            "/agents/{agent_id}",
            get(agents::get_agent)
                .put(agents::update_agent)
                .delete(agents::delete_agent),
        )
        .route(
            "/agents/{agent_id}/assign-prompt/{prompt_id}",
            post(agents::assign_prompt),
        )
        .route(
            "/agents/{agent_id}/remove-prompt/{prompt_id}",
            delete(agents::remove_prompt),
        )
        .route(
            "/agents/{agent_id}/unassigned-prompts",
            get(agents::unassigned_prompts),
        )
        .route("/agents/{agent_id}/upload-photo", post(agents::upload_photo))
        // Global profile
        .route("/sukhi", profile.clone())
        .route("/sukhi/", profile.clone())
        .route("/sukhi-profile", profile.clone())
        .route("/sukhi-profile/", profile)
        .route("/sukhi/assign-prompt/{prompt_id}", post(profile::assign_prompt))
        .route("/sukhi/remove-prompt/{prompt_id}", delete(profile::remove_prompt))
        .route("/sukhi/unassigned-prompts", get(profile::unassigned_prompts))
        .route("/sukhi/upload-photo", post(profile::upload_photo))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/", get(root::root))
        .route("/health", get(root::health))
        .route("/token", post(auth::login))
        .merge(protected)
        .with_state(state)
}
