//! Application state

use std::sync::Arc;

use crate::auth::{AccessGate, TokenService};
use crate::db::{AdminRepository, AgentRepository, Database, PromptRepository};
use crate::storage::PhotoStore;

use super::assignments::AssignmentManager;

pub struct AppState {
    pub db: Database,
    pub admins: AdminRepository,
    pub prompts: PromptRepository,
    pub agents: AgentRepository,
    pub assignments: AssignmentManager,
    pub tokens: TokenService,
    pub gate: AccessGate,
    pub photos: Arc<dyn PhotoStore>,
}

impl AppState {
    pub fn new(db: Database, tokens: TokenService, photos: Arc<dyn PhotoStore>) -> Self {
        let admins = AdminRepository::new(db.clone());
        Self {
            prompts: PromptRepository::new(db.clone()),
            agents: AgentRepository::new(db.clone()),
            assignments: AssignmentManager::new(db.clone()),
            gate: AccessGate::new(tokens.clone(), admins.clone()),
            admins,
            tokens,
            photos,
            db,
        }
    }
}
