//! Agent <-> prompt assignment manager
//!
//! All writes to `agent_prompts` outside of entity deletion go through here.
//! Each operation runs in one immediate transaction, so concurrent identical
//! requests cannot produce duplicate pairs or partial results.

use rusqlite::{params, Connection};

use crate::db::repositories::{agent, prompt};
use crate::db::{Agent, Database, Prompt};
use crate::error::{Error, Result};

/// An identifiable entity carrying a set of assigned prompts
pub trait PromptHolder {
    fn holder_id(&self) -> &str;

    fn prompts(&self) -> &[Prompt];

    fn has_prompt(&self, prompt_id: i64) -> bool {
        self.prompts().iter().any(|p| p.id == prompt_id)
    }
}

impl PromptHolder for Agent {
    fn holder_id(&self) -> &str {
        &self.id
    }

    fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }
}

#[derive(Clone)]
pub struct AssignmentManager {
    db: Database,
}

impl AssignmentManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Link a prompt to an agent. Linking an already linked prompt is a no-op.
    pub async fn assign(&self, agent_id: &str, prompt_id: i64) -> Result<Agent> {
        let agent_id = agent_id.to_string();
        self.db
            .transaction(move |tx| {
                let holder = agent::find(tx, &agent_id)?.ok_or(Error::NotFound("Agent"))?;
                if prompt::find(tx, prompt_id)?.is_none() {
                    return Err(Error::NotFound("Prompt"));
                }

                if link(tx, &holder, prompt_id)? {
                    refreshed(tx, &agent_id)
                } else {
                    Ok(holder)
                }
            })
            .await
    }

    /// Unlink a prompt from an agent.
    ///
    /// The prompt must exist even when it is not linked; an existing but
    /// unlinked prompt leaves the agent unchanged.
    pub async fn unassign(&self, agent_id: &str, prompt_id: i64) -> Result<Agent> {
        let agent_id = agent_id.to_string();
        self.db
            .transaction(move |tx| {
                let holder = agent::find(tx, &agent_id)?.ok_or(Error::NotFound("Agent"))?;
                if prompt::find(tx, prompt_id)?.is_none() {
                    return Err(Error::NotFound("Prompt"));
                }

                if unlink(tx, &holder, prompt_id)? {
                    refreshed(tx, &agent_id)
                } else {
                    Ok(holder)
                }
            })
            .await
    }

    /// Every prompt not linked to the agent, in catalog order
    pub async fn list_unassigned(&self, agent_id: &str) -> Result<Vec<Prompt>> {
        let agent_id = agent_id.to_string();
        self.db
            .transaction(move |tx| {
                if !agent::exists(tx, &agent_id)? {
                    return Err(Error::NotFound("Agent"));
                }
                prompt::not_assigned_to(tx, &agent_id)
            })
            .await
    }
}

/// Returns whether a row was inserted
fn link(conn: &Connection, holder: &impl PromptHolder, prompt_id: i64) -> Result<bool> {
    if holder.has_prompt(prompt_id) {
        tracing::debug!(
            "Prompt {} already assigned to {}",
            prompt_id,
            holder.holder_id()
        );
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO agent_prompts (agent_id, prompt_id) VALUES (?1, ?2)",
        params![holder.holder_id(), prompt_id],
    )?;
    tracing::debug!("Assigned prompt {} to {}", prompt_id, holder.holder_id());
    Ok(true)
}

/// Returns whether a row was removed
fn unlink(conn: &Connection, holder: &impl PromptHolder, prompt_id: i64) -> Result<bool> {
    if !holder.has_prompt(prompt_id) {
        return Ok(false);
    }

    conn.execute(
        "DELETE FROM agent_prompts WHERE agent_id = ?1 AND prompt_id = ?2",
        params![holder.holder_id(), prompt_id],
    )?;
    tracing::debug!("Removed prompt {} from {}", prompt_id, holder.holder_id());
    Ok(true)
}

fn refreshed(conn: &Connection, agent_id: &str) -> Result<Agent> {
    agent::find(conn, agent_id)?.ok_or(Error::NotFound("Agent"))
}
