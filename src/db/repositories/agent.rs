//! Agent repository
//!
//! Agents are keyed by a caller-supplied string. The global profile is just
//! the agent stored under [`GLOBAL_PROFILE_ID`], created on first read.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Deserializer, Serialize};

use super::prompt::{self, Prompt};
use crate::db::Database;
use crate::error::{Error, Result};

/// Well-known key of the global profile
pub const GLOBAL_PROFILE_ID: &str = "sukhi";
pub const GLOBAL_PROFILE_NAME: &str = "Sukhi";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub about: Option<String>,
    pub photo_url: Option<String>,
    #[serde(default)]
    pub prompts: Vec<Prompt>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAgent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Partial update. An absent field is left alone; for the nullable columns
/// an explicit `null` clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub about: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub photo_url: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl AgentUpdate {
    pub fn photo_url(url: impl Into<String>) -> Self {
        Self {
            photo_url: Some(Some(url.into())),
            ..Self::default()
        }
    }

    fn apply(self, agent: &mut Agent) {
        if let Some(name) = self.name {
            agent.name = name;
        }
        if let Some(about) = self.about {
            agent.about = about;
        }
        if let Some(photo_url) = self.photo_url {
            agent.photo_url = photo_url;
        }
    }
}

#[derive(Clone)]
pub struct AgentRepository {
    db: Database,
}

impl AgentRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a new agent under a caller-supplied ID
    pub async fn create(&self, new: NewAgent) -> Result<Agent> {
        if new.id.trim().is_empty() {
            return Err(Error::Validation("Agent ID must not be empty".into()));
        }
        if new.name.trim().is_empty() {
            return Err(Error::Validation("Agent name must not be empty".into()));
        }

        self.db
            .transaction(move |tx| {
                if exists(tx, &new.id)? {
                    return Err(Error::Conflict(format!(
                        "Agent with ID '{}' already exists.",
                        new.id
                    )));
                }

                tx.execute(
                    "INSERT INTO agents (id, name, about, photo_url) VALUES (?1, ?2, ?3, ?4)",
                    params![new.id, new.name, new.about, new.photo_url],
                )?;

                tracing::debug!("Created agent: {}", new.id);
                Ok(Agent {
                    id: new.id,
                    name: new.name,
                    about: new.about,
                    photo_url: new.photo_url,
                    prompts: Vec::new(),
                })
            })
            .await
    }

    /// Get an agent with its assigned prompts
    pub async fn get(&self, id: &str) -> Result<Agent> {
        let id = id.to_string();
        self.db
            .run(move |conn| find(conn, &id)?.ok_or(Error::NotFound("Agent")))
            .await
    }

    /// Get the global profile, creating it with defaults if it is missing.
    ///
    /// Creation goes through `INSERT OR IGNORE` on the primary key, so two
    /// racing first reads both end up reading the single winning row.
    pub async fn get_or_create_global(&self) -> Result<Agent> {
        self.db
            .run(|conn| {
                if let Some(agent) = find(conn, GLOBAL_PROFILE_ID)? {
                    return Ok(agent);
                }

                let inserted = conn.execute(
                    "INSERT OR IGNORE INTO agents (id, name, about) VALUES (?1, ?2, '')",
                    params![GLOBAL_PROFILE_ID, GLOBAL_PROFILE_NAME],
                )?;
                if inserted > 0 {
                    tracing::info!("Created global profile '{}'", GLOBAL_PROFILE_ID);
                }

                find(conn, GLOBAL_PROFILE_ID)?.ok_or(Error::NotFound("Agent"))
            })
            .await
    }

    /// List agents in insertion order
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Agent>> {
        self.db
            .run(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, name, about, photo_url FROM agents
                     ORDER BY rowid LIMIT ?1 OFFSET ?2",
                )?;
                let mut agents = stmt
                    .query_map(params![limit, skip], map_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                for agent in &mut agents {
                    agent.prompts = prompt::assigned_to(conn, &agent.id)?;
                }
                Ok(agents)
            })
            .await
    }

    /// Apply a partial update
    pub async fn update(&self, id: &str, update: AgentUpdate) -> Result<Agent> {
        if matches!(&update.name, Some(name) if name.trim().is_empty()) {
            return Err(Error::Validation("Agent name must not be empty".into()));
        }

        let id = id.to_string();
        self.db
            .transaction(move |tx| {
                let mut agent = find(tx, &id)?.ok_or(Error::NotFound("Agent"))?;
                update.apply(&mut agent);

                tx.execute(
                    "UPDATE agents SET name = ?1, about = ?2, photo_url = ?3 WHERE id = ?4",
                    params![agent.name, agent.about, agent.photo_url, id],
                )?;

                tracing::debug!("Updated agent: {}", id);
                Ok(agent)
            })
            .await
    }

    /// Delete an agent and its assignments.
    /// Returns the agent (with its prompts) as it was before deletion.
    /// The global profile cannot be deleted.
    pub async fn delete(&self, id: &str) -> Result<Agent> {
        if id == GLOBAL_PROFILE_ID {
            return Err(Error::Validation(format!(
                "The global profile '{}' cannot be deleted.",
                GLOBAL_PROFILE_ID
            )));
        }

        let id = id.to_string();
        self.db
            .transaction(move |tx| {
                let agent = find(tx, &id)?.ok_or(Error::NotFound("Agent"))?;

                tx.execute("DELETE FROM agent_prompts WHERE agent_id = ?1", params![id])?;
                tx.execute("DELETE FROM agents WHERE id = ?1", params![id])?;

                tracing::debug!("Deleted agent: {}", id);
                Ok(agent)
            })
            .await
    }
}

pub(crate) fn exists(conn: &Connection, id: &str) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM agents WHERE id = ?1", params![id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

pub(crate) fn find(conn: &Connection, id: &str) -> Result<Option<Agent>> {
    let agent = conn
        .query_row(
            "SELECT id, name, about, photo_url FROM agents WHERE id = ?1",
            params![id],
            map_row,
        )
        .optional()?;

    match agent {
        Some(mut agent) => {
            agent.prompts = prompt::assigned_to(conn, &agent.id)?;
            Ok(Some(agent))
        }
        None => Ok(None),
    }
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Agent> {
    Ok(Agent {
        id: row.get(0)?,
        name: row.get(1)?,
        about: row.get(2)?,
        photo_url: row.get(3)?,
        prompts: Vec::new(),
    })
}
