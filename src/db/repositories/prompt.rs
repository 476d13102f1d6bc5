//! Prompt repository

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::{Error, Result};

const COLUMNS: &str = "id, title, content, created_at, updated_at";

/// Largest id a caller may pick; the rest of the range stays free for
/// automatic ids
pub const MAX_PROMPT_ID: i64 = i32::MAX as i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a prompt. `id` is normally left out and assigned by
/// the database; when supplied it must not already be taken.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPrompt {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl PromptUpdate {
    fn apply(self, prompt: &mut Prompt) {
        if let Some(title) = self.title {
            prompt.title = title;
        }
        if let Some(content) = self.content {
            prompt.content = content;
        }
    }
}

#[derive(Clone)]
pub struct PromptRepository {
    db: Database,
}

impl PromptRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a new prompt
    pub async fn create(&self, new: NewPrompt) -> Result<Prompt> {
        if new.title.trim().is_empty() {
            return Err(Error::Validation("Prompt title must not be empty".into()));
        }
        if let Some(id) = new.id {
            if !(1..=MAX_PROMPT_ID).contains(&id) {
                return Err(Error::Validation(format!(
                    "Prompt ID must be between 1 and {}",
                    MAX_PROMPT_ID
                )));
            }
        }

        self.db
            .transaction(move |tx| {
                if let Some(id) = new.id {
                    if find(tx, id)?.is_some() {
                        return Err(Error::Conflict(format!(
                            "Prompt with ID '{}' already exists.",
                            id
                        )));
                    }
                }

                let created_at = Utc::now();
                tx.execute(
                    "INSERT INTO prompts (id, title, content, created_at) VALUES (?1, ?2, ?3, ?4)",
                    params![new.id, new.title, new.content, created_at],
                )?;
                let id = tx.last_insert_rowid();

                tracing::debug!("Created prompt: {}", id);
                Ok(Prompt {
                    id,
                    title: new.title,
                    content: new.content,
                    created_at,
                    updated_at: None,
                })
            })
            .await
    }

    /// Get a prompt by ID
    pub async fn get(&self, id: i64) -> Result<Prompt> {
        self.db
            .run(move |conn| find(conn, id)?.ok_or(Error::NotFound("Prompt")))
            .await
    }

    /// List prompts in id order
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Prompt>> {
        self.db
            .run(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COLUMNS} FROM prompts ORDER BY id LIMIT ?1 OFFSET ?2"
                ))?;
                let prompts = stmt
                    .query_map(params![limit, skip], map_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(prompts)
            })
            .await
    }

    /// Apply a partial update and refresh `updated_at`
    pub async fn update(&self, id: i64, update: PromptUpdate) -> Result<Prompt> {
        if matches!(&update.title, Some(title) if title.trim().is_empty()) {
            return Err(Error::Validation("Prompt title must not be empty".into()));
        }

        self.db
            .transaction(move |tx| {
                let mut prompt = find(tx, id)?.ok_or(Error::NotFound("Prompt"))?;
                update.apply(&mut prompt);
                prompt.updated_at = Some(Utc::now());

                tx.execute(
                    "UPDATE prompts SET title = ?1, content = ?2, updated_at = ?3 WHERE id = ?4",
                    params![prompt.title, prompt.content, prompt.updated_at, id],
                )?;

                tracing::debug!("Updated prompt: {}", id);
                Ok(prompt)
            })
            .await
    }

    /// Delete a prompt and every assignment pointing at it.
    /// Returns the prompt as it was before deletion.
    pub async fn delete(&self, id: i64) -> Result<Prompt> {
        self.db
            .transaction(move |tx| {
                let prompt = find(tx, id)?.ok_or(Error::NotFound("Prompt"))?;

                let unlinked = tx.execute(
                    "DELETE FROM agent_prompts WHERE prompt_id = ?1",
                    params![id],
                )?;
                tx.execute("DELETE FROM prompts WHERE id = ?1", params![id])?;

                tracing::debug!("Deleted prompt {} ({} assignments removed)", id, unlinked);
                Ok(prompt)
            })
            .await
    }
}

pub(crate) fn find(conn: &Connection, id: i64) -> Result<Option<Prompt>> {
    let prompt = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM prompts WHERE id = ?1"),
            params![id],
            map_row,
        )
        .optional()?;
    Ok(prompt)
}

/// Prompts linked to an agent, in id order
pub(crate) fn assigned_to(conn: &Connection, agent_id: &str) -> Result<Vec<Prompt>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.title, p.content, p.created_at, p.updated_at
         FROM prompts p
         JOIN agent_prompts ap ON ap.prompt_id = p.id
         WHERE ap.agent_id = ?1
         ORDER BY p.id",
    )?;
    let prompts = stmt
        .query_map(params![agent_id], map_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(prompts)
}

/// Prompts not linked to an agent, in id order
pub(crate) fn not_assigned_to(conn: &Connection, agent_id: &str) -> Result<Vec<Prompt>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.title, p.content, p.created_at, p.updated_at
         FROM prompts p
         WHERE NOT EXISTS (
             SELECT 1 FROM agent_prompts ap
             WHERE ap.agent_id = ?1 AND ap.prompt_id = p.id
         )
         ORDER BY p.id",
    )?;
    let prompts = stmt
        .query_map(params![agent_id], map_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(prompts)
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Prompt> {
    Ok(Prompt {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}
