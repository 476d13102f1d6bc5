//! Database module

pub mod schema;
pub mod connection;
pub mod repositories;

pub use connection::Database;
pub use repositories::admin::{Admin, AdminRepository};
pub use repositories::agent::{Agent, AgentRepository, AgentUpdate, NewAgent, GLOBAL_PROFILE_ID};
pub use repositories::prompt::{NewPrompt, Prompt, PromptRepository, PromptUpdate, MAX_PROMPT_ID};
