pub mod assignments;
pub mod state;

pub use assignments::{AssignmentManager, PromptHolder};
pub use state::AppState;
