//! Delete command handler.

use clap::Args;
use prompter_core::{config::AppConfig, AppResult};
use prompter_prompt::PromptRepository;

use super::open_store;

/// Delete a prompt
#[derive(Args, Debug)]
pub struct DeleteCommand {
    /// Prompt id or name
    pub id: String,
}

impl DeleteCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing delete command for '{}'", self.id);

        open_store(config).delete(&self.id)?;
        println!("Deleted prompt: {}", self.id);

        Ok(())
    }
}
