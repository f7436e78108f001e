//! Show command handler.

use clap::Args;
use prompter_core::{config::AppConfig, AppResult};
use prompter_prompt::{referenced_variables, PromptRepository};

use super::open_store;

/// Display a prompt
#[derive(Args, Debug)]
pub struct ShowCommand {
    /// Prompt id or name
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ShowCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing show command for '{}'", self.id);

        let prompt = open_store(config).get(&self.id)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&prompt)?);
            return Ok(());
        }

        println!("{}", prompt.name);
        if !prompt.description.is_empty() {
            println!("{}", prompt.description);
        }
        if !prompt.tags.is_empty() {
            println!("Tags: {}", prompt.tags.join(", "));
        }
        if !prompt.category.is_empty() {
            println!("Category: {}", prompt.category);
        }
        println!("Tool: {}", prompt.tool);

        let variables = if prompt.variables.is_empty() {
            referenced_variables(&prompt.content)
        } else {
            prompt.variables.clone()
        };
        if !variables.is_empty() {
            println!("Variables: {}", variables.join(", "));
        }

        println!();
        println!("{}", prompt.content);

        Ok(())
    }
}
