//! Export command handler.

use clap::Args;
use prompter_core::{config::AppConfig, AppResult};
use prompter_prompt::{export_prompt, export_prompt_as, PromptRepository};

use super::open_store;

/// Export a prompt for a format or provider
#[derive(Args, Debug)]
pub struct ExportCommand {
    /// Prompt id or name
    pub id: String,

    /// Format (messages, markdown, text) or provider name (openai, groq, claude, ...)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Treat --format as an explicit format name and reject anything else
    #[arg(long)]
    pub strict: bool,
}

impl ExportCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing export command for '{}'", self.id);

        let prompt = open_store(config).get(&self.id)?;

        let exported = if self.strict {
            export_prompt_as(&prompt, &self.format)?
        } else {
            export_prompt(&prompt, &self.format, Some(config.providers_path().as_path()))?
        };
        println!("{}", exported);

        Ok(())
    }
}
