//! List command handler.

use clap::Args;
use prompter_core::{config::AppConfig, AppResult};
use prompter_prompt::PromptRepository;

use super::{format_table, open_store};

/// List all prompts
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing list command");

        let items = open_store(config).list()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&items)?);
            return Ok(());
        }

        if items.is_empty() {
            println!("No prompts found.");
            return Ok(());
        }

        let rows: Vec<Vec<String>> = items
            .iter()
            .map(|item| {
                vec![
                    item.id.clone(),
                    item.name.clone(),
                    item.description.clone(),
                    item.tags.join(", "),
                    item.tool.clone(),
                ]
            })
            .collect();

        print!(
            "{}",
            format_table(&["Id", "Name", "Description", "Tags", "Tool"], &rows)
        );

        Ok(())
    }
}
