//! Providers command handler.

use clap::Args;
use prompter_core::{config::AppConfig, AppResult};
use prompter_prompt::{list_effective, ExportFormat};

use super::format_table;

/// List supported providers and their export formats
#[derive(Args, Debug)]
pub struct ProvidersCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ProvidersCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing providers command");

        let providers = list_effective(Some(config.providers_path().as_path()));

        if self.json {
            let output: Vec<serde_json::Value> = providers
                .iter()
                .map(|(name, format)| serde_json::json!({ "provider": name, "format": format }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        let rows: Vec<Vec<String>> = providers
            .into_iter()
            .map(|(name, format)| vec![name, format.to_string()])
            .collect();
        print!("{}", format_table(&["Provider", "Export Format"], &rows));

        println!();
        println!(
            "Any unlisted provider defaults to '{}' (OpenAI-compatible).",
            ExportFormat::DEFAULT
        );
        println!("You can use any string as a tool name in your prompts.");

        Ok(())
    }
}
