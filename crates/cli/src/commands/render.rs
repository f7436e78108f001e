//! Render command handler.

use clap::Args;
use prompter_core::{config::AppConfig, AppError, AppResult};
use prompter_prompt::render_record;
use std::collections::HashMap;

use super::open_store;

/// Render a prompt with variable substitution
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Prompt id or name
    pub id: String,

    /// Variable binding as key=value (repeatable)
    #[arg(long = "var")]
    pub vars: Vec<String>,
}

impl RenderCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing render command for '{}'", self.id);

        let variables = parse_vars(&self.vars)?;
        let rendered = render_record(&open_store(config), &self.id, &variables)?;
        println!("{}", rendered);

        Ok(())
    }
}

/// Parse `key=value` pairs; the first `=` splits, both sides are trimmed.
fn parse_vars(raw: &[String]) -> AppResult<HashMap<String, String>> {
    let mut variables = HashMap::new();
    for pair in raw {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            AppError::InvalidArgument(format!(
                "Invalid variable format: {} (expected key=value)",
                pair
            ))
        })?;
        variables.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(variables)
}
