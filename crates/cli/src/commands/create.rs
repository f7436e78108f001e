//! Create command handler.

use clap::Args;
use prompter_core::{config::AppConfig, AppResult};
use prompter_prompt::{NewPrompt, PromptRepository};
use std::io::{IsTerminal, Read};

use super::{open_store, split_list};

/// Create a new prompt
#[derive(Args, Debug)]
pub struct CreateCommand {
    /// Prompt name (the id is derived from it)
    pub name: String,

    /// Short description
    #[arg(long, visible_alias = "desc", default_value = "")]
    pub description: String,

    /// Comma-separated tags
    #[arg(short, long, default_value = "")]
    pub tags: String,

    /// Provider hint (any string, e.g. claude, openai, my-local-llm)
    #[arg(long, default_value = prompter_prompt::types::DEFAULT_TOOL)]
    pub tool: String,

    /// Category
    #[arg(long, default_value = "")]
    pub category: String,

    /// Declared variable name (repeatable)
    #[arg(long = "var")]
    pub variables: Vec<String>,

    /// Prompt content (read from stdin when omitted and stdin is piped)
    #[arg(long)]
    pub content: Option<String>,
}

impl CreateCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing create command for '{}'", self.name);

        let store = open_store(config);
        store.init()?;

        let data = NewPrompt::named(&self.name)
            .with_description(&self.description)
            .with_content(self.read_content()?)
            .with_tags(split_list(&self.tags))
            .with_tool(&self.tool)
            .with_variables(self.variables.clone())
            .with_category(&self.category);

        let prompt = store.create(data)?;
        println!("Created prompt: {}", prompt.id);

        Ok(())
    }

    fn read_content(&self) -> AppResult<String> {
        if let Some(ref content) = self.content {
            return Ok(content.clone());
        }

        let mut stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Ok(String::new());
        }

        let mut body = String::new();
        stdin.read_to_string(&mut body)?;
        Ok(body)
    }
}
