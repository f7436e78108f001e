//! Edit command handler.
//!
//! Round-trips a prompt's content through `$EDITOR`.

use clap::Args;
use prompter_core::{config::AppConfig, AppError, AppResult};
use prompter_prompt::{PromptRepository, PromptUpdate};
use std::io::Write;
use std::process::Command;

use super::open_store;

const DEFAULT_EDITOR: &str = "vi";

/// Open a prompt in $EDITOR
#[derive(Args, Debug)]
pub struct EditCommand {
    /// Prompt id or name
    pub id: String,
}

impl EditCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing edit command for '{}'", self.id);

        let store = open_store(config);
        let prompt = store.get(&self.id)?;

        let mut file = tempfile::Builder::new()
            .prefix("prompter-")
            .suffix(".md")
            .tempfile()?;
        file.write_all(prompt.content.as_bytes())?;
        file.flush()?;

        let editor = std::env::var("EDITOR").unwrap_or_else(|_| DEFAULT_EDITOR.to_string());
        let (program, args) = split_editor(&editor)?;
        tracing::debug!("Launching editor {} on {:?}", program, file.path());

        let status = Command::new(program).args(args).arg(file.path()).status()?;
        if !status.success() {
            return Err(AppError::Other(format!(
                "Editor '{}' exited with {}",
                editor, status
            )));
        }

        let new_content = std::fs::read_to_string(file.path())?;
        if new_content == prompt.content {
            println!("No changes to prompt: {}", prompt.id);
            return Ok(());
        }

        store.update(
            &prompt.id,
            PromptUpdate {
                content: Some(new_content),
                ..Default::default()
            },
        )?;
        println!("Updated prompt: {}", prompt.id);

        Ok(())
    }
}

/// Split an `$EDITOR` value like `code --wait` into program and arguments.
fn split_editor(editor: &str) -> AppResult<(&str, Vec<&str>)> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| AppError::Config("EDITOR is empty".to_string()))?;
    Ok((program, parts.collect()))
}
