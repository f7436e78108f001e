//! Init command handler.
//!
//! Creates the prompts directory and the provider override file.

use clap::Args;
use prompter_core::{config::AppConfig, AppResult};
use prompter_prompt::materialize_default_override_source;

use super::open_store;

/// Initialize a prompts directory
#[derive(Args, Debug)]
pub struct InitCommand {}

impl InitCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing init command");

        let store = open_store(config);
        store.init()?;
        println!("Initialized prompts directory: {}", store.directory().display());

        let providers = materialize_default_override_source(&config.providers_path())?;
        println!("Provider overrides: {}", providers.display());

        Ok(())
    }
}
