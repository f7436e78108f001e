//! Prompt system for Prompter.
//!
//! This crate provides prompt management with:
//! - Markdown prompt records with YAML front matter
//! - A provider registry mapping provider names to export formats,
//!   overridable per workspace through `providers.yaml`
//! - Export of prompt content as chat messages, markdown, or text
//! - Strict Handlebars variable substitution

pub mod export;
pub mod providers;
pub mod render;
pub mod store;
pub mod types;

// Re-export main types
pub use export::{export_prompt, export_prompt_as, export_record, serialize_content};
pub use providers::{
    list_effective, load_effective_table, materialize_default_override_source,
    normalize_provider, resolve_format, ExportFormat, ProviderTable,
};
pub use render::{referenced_variables, render, render_record};
pub use store::{sanitize_id, PromptRepository, PromptStore};
pub use types::{NewPrompt, PromptRecord, PromptSummary, PromptUpdate};
