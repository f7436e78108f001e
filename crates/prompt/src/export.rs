//! Prompt export.
//!
//! Turns a record's content into the wire shape a provider expects. Two
//! entry points differ in how much they trust their input:
//! - `export_prompt` takes a free-form format-or-provider string and never
//!   fails on an unknown provider.
//! - `export_prompt_as` takes an explicit format name and rejects anything
//!   outside the enumeration.

use crate::providers::{resolve_format, ExportFormat};
use crate::store::PromptRepository;
use crate::types::PromptRecord;
use prompter_core::AppResult;
use serde::Serialize;
use std::path::Path;

/// Chat message as consumed by OpenAI-compatible APIs.
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Apply a format's transform to prompt content.
pub fn serialize_content(content: &str, format: ExportFormat) -> AppResult<String> {
    match format {
        ExportFormat::Messages => to_messages(content),
        ExportFormat::Markdown => Ok(to_markdown(content)),
        ExportFormat::Text => Ok(to_text(content)),
    }
}

fn to_messages(content: &str) -> AppResult<String> {
    let messages = [ChatMessage {
        role: "system",
        content,
    }];
    Ok(serde_json::to_string_pretty(&messages)?)
}

fn to_markdown(content: &str) -> String {
    content.to_string()
}

fn to_text(content: &str) -> String {
    content.to_string()
}

/// Export a record for a format name or provider name.
///
/// Unknown providers fall back to `messages`.
pub fn export_prompt(
    record: &PromptRecord,
    fmt_or_provider: &str,
    override_source: Option<&Path>,
) -> AppResult<String> {
    let format = resolve_format(fmt_or_provider, override_source);
    tracing::debug!(
        "Exporting prompt {} for '{}' as {}",
        record.id,
        fmt_or_provider,
        format
    );
    serialize_content(&record.content, format)
}

/// Export a record with an explicit format name.
///
/// Fails with `InvalidArgument` if `format_name` is not one of
/// `messages`, `markdown`, `text`.
pub fn export_prompt_as(record: &PromptRecord, format_name: &str) -> AppResult<String> {
    let format: ExportFormat = format_name.parse()?;
    serialize_content(&record.content, format)
}

/// Load a record from a repository and export it.
pub fn export_record(
    repo: &dyn PromptRepository,
    id: &str,
    fmt_or_provider: &str,
    override_source: Option<&Path>,
) -> AppResult<String> {
    let record = repo.get(id)?;
    export_prompt(&record, fmt_or_provider, override_source)
}
