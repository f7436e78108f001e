//! Command handlers for the Prompter CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod create;
pub mod delete;
pub mod edit;
pub mod export;
pub mod init;
pub mod list;
pub mod providers;
pub mod render;
pub mod show;

// Re-export command types for convenience
pub use create::CreateCommand;
pub use delete::DeleteCommand;
pub use edit::EditCommand;
pub use export::ExportCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use providers::ProvidersCommand;
pub use render::RenderCommand;
pub use show::ShowCommand;

use prompter_core::AppConfig;
use prompter_prompt::PromptStore;

/// Store rooted at the configured prompts directory.
pub(crate) fn open_store(config: &AppConfig) -> PromptStore {
    PromptStore::new(config.prompts_path())
}

/// Format rows as a left-aligned table with a header line.
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&format_row(headers.to_vec()));
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

/// Split a comma-separated flag into trimmed, non-empty items.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
