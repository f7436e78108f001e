//! Prompt types for Prompter.
//!
//! This module defines the domain entities for the prompt system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tool hint used when a record does not name one.
pub const DEFAULT_TOOL: &str = "generic";

/// A prompt record loaded from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    /// Identifier derived from the name (also the file stem)
    pub id: String,

    /// Human-readable name
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Markdown body; may contain `{{variable}}` placeholders
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Free-form provider hint (e.g. "claude", "my-local-llm")
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Variable names the author declared for this prompt
    #[serde(default)]
    pub variables: Vec<String>,

    #[serde(default)]
    pub category: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Listing entry; a record without its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub tool: String,
    pub category: String,
    pub updated_at: DateTime<Utc>,
}

impl From<&PromptRecord> for PromptSummary {
    fn from(record: &PromptRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            tags: record.tags.clone(),
            tool: record.tool.clone(),
            category: record.category.clone(),
            updated_at: record.updated_at,
        }
    }
}

/// Input for creating a prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPrompt {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default = "default_tool")]
    pub tool: String,

    #[serde(default)]
    pub variables: Vec<String>,

    #[serde(default)]
    pub category: String,
}

impl NewPrompt {
    /// Create a prompt input with only a name; everything else defaulted.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            content: String::new(),
            tags: Vec::new(),
            tool: default_tool(),
            variables: Vec::new(),
            category: String::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_variables(mut self, variables: Vec<String>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// Partial update; only `Some` fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl PromptUpdate {
    /// Check if any field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.tool.is_none()
            && self.variables.is_none()
            && self.category.is_none()
    }

    /// Apply the set fields to a record. Does not touch id or timestamps.
    pub fn apply_to(self, record: &mut PromptRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(content) = self.content {
            record.content = content;
        }
        if let Some(tags) = self.tags {
            record.tags = tags;
        }
        if let Some(tool) = self.tool {
            record.tool = tool;
        }
        if let Some(variables) = self.variables {
            record.variables = variables;
        }
        if let Some(category) = self.category {
            record.category = category;
        }
    }
}

fn default_tool() -> String {
    DEFAULT_TOOL.to_string()
}
