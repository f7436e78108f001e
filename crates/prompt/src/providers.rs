//! Provider registry.
//!
//! Maps free-form provider names onto the three export formats. The
//! effective table is the compiled-in table overlaid by an optional user
//! override file (`providers.yaml`):
//!
//! ```yaml
//! providers:
//!   my-company-llm: markdown
//!   claude: messages
//! ```
//!
//! The override file is read fresh on every call; nothing is cached.

use prompter_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Serialization applied to a prompt's content on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// JSON array with a single system message
    Messages,
    /// Content unchanged
    Markdown,
    /// Content unchanged
    Text,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Messages, Self::Markdown, Self::Text];

    /// Format used for providers the registry does not know.
    pub const DEFAULT: ExportFormat = ExportFormat::Messages;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Messages => "messages",
            Self::Markdown => "markdown",
            Self::Text => "text",
        }
    }

    /// Exact match against a format name; `None` for anything else.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            AppError::InvalidArgument(format!(
                "Unknown format: {}. Available: {}",
                s,
                Self::ALL.map(|f| f.as_str()).join(", ")
            ))
        })
    }
}

/// Compiled-in provider table.
const BUILTIN_PROVIDERS: &[(&str, ExportFormat)] = &[
    // OpenAI-compatible chat APIs
    ("openai", ExportFormat::Messages),
    ("chatgpt", ExportFormat::Messages),
    ("gpt", ExportFormat::Messages),
    ("groq", ExportFormat::Messages),
    ("together", ExportFormat::Messages),
    ("mistral", ExportFormat::Messages),
    ("ollama", ExportFormat::Messages),
    ("lmstudio", ExportFormat::Messages),
    ("vllm", ExportFormat::Messages),
    ("anyscale", ExportFormat::Messages),
    ("fireworks", ExportFormat::Messages),
    ("perplexity", ExportFormat::Messages),
    ("deepseek", ExportFormat::Messages),
    ("openrouter", ExportFormat::Messages),
    ("litellm", ExportFormat::Messages),
    ("azure", ExportFormat::Messages),
    ("cohere", ExportFormat::Messages),
    // Markdown-first assistants
    ("claude", ExportFormat::Markdown),
    ("anthropic", ExportFormat::Markdown),
    ("gemini", ExportFormat::Markdown),
    ("google", ExportFormat::Markdown),
    // Plain text
    ("generic", ExportFormat::Text),
];

/// Documentation written by `materialize_default_override_source`.
const DEFAULT_OVERRIDE_SOURCE: &str = "\
# Provider export formats.
#
# Map a provider name to one of: messages, markdown, text.
#   messages  - JSON array with a single system message (OpenAI-compatible)
#   markdown  - prompt content unchanged
#   text      - prompt content unchanged
#
# Entries here are added to the built-in table and win over built-in
# entries with the same name. Names are case-insensitive. Providers that
# appear nowhere default to 'messages'. The names 'messages', 'markdown'
# and 'text' are reserved and cannot be registered.
#
# Example:
#   providers:
#     my-company-llm: markdown
#     claude: messages

providers:
";

/// Normalized provider name: trimmed and lowercased.
pub fn normalize_provider(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A provider name → export format mapping, ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderTable {
    entries: BTreeMap<String, ExportFormat>,
}

impl ProviderTable {
    /// The compiled-in table.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_PROVIDERS
                .iter()
                .map(|(name, format)| (name.to_string(), *format))
                .collect(),
        }
    }

    /// Look up a provider by its normalized name.
    pub fn get(&self, provider: &str) -> Option<ExportFormat> {
        self.entries.get(&normalize_provider(provider)).copied()
    }

    pub fn contains(&self, provider: &str) -> bool {
        self.get(provider).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ExportFormat)> {
        self.entries.iter().map(|(name, format)| (name.as_str(), *format))
    }

    /// Return a new table with `overrides` laid over this one.
    ///
    /// Each override is normalized and validated; entries with a format
    /// outside the enumeration or a reserved name are dropped.
    pub fn overlay(&self, overrides: &BTreeMap<String, String>) -> Self {
        let mut merged = self.entries.clone();

        for (raw_name, raw_format) in overrides {
            let name = normalize_provider(raw_name);

            if name.is_empty() {
                tracing::warn!("Ignoring provider override with an empty name");
                continue;
            }

            if ExportFormat::from_name(&name).is_some() {
                tracing::warn!(
                    "Ignoring provider override '{}': format names are reserved",
                    name
                );
                continue;
            }

            match ExportFormat::from_name(raw_format.trim()) {
                Some(format) => {
                    if let Some(previous) = merged.insert(name.clone(), format) {
                        tracing::debug!(
                            "Provider '{}' overridden: {} -> {}",
                            name,
                            previous,
                            format
                        );
                    }
                }
                None => {
                    tracing::warn!(
                        "Ignoring provider override '{}': unknown format '{}'",
                        name,
                        raw_format
                    );
                }
            }
        }

        Self { entries: merged }
    }
}

/// Read the raw `providers` mapping from an override file.
///
/// A missing file or an unrecognized document shape yields an empty map.
/// Only unreadable or unparseable files are errors.
fn read_override_source(path: &Path) -> AppResult<BTreeMap<String, String>> {
    if !path.exists() {
        tracing::debug!("No provider override file at {:?}", path);
        return Ok(BTreeMap::new());
    }

    let malformed = |reason: String| AppError::MalformedOverrideSource {
        path: path.to_path_buf(),
        reason,
    };

    let contents = fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
    let document: Value = if contents.trim().is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str(&contents).map_err(|e| malformed(e.to_string()))?
    };

    let providers = match document.get("providers") {
        Some(Value::Mapping(mapping)) => mapping,
        Some(Value::Null) | None => return Ok(BTreeMap::new()),
        Some(_) => {
            tracing::warn!("'providers' in {:?} is not a mapping; ignoring", path);
            return Ok(BTreeMap::new());
        }
    };

    let mut overrides = BTreeMap::new();
    for (key, value) in providers {
        match (key.as_str(), value.as_str()) {
            (Some(name), Some(format)) => {
                overrides.insert(name.to_string(), format.to_string());
            }
            _ => tracing::warn!(
                "Ignoring non-string provider entry {:?}: {:?} in {:?}",
                key,
                value,
                path
            ),
        }
    }

    Ok(overrides)
}

/// Build the effective provider table.
///
/// `None`, a missing file, or a malformed file all yield the built-in
/// table unchanged.
pub fn load_effective_table(override_source: Option<&Path>) -> ProviderTable {
    let builtin = ProviderTable::builtin();

    let Some(path) = override_source else {
        return builtin;
    };

    match read_override_source(path) {
        Ok(overrides) => builtin.overlay(&overrides),
        Err(e) => {
            tracing::warn!("{}; using built-in providers only", e);
            builtin
        }
    }
}

/// Resolve a format name or provider name to an export format.
///
/// Exact format names are returned directly. Anything else is a provider
/// lookup in the effective table, defaulting to `messages`.
pub fn resolve_format(fmt_or_provider: &str, override_source: Option<&Path>) -> ExportFormat {
    if let Some(format) = ExportFormat::from_name(fmt_or_provider) {
        return format;
    }

    match load_effective_table(override_source).get(fmt_or_provider) {
        Some(format) => format,
        None => {
            if let Some(format) = near_format_name(fmt_or_provider) {
                tracing::warn!(
                    "'{}' is not a format name (did you mean '{}'?); \
                     format names are exact, defaulting to {}",
                    fmt_or_provider,
                    format,
                    ExportFormat::DEFAULT
                );
            } else {
                tracing::debug!(
                    "Provider '{}' not registered; defaulting to {}",
                    fmt_or_provider,
                    ExportFormat::DEFAULT
                );
            }
            ExportFormat::DEFAULT
        }
    }
}

/// Format whose name matches `input` once normalized, but not exactly.
fn near_format_name(input: &str) -> Option<ExportFormat> {
    ExportFormat::from_name(&normalize_provider(input)).filter(|f| f.as_str() != input)
}

/// Effective table as `(name, format)` pairs sorted by name.
pub fn list_effective(override_source: Option<&Path>) -> Vec<(String, ExportFormat)> {
    load_effective_table(override_source)
        .iter()
        .map(|(name, format)| (name.to_string(), format))
        .collect()
}

/// Ensure an override file exists at `path`, writing commented defaults.
///
/// An existing file is never touched. Parent directories are created.
pub fn materialize_default_override_source(path: &Path) -> AppResult<PathBuf> {
    if path.exists() {
        tracing::debug!("Provider override file already exists at {:?}", path);
        return Ok(path.to_path_buf());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, DEFAULT_OVERRIDE_SOURCE)?;
    tracing::info!("Created provider override file at {:?}", path);

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_overrides(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("providers.yaml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_builtin_provider_formats() {
        for (name, expected) in BUILTIN_PROVIDERS {
            assert_eq!(resolve_format(name, None), *expected, "provider {}", name);
        }
    }

    #[test]
    fn test_provider_format_mapping() {
        assert_eq!(resolve_format("openai", None), ExportFormat::Messages);
        assert_eq!(resolve_format("groq", None), ExportFormat::Messages);
        assert_eq!(resolve_format("deepseek", None), ExportFormat::Messages);
        assert_eq!(resolve_format("claude", None), ExportFormat::Markdown);
        assert_eq!(resolve_format("gemini", None), ExportFormat::Markdown);
        assert_eq!(resolve_format("generic", None), ExportFormat::Text);
    }

    #[test]
    fn test_provider_lookup_is_normalized() {
        assert_eq!(resolve_format("  Claude ", None), ExportFormat::Markdown);
        assert_eq!(resolve_format("OPENAI", None), ExportFormat::Messages);
    }

    #[test]
    fn test_unknown_provider_defaults_to_messages() {
        assert_eq!(resolve_format("some-new-provider", None), ExportFormat::Messages);
        assert_eq!(resolve_format("", None), ExportFormat::Messages);
    }

    #[test]
    fn test_near_format_names_fall_back_to_default() {
        assert_eq!(near_format_name(" markdown "), Some(ExportFormat::Markdown));
        assert_eq!(near_format_name("Text"), Some(ExportFormat::Text));
        assert_eq!(near_format_name("markdown"), None);
        assert_eq!(near_format_name("claude"), None);

        assert_eq!(resolve_format("MARKDOWN", None), ExportFormat::Messages);
        assert_eq!(resolve_format(" text ", None), ExportFormat::Messages);
    }

    #[test]
    fn test_explicit_format_bypasses_table() {
        let temp = TempDir::new().unwrap();
        // Reserved names never reach the table, so this cannot redirect "text"
        let path = write_overrides(&temp, "providers:\n  text: messages\n");
        assert_eq!(resolve_format("text", Some(path.as_path())), ExportFormat::Text);
        assert_eq!(resolve_format("markdown", Some(path.as_path())), ExportFormat::Markdown);
    }

    #[test]
    fn test_format_from_str_is_strict() {
        assert_eq!("messages".parse::<ExportFormat>().unwrap(), ExportFormat::Messages);
        assert!(matches!(
            "Messages".parse::<ExportFormat>(),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            "openai".parse::<ExportFormat>(),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_list_providers() {
        let providers = list_effective(None);
        assert!(providers.len() > 10);

        let names: Vec<&str> = providers.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"openai"));
        assert!(names.contains(&"groq"));
        assert!(names.contains(&"claude"));

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_list_providers_includes_custom() {
        let temp = TempDir::new().unwrap();
        let path = write_overrides(&temp, "providers:\n  acme-llm: messages\n");

        let providers = list_effective(Some(path.as_path()));
        assert!(providers.contains(&("acme-llm".to_string(), ExportFormat::Messages)));
        assert!(providers.iter().any(|(n, _)| n == "openai"));
    }

    #[test]
    fn test_load_merges_user_providers() {
        let temp = TempDir::new().unwrap();
        let path = write_overrides(
            &temp,
            "providers:\n  my-company-llm: markdown\n  my-local: text\n",
        );

        let merged = load_effective_table(Some(path.as_path()));
        assert_eq!(merged.get("my-company-llm"), Some(ExportFormat::Markdown));
        assert_eq!(merged.get("my-local"), Some(ExportFormat::Text));
        assert_eq!(merged.get("openai"), Some(ExportFormat::Messages));
        assert_eq!(merged.get("claude"), Some(ExportFormat::Markdown));
    }

    #[test]
    fn test_effective_table_keeps_every_builtin() {
        let temp = TempDir::new().unwrap();
        let path = write_overrides(&temp, "providers:\n  claude: messages\n  extra: text\n");

        let merged = load_effective_table(Some(path.as_path()));
        for (name, _) in BUILTIN_PROVIDERS {
            assert!(merged.contains(name), "missing builtin {}", name);
        }
        assert_eq!(merged.len(), BUILTIN_PROVIDERS.len() + 1);
    }

    #[test]
    fn test_user_override_wins_over_builtin() {
        let temp = TempDir::new().unwrap();
        let path = write_overrides(&temp, "providers:\n  claude: messages\n");

        assert_eq!(
            load_effective_table(Some(path.as_path())).get("claude"),
            Some(ExportFormat::Messages)
        );
        assert_eq!(resolve_format("claude", Some(path.as_path())), ExportFormat::Messages);
    }

    #[test]
    fn test_user_override_key_is_normalized() {
        let temp = TempDir::new().unwrap();
        let path = write_overrides(&temp, "providers:\n  \" Claude \": text\n");

        let merged = load_effective_table(Some(path.as_path()));
        assert_eq!(merged.get("claude"), Some(ExportFormat::Text));
        assert_eq!(merged.len(), BUILTIN_PROVIDERS.len());
    }

    #[test]
    fn test_invalid_formats_are_dropped() {
        let temp = TempDir::new().unwrap();
        let path = write_overrides(
            &temp,
            "providers:\n  bad-provider: nonexistent_format\n  claude: MESSAGES\n",
        );

        let merged = load_effective_table(Some(path.as_path()));
        assert!(!merged.contains("bad-provider"));
        assert_eq!(merged.get("claude"), Some(ExportFormat::Markdown));
    }

    #[test]
    fn test_reserved_names_are_dropped() {
        let temp = TempDir::new().unwrap();
        let path = write_overrides(&temp, "providers:\n  markdown: text\n  messages: text\n");

        let merged = load_effective_table(Some(path.as_path()));
        assert_eq!(merged, ProviderTable::builtin());
    }

    #[test]
    fn test_non_string_entries_are_dropped() {
        let temp = TempDir::new().unwrap();
        let path = write_overrides(
            &temp,
            "providers:\n  42: markdown\n  listy: [markdown]\n  ok-one: markdown\n",
        );

        let merged = load_effective_table(Some(path.as_path()));
        assert!(!merged.contains("listy"));
        assert_eq!(merged.get("ok-one"), Some(ExportFormat::Markdown));
    }

    #[test]
    fn test_load_no_file() {
        let temp = TempDir::new().unwrap();
        let merged = load_effective_table(Some(temp.path().join("providers.yaml").as_path()));
        assert_eq!(merged.get("openai"), Some(ExportFormat::Messages));
        assert_eq!(merged, ProviderTable::builtin());
    }

    #[test]
    fn test_load_none_location() {
        let merged = load_effective_table(None);
        assert_eq!(merged.get("openai"), Some(ExportFormat::Messages));
    }

    #[test]
    fn test_missing_source_equals_empty_providers() {
        let temp = TempDir::new().unwrap();
        let empty = write_overrides(&temp, "providers: {}\n");

        assert_eq!(load_effective_table(None), load_effective_table(Some(empty.as_path())));
    }

    #[test]
    fn test_unrecognized_structure_means_no_overrides() {
        let temp = TempDir::new().unwrap();
        for contents in ["- a\n- b\n", "other: {x: markdown}\n", "providers: markdown\n", ""] {
            let path = write_overrides(&temp, contents);
            assert_eq!(
                load_effective_table(Some(path.as_path())),
                ProviderTable::builtin(),
                "contents {:?}",
                contents
            );
        }
    }

    #[test]
    fn test_malformed_source_degrades_to_builtin() {
        let temp = TempDir::new().unwrap();
        let path = write_overrides(&temp, "providers:\n  claude: [unclosed\n");

        assert!(matches!(
            read_override_source(&path),
            Err(AppError::MalformedOverrideSource { .. })
        ));
        assert_eq!(load_effective_table(Some(path.as_path())), ProviderTable::builtin());
        assert_eq!(resolve_format("claude", Some(path.as_path())), ExportFormat::Markdown);
    }

    #[test]
    fn test_materialize_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/providers.yaml");

        let created = materialize_default_override_source(&path).unwrap();
        assert_eq!(created, path);
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("providers:"));

        // Defaults carry documentation only, no active entries
        assert_eq!(load_effective_table(Some(path.as_path())), ProviderTable::builtin());
    }

    #[test]
    fn test_materialize_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("providers.yaml");

        materialize_default_override_source(&path).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        materialize_default_override_source(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), first);

        fs::write(&path, "providers:\n  my-llm: markdown\n").unwrap();
        materialize_default_override_source(&path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("my-llm"));
    }
}
