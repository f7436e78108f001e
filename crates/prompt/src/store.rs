//! File-backed prompt store.
//!
//! Each record is a markdown file `<id>.md` with a YAML front matter block:
//!
//! ```text
//! ---
//! name: Code Review
//! tool: claude
//! ---
//! Review the following {{language}} code.
//! ```

use crate::types::{NewPrompt, PromptRecord, PromptSummary, PromptUpdate, DEFAULT_TOOL};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use prompter_core::{AppError, AppResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const FRONT_MATTER_DELIMITER: &str = "---";
const RECORD_EXTENSION: &str = "md";

static UNSAFE_ID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\-]").unwrap());
static DASH_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// Storage contract for prompt records.
///
/// Export and render only ever call `get`; the remaining operations exist
/// for the CLI.
pub trait PromptRepository {
    /// Load a record by id. Fails with `NotFound` if absent.
    fn get(&self, id: &str) -> AppResult<PromptRecord>;

    /// List all records, ordered by id.
    fn list(&self) -> AppResult<Vec<PromptSummary>>;

    /// Create a record. Fails with `AlreadyExists` if the derived id is taken.
    fn create(&self, data: NewPrompt) -> AppResult<PromptRecord>;

    /// Apply a partial update, renaming the record if its name changes.
    fn update(&self, id: &str, data: PromptUpdate) -> AppResult<PromptRecord>;

    /// Remove a record. Fails with `NotFound` if absent.
    fn delete(&self, id: &str) -> AppResult<()>;
}

/// Derive a record id from a name.
///
/// Lowercases, turns anything that is not a word character or `-` into
/// `-`, and collapses dash runs. Names with nothing usable are rejected.
pub fn sanitize_id(name: &str) -> AppResult<String> {
    let lowered = name.trim().to_lowercase();
    let replaced = UNSAFE_ID_CHARS.replace_all(&lowered, "-");
    let collapsed = DASH_RUNS.replace_all(&replaced, "-");
    let id = collapsed.trim_matches('-');

    if id.is_empty() {
        return Err(AppError::InvalidArgument(format!(
            "Invalid prompt name: {:?}",
            name
        )));
    }

    Ok(id.to_string())
}

/// Metadata stored in the front matter block.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FrontMatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variables: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl From<&PromptRecord> for FrontMatter {
    fn from(record: &PromptRecord) -> Self {
        Self {
            name: Some(record.name.clone()),
            description: Some(record.description.clone()),
            tags: Some(record.tags.clone()),
            tool: Some(record.tool.clone()),
            variables: Some(record.variables.clone()),
            category: Some(record.category.clone()),
            created_at: Some(record.created_at),
            updated_at: Some(record.updated_at),
        }
    }
}

/// Prompt store rooted at a directory of markdown files.
#[derive(Debug, Clone)]
pub struct PromptStore {
    directory: PathBuf,
}

impl PromptStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Create the store directory if it does not exist.
    pub fn init(&self) -> AppResult<()> {
        fs::create_dir_all(&self.directory)?;
        tracing::debug!("Initialized prompt store at {:?}", self.directory);
        Ok(())
    }

    fn record_path(&self, id: &str) -> AppResult<PathBuf> {
        let safe = sanitize_id(id)?;
        let path = self
            .directory
            .join(format!("{}.{}", safe, RECORD_EXTENSION));

        // Sanitized ids cannot contain separators; this guards future changes.
        if path.parent() != Some(self.directory.as_path()) {
            return Err(AppError::InvalidArgument(format!("Invalid prompt id: {:?}", id)));
        }

        Ok(path)
    }

    fn load(&self, path: &Path) -> AppResult<PromptRecord> {
        let raw = fs::read_to_string(path)?;
        let (front, body) = split_front_matter(&raw);

        let meta: FrontMatter = match front {
            Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml).map_err(|e| {
                AppError::Prompt(format!("Failed to parse front matter {:?}: {}", path, e))
            })?,
            _ => FrontMatter::default(),
        };

        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| AppError::Prompt(format!("Invalid record file name: {:?}", path)))?
            .to_string();

        let (created_fallback, modified_fallback) = file_times(path);

        Ok(PromptRecord {
            name: meta.name.unwrap_or_else(|| id.clone()),
            id,
            description: meta.description.unwrap_or_default(),
            content: strip_trailing_newline(body).to_string(),
            tags: meta.tags.unwrap_or_default(),
            tool: meta.tool.unwrap_or_else(|| DEFAULT_TOOL.to_string()),
            variables: meta.variables.unwrap_or_default(),
            category: meta.category.unwrap_or_default(),
            created_at: meta.created_at.unwrap_or(created_fallback),
            updated_at: meta.updated_at.unwrap_or(modified_fallback),
        })
    }

    fn save(&self, record: &PromptRecord) -> AppResult<PathBuf> {
        let path = self.record_path(&record.id)?;
        let yaml = serde_yaml::to_string(&FrontMatter::from(record))?;

        let mut document = String::with_capacity(yaml.len() + record.content.len() + 16);
        document.push_str(FRONT_MATTER_DELIMITER);
        document.push('\n');
        document.push_str(&yaml);
        document.push_str(FRONT_MATTER_DELIMITER);
        document.push('\n');
        document.push_str(&record.content);
        document.push('\n');

        fs::write(&path, document)?;
        tracing::debug!("Saved prompt {} to {:?}", record.id, path);
        Ok(path)
    }
}

impl PromptRepository for PromptStore {
    fn get(&self, id: &str) -> AppResult<PromptRecord> {
        let path = self.record_path(id)?;
        tracing::debug!("Loading prompt from: {:?}", path);

        if !path.exists() {
            return Err(AppError::NotFound(id.to_string()));
        }

        self.load(&path)
    }

    fn list(&self) -> AppResult<Vec<PromptSummary>> {
        if !self.directory.exists() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = walkdir::WalkDir::new(&self.directory)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| {
                p.is_file() && p.extension().and_then(|s| s.to_str()) == Some(RECORD_EXTENSION)
            })
            .collect();
        paths.sort();

        let mut items = Vec::with_capacity(paths.len());
        for path in paths {
            let record = self.load(&path)?;
            items.push(PromptSummary::from(&record));
        }

        Ok(items)
    }

    fn create(&self, data: NewPrompt) -> AppResult<PromptRecord> {
        let now = Utc::now();
        let record = PromptRecord {
            id: sanitize_id(&data.name)?,
            name: data.name,
            description: data.description,
            content: data.content,
            tags: data.tags,
            tool: data.tool,
            variables: data.variables,
            category: data.category,
            created_at: now,
            updated_at: now,
        };

        if self.record_path(&record.id)?.exists() {
            return Err(AppError::AlreadyExists(record.id));
        }

        self.save(&record)?;
        tracing::info!("Created prompt: {}", record.id);
        Ok(record)
    }

    fn update(&self, id: &str, data: PromptUpdate) -> AppResult<PromptRecord> {
        let mut record = self.get(id)?;
        let old_path = self.record_path(&record.id)?;

        let renamed_id = match data.name.as_deref() {
            Some(name) => Some(sanitize_id(name)?).filter(|new_id| *new_id != record.id),
            None => None,
        };

        data.apply_to(&mut record);
        record.updated_at = Utc::now();

        if let Some(new_id) = renamed_id {
            if self.record_path(&new_id)?.exists() {
                return Err(AppError::AlreadyExists(new_id));
            }
            record.id = new_id;
            self.save(&record)?;
            fs::remove_file(&old_path)?;
            tracing::info!("Renamed prompt {} to {}", id, record.id);
            return Ok(record);
        }

        self.save(&record)?;
        Ok(record)
    }

    fn delete(&self, id: &str) -> AppResult<()> {
        let path = self.record_path(id)?;
        if !path.exists() {
            return Err(AppError::NotFound(id.to_string()));
        }
        fs::remove_file(&path)?;
        tracing::info!("Deleted prompt: {}", id);
        Ok(())
    }
}

/// Split a document into its front matter YAML and body.
///
/// Returns `None` for the YAML when the document does not open with a
/// delimiter line or never closes it; the whole input is then the body.
fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let rest = match raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))
    {
        Some(rest) => rest,
        None => return (None, raw),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == FRONT_MATTER_DELIMITER {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, raw)
}

fn strip_trailing_newline(body: &str) -> &str {
    body.strip_suffix("\r\n")
        .or_else(|| body.strip_suffix('\n'))
        .unwrap_or(body)
}

/// Creation and modification times of a file, falling back to now.
fn file_times(path: &Path) -> (DateTime<Utc>, DateTime<Utc>) {
    let now = Utc::now();
    let Ok(meta) = fs::metadata(path) else {
        return (now, now);
    };

    let modified = meta.modified().map(DateTime::<Utc>::from).unwrap_or(now);
    let created = meta.created().map(DateTime::<Utc>::from).unwrap_or(modified);
    (created, modified)
}
