//! Template rendering for prompt content.
//!
//! Placeholders use `{{name}}` syntax and are evaluated by Handlebars in
//! strict mode: every referenced name must be bound or the render fails.
//! Each call builds a fresh registry with no partials, no template
//! directories and no custom helpers, so a template can only read the
//! variables it is given.
//!
//! Strict mode does not cover names passed to the built-in block helpers
//! (`{{#if name}}`, `{{#with name}}`, ...) or keys read through `lookup`.
//! Those are checked against the bindings before Handlebars runs.

use crate::store::PromptRepository;
use handlebars::{Handlebars, RenderError, RenderErrorReason};
use once_cell::sync::Lazy;
use prompter_core::{AppError, AppResult};
use regex::Regex;
use std::collections::HashMap;

/// `{{name}}`, `{{ name }}`, `{{{name}}}`, `{{~name~}}`
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\{?~?\s*([A-Za-z_][\w.\-]*)\s*~?\}?\}\}").unwrap()
});

/// First parameter of a built-in block helper, including `{{else if name}}`.
static HELPER_PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{~?\s*(?:#\s*|else\s+)(?:if|unless|with|each)\s+([A-Za-z_][\w.\-]*)")
        .unwrap()
});

/// String key read from the root context with `lookup`.
static LOOKUP_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{\{\{?~?\s*lookup\s+(?:this|@root)\s+"([^"]+)""#).unwrap()
});

/// Any `{{ ... }}` tag, capturing its trimmed body.
static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\{?~?\s*([^{}]*?)\s*~?\}?\}\}").unwrap());

/// Words that look like names but never refer to a variable.
const KEYWORDS: &[&str] = &["else", "this", "true", "false", "null", "undefined"];

/// Render prompt content with the given variables.
///
/// # Errors
/// - `UndefinedVariable` if a placeholder has no binding
/// - `Prompt` if the content is not a valid template
///
/// # Example
/// ```
/// use prompter_prompt::render;
/// use std::collections::HashMap;
///
/// let mut vars = HashMap::new();
/// vars.insert("name".to_string(), "World".to_string());
/// assert_eq!(render("Hello {{name}}!", &vars).unwrap(), "Hello World!");
/// ```
pub fn render(content: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    if let Some(name) = unbound_helper_reference(content, variables) {
        return Err(AppError::UndefinedVariable { name });
    }

    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    // Prompts are plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .render_template(content, variables)
        .map_err(|e| map_render_error(e, content, variables))
}

/// Load a record from a repository and render its content.
pub fn render_record(
    repo: &dyn PromptRepository,
    id: &str,
    variables: &HashMap<String, String>,
) -> AppResult<String> {
    let record = repo.get(id)?;
    tracing::debug!(
        "Rendering prompt {} with {} variable(s)",
        record.id,
        variables.len()
    );
    render(&record.content, variables)
}

/// Variable names referenced by the content, in first-seen order.
///
/// Covers simple placeholders, block helper parameters and `lookup` keys.
pub fn referenced_variables(content: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();
    for pattern in [&*PLACEHOLDER, &*HELPER_PARAM, &*LOOKUP_KEY] {
        found.extend(captured_names(pattern, content));
    }
    found.sort_by_key(|(offset, _)| *offset);

    let mut names: Vec<String> = Vec::new();
    for (_, name) in found {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn captured_names(pattern: &Regex, content: &str) -> Vec<(usize, String)> {
    pattern
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .filter(|m| !is_keyword(m.as_str()))
        .map(|m| (m.start(), m.as_str().to_string()))
        .collect()
}

fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&root_segment(name))
}

fn root_segment(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

fn is_bound(name: &str, variables: &HashMap<String, String>) -> bool {
    variables.contains_key(name) || variables.contains_key(root_segment(name))
}

/// First helper parameter or `lookup` key with no binding.
fn unbound_helper_reference(content: &str, variables: &HashMap<String, String>) -> Option<String> {
    let mut found = captured_names(&HELPER_PARAM, content);
    found.extend(captured_names(&LOOKUP_KEY, content));
    found.sort_by_key(|(offset, _)| *offset);

    found
        .into_iter()
        .map(|(_, name)| name)
        .find(|name| !is_bound(name, variables))
}

fn map_render_error(
    err: RenderError,
    content: &str,
    variables: &HashMap<String, String>,
) -> AppError {
    match err.reason() {
        RenderErrorReason::MissingVariable(name) => {
            let name = name
                .clone()
                .filter(|n| !n.is_empty())
                .or_else(|| {
                    referenced_variables(content)
                        .into_iter()
                        .find(|n| !is_bound(n, variables))
                })
                .unwrap_or_else(|| offending_expression(content, err.line_no));
            AppError::UndefinedVariable { name }
        }
        _ => AppError::Prompt(format!("Failed to render template: {}", err)),
    }
}

/// Body of the first tag on the reported line, or in the whole content.
fn offending_expression(content: &str, line_no: Option<usize>) -> String {
    let line = line_no
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| content.lines().nth(i));

    line.into_iter()
        .chain(std::iter::once(content))
        .flat_map(|text| TAG.captures_iter(text).filter_map(|caps| caps.get(1)))
        .map(|m| m.as_str().trim().to_string())
        .find(|body| !body.is_empty())
        .unwrap_or_else(|| "<template>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PromptStore;
    use crate::types::NewPrompt;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render() {
        let result = render("Hello {{name}}!", &vars(&[("name", "World")])).unwrap();
        assert_eq!(result, "Hello World!");
    }

    #[test]
    fn test_render_with_spaces_inside_braces() {
        let result = render("Hello {{ name }}!", &vars(&[("name", "World")])).unwrap();
        assert_eq!(result, "Hello World!");
    }

    #[test]
    fn test_render_missing_var() {
        match render("Hello {{name}}!", &HashMap::new()) {
            Err(AppError::UndefinedVariable { name }) => assert_eq!(name, "name"),
            other => panic!("Expected UndefinedVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_render_reports_the_unbound_name() {
        let result = render("{{greeting}}, {{place}}", &vars(&[("greeting", "Hi")]));
        match result {
            Err(AppError::UndefinedVariable { name }) => assert_eq!(name, "place"),
            other => panic!("Expected UndefinedVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_render_without_placeholders_is_identity() {
        let content = "No placeholders here.\n- just markdown\n";
        let bindings = vars(&[("unused", "value")]);
        assert_eq!(render(content, &bindings).unwrap(), content);
        assert_eq!(render(content, &HashMap::new()).unwrap(), content);
    }

    #[test]
    fn test_render_does_not_escape_html() {
        let result = render("Code: {{snippet}}", &vars(&[("snippet", "<a href=\"x\">&</a>")]));
        assert_eq!(result.unwrap(), "Code: <a href=\"x\">&</a>");
    }

    #[test]
    fn test_render_is_repeatable() {
        let bindings = vars(&[("name", "World")]);
        let first = render("Hi {{name}}", &bindings).unwrap();
        let second = render("Hi {{name}}", &bindings).unwrap();
        assert_eq!(first, second);
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn test_render_rejects_partials() {
        let result = render("{{> secrets}}", &HashMap::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_render_invalid_template() {
        let result = render("Hello {{#if name}}", &vars(&[("name", "x")]));
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    fn assert_undefined(result: AppResult<String>, expected: &str) {
        match result {
            Err(AppError::UndefinedVariable { name }) => assert_eq!(name, expected),
            other => panic!("Expected UndefinedVariable({}), got {:?}", expected, other),
        }
    }

    #[test]
    fn test_render_if_on_unbound_name_fails() {
        assert_undefined(render("{{#if missing}}yes{{/if}}done", &HashMap::new()), "missing");
    }

    #[test]
    fn test_render_unless_on_unbound_name_fails() {
        assert_undefined(
            render("{{#unless missing}}shown{{/unless}}", &HashMap::new()),
            "missing",
        );
    }

    #[test]
    fn test_render_with_on_unbound_name_fails() {
        assert_undefined(
            render("{{#with missing}}x{{else}}fallback{{/with}}", &HashMap::new()),
            "missing",
        );
    }

    #[test]
    fn test_render_else_if_on_unbound_name_fails() {
        let bindings = vars(&[("flag", "")]);
        assert_undefined(
            render("{{#if flag}}a{{else if other}}b{{/if}}", &bindings),
            "other",
        );
    }

    #[test]
    fn test_render_block_helpers_with_bound_names() {
        let bindings = vars(&[("flag", "on"), ("empty", "")]);
        assert_eq!(
            render("{{#if flag}}yes{{/if}}|{{#unless empty}}no{{/unless}}", &bindings).unwrap(),
            "yes|no"
        );
    }

    #[test]
    fn test_render_lookup_names_the_missing_key() {
        assert_undefined(render("[{{lookup this \"missing\"}}]", &HashMap::new()), "missing");

        let bindings = vars(&[("present", "here")]);
        assert_eq!(
            render("[{{lookup this \"present\"}}]", &bindings).unwrap(),
            "[here]"
        );
    }

    #[test]
    fn test_offending_expression_is_never_empty() {
        assert_eq!(offending_expression("a\n{{lookup ../x y}}", Some(2)), "lookup ../x y");
        assert_eq!(offending_expression("{{  }} {{foo bar}}", None), "foo bar");
        assert_eq!(offending_expression("no tags", Some(7)), "<template>");
    }

    #[test]
    fn test_referenced_variables() {
        let names = referenced_variables("{{a}} and {{ b }} then {{a}} and {{{c}}}");
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_referenced_variables_skips_keywords() {
        let content = "{{#each items}}{{this}}{{@index}}{{/each}}{{#if a}}x{{else}}y{{/if}}\
                       {{this.name}}{{lookup this \"k\"}}";
        assert_eq!(referenced_variables(content), vec!["items", "a", "k"]);
    }

    #[test]
    fn test_render_record() {
        let temp = TempDir::new().unwrap();
        let store = PromptStore::new(temp.path());
        store
            .create(
                NewPrompt::named("test-prompt")
                    .with_content("Hello {{name}}, welcome to {{place}}."),
            )
            .unwrap();

        let result = render_record(
            &store,
            "test-prompt",
            &vars(&[("name", "Ada"), ("place", "Rust")]),
        )
        .unwrap();
        assert_eq!(result, "Hello Ada, welcome to Rust.");
    }

    #[test]
    fn test_render_record_not_found() {
        let temp = TempDir::new().unwrap();
        let store = PromptStore::new(temp.path());
        let result = render_record(&store, "missing", &HashMap::new());
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
