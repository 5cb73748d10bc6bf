use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{schemars, tool, tool_handler, tool_router, ServerHandler};
use serde::Deserialize;

use crate::checker::{spellcheck_text, SpellcheckReport};
use crate::dictionary::WordFrequency;
use crate::error::McpSpellcheckError;
use crate::report::format_issue;

#[derive(Clone)]
pub struct McpSpellcheckServer {
    github: Arc<octocrab::Octocrab>,
    default_owner: Option<String>,
    dictionary: Arc<WordFrequency>,
    allow_list: Arc<[String]>,
    tool_router: ToolRouter<Self>,
}

// -- Tool parameter types --

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SpellcheckParams {
    #[schemars(description = "The raw markdown text to spellcheck")]
    pub text: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SpellcheckReportParams {
    #[schemars(description = "The raw markdown text to spellcheck")]
    pub text: String,

    #[schemars(description = "Path of the file the text came from, used in the issue title")]
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FileContentsParams {
    #[schemars(description = "Repository owner (user or org)")]
    #[serde(default)]
    pub owner: Option<String>,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "File path within the repository")]
    pub path: String,

    #[schemars(description = "Git ref (branch, tag, or SHA). Defaults to the repo's default branch")]
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateIssueParams {
    #[schemars(description = "Repository owner (user or org)")]
    #[serde(default)]
    pub owner: Option<String>,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Issue title")]
    pub title: String,

    #[schemars(description = "Issue body (markdown)")]
    #[serde(default)]
    pub body: Option<String>,

    #[schemars(description = "Label names to apply")]
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

/// A decoded file fetched from a repository.
struct FileContents {
    path: String,
    name: Option<String>,
    size: Option<u64>,
    sha: Option<String>,
    content: String,
}

impl McpSpellcheckServer {
    pub fn new(
        github: octocrab::Octocrab,
        default_owner: Option<String>,
        dictionary: WordFrequency,
        allow_list: Vec<String>,
    ) -> Self {
        Self {
            github: Arc::new(github),
            default_owner,
            dictionary: Arc::new(dictionary),
            allow_list: allow_list.into(),
            tool_router: Self::tool_router(),
        }
    }

    fn resolve_owner(&self, param: Option<&str>) -> Result<String, McpSpellcheckError> {
        param
            .map(String::from)
            .or_else(|| self.default_owner.clone())
            .ok_or_else(|| {
                McpSpellcheckError::MissingParam(
                    "owner is required (or set --owner default)".to_string(),
                )
            })
    }

    fn check(&self, text: &str) -> SpellcheckReport {
        spellcheck_text(text, &self.dictionary, &*self.allow_list)
    }

    fn err(&self, e: McpSpellcheckError) -> ErrorData {
        e.to_mcp_error()
    }

    async fn fetch_file(
        &self,
        params: &FileContentsParams,
    ) -> Result<FileContents, McpSpellcheckError> {
        let owner = self.resolve_owner(params.owner.as_deref())?;
        sanitize(&owner, "owner", GITHUB_NAME_FORBIDDEN)?;
        sanitize(&params.repo, "repo", GITHUB_NAME_FORBIDDEN)?;
        sanitize(&params.path, "path", URL_VALUE_FORBIDDEN)?;

        let mut route = format!("/repos/{}/{}/contents/{}", owner, params.repo, params.path);
        if let Some(ref git_ref) = params.git_ref {
            sanitize(git_ref, "ref", URL_VALUE_FORBIDDEN)?;
            route.push_str(&format!("?ref={}", git_ref));
        }

        tracing::debug!(%route, "Fetching file contents");
        let response: serde_json::Value = self.github.get(&route, None::<&()>).await?;

        if response.is_array() {
            return Err(McpSpellcheckError::Decode(format!(
                "{} is a directory, not a file",
                params.path
            )));
        }

        let content = response
            .get("content")
            .and_then(|c| c.as_str())
            .map(|c| decode_content(c).unwrap_or_else(|| "[binary content]".to_string()))
            .unwrap_or_default();

        Ok(FileContents {
            path: response
                .get("path")
                .and_then(|p| p.as_str())
                .unwrap_or(&params.path)
                .to_string(),
            name: response.get("name").and_then(|n| n.as_str()).map(String::from),
            size: response.get("size").and_then(|s| s.as_u64()),
            sha: response.get("sha").and_then(|s| s.as_str()).map(String::from),
            content,
        })
    }
}

/// Decode GitHub's base64 file content, which arrives wrapped with newlines.
/// Returns `None` for content that is not valid base64 or not UTF-8.
fn decode_content(encoded: &str) -> Option<String> {
    use base64::Engine;
    let cleaned: String = encoded.chars().filter(|ch| !ch.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(&cleaned)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
}

/// Characters rejected in owner and repo names used in raw API routes.
const GITHUB_NAME_FORBIDDEN: &[char] = &['/', '?', '#', '%', '\0', ' ', '\n', '\t'];

/// Characters rejected in file paths and refs. Slashes are allowed here for
/// branch names like `feature/foo` and paths like `docs/README.md`.
const URL_VALUE_FORBIDDEN: &[char] = &['?', '#', '&', '\0', '\n', '\r', '\t'];

/// Reject an empty value or one containing any `forbidden` character, so it
/// cannot inject into a raw API route.
fn sanitize(value: &str, field: &str, forbidden: &[char]) -> Result<(), McpSpellcheckError> {
    if value.is_empty() {
        return Err(McpSpellcheckError::MissingParam(format!(
            "{} must not be empty",
            field
        )));
    }
    if let Some(ch) = value.chars().find(|ch| forbidden.contains(ch)) {
        return Err(McpSpellcheckError::MissingParam(format!(
            "{} contains invalid character {:?}",
            field, ch
        )));
    }
    Ok(())
}

fn json_result(value: serde_json::Value) -> CallToolResult {
    let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string());
    CallToolResult::success(vec![Content::text(text)])
}

// -- MCP tool handlers --

#[tool_router]
impl McpSpellcheckServer {
    #[tool(
        name = "spellcheck_text",
        description = "Check for misspelled words in a markdown document, ignoring code blocks, links, images, and formatting. Returns the misspelled words and a suggested correction (or null) for each"
    )]
    async fn spellcheck_text(
        &self,
        Parameters(params): Parameters<SpellcheckParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::debug!(bytes = params.text.len(), "spellcheck_text called");
        let report = self.check(&params.text);
        Ok(json_result(serde_json::json!(report)))
    }

    #[tool(
        name = "spellcheck_report",
        description = "Spellcheck a markdown document and draft a GitHub issue (title and body) listing the misspelled words and suggested corrections"
    )]
    async fn spellcheck_report(
        &self,
        Parameters(params): Parameters<SpellcheckReportParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let path = params.path.as_deref().unwrap_or("README.md");
        let report = self.check(&params.text);
        let draft = format_issue(&report, path);
        Ok(json_result(serde_json::json!({
            "misspelled": report.misspelled,
            "suggestions": report.suggestions,
            "title": draft.title,
            "body": draft.body,
        })))
    }

    #[tool(
        name = "get_file_contents",
        description = "Get file content from a repository at a specific ref"
    )]
    async fn get_file_contents(
        &self,
        Parameters(params): Parameters<FileContentsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let file = self.fetch_file(&params).await.map_err(|e| self.err(e))?;

        Ok(json_result(serde_json::json!({
            "path": file.path,
            "name": file.name,
            "size": file.size,
            "content": file.content,
            "sha": file.sha,
        })))
    }

    #[tool(
        name = "spellcheck_file",
        description = "Read a file from a repository and spellcheck it as markdown. Returns the misspelled words and suggested corrections"
    )]
    async fn spellcheck_file(
        &self,
        Parameters(params): Parameters<FileContentsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let file = self.fetch_file(&params).await.map_err(|e| self.err(e))?;
        let report = self.check(&file.content);

        tracing::info!(
            path = %file.path,
            misspelled = report.misspelled.len(),
            "Spellchecked repository file"
        );

        Ok(json_result(serde_json::json!({
            "path": file.path,
            "sha": file.sha,
            "misspelled": report.misspelled,
            "suggestions": report.suggestions,
        })))
    }

    #[tool(
        name = "create_issue",
        description = "Open a new issue in a repository"
    )]
    async fn create_issue(
        &self,
        Parameters(params): Parameters<CreateIssueParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let owner = self
            .resolve_owner(params.owner.as_deref())
            .map_err(|e| self.err(e))?;
        sanitize(&owner, "owner", GITHUB_NAME_FORBIDDEN).map_err(|e| self.err(e))?;
        sanitize(&params.repo, "repo", GITHUB_NAME_FORBIDDEN).map_err(|e| self.err(e))?;
        if params.title.trim().is_empty() {
            return Err(self.err(McpSpellcheckError::MissingParam(
                "title must not be empty".to_string(),
            )));
        }

        let handler = self.github.issues(&owner, &params.repo);
        let mut request = handler.create(&params.title);
        if let Some(body) = &params.body {
            request = request.body(body.clone());
        }
        if let Some(labels) = &params.labels {
            request = request.labels(labels.clone());
        }
        let issue = request
            .send()
            .await
            .map_err(|e| self.err(McpSpellcheckError::GitHub(e)))?;

        tracing::info!(
            repo = %format!("{}/{}", owner, params.repo),
            number = issue.number,
            "Created issue"
        );

        Ok(json_result(serde_json::json!({
            "repo": format!("{}/{}", owner, params.repo),
            "number": issue.number,
            "title": issue.title,
            "url": issue.html_url.to_string(),
        })))
    }
}

#[tool_handler]
impl ServerHandler for McpSpellcheckServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mcp-spellcheck".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Spellcheck server. Use spellcheck_text to check markdown text, \
                 get_file_contents to read a repository file, spellcheck_file to read \
                 and check one in a single call, spellcheck_report to draft an issue \
                 from the results, and create_issue to open it."
                    .to_string(),
            ),
        }
    }
}
