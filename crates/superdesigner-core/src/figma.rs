//! Figma references and the comments REST endpoint.
//!
//! `figma.md` in a project's context folder holds one or more design URLs,
//! optionally with explicit `FileKey:` / `NodeId:` override lines. Posting
//! is a plain blocking `POST /files/{key}/comments` per comment.

use crate::comment::ReviewComment;
use crate::error::{DesignError, Result};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.figma.com/v1";
pub const TOKEN_ENV: &str = "FIGMA_ACCESS_TOKEN";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

static FILE_KEY_URL_RE: OnceLock<Regex> = OnceLock::new();
static FILE_KEY_LINE_RE: OnceLock<Regex> = OnceLock::new();
static NODE_ID_URL_RE: OnceLock<Regex> = OnceLock::new();
static NODE_ID_LINE_RE: OnceLock<Regex> = OnceLock::new();

// ---------------------------------------------------------------------------
// Reference parsing
// ---------------------------------------------------------------------------

/// File key from a `figma.com/file/<KEY>` or `figma.com/design/<KEY>` URL,
/// falling back to a `FileKey: <KEY>` line.
pub fn extract_file_key(content: &str) -> Option<String> {
    let url = FILE_KEY_URL_RE
        .get_or_init(|| Regex::new(r"figma\.com/(?:file|design)/([a-zA-Z0-9]+)").unwrap());
    let line = FILE_KEY_LINE_RE.get_or_init(|| Regex::new(r"(?m)^FileKey:\s*([a-zA-Z0-9]+)").unwrap());

    url.captures(content)
        .or_else(|| line.captures(content))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Node id from the first `node-id=12-345` / `node-id=12:345` URL parameter,
/// falling back to a `NodeId: 12:345` line. Always returned in colon form,
/// which is what the API expects.
pub fn extract_node_id(content: &str) -> Option<String> {
    let url = NODE_ID_URL_RE.get_or_init(|| Regex::new(r"node-id=(\d+[-:]\d+)").unwrap());
    let line = NODE_ID_LINE_RE.get_or_init(|| Regex::new(r"(?m)^NodeId:\s*(\d+[:-]\d+)").unwrap());

    url.captures(content)
        .or_else(|| line.captures(content))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().replacen('-', ":", 1))
}

/// Both identifiers parsed from a `figma.md` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FigmaRef {
    pub file_key: Option<String>,
    pub node_id: Option<String>,
}

impl FigmaRef {
    pub fn parse(content: &str) -> Self {
        Self {
            file_key: extract_file_key(content),
            node_id: extract_node_id(content),
        }
    }

    pub fn file_url(file_key: &str) -> String {
        format!("https://www.figma.com/file/{file_key}")
    }
}

// ---------------------------------------------------------------------------
// Comment formatting
// ---------------------------------------------------------------------------

/// Flatten a parsed comment into the single text body Figma displays.
pub fn format_comment(comment: &ReviewComment) -> String {
    let mut parts = vec![format!("[{}]", comment.kind), comment.message.clone()];
    if !comment.why.is_empty() {
        parts.push(format!("\n\n📎 {}", comment.why));
    }
    parts.join(" ")
}

// ---------------------------------------------------------------------------
// REST client
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct NodeOffset {
    x: i32,
    y: i32,
}

#[derive(Debug, Serialize)]
struct ClientMeta<'a> {
    node_id: &'a str,
    node_offset: NodeOffset,
}

#[derive(Debug, Serialize)]
struct PostCommentBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_meta: Option<ClientMeta<'a>>,
}

pub struct FigmaClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

impl FigmaClient {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Post one comment to a file, pinned to `node_id` when given.
    pub fn post_comment(&self, file_key: &str, message: &str, node_id: Option<&str>) -> Result<()> {
        let body = PostCommentBody {
            message,
            client_meta: node_id.map(|id| ClientMeta {
                node_id: id,
                node_offset: NodeOffset { x: 0, y: 0 },
            }),
        };
        let url = format!("{}/files/{}/comments", self.api_base, file_key);
        tracing::debug!(%url, node_id = ?node_id, "posting figma comment");

        let resp = self
            .http
            .post(&url)
            .header("X-Figma-Token", &self.token)
            .json(&body)
            .send()?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let message = resp
            .json::<serde_json::Value>()
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        Err(DesignError::Figma {
            status: status.as_u16(),
            message,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
