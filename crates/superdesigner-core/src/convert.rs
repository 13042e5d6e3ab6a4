//! Raw artifact conversion.
//!
//! Files dropped into `projects/<slug>/raw/` are flattened to text and
//! bundled with a conversion prompt that asks the agent to rewrite them into
//! `context/prd.md` and `context/research.md`. Nothing here interprets the
//! content; unreadable inputs become placeholder text the user pastes over.

use crate::error::{DesignError, Result};
use crate::{io, paths, project, templates};
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["pdf", "pptx", "txt", "md"];

const NO_SLIDE_TEXT: &str = "[No text content found in slides]";

// ---------------------------------------------------------------------------
// Text extraction
// ---------------------------------------------------------------------------

/// Text pulled from one raw file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub text: String,
    /// True when `text` is instructions for the user rather than content.
    pub is_placeholder: bool,
}

impl Extracted {
    fn content(text: String) -> Self {
        Self {
            text,
            is_placeholder: false,
        }
    }

    fn placeholder(text: String) -> Self {
        Self {
            text,
            is_placeholder: true,
        }
    }
}

/// Lowercased extension without the dot.
pub fn extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

pub fn is_supported(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension(path).as_str())
}

/// Extract text by extension. Never fails: problems are reported inline.
pub fn extract_text(path: &Path) -> Extracted {
    match extension(path).as_str() {
        "txt" | "md" => extract_plain_text(path),
        "pptx" => extract_pptx(path),
        "pdf" => extract_pdf(path),
        other => Extracted::placeholder(format!("[Unsupported file type: .{other}]")),
    }
}

fn extract_plain_text(path: &Path) -> Extracted {
    match std::fs::read_to_string(path) {
        Ok(text) => Extracted::content(text),
        Err(e) => Extracted::placeholder(format!("[Error reading file: {e}]")),
    }
}

fn extract_pptx(path: &Path) -> Extracted {
    match read_slides(path) {
        Ok(slides) if slides.is_empty() => Extracted::placeholder(NO_SLIDE_TEXT.to_string()),
        Ok(slides) => Extracted::content(slides.join("\n\n")),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "pptx extraction failed");
            Extracted::placeholder(format!(
                "[Error extracting PPTX: {e}]\n\nPlease paste the slide content here manually."
            ))
        }
    }
}

/// `--- Slide N ---` sections for every slide that has text, in slide order.
fn read_slides(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut slides = Vec::new();

    for index in 1.. {
        let name = format!("ppt/slides/slide{index}.xml");
        let mut xml = String::new();
        match archive.by_name(&name) {
            Ok(mut entry) => {
                entry.read_to_string(&mut xml)?;
            }
            Err(zip::result::ZipError::FileNotFound) => break,
            Err(e) => return Err(e.into()),
        }
        let text = slide_text(&xml);
        if !text.trim().is_empty() {
            slides.push(format!("--- Slide {index} ---\n{text}"));
        }
    }
    Ok(slides)
}

static TEXT_RUN_RE: OnceLock<Regex> = OnceLock::new();

/// Trimmed `<a:t>` text runs of one slide, one per line.
pub fn slide_text(xml: &str) -> String {
    let re = TEXT_RUN_RE.get_or_init(|| Regex::new(r"<a:t(?:\s[^>]*)?>([^<]*)</a:t>").unwrap());
    re.captures_iter(xml)
        .filter_map(|c| c.get(1))
        .map(|m| unescape_xml(m.as_str().trim()))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn extract_pdf(path: &Path) -> Extracted {
    let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    Extracted::placeholder(format!(
        "[PDF extraction not enabled in v0]

This PDF file is {}.

To include this content:
1. Open the PDF in a viewer
2. Select all text (Cmd+A / Ctrl+A)
3. Copy and paste the text below this line

---
PASTE PDF TEXT HERE
---",
        format_bytes(size)
    ))
}

/// `512 bytes`, `1.5 KB`, `2.0 MB`.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} bytes")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

// ---------------------------------------------------------------------------
// Raw files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawFile {
    pub filename: String,
    pub ext: String,
    pub bytes: u64,
    #[serde(skip)]
    pub text: String,
    pub is_placeholder: bool,
}

/// Extract every supported file in `dir`, sorted by filename.
pub fn scan_raw_dir(dir: &Path) -> Result<Vec<RawFile>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_supported(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let files = paths
        .iter()
        .map(|path| {
            let extracted = extract_text(path);
            RawFile {
                filename: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                ext: extension(path),
                bytes: std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
                text: extracted.text,
                is_placeholder: extracted.is_placeholder,
            }
        })
        .collect();
    Ok(files)
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

pub fn render_convert_context(slug: &str, files: &[RawFile], generated: DateTime<Utc>) -> String {
    let mut out = format!(
        "# Superdesigner Convert Context\nProject: {slug}\nGenerated: {}\n\n## Raw Files Index\n",
        generated.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    for f in files {
        let marker = if f.is_placeholder { " [manual paste required]" } else { "" };
        out.push_str(&format!("- {} ({}, {} bytes){marker}\n", f.filename, f.ext, f.bytes));
    }
    out.push_str("\n## Raw Content\n");
    for f in files {
        out.push_str(&format!("\n### FILE: {}\n\n{}\n", f.filename, f.text));
    }
    out
}

const PROMPT_PRD_HEADER: &str = "---\nProject: <Project Name>\nCreated: <ISO>\n---\n\n";
const PROMPT_RESEARCH_HEADER: &str = "Project: <Project Name>\nGenerated: <ISO>\n";

fn research_template_for_prompt() -> String {
    // The research template's title line is followed by the metadata lines.
    match templates::RESEARCH_TEMPLATE.split_once('\n') {
        Some((title, rest)) => format!("{title}\n{PROMPT_RESEARCH_HEADER}{rest}"),
        None => templates::RESEARCH_TEMPLATE.to_string(),
    }
}

pub fn render_convert_prompt(slug: &str) -> String {
    format!(
        r#"# Superdesigner Convert Prompt

Read `{context}` in this folder and convert the raw content into structured PRD and research documents.

## Rules (STRICT)

1. **Do NOT invent requirements** — only extract what is explicitly stated or clearly implied in the source material.
2. **Preserve intent** — maintain the original meaning, flows, states, metrics, and edge cases.
3. **Remove noise** — strip slide headers, footers, page numbers, and repetition.
4. **Handle uncertainty** — if something is unclear or ambiguous, add it to "Open questions".
5. **Be concise** — use bullets and short sentences. No fluff.

## Output (EXACTLY two files)

Create these files in `projects/{slug}/context/`:

### 1. `prd.md`

Use this EXACT template structure:

```markdown
{prd_header}{prd}
```

### 2. `research.md`

Use this EXACT template structure:

```markdown
{research}
```

## Instructions

1. Read the raw content from `{context}`
2. Identify PRD content (requirements, flows, features, metrics) → goes into `prd.md`
3. Identify research content (findings, quotes, insights, pain points) → goes into `research.md`
4. If content fits both, prioritize PRD for requirements and research for user insights
5. Leave empty sections as-is if no relevant content exists (don't remove them)
6. Replace `<Project Name>` with: {slug}
7. Replace `<ISO>` with the current date in ISO format

## After conversion

Run `superdesigner review {slug}` to generate the design review.
"#,
        context = paths::CONVERT_CONTEXT_FILE,
        prd_header = PROMPT_PRD_HEADER,
        prd = templates::PRD_TEMPLATE,
        research = research_template_for_prompt(),
    )
}

// ---------------------------------------------------------------------------
// Project conversion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConvertOutcome {
    /// `raw/` holds no supported files. `created_raw` is true when the
    /// folder had to be created.
    NoFiles { created_raw: bool },
    Converted {
        files: Vec<RawFile>,
        created_raw: bool,
    },
}

impl ConvertOutcome {
    pub fn needs_manual_paste(&self) -> bool {
        match self {
            ConvertOutcome::NoFiles { .. } => false,
            ConvertOutcome::Converted { files, .. } => files.iter().any(|f| f.is_placeholder),
        }
    }
}

/// Extract a project's raw files and write the conversion prompt and context.
pub fn convert_project(root: &Path, slug: &str, now: DateTime<Utc>) -> Result<ConvertOutcome> {
    if !project::exists(root, slug) {
        return Err(DesignError::ProjectNotFound(slug.to_string()));
    }

    let raw = paths::raw_dir(root, slug);
    let created_raw = !raw.is_dir();
    io::ensure_dir(&raw)?;

    let files = scan_raw_dir(&raw)?;
    if files.is_empty() {
        return Ok(ConvertOutcome::NoFiles { created_raw });
    }
    tracing::debug!(slug, count = files.len(), "extracted raw files");

    let dir = paths::convert_prompts_dir(root, slug);
    io::atomic_write(
        &dir.join(paths::CONVERT_CONTEXT_FILE),
        render_convert_context(slug, &files, now).as_bytes(),
    )?;
    io::atomic_write(
        &dir.join(paths::CONVERT_PROMPT_FILE),
        render_convert_prompt(slug).as_bytes(),
    )?;

    Ok(ConvertOutcome::Converted { files, created_raw })
}
