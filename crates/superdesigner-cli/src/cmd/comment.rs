use crate::cmd::resolve_single;
use crate::output::print_json;
use anyhow::{bail, Context};
use std::path::Path;
use superdesigner_core::artifact::{ArtifactKind, ArtifactSet};
use superdesigner_core::comment::{parse_comments, ReviewComment};
use superdesigner_core::config::Config;
use superdesigner_core::figma::{self, FigmaClient, FigmaRef};
use superdesigner_core::{paths, DesignError};

pub fn run(root: &Path, slug: Option<&str>, dry_run: bool, json: bool) -> anyhow::Result<()> {
    let slug = resolve_single(root, slug)?;

    let preview = paths::comments_preview_path(root, &slug);
    if !preview.is_file() {
        return Err(DesignError::CommentsNotFound(slug).into());
    }
    let content = std::fs::read_to_string(&preview)
        .with_context(|| format!("failed to read {}", preview.display()))?;
    let comments = parse_comments(&content);
    if comments.is_empty() {
        bail!("no comments found in {}", preview.display());
    }

    let figma_ref = FigmaRef::parse(&ArtifactSet::load(root, &slug).figma);

    if dry_run {
        if json {
            return print_json(&comments);
        }
        print_dry_run(&slug, &comments, &figma_ref);
        return Ok(());
    }

    let figma_md = paths::context_dir(root, &slug).join(ArtifactKind::Figma.filename());
    let file_key = figma_ref
        .file_key
        .as_deref()
        .ok_or_else(|| DesignError::MissingFileKey(figma_md.display().to_string()))?;

    load_dotenv(root);
    let token = std::env::var(figma::TOKEN_ENV)
        .ok()
        .filter(|t| !t.trim().is_empty())
        .ok_or(DesignError::MissingToken)?;

    let config = Config::load(root).context("failed to load config.yaml")?;
    let client = FigmaClient::new(config.figma.api_base.as_str(), token)?;

    println!("📤 Posting {} comments to {}", comments.len(), FigmaRef::file_url(file_key));
    println!();

    let mut failed = 0usize;
    for (i, c) in comments.iter().enumerate() {
        let node_id = c.node_id.as_deref().or(figma_ref.node_id.as_deref());
        match client.post_comment(file_key, &figma::format_comment(c), node_id) {
            Ok(()) => println!("  ✅ {}. [{}] {}", i + 1, c.kind, c.target()),
            Err(e) => {
                failed += 1;
                tracing::warn!(comment = i + 1, error = %e, "figma comment failed");
                println!("  ❌ {}. [{}] {}: {e}", i + 1, c.kind, c.target());
            }
        }
    }

    let posted = comments.len() - failed;
    println!();
    println!("Posted {posted}/{} comments.", comments.len());
    if failed > 0 {
        bail!("{failed} of {} comments failed to post", comments.len());
    }
    println!("View them at {}", FigmaRef::file_url(file_key));
    Ok(())
}

/// Load `.env` from the workspace root, then the current directory.
/// Variables already set are never overridden.
fn load_dotenv(root: &Path) {
    match dotenvy::from_path(root.join(".env")) {
        Ok(()) => tracing::debug!(root = %root.display(), "loaded .env"),
        Err(e) => tracing::debug!(error = %e, "no .env in workspace root"),
    }
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env in current directory");
    }
}

fn print_dry_run(slug: &str, comments: &[ReviewComment], figma_ref: &FigmaRef) {
    println!("🔍 Dry run: {} comments for {slug}", comments.len());
    match &figma_ref.file_key {
        Some(key) => println!("   File: {}", FigmaRef::file_url(key)),
        None => println!("   File: not set (add a Figma link to context/figma.md before posting)"),
    }
    println!();

    for (i, c) in comments.iter().enumerate() {
        let node = match c.node_id.as_deref().or(figma_ref.node_id.as_deref()) {
            Some(id) => format!("node: {id}"),
            None => "file level".to_string(),
        };
        println!("{}. [{}] @ {} ({node})", i + 1, c.kind, c.target());
        println!("   {}", c.headline());
        if !c.why.is_empty() {
            println!("   📎 {}", c.why);
        }
        println!();
    }

    println!("Nothing was posted. Run without --dry-run to post to Figma.");
}
