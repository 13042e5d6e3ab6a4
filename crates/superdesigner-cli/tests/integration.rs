#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn sd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("superdesigner").unwrap();
    cmd.current_dir(dir.path())
        .env("SUPERDESIGNER_ROOT", dir.path())
        .env("SUPERDESIGNER_TELEMETRY", "0")
        .env_remove("SUPERDESIGNER_TELEMETRY_URL")
        .env_remove("FIGMA_ACCESS_TOKEN");
    cmd
}

fn context(dir: &TempDir, slug: &str, file: &str) -> PathBuf {
    dir.path().join("projects").join(slug).join("context").join(file)
}

fn insights(dir: &TempDir, slug: &str, file: &str) -> PathBuf {
    dir.path().join("projects").join(slug).join("insights").join(file)
}

const PRD: &str = "---
Project: Botim Quest
Created: 2026-03-14T09:30:00.000Z
---

# Product Requirements Document

## Overview
Daily quests that reward engagement.

## Happy path
1. Sign up
2. Verify email
3. See dashboard

## Edge cases
- User has no network
- Duplicate signup attempt
";

const FIGMA: &str = "# Figma\n\nLink: https://www.figma.com/design/ABC123/My-File?node-id=12-345\n";

/// A project with a filled-in PRD and Figma link.
fn seeded_project(dir: &TempDir) {
    sd(dir).args(["init", "Botim", "Quest"]).assert().success();
    std::fs::write(context(dir, "botim-quest", "prd.md"), PRD).unwrap();
    std::fs::write(context(dir, "botim-quest", "figma.md"), FIGMA).unwrap();
}

fn write_config(dir: &TempDir, yaml: &str) {
    std::fs::create_dir_all(dir.path().join(".superdesigner")).unwrap();
    std::fs::write(dir.path().join(".superdesigner/config.yaml"), yaml).unwrap();
}

// ---------------------------------------------------------------------------
// superdesigner init
// ---------------------------------------------------------------------------

#[test]
fn init_scaffolds_project() {
    let dir = TempDir::new().unwrap();
    sd(&dir)
        .args(["init", "Botim", "Quest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created project: Botim Quest"));

    for file in ["prd.md", "research.md", "figma.md", "analytics.md"] {
        assert!(context(&dir, "botim-quest", file).is_file(), "{file}");
    }
    assert!(dir.path().join("projects/botim-quest/raw").is_dir());
    assert!(dir.path().join("projects/botim-quest/insights/prompts").is_dir());
    assert!(dir.path().join(".superdesigner/config.yaml").is_file());

    let prd = std::fs::read_to_string(context(&dir, "botim-quest", "prd.md")).unwrap();
    assert!(prd.starts_with("---\nProject: Botim Quest\nCreated: "));
}

#[test]
fn new_is_an_alias_for_init() {
    let dir = TempDir::new().unwrap();
    sd(&dir).args(["new", "Side Quest"]).assert().success();
    assert!(context(&dir, "side-quest", "prd.md").is_file());
}

#[test]
fn init_rejects_existing_project() {
    let dir = TempDir::new().unwrap();
    sd(&dir).args(["init", "Quest"]).assert().success();
    sd(&dir)
        .args(["init", "Quest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("project already exists: quest"));
}

#[test]
fn init_rejects_symbol_only_name() {
    let dir = TempDir::new().unwrap();
    sd(&dir)
        .args(["init", "!!!"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid project name"));
    assert!(!dir.path().join("projects").read_dir().unwrap().any(|_| true));
}

#[test]
fn init_keeps_existing_config() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "agent:\n  timeout_minutes: 3\n");
    sd(&dir).args(["init", "Quest"]).assert().success();
    let cfg = std::fs::read_to_string(dir.path().join(".superdesigner/config.yaml")).unwrap();
    assert_eq!(cfg, "agent:\n  timeout_minutes: 3\n");
}

// ---------------------------------------------------------------------------
// superdesigner list
// ---------------------------------------------------------------------------

#[test]
fn list_shows_projects() {
    let dir = TempDir::new().unwrap();
    sd(&dir).args(["init", "Beta"]).assert().success();
    sd(&dir).args(["init", "Alpha"]).assert().success();
    std::fs::create_dir_all(dir.path().join("projects/.hidden")).unwrap();

    sd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"))
        .stdout(predicate::str::contains("beta"))
        .stdout(predicate::str::contains(".hidden").not());
}

#[test]
fn list_json() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    let out = sd(&dir).args(["list", "--json"]).output().unwrap();
    assert!(out.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(rows[0]["slug"], "botim-quest");
    assert_eq!(rows[0]["name"], "Botim Quest");
    assert_eq!(rows[0]["reviewed"], false);
}

// ---------------------------------------------------------------------------
// superdesigner review
// ---------------------------------------------------------------------------

#[test]
fn review_writes_all_outputs() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    sd(&dir)
        .args(["review", "botim-quest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("superdesigner review botim-quest --agent"));

    let review = std::fs::read_to_string(insights(&dir, "botim-quest", "design-review.md")).unwrap();
    assert!(review.starts_with("# Design Review: Botim Quest\n"));
    assert!(review.contains("## 1. Intended Flow (from PRD)"));
    assert!(review.contains("1. Sign up"));
    assert!(review.contains("## 6. Figma Make Prompt"));

    let preview =
        std::fs::read_to_string(insights(&dir, "botim-quest", "design-comments.preview.md")).unwrap();
    assert!(preview.contains("## Comment 1\n"));
    assert!(preview.contains("nodeId: 12:345"));
    assert!(preview.contains("User has no network"));

    assert!(insights(&dir, "botim-quest", "prompts/_review_prompt.md").is_file());
    let ctx =
        std::fs::read_to_string(insights(&dir, "botim-quest", "prompts/_review_context.md")).unwrap();
    assert!(ctx.contains("Slug: botim-quest"));
    assert!(ctx.contains("*No research.md found*") || ctx.contains("# Research Notes"));
}

#[test]
fn review_auto_selects_single_project() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    sd(&dir).arg("review").assert().success();
    assert!(insights(&dir, "botim-quest", "design-review.md").is_file());
}

#[test]
fn review_requires_choice_with_several_projects() {
    let dir = TempDir::new().unwrap();
    sd(&dir).args(["init", "Alpha"]).assert().success();
    sd(&dir).args(["init", "Beta"]).assert().success();
    sd(&dir)
        .arg("review")
        .assert()
        .failure()
        .stderr(predicate::str::contains("alpha, beta"));
}

#[test]
fn review_all_covers_every_project() {
    let dir = TempDir::new().unwrap();
    sd(&dir).args(["init", "Alpha"]).assert().success();
    sd(&dir).args(["init", "Beta"]).assert().success();
    sd(&dir).args(["review", "all"]).assert().success();
    assert!(insights(&dir, "alpha", "design-review.md").is_file());
    assert!(insights(&dir, "beta", "design-review.md").is_file());
}

#[test]
fn review_unknown_project_fails() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    sd(&dir)
        .args(["review", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("project not found: nope"));
}

#[test]
fn review_agent_rejects_all() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    sd(&dir)
        .args(["review", "all", "--agent"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("--agent requires a single project slug"));
}

#[test]
fn review_agent_missing_prints_install_steps() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    write_config(&dir, "agent:\n  executable: superdesigner-missing-agent\n");
    sd(&dir)
        .args(["review", "botim-quest", "--agent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cursor Agent CLI not found"))
        .stdout(predicate::str::contains("curl https://cursor.com/install -fsS | bash"))
        .stdout(predicate::str::contains("_review_prompt.md"));
}

#[test]
fn review_json_reports_files() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    let out = sd(&dir).args(["review", "botim-quest", "--json"]).output().unwrap();
    assert!(out.status.success());
    let reports: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(reports[0]["slug"], "botim-quest");
    assert_eq!(reports[0]["comments"], 6);
    assert_eq!(reports[0]["files"].as_array().unwrap().len(), 4);
}

#[test]
fn review_agent_missing_json_stays_valid() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    write_config(&dir, "agent:\n  executable: superdesigner-missing-agent\n");
    let out = sd(&dir)
        .args(["review", "botim-quest", "--agent", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let reports: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(reports[0]["slug"], "botim-quest");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Cursor Agent CLI not found"), "{stderr}");
}

#[test]
fn review_agent_rejects_all_json_keeps_stdout_clean() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    sd(&dir)
        .args(["review", "all", "--agent", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--agent requires a single project slug"));
}

// ---------------------------------------------------------------------------
// superdesigner comment
// ---------------------------------------------------------------------------

#[test]
fn comment_requires_preview() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    sd(&dir)
        .args(["comment", "botim-quest", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("superdesigner review botim-quest"));
}

#[test]
fn comment_dry_run_prints_without_token() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    sd(&dir).args(["review", "botim-quest"]).assert().success();
    sd(&dir)
        .args(["comment", "botim-quest", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run: 6 comments for botim-quest"))
        .stdout(predicate::str::contains("https://www.figma.com/file/ABC123"))
        .stdout(predicate::str::contains("[Missing State] @"))
        .stdout(predicate::str::contains("(node: 12:345)"))
        .stdout(predicate::str::contains("2. [Edge Case] @ Relevant Screen"))
        .stdout(predicate::str::contains("📎 PRD → \"Edge cases\" → \"User has no network\""));
}

#[test]
fn comment_needs_token() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    sd(&dir).args(["review", "botim-quest"]).assert().success();
    sd(&dir)
        .args(["comment", "botim-quest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FIGMA_ACCESS_TOKEN not set"));
}

#[test]
fn comment_needs_file_key() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    std::fs::write(context(&dir, "botim-quest", "figma.md"), "# Figma\n\nLink:\n").unwrap();
    sd(&dir).args(["review", "botim-quest"]).assert().success();
    sd(&dir)
        .args(["comment", "botim-quest"])
        .env("FIGMA_ACCESS_TOKEN", "figd_test")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no Figma file key found"));
}

#[test]
fn comment_posts_each_comment() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    sd(&dir).args(["review", "botim-quest"]).assert().success();

    let mut server = mockito::Server::new();
    let m = server
        .mock("POST", "/v1/files/ABC123/comments")
        .match_header("x-figma-token", "figd_test")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "client_meta": { "node_id": "12:345" }
        })))
        .with_status(200)
        .with_body("{}")
        .expect(6)
        .create();
    write_config(&dir, &format!("figma:\n  api_base: {}/v1\n", server.url()));

    sd(&dir)
        .args(["comment", "botim-quest"])
        .env("FIGMA_ACCESS_TOKEN", "figd_test")
        .assert()
        .success()
        .stdout(predicate::str::contains("Posted 6/6 comments."));
    m.assert();
}

#[test]
fn comment_reads_token_from_dotenv() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    sd(&dir).args(["review", "botim-quest"]).assert().success();

    let mut server = mockito::Server::new();
    let m = server
        .mock("POST", "/v1/files/ABC123/comments")
        .match_header("x-figma-token", "figd_from_env_file")
        .with_status(200)
        .expect(6)
        .create();
    write_config(&dir, &format!("figma:\n  api_base: {}/v1\n", server.url()));
    std::fs::write(dir.path().join(".env"), "FIGMA_ACCESS_TOKEN=figd_from_env_file\n").unwrap();

    sd(&dir).args(["comment", "botim-quest"]).assert().success();
    m.assert();
}

#[test]
fn comment_failures_exit_non_zero() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    sd(&dir).args(["review", "botim-quest"]).assert().success();

    let mut server = mockito::Server::new();
    server
        .mock("POST", "/v1/files/ABC123/comments")
        .with_status(403)
        .with_body(r#"{"status":403,"err":"Invalid token","message":"Invalid token"}"#)
        .create();
    write_config(&dir, &format!("figma:\n  api_base: {}/v1\n", server.url()));

    sd(&dir)
        .args(["comment", "botim-quest"])
        .env("FIGMA_ACCESS_TOKEN", "figd_bad")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Invalid token"))
        .stdout(predicate::str::contains("Posted 0/6 comments."))
        .stderr(predicate::str::contains("6 of 6 comments failed to post"));
}

// ---------------------------------------------------------------------------
// superdesigner convert
// ---------------------------------------------------------------------------

#[test]
fn convert_writes_prompt_and_context() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    let raw = dir.path().join("projects/botim-quest/raw");
    std::fs::write(raw.join("notes.txt"), "Users want streak rewards.").unwrap();
    std::fs::write(raw.join("deck.pdf"), b"%PDF-1.4").unwrap();
    std::fs::write(raw.join("ignored.docx"), b"zz").unwrap();

    sd(&dir)
        .args(["convert", "botim-quest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.txt"))
        .stdout(predicate::str::contains("[manual paste required]"));

    let prompts = dir.path().join("projects/botim-quest/prompts");
    let ctx = std::fs::read_to_string(prompts.join("_convert_context.md")).unwrap();
    assert!(ctx.contains("Users want streak rewards."));
    assert!(ctx.contains("deck.pdf (pdf, 8 bytes) [manual paste required]"));
    assert!(!ctx.contains("ignored.docx"));
    assert!(prompts.join("_convert_prompt.md").is_file());
}

#[test]
fn convert_without_raw_files_is_reported() {
    let dir = TempDir::new().unwrap();
    seeded_project(&dir);
    sd(&dir)
        .args(["convert", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no supported files"));
}

// ---------------------------------------------------------------------------
// superdesigner doctor
// ---------------------------------------------------------------------------

#[test]
fn doctor_fails_without_projects_folder() {
    let dir = TempDir::new().unwrap();
    sd(&dir)
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains("projects/ folder not found"))
        .stdout(predicate::str::contains("superdesigner doctor --fix"));
}

#[test]
fn doctor_fix_creates_projects_folder() {
    let dir = TempDir::new().unwrap();
    sd(&dir)
        .args(["doctor", "--fix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed!"));
    assert!(dir.path().join("projects").is_dir());
}

#[test]
fn doctor_flags_invalid_config() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("projects")).unwrap();
    write_config(&dir, "agent: [not, a, map]\n");
    sd(&dir)
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains("config.yaml is invalid"));
}
