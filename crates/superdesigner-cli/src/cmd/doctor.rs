use crate::output::print_json;
use anyhow::bail;
use serde::Serialize;
use std::path::Path;
use superdesigner_core::artifact::ArtifactKind;
use superdesigner_core::config::{Config, WarnLevel};
use superdesigner_core::{io, paths, templates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Ok,
    Failed,
    /// Reported but never fails the run.
    Info,
}

#[derive(Debug, Serialize)]
struct Check {
    name: &'static str,
    status: Status,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<String>,
    #[serde(skip)]
    fixable: bool,
}

impl Check {
    fn ok(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            status: Status::Ok,
            message: message.into(),
            fix: None,
            fixable: false,
        }
    }

    fn failed(name: &'static str, message: impl Into<String>, fix: impl Into<String>) -> Self {
        Self {
            name,
            status: Status::Failed,
            message: message.into(),
            fix: Some(fix.into()),
            fixable: false,
        }
    }

    fn icon(&self) -> &'static str {
        match self.status {
            Status::Ok => "✅",
            Status::Failed => "❌",
            Status::Info => "ℹ️",
        }
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

fn check_workspace(root: &Path) -> Check {
    let here = std::env::current_dir().map(|cwd| cwd == root).unwrap_or(false);
    let suffix = if here { " (current directory)" } else { "" };
    Check::ok("Workspace root", format!("{}{suffix}", root.display()))
}

fn check_projects(root: &Path) -> Check {
    if paths::projects_dir(root).is_dir() {
        return Check::ok("Projects folder", "projects/ folder exists");
    }
    Check {
        fixable: true,
        ..Check::failed("Projects folder", "projects/ folder not found", "Run: mkdir projects")
    }
}

fn check_config(root: &Path) -> Check {
    let cfg = match Config::load(root) {
        Ok(cfg) => cfg,
        Err(e) => {
            return Check::failed(
                "Config",
                format!("{} is invalid: {e}", paths::CONFIG_FILE),
                format!("Fix or delete {}", paths::CONFIG_FILE),
            )
        }
    };

    let errors: Vec<String> = cfg
        .validate()
        .into_iter()
        .filter(|w| w.level == WarnLevel::Error)
        .map(|w| w.message)
        .collect();
    if !errors.is_empty() {
        return Check::failed("Config", errors.join("; "), format!("Edit {}", paths::CONFIG_FILE));
    }

    if paths::config_path(root).is_file() {
        Check::ok("Config", format!("{} is valid", paths::CONFIG_FILE))
    } else {
        Check::ok("Config", "no config file, using defaults")
    }
}

fn check_templates() -> Check {
    let all_present = ArtifactKind::all()
        .iter()
        .all(|&k| !templates::body(k).trim().is_empty());
    if all_present {
        Check::ok("Templates", "Templates accessible")
    } else {
        Check::failed("Templates", "Templates not found", "Reinstall superdesigner")
    }
}

fn check_agent(root: &Path) -> Check {
    let executable = Config::load(root)
        .map(|c| c.agent.executable)
        .unwrap_or_else(|_| cursor_agent::DEFAULT_EXECUTABLE.to_string());
    if cursor_agent::is_available(&executable) {
        return Check::ok("Cursor Agent", format!("Cursor Agent CLI available ({executable})"));
    }
    Check {
        status: Status::Info,
        ..Check::failed(
            "Cursor Agent",
            "Cursor Agent CLI not found (optional)",
            "Run: curl https://cursor.com/install -fsS | bash",
        )
    }
}

fn run_checks(root: &Path) -> Vec<Check> {
    vec![
        check_workspace(root),
        check_projects(root),
        check_config(root),
        check_templates(),
        check_agent(root),
    ]
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

pub fn run(root: &Path, fix: bool, json: bool) -> anyhow::Result<()> {
    let mut checks = run_checks(root);

    let fixable = checks.iter().any(|c| c.status == Status::Failed && c.fixable);
    if fix && fixable {
        io::ensure_dir(&paths::projects_dir(root))?;
        tracing::debug!(root = %root.display(), "created projects folder");
        checks = run_checks(root);
    }

    let failed = checks.iter().filter(|c| c.status == Status::Failed).count();

    if json {
        print_json(&checks)?;
    } else {
        print_report(&checks, fix && fixable);
        if failed == 0 {
            println!("All checks passed! Superdesigner is ready to use.");
            println!();
            println!("Quick start:");
            println!("  superdesigner init \"My Project\"");
            println!("  superdesigner review my-project --agent");
        } else {
            println!("Some checks failed. Fix the issues above and run again.");
            if !fix && checks.iter().any(|c| c.fixable) {
                println!();
                println!("Run with --fix to auto-fix some issues:");
                println!("  superdesigner doctor --fix");
            }
        }
        println!();
    }

    if failed > 0 {
        bail!("{failed} check(s) failed");
    }
    Ok(())
}

fn print_report(checks: &[Check], fixed: bool) {
    println!();
    println!("🩺 Superdesigner Doctor");
    println!();
    if fixed {
        println!("🔧 Created projects/ folder");
        println!();
    }
    for c in checks {
        println!("  {} {}: {}", c.icon(), c.name, c.message);
        if c.status != Status::Ok {
            if let Some(fix) = &c.fix {
                println!("     💡 {fix}");
            }
        }
    }
    println!();
}
