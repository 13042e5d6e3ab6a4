use crate::cmd::resolve_targets;
use crate::output::print_json;
use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use superdesigner_core::convert::{self, ConvertOutcome, SUPPORTED_EXTENSIONS};
use superdesigner_core::paths;

#[derive(Serialize)]
struct ConvertReport {
    slug: String,
    #[serde(flatten)]
    outcome: ConvertOutcome,
}

pub fn run(root: &Path, target: Option<&str>, json: bool) -> anyhow::Result<()> {
    let slugs = resolve_targets(root, target)?;
    let now = Utc::now();

    let mut reports = Vec::with_capacity(slugs.len());
    for slug in slugs {
        let outcome = convert::convert_project(root, &slug, now)
            .with_context(|| format!("failed to convert {slug}"))?;
        if !json {
            print_outcome(&slug, &outcome);
        }
        reports.push(ConvertReport { slug, outcome });
    }

    if json {
        return print_json(&reports);
    }
    Ok(())
}

fn print_outcome(slug: &str, outcome: &ConvertOutcome) {
    println!("{slug}:");
    match outcome {
        ConvertOutcome::NoFiles { created_raw } => {
            if *created_raw {
                println!("  created projects/{slug}/{}/", paths::RAW_DIR);
            }
            let exts: Vec<String> = SUPPORTED_EXTENSIONS.iter().map(|e| format!(".{e}")).collect();
            println!(
                "  no supported files in projects/{slug}/{}/ ({})",
                paths::RAW_DIR,
                exts.join(", ")
            );
        }
        ConvertOutcome::Converted { files, .. } => {
            for f in files {
                let marker = if f.is_placeholder { "  [manual paste required]" } else { "" };
                println!("  {} ({}){marker}", f.filename, convert::format_bytes(f.bytes));
            }
            println!(
                "  wrote projects/{slug}/{}/{} and {}",
                paths::PROMPTS_DIR,
                paths::CONVERT_PROMPT_FILE,
                paths::CONVERT_CONTEXT_FILE
            );
            if outcome.needs_manual_paste() {
                println!("  some files need their text pasted into the context file by hand");
            }
            println!(
                "  next: open {} in Cursor and run it in Agent mode",
                paths::CONVERT_PROMPT_FILE
            );
        }
    }
    println!();
}
