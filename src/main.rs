//! ruledocs - Main Entry Point
//!
//! Command line front end: export rule trees as Markdown or HTML docs,
//! import rules back out of docs, and edit titles and descriptions.

use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use ruledocs::config::{load_config, save_config_silent, Settings};
use ruledocs::docs::DocsSession;
use ruledocs::error::{Error, Result};
use ruledocs::export::{extract, generate_html_document, MarkdownExporter, IMPORT_FAILED_MESSAGE};
use ruledocs::markdown::{BufferSurface, HtmlCodec};
use ruledocs::rules::store::write_atomic;
use ruledocs::rules::{
    is_mock_rule, load_rules_file, load_rules_payload, save_rules_file, DefaultDescriber,
    RuleDescriber, RuleItem, RuleRoot, RuleStore,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Application name constant.
const APP_NAME: &str = "ruledocs";

// ─────────────────────────────────────────────────────────────────────────────
// CLI Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "ruledocs", version, about = "Document and share HTTP mock rule trees.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Export a rules file as Markdown docs
    Export {
        /// Rules file (JSON)
        rules: PathBuf,
        /// Output file; stdout if omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Import rules from Markdown docs or raw JSON
    Import {
        /// Markdown docs or rules JSON
        file: PathBuf,
        /// Rules file to write; stdout if omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print the groups and rules of a rules file with their ids
    List {
        /// Rules file (JSON)
        rules: PathBuf,
    },
    /// Set the title of a group or rule
    SetTitle {
        /// Rules file (JSON)
        rules: PathBuf,
        /// Group or rule id
        id: String,
        /// New title; empty clears a rule title
        title: String,
    },
    /// Set a description from formatted HTML, stored as Markdown
    Describe {
        /// Rules file (JSON)
        rules: PathBuf,
        /// Group or rule id
        id: String,
        /// HTML file with the formatted description
        html_file: PathBuf,
    },
    /// Render a rules file as a standalone HTML page
    Render {
        /// Rules file (JSON)
        rules: PathBuf,
        /// Output file; stdout if omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// How a command finished when it did not hit an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Success,
    /// The user has already been told what went wrong
    Failure,
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry Point
// ─────────────────────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    debug!("Starting {} with {:?}", APP_NAME, cli.command);

    let mut settings = load_config();
    let recent_before = settings.recent_rules_files.clone();

    let result = run(cli.command, &mut settings);

    if settings.recent_rules_files != recent_before {
        save_config_silent(&settings);
    }

    match result {
        Ok(Status::Success) => ExitCode::SUCCESS,
        Ok(Status::Failure) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Dispatch a command.
fn run(command: Command, settings: &mut Settings) -> Result<Status> {
    match command {
        Command::Export { rules, output } => {
            let markdown = export_markdown(&rules, settings)?;
            remember(settings, &rules);
            emit(output.as_deref(), &markdown)?;
            Ok(Status::Success)
        }
        Command::Import { file, output } => import(&file, output.as_deref()),
        Command::List { rules } => {
            let store = load_rules_file(&rules)?;
            remember(settings, &rules);
            print!("{}", outline(store.snapshot(), &DefaultDescriber));
            Ok(Status::Success)
        }
        Command::SetTitle { rules, id, title } => {
            set_title(&rules, &id, &title)?;
            remember(settings, &rules);
            Ok(Status::Success)
        }
        Command::Describe {
            rules,
            id,
            html_file,
        } => {
            let status = describe(&rules, &id, &html_file, settings)?;
            remember(settings, &rules);
            Ok(status)
        }
        Command::Render { rules, output } => {
            let markdown = export_markdown(&rules, settings)?;
            let html =
                generate_html_document(&markdown, &settings.html_export_title, settings.linkify);
            remember(settings, &rules);
            emit(output.as_deref(), &html)?;
            Ok(Status::Success)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

fn export_markdown(rules: &Path, settings: &Settings) -> Result<String> {
    let store = load_rules_file(rules)?;
    Ok(MarkdownExporter::new()
        .title(&settings.export_title)
        .export(store.snapshot()))
}

fn import(file: &Path, output: Option<&Path>) -> Result<Status> {
    let text = read_text(file)?;

    let payload = match extract(&text) {
        Ok(payload) => payload,
        Err(e) => {
            debug!("Import of {} failed: {}", file.display(), e);
            eprintln!("{}", IMPORT_FAILED_MESSAGE);
            return Ok(Status::Failure);
        }
    };

    let store = load_rules_payload(payload)?;
    match output {
        Some(path) => save_rules_file(path, store.snapshot())?,
        None => println!("{}", serde_json::to_string_pretty(store.snapshot())?),
    }
    info!("Imported rules from {}", file.display());
    Ok(Status::Success)
}

fn set_title(rules: &Path, id: &str, title: &str) -> Result<()> {
    let mut store = load_rules_file(rules)?;
    let mut session: DocsSession<BufferSurface<String>, HtmlCodec> = DocsSession::new();
    session.select(id);
    session.set_title(&mut store, title)?;
    save_rules_file(rules, store.snapshot())
}

/// Feed formatted HTML through a live description editor, as if the user
/// had typed it, and store the Markdown it produces.
fn describe(rules: &Path, id: &str, html_file: &Path, settings: &Settings) -> Result<Status> {
    let html = read_text(html_file)?;
    let mut store = load_rules_file(rules)?;

    let mut session =
        DocsSession::new().placeholder(settings.description_placeholder.clone());
    session.select(id);
    session.begin_edit_description(
        &store,
        BufferSurface::new(),
        HtmlCodec::new(settings.linkify),
    )?;

    let editor = session
        .editor_mut()
        .ok_or_else(|| Error::Application("Description editor did not open".to_string()))?;
    let cursor = html.len();
    editor.surface_mut().type_content(html, cursor);

    if !session.description_input(&mut store)? {
        warn!("Could not convert {} to Markdown", html_file.display());
        eprintln!("The description could not be converted; nothing was changed.");
        return Ok(Status::Failure);
    }
    session.end_edit_description();

    save_rules_file(rules, store.snapshot())?;
    Ok(Status::Success)
}

/// Indented outline of a tree, one item per line.
fn outline(root: &RuleRoot, describer: &dyn RuleDescriber) -> String {
    let mut out = String::new();
    let mut stack: Vec<(&RuleItem, usize)> = root.items.iter().rev().map(|i| (i, 0)).collect();

    while let Some((item, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        match item {
            RuleItem::Group(group) => {
                out.push_str(&format!("{}- {} [{}]\n", indent, group.title, group.id));
                stack.extend(group.items.iter().rev().map(|i| (i, depth + 1)));
            }
            RuleItem::Rule(rule) => {
                let title = rule
                    .title
                    .clone()
                    .unwrap_or_else(|| describer.summarize_matcher(rule));
                let mock = if is_mock_rule(rule) { " (Mock)" } else { "" };
                out.push_str(&format!("{}- {}{} [{}]\n", indent, title, mock, rule.id));
            }
        }
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write to `output`, or to stdout when no file is given.
fn emit(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            write_atomic(path, contents)?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", contents),
    }
    Ok(())
}

fn remember(settings: &mut Settings, rules: &Path) {
    let path = fs::canonicalize(rules).unwrap_or_else(|_| rules.to_path_buf());
    settings.add_recent_file(path);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ruledocs::rules::{Rule, RuleDocNode, RuleGroup, RulePart, RulesStore};
    use tempfile::TempDir;

    struct TestEnv {
        temp_dir: TempDir,
        rules: PathBuf,
    }

    impl TestEnv {
        fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let rules = temp_dir.path().join("rules.json");

            let mut group = RuleGroup::new("g1", "Payments");
            group.description = Some("Card flows".to_string());
            let mut rule = Rule::new("r1", "http");
            rule.matchers
                .push(RulePart::new("method").with("method", "post"));
            rule.matchers
                .push(RulePart::new("simple-path").with("path", "/charge"));
            rule.steps.push(RulePart::new("simple").with("status", 201));
            group.items.push(rule.into());
            let mut named = Rule::new("r2", "http");
            named.title = Some("Health".to_string());
            let root = RuleRoot::new(vec![group.into(), named.into()]);

            save_rules_file(&rules, &root).expect("Failed to write rules");
            Self { temp_dir, rules }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.temp_dir.path().join(name)
        }

        fn store(&self) -> RulesStore {
            load_rules_file(&self.rules).expect("Failed to load rules")
        }
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["ruledocs", "export", "rules.json", "-o", "docs.md"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Export { output: Some(ref out), .. } if out == Path::new("docs.md")
        ));

        let cli = Cli::try_parse_from(["ruledocs", "set-title", "rules.json", "r1", ""]).unwrap();
        assert!(matches!(cli.command, Command::SetTitle { ref title, .. } if title.is_empty()));
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let env = TestEnv::new();
        let mut settings = Settings::default();
        let docs = env.path("docs.md");
        let imported = env.path("imported.json");

        let status = run(
            Command::Export {
                rules: env.rules.clone(),
                output: Some(docs.clone()),
            },
            &mut settings,
        )
        .unwrap();
        assert_eq!(status, Status::Success);

        let markdown = fs::read_to_string(&docs).unwrap();
        assert!(markdown.starts_with("# Rules & docs\n"));
        assert!(markdown.contains("```htkrules\n"));

        let status = run(
            Command::Import {
                file: docs,
                output: Some(imported.clone()),
            },
            &mut settings,
        )
        .unwrap();
        assert_eq!(status, Status::Success);
        assert_eq!(load_rules_file(&imported).unwrap(), env.store());
        assert_eq!(settings.recent_rules_files.len(), 1);
    }

    #[test]
    fn test_export_uses_configured_title() {
        let env = TestEnv::new();
        let settings = Settings {
            export_title: "Team rules".to_string(),
            ..Settings::default()
        };
        let markdown = export_markdown(&env.rules, &settings).unwrap();
        assert!(markdown.starts_with("# Team rules\n"));
    }

    #[test]
    fn test_import_failure_reports_status() {
        let env = TestEnv::new();
        let notes = env.path("notes.md");
        fs::write(&notes, "# Notes\n\nNo rules here.").unwrap();

        let status = import(&notes, Some(&env.path("out.json"))).unwrap();
        assert_eq!(status, Status::Failure);
        assert!(!env.path("out.json").exists());
    }

    #[test]
    fn test_import_missing_file_is_error() {
        let env = TestEnv::new();
        let result = import(&env.path("missing.md"), None);
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }

    #[test]
    fn test_set_title_updates_file() {
        let env = TestEnv::new();
        set_title(&env.rules, "g1", "Billing").unwrap();
        set_title(&env.rules, "r2", "").unwrap();

        let store = env.store();
        assert_eq!(store.snapshot().find("g1").and_then(|n| n.title()), Some("Billing"));
        assert_eq!(store.snapshot().find("r2").and_then(|n| n.title()), None);
    }

    #[test]
    fn test_set_title_unknown_id() {
        let env = TestEnv::new();
        let result = set_title(&env.rules, "nope", "x");
        assert!(matches!(result, Err(Error::UnknownItem(_))));
    }

    #[test]
    fn test_describe_stores_markdown() {
        let env = TestEnv::new();
        let html = env.path("desc.html");
        fs::write(&html, "<p>Creates a <strong>charge</strong></p>").unwrap();

        let status = describe(&env.rules, "r1", &html, &Settings::default()).unwrap();
        assert_eq!(status, Status::Success);

        let store = env.store();
        match store.snapshot().find("r1") {
            Some(RuleDocNode::Rule(rule)) => {
                let description = rule.description.as_deref().unwrap();
                assert!(description.contains("**charge**"));
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_describe_with_empty_html_clears_description() {
        let env = TestEnv::new();
        let html = env.path("empty.html");
        fs::write(&html, "<p></p>").unwrap();

        describe(&env.rules, "g1", &html, &Settings::default()).unwrap();
        assert_eq!(
            env.store().snapshot().find("g1").and_then(|n| n.description()),
            None
        );
    }

    #[test]
    fn test_render_writes_html_page() {
        let env = TestEnv::new();
        let mut settings = Settings::default();
        let page = env.path("docs.html");

        run(
            Command::Render {
                rules: env.rules.clone(),
                output: Some(page.clone()),
            },
            &mut settings,
        )
        .unwrap();

        let html = fs::read_to_string(&page).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Rules documentation</title>"));
        assert!(html.contains("Payments"));
    }

    #[test]
    fn test_outline_indents_nested_items() {
        let env = TestEnv::new();
        let text = outline(env.store().snapshot(), &DefaultDescriber);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "- Payments [g1]");
        assert!(lines[1].starts_with("  - POST requests"));
        assert!(lines[1].ends_with(" (Mock) [r1]"));
        assert_eq!(lines[2], "- Health [r2]");
    }
}
