mod display;

use std::path::{Path, PathBuf};

use anyhow::Context;
use capnote_core::lineage::compute_carry_forward;
use capnote_core::{
    EngineConfig, FollowUpFactory, IssueObject, NameRoster, NoteEngine, PracticeGapLinker,
    PracticeGapObject, UuidIds, WeeklyNote, merge_outcomes, parse_tag,
};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "capnote", version, about = "Run the CAP note engine over JSON documents")]
struct Cli {
    /// Engine config (TOML). Defaults apply when omitted.
    #[arg(long, global = true, env = "CAPNOTE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a single plan line and show the tag it carries.
    Parse { line: String },

    /// Build follow-ups for an issue's plan, keeping recorded outcomes.
    FollowUps {
        #[arg(long)]
        issue: PathBuf,
        /// JSON array of known people names.
        #[arg(long)]
        roster: Option<PathBuf>,
        /// Print cards instead of JSON.
        #[arg(long)]
        cards: bool,
    },

    /// List the issues a new note would carry over from `--note`.
    CarryForward {
        #[arg(long)]
        note: PathBuf,
        /// JSON array of stored issues.
        #[arg(long)]
        issues: PathBuf,
        #[arg(long)]
        cards: bool,
    },

    /// Link an issue's assessment lines to known practice gaps.
    LinkGaps {
        #[arg(long)]
        issue: PathBuf,
        #[arg(long)]
        gaps: PathBuf,
    },

    /// Follow-ups and gap links in one pass, as done when a note is finalized.
    Finalize {
        #[arg(long)]
        issue: PathBuf,
        #[arg(long)]
        gaps: Option<PathBuf>,
        #[arg(long)]
        roster: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("capnote v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Parse { line } => match parse_tag(&line) {
            Some(tag) => println!("{}", display::tag_line(&tag)),
            None => println!("no tag"),
        },

        Command::FollowUps {
            issue,
            roster,
            cards,
        } => {
            let issue: IssueObject = read_json(&issue)?;
            let roster = load_roster(roster.as_deref())?;
            let factory = FollowUpFactory::new(&roster);

            let mut drafts = factory.build_drafts(&issue);
            if config.merge_outcomes {
                let rebuilt = drafts.iter().map(|d| d.follow_up.clone()).collect();
                let merged = merge_outcomes(&issue.follow_ups, rebuilt);
                for (draft, fu) in drafts.iter_mut().zip(merged) {
                    draft.follow_up = fu;
                }
            }

            if cards {
                for draft in &drafts {
                    println!("{}", display::follow_up_card(draft));
                }
            } else {
                let follow_ups: Vec<_> = drafts.iter().map(|d| &d.follow_up).collect();
                println!("{}", serde_json::to_string_pretty(&follow_ups)?);
            }
        }

        Command::CarryForward {
            note,
            issues,
            cards,
        } => {
            let note: WeeklyNote = read_json(&note)?;
            let issues: Vec<IssueObject> = read_json(&issues)?;
            let carried = compute_carry_forward(&note, &issues);
            if cards {
                println!("=== {} after {} ===", note.project, note.date);
                print!("{}", display::issue_list(&carried));
            } else {
                let ids: Vec<&str> = carried.iter().map(|i| i.id.as_str()).collect();
                println!("{}", serde_json::to_string_pretty(&ids)?);
            }
        }

        Command::LinkGaps { issue, gaps } => {
            let issue: IssueObject = read_json(&issue)?;
            let gaps: Vec<PracticeGapObject> = read_json(&gaps)?;
            let result =
                PracticeGapLinker::new(&config).link_assessments(&issue, &gaps, chrono::Utc::now());
            let out = serde_json::json!({
                "issue": result.issue,
                "gaps": result.gaps,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }

        Command::Finalize {
            issue,
            gaps,
            roster,
        } => {
            let issue: IssueObject = read_json(&issue)?;
            let gaps: Vec<PracticeGapObject> = match gaps {
                Some(path) => read_json(&path)?,
                None => Vec::new(),
            };
            let roster = load_roster(roster.as_deref())?;
            let ids = UuidIds;
            let engine = NoteEngine::new(config, &roster, &ids);

            let done = engine
                .finalize_issue(&issue, &gaps, chrono::Utc::now())
                .with_context(|| format!("finalizing issue {}", issue.id))?;
            let messages: Vec<&str> = done.drafts.iter().map(|d| d.text.message.as_str()).collect();
            let out = serde_json::json!({
                "issue": done.issue,
                "gaps": done.gaps,
                "messages": messages,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_roster(path: Option<&Path>) -> anyhow::Result<NameRoster> {
    match path {
        Some(path) => read_json(path),
        None => Ok(NameRoster::default()),
    }
}
