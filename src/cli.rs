//! CLI interface for WanderLog.
//!
//! `wanderlog new <photo|voice|text>` drives one capture session from
//! arguments and stdin, then commits it. `timeline` and `show` read the
//! journal back.

mod format;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jiff::tz::TimeZone;

use crate::config::Config;
use crate::device::{Camera, CameraView, FileCamera, LineTranscriber, record};
use crate::enrich::{Enricher, GeminiClient};
use crate::journal::Journal;
use crate::model::{CaptureSession, Entry, InputMode};
use crate::pipeline;
use crate::storage::EntryStore;

use format::format_entry;

/// WanderLog: a travel journal with generated captions.
#[derive(Debug, Parser)]
#[command(name = "wanderlog", version, after_long_help = USAGE_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const USAGE_HELP: &str = r#"Examples:
  wanderlog new text "Sunset over the bay" --location Lisbon
  wanderlog new photo --image ~/DCIM/IMG_0042.jpg --text "Tram 28"
  wanderlog new voice --location Porto      (type phrases, blank line to stop)
  wanderlog timeline --limit 5
  wanderlog show 3fa8"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a new memory.
    New {
        #[command(subcommand)]
        input: NewEntry,
    },

    /// Show the timeline, newest first.
    Timeline {
        /// Show at most this many entries.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print one entry as JSON.
    Show {
        /// Entry ID: full ID or unambiguous prefix.
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum NewEntry {
    /// A written memory.
    Text {
        /// What happened.
        text: Option<String>,

        #[command(flatten)]
        draft: DraftArgs,
    },

    /// A photo, optionally with a few words.
    Photo {
        /// Still image to capture from.
        #[arg(long)]
        image: PathBuf,

        #[arg(long)]
        text: Option<String>,

        #[command(flatten)]
        draft: DraftArgs,
    },

    /// A spoken memory, transcribed from stdin one phrase per line.
    Voice {
        #[command(flatten)]
        draft: DraftArgs,
    },
}

/// Options shared by every capture mode.
#[derive(Debug, Args)]
pub struct DraftArgs {
    /// Where you are. Defaults to the configured location.
    #[arg(long)]
    location: Option<String>,

    /// Skip the caption and weather lookup.
    #[arg(long)]
    offline: bool,
}

/// Run a parsed command, returning an error message on failure.
pub fn run<S: EntryStore>(cli: Cli, config: &Config, journal: &mut Journal<S>) -> Result<(), String> {
    match cli.command {
        Command::New { input } => cmd_new(config, journal, input),
        Command::Timeline { limit } => {
            cmd_timeline(journal.entries(), limit);
            Ok(())
        }
        Command::Show { id } => cmd_show(journal.entries(), &id),
    }
}

fn cmd_new<S: EntryStore>(
    config: &Config,
    journal: &mut Journal<S>,
    input: NewEntry,
) -> Result<(), String> {
    let mut session = CaptureSession::new(config.default_location.clone());

    let draft = match input {
        NewEntry::Text { text, draft } => {
            session.open(InputMode::Text);
            session.set_text(text.unwrap_or_default());
            draft
        }
        NewEntry::Photo { image, text, draft } => {
            session.open(InputMode::Photo);
            if let Some(text) = text {
                session.set_text(text);
            }
            let mut camera = FileCamera::new(image);
            if let Some(data_uri) = capture_with_retry(&mut camera) {
                session.attach_image(data_uri);
            }
            draft
        }
        NewEntry::Voice { draft } => {
            session.open(InputMode::Voice);
            eprintln!("Listening. One phrase per line, blank line to stop.");
            let mut transcriber = LineTranscriber::new(io::stdin().lock());
            record(&mut session, &mut transcriber)
                .map_err(|e| format!("voice capture failed: {e}"))?;
            draft
        }
    };

    if let Some(location) = draft.location {
        session.set_location(location);
    }

    if !session.can_commit() {
        eprintln!("Nothing to save: add some text or a photo.");
        session.dismiss();
        return Ok(());
    }

    let client;
    let enricher: Option<&dyn Enricher> = if draft.offline {
        None
    } else {
        client = GeminiClient::new(&config.enrichment)
            .map_err(|e| format!("failed to set up enrichment: {e}"))?;
        eprintln!("Enhancing…");
        Some(&client)
    };

    match pipeline::commit(&mut session, enricher, journal).map_err(|e| e.to_string())? {
        Some(entry) => println!("{}", format_entry(&entry, &TimeZone::system())),
        None => eprintln!("Nothing to save."),
    }
    Ok(())
}

/// Tries the camera, offering a retry on stdin after each failure.
fn capture_with_retry(camera: &mut impl Camera) -> Option<String> {
    let mut view = CameraView::new();
    let mut image = view.capture(camera);
    while image.is_none() {
        let Some(error) = view.error() else {
            break;
        };
        eprintln!("{error}");
        if !confirm("Retry? [y/N] ") {
            break;
        }
        image = view.retry(camera);
    }
    image
}

fn confirm(prompt: &str) -> bool {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
    }
}

fn cmd_timeline(entries: &[Entry], limit: Option<usize>) {
    if entries.is_empty() {
        println!("No memories yet. Record one with `wanderlog new`.");
        return;
    }

    let tz = TimeZone::system();
    let shown = limit.unwrap_or(entries.len());
    for entry in entries.iter().take(shown) {
        println!("{}\n", format_entry(entry, &tz));
    }
    if shown < entries.len() {
        eprintln!("… {} older entries", entries.len() - shown);
    }
}

fn cmd_show(entries: &[Entry], reference: &str) -> Result<(), String> {
    let entry = resolve_entry(entries, reference)?;
    let json = serde_json::to_string_pretty(entry)
        .map_err(|e| format!("failed to serialize entry: {e}"))?;
    println!("{json}");
    Ok(())
}

/// Resolve an entry reference (full ID or unambiguous prefix).
fn resolve_entry<'a>(entries: &'a [Entry], reference: &str) -> Result<&'a Entry, String> {
    if let Some(entry) = entries.iter().find(|e| e.id == reference) {
        return Ok(entry);
    }

    let matches: Vec<&Entry> = entries
        .iter()
        .filter(|e| e.id.starts_with(reference))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no entry matching '{reference}'")),
        [entry] => Ok(*entry),
        many => {
            let ids: Vec<&str> = many.iter().map(|e| format::short_id(&e.id)).collect();
            Err(format!(
                "'{reference}' is ambiguous: matches {} entries: {}",
                many.len(),
                ids.join(", ")
            ))
        }
    }
}
