//! ainotes: offline-first notes from the command line.
//!
//! Every command works against the on-device cache and reaches the hosted
//! note table when it is configured and reachable.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ainotes_cloud::PostgrestNoteStore;
use ainotes_core::{
    defaults, view, Error, Note, NoteDraft, NoteId, NoteUpdate, RefineMode, SortOption,
};
use ainotes_inference::OpenAiRefiner;
use ainotes_store::JsonFileCache;
use ainotes_sync::{NoteSync, SyncConfig};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "ainotes")]
#[command(author, version, about = "Offline-first notes with AI refinement")]
#[command(propagate_version = true)]
struct Cli {
    /// User whose notes to work on (default: config or AINOTES_USER_ID)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Work on the local cache only
    #[arg(long, global = true)]
    offline: bool,

    /// Local cache file (default: platform data directory)
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List notes, pinned first
    List {
        /// Show the archive instead of active notes
        #[arg(short, long)]
        archived: bool,

        /// Only notes whose title or content contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Order within the pinned and other groups
        #[arg(long, value_enum, default_value_t = SortArg::Updated)]
        sort: SortArg,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Create a note
    Create {
        #[arg(short, long, default_value = "")]
        title: String,

        #[arg(short, long, default_value = "")]
        content: String,

        #[arg(short, long)]
        pinned: bool,

        #[arg(long)]
        color: Option<String>,
    },

    /// Edit a note
    Update {
        /// Note id as shown by `list`
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Pin a note
    Pin { id: String },

    /// Unpin a note
    Unpin { id: String },

    /// Move a note to the archive
    Archive { id: String },

    /// Restore a note from the archive
    Unarchive { id: String },

    /// Delete a note
    Delete { id: String },

    /// Rewrite text, or a note's content, with the AI refiner
    Refine {
        /// Text to refine
        #[arg(required_unless_present = "note", conflicts_with = "note")]
        text: Option<String>,

        /// Refine this note's content in place
        #[arg(short, long)]
        note: Option<String>,

        /// Replace the text or keep both versions
        #[arg(short, long, value_enum, default_value_t = ModeArg::Replace)]
        mode: ModeArg,
    },

    /// Push unsynced notes and refresh from the cloud
    Sync,

    /// Show mode and unsynced notes
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Updated,
    Created,
}

impl From<SortArg> for SortOption {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Updated => SortOption::UpdatedAt,
            SortArg::Created => SortOption::CreatedAt,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Replace,
    Both,
}

impl From<ModeArg> for RefineMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Replace => RefineMode::Replace,
            ModeArg::Both => RefineMode::Both,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let _log_guard = init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing with configurable output.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables file logging)
///   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
///   RUST_LOG    - standard env filter (default: "warn")
///
/// Console output goes to stderr so command output stays clean on stdout.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("ainotes.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}

fn build_engine(cli: &Cli, config: &AppConfig) -> anyhow::Result<NoteSync> {
    let cache_path = cli
        .cache
        .clone()
        .unwrap_or_else(|| config.cache.resolved_path());
    let cache = Arc::new(JsonFileCache::new(cache_path));

    let sync_config = if cli.offline || config.offline {
        SyncConfig::offline()
    } else {
        let remote = PostgrestNoteStore::new(config.cloud.clone())
            .context("Failed to create cloud store")?;
        SyncConfig::online(Arc::new(remote))
    };

    let refiner =
        OpenAiRefiner::new(config.refine.clone()).context("Failed to create refiner")?;

    Ok(NoteSync::new(cache, sync_config).with_refiner(Arc::new(refiner)))
}

fn resolve_user(cli: &Cli, config: &AppConfig) -> anyhow::Result<String> {
    cli.user
        .clone()
        .or_else(|| config.user_id.clone())
        .ok_or_else(|| anyhow!("No user given: pass --user or set AINOTES_USER_ID"))
}

fn resolve_note(sync: &NoteSync, user_id: &str, key: &str) -> anyhow::Result<Note> {
    sync.find(user_id, key)
        .ok_or_else(|| Error::NotFound(format!("note {}", key)).into())
}

/// Cached notes resolve to their id. Any other key that is not a temporary
/// id is taken as a remote id, so notes seen only in a remote listing can
/// still be changed.
fn resolve_id(sync: &NoteSync, user_id: &str, key: &str) -> anyhow::Result<NoteId> {
    if let Some(note) = sync.find(user_id, key) {
        return Ok(note.id);
    }
    if key.starts_with(defaults::TEMP_ID_DISPLAY_PREFIX) {
        return Err(Error::NotFound(format!("note {}", key)).into());
    }
    Ok(NoteId::persisted(key))
}

fn print_outcome(id: &NoteId, note: Option<Note>) {
    match note {
        Some(note) => print_note(&note),
        None => println!("Updated {} (not cached on this device)", id),
    }
}

fn print_note(note: &Note) {
    let mut flags = String::new();
    if note.is_pinned {
        flags.push('*');
    }
    if !note.is_synced {
        flags.push('~');
    }
    println!(
        "{:<2} {}  {}  {}",
        flags,
        note.id,
        note.updated_at.format("%Y-%m-%d %H:%M"),
        if note.title.is_empty() {
            "(untitled)"
        } else {
            note.title.as_str()
        }
    );
    for line in note.content.lines() {
        println!("      {}", line);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    let sync = build_engine(&cli, &config)?;

    match &cli.command {
        Commands::List {
            archived,
            search,
            sort,
            json,
        } => {
            let user_id = resolve_user(&cli, &config)?;
            let notes = if *archived {
                sync.fetch_archived(&user_id).await?
            } else {
                sync.fetch_active(&user_id).await?
            };

            let mut matched = view::search(&notes, search.as_deref().unwrap_or(""));
            view::sort(&mut matched, (*sort).into());
            let (pinned, others) = view::partition_pinned(matched);

            if *json {
                let all: Vec<&Note> = pinned.into_iter().chain(others).collect();
                println!("{}", serde_json::to_string_pretty(&all)?);
                return Ok(());
            }

            if !pinned.is_empty() {
                println!("Pinned");
                pinned.iter().for_each(|n| print_note(n));
                println!();
            }
            if !others.is_empty() {
                println!("{}", if *archived { "Archived" } else { "Others" });
                others.iter().for_each(|n| print_note(n));
            }
            if sync.is_offline() {
                eprintln!("(offline: showing device copy)");
            }
        }

        Commands::Create {
            title,
            content,
            pinned,
            color,
        } => {
            let user_id = resolve_user(&cli, &config)?;
            let mut draft = NoteDraft::new(title.as_str(), content.as_str()).pinned(*pinned);
            if let Some(color) = color {
                draft = draft.color(color.as_str());
            }
            match sync.create(&user_id, draft).await? {
                Some(note) => print_note(&note),
                None => eprintln!("Empty note discarded"),
            }
        }

        Commands::Update {
            id,
            title,
            content,
            color,
        } => {
            let user_id = resolve_user(&cli, &config)?;
            let id = resolve_id(&sync, &user_id, id)?;
            let update = NoteUpdate {
                title: title.clone(),
                content: content.clone(),
                color: color.clone(),
                ..Default::default()
            };
            print_outcome(&id, sync.update(&id, update).await?);
        }

        Commands::Pin { id } | Commands::Unpin { id } => {
            let user_id = resolve_user(&cli, &config)?;
            let id = resolve_id(&sync, &user_id, id)?;
            let pinned = matches!(cli.command, Commands::Pin { .. });
            print_outcome(&id, sync.set_pinned(&id, pinned).await?);
        }

        Commands::Archive { id } | Commands::Unarchive { id } => {
            let user_id = resolve_user(&cli, &config)?;
            let id = resolve_id(&sync, &user_id, id)?;
            let archived = matches!(cli.command, Commands::Archive { .. });
            print_outcome(&id, sync.set_archived(&id, archived).await?);
        }

        Commands::Delete { id } => {
            let user_id = resolve_user(&cli, &config)?;
            let id = resolve_id(&sync, &user_id, id)?;
            sync.delete(&id).await?;
            println!("Deleted {}", id);
        }

        Commands::Refine { text, note, mode } => match (text, note) {
            (_, Some(key)) => {
                let user_id = resolve_user(&cli, &config)?;
                let note = resolve_note(&sync, &user_id, key)?;
                match sync.refine_note(&note.id, (*mode).into()).await? {
                    Some(note) => print_note(&note),
                    None => eprintln!("Note has no content to refine"),
                }
            }
            (Some(text), None) => match sync.refine(text).await? {
                Some(result) => println!("{}", result.apply((*mode).into())),
                None => eprintln!("Nothing to refine"),
            },
            (None, None) => return Err(anyhow!("Give text to refine or --note <id>")),
        },

        Commands::Sync => {
            let user_id = resolve_user(&cli, &config)?;
            if sync.is_offline() {
                println!("Offline: nothing to sync");
                return Ok(());
            }
            let report = sync.resync(&user_id).await?;
            let active = sync.fetch_active(&user_id).await?;
            println!(
                "Inserted {}, updated {}, failed {}, skipped {}; {} active notes",
                report.inserted,
                report.updated,
                report.failed,
                report.skipped,
                active.len()
            );
        }

        Commands::Status => {
            let user_id = resolve_user(&cli, &config)?;
            let unsynced = sync.unsynced(&user_id);
            println!("Mode: {}", if sync.is_offline() { "offline" } else { "online" });
            println!("Unsynced notes: {}", unsynced.len());
            unsynced.iter().for_each(print_note);
        }
    }

    Ok(())
}
