mod display;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use consultlens_core::{
    Comment, ConsultationMeta, LoadedConsultation, Provenance, StanceFilter, Summary,
    ViewSession, ViewState, WordCloudAsset, WordCloudTable, filter_comments, summarize,
};
use consultlens_sync::SourceClient;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "consultlens")]
#[command(about = "Filterable, aggregated view of public consultation comments", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL
    #[arg(
        long,
        global = true,
        env = "CONSULTLENS_API_URL",
        default_value = "http://localhost:5000"
    )]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "CONSULTLENS_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List consultations known to the backend
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one consultation: statistics, filtered submissions and word cloud
    Show(ShowArgs),
}

#[derive(Args)]
struct ShowArgs {
    /// Consultation id
    id: String,

    /// Stance filter for the submissions list: All, Positive, Negative or Neutral
    #[arg(long, default_value = "All")]
    stance: StanceFilter,

    /// Case-insensitive search over submitter, summary and keywords
    #[arg(short, long, default_value = "")]
    query: String,

    /// Stance filter for the word cloud
    #[arg(long, default_value = "All")]
    cloud_stance: StanceFilter,

    /// JSON word-cloud table replacing the built-in one
    #[arg(long, env = "CONSULTLENS_WORDCLOUDS")]
    wordclouds: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    meta: &'a ConsultationMeta,
    provenance: &'a Provenance,
    summary: &'a Summary,
    stance: StanceFilter,
    query: &'a str,
    comments: &'a [&'a Comment],
    total: usize,
    wordcloud: Option<&'a WordCloudAsset>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("consultlens v{}", env!("CARGO_PKG_VERSION"));

    let client = SourceClient::with_timeout(cli.base_url, Duration::from_secs(cli.timeout_secs))
        .context("building HTTP client")?;

    match cli.command {
        Commands::List { json } => run_list(&client, json).await,
        Commands::Show(args) => run_show(&client, &args).await,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_list(client: &SourceClient, json: bool) -> anyhow::Result<()> {
    let metas = match client.fetch_consultations().await {
        Ok(metas) => metas,
        Err(e) => {
            tracing::warn!(error = %e, "consultation list unavailable");
            Vec::new()
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&metas)?);
    } else {
        display::print_consultation_list(&metas);
    }
    Ok(())
}

async fn run_show(client: &SourceClient, args: &ShowArgs) -> anyhow::Result<()> {
    let table = match &args.wordclouds {
        Some(path) => load_wordclouds(path)?,
        None => WordCloudTable::builtin(),
    };

    let mut session = ViewSession::new();
    if let Some(ticket) = session.navigate_raw(&args.id) {
        let loaded = client.load_consultation(ticket.id).await;
        session.resolve(ticket, loaded);
    }

    match session.state() {
        ViewState::Ready(loaded) => render(loaded, &table, args),
        ViewState::NotFound { requested } => {
            anyhow::bail!("Consultation not found: {requested:?}")
        }
        ViewState::Idle | ViewState::Loading { .. } => {
            anyhow::bail!("consultation {:?} did not finish loading", args.id)
        }
    }
}

fn render(loaded: &LoadedConsultation, table: &WordCloudTable, args: &ShowArgs) -> anyhow::Result<()> {
    let summary = summarize(&loaded.comments);
    let view = filter_comments(&loaded.comments, args.stance, &args.query);
    let wordcloud = table.select(loaded.meta.id, args.cloud_stance);

    if args.json {
        let output = ShowOutput {
            meta: &loaded.meta,
            provenance: &loaded.provenance,
            summary: &summary,
            stance: args.stance,
            query: &args.query,
            comments: &view.comments,
            total: view.total,
            wordcloud,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    display::print_header(&loaded.meta, &loaded.provenance);
    display::print_overview(&summary);
    display::print_insights(&summary);
    display::print_submissions(&view, args.stance, &args.query);
    display::print_wordcloud(args.cloud_stance, wordcloud);
    Ok(())
}

fn load_wordclouds(path: &Path) -> anyhow::Result<WordCloudTable> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading word-cloud table {}", path.display()))?;
    WordCloudTable::from_json(&raw)
        .with_context(|| format!("parsing word-cloud table {}", path.display()))
}
