use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use rr_common::config::EmbedderKind;
use rr_common::export::{render_table, write_csv, write_json_report};
use rr_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use rr_common::source::{DocumentSource, JsonBatchSource, TextDirSource};
use rr_common::{
    create_provider, extract_fields, Document, FieldFacets, RankerConfig, RankingPipeline,
};
use tracing::info;

const APP_NAME: &str = "rr-rank";

#[derive(Debug, Parser)]
#[command(
    name = "rr-rank",
    about = "Rank candidate resumes against a job description"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score every candidate and print the top list and the band list
    Rank(RankArgs),
    /// Print the distinct extracted field values over the candidates as JSON
    Facets(SourceArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// JSON array of {"id", "text"} objects; the first entry is the job description
    #[arg(long, conflicts_with_all = ["reference", "candidates"], required_unless_present = "reference")]
    batch: Option<PathBuf>,

    /// Job description text file
    #[arg(long, requires = "candidates")]
    reference: Option<PathBuf>,

    /// Directory of candidate .txt files
    #[arg(long, requires = "reference")]
    candidates: Option<PathBuf>,
}

impl SourceArgs {
    fn load(&self) -> Result<Vec<Document>> {
        let documents = match (&self.batch, &self.reference, &self.candidates) {
            (Some(batch), _, _) => JsonBatchSource::new(batch).load()?,
            (None, Some(reference), Some(candidates)) => {
                TextDirSource::new(reference, candidates).load()?
            }
            _ => anyhow::bail!("either --batch or --reference with --candidates is required"),
        };
        Ok(documents)
    }
}

#[derive(Debug, Args)]
struct RankArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Number of leading results in the top list (overrides RR_TOP_N)
    #[arg(long)]
    top_n: Option<usize>,

    /// Embedding backend: hash or http (overrides RR_EMBEDDER)
    #[arg(long, value_parser = parse_embedder)]
    embedder: Option<EmbedderKind>,

    /// Base URL of the embedding server (overrides RR_EMBEDDING_URL)
    #[arg(long)]
    embedding_url: Option<String>,

    /// Write the top list as CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the full run report as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

impl RankArgs {
    fn config(&self) -> RankerConfig {
        let mut config = RankerConfig::from_env();
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        if let Some(kind) = self.embedder {
            config.embedder.kind = kind;
        }
        if let Some(url) = &self.embedding_url {
            config.embedder.url = Some(url.clone());
        }
        config
    }
}

fn parse_embedder(raw: &str) -> Result<EmbedderKind, String> {
    raw.parse()
}

fn run_rank(args: RankArgs) -> Result<()> {
    let documents = args.source.load()?;
    let config = args.config();

    let provider = create_provider(&config.embedder).context("building embedding provider")?;
    let pipeline = RankingPipeline::new(provider, config);
    let output = pipeline.run(&documents)?;

    println!("Top {} matches for {}", pipeline.config().top_n, output.reference_id);
    print!("{}", render_table(&output.top));
    if !output.band.is_empty() {
        println!();
        println!("Near threshold");
        print!("{}", render_table(&output.band));
    }

    if let Some(path) = &args.csv {
        write_csv(&output.top, BufWriter::new(create(path)?))
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), rows = output.top.len(), "wrote csv");
    }
    if let Some(path) = &args.json {
        write_json_report(&output, BufWriter::new(create(path)?))
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote json report");
    }

    Ok(())
}

fn run_facets(args: SourceArgs) -> Result<()> {
    let documents = args.load()?;
    let fields: Vec<_> = documents
        .iter()
        .skip(1)
        .map(|doc| extract_fields(&doc.text))
        .collect();

    let facets = FieldFacets::from_fields(&fields);
    println!("{}", serde_json::to_string_pretty(&facets)?);
    Ok(())
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("creating {}", path.display()))
}

fn run() -> Result<()> {
    dotenv().ok();
    init_tracing_subscriber(APP_NAME);
    install_tracing_panic_hook(APP_NAME);

    match Cli::parse().command {
        Command::Rank(args) => run_rank(args),
        Command::Facets(args) => run_facets(args),
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{APP_NAME} failed: {err:#}");
        std::process::exit(1);
    }
}
