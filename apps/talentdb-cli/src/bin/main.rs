use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use talentdb_core::config::Config;
use talentdb_core::profile::CandidateProfile;
use talentdb_core::{DocumentType, SearchMode, SearchParams};
use talentdb_hybrid::SearchService;
use talentdb_vespa::VespaClient;

#[derive(Debug, Parser)]
#[command(name = "talentdb", version, about = "Hybrid candidate and job search")]
struct Cli {
    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a search and print formatted results
    Search(SearchArgs),
    /// Print the compiled backend query without running it
    Compile(SearchArgs),
    /// Feed a document from a JSON file
    Feed(FeedArgs),
}

#[derive(Debug, Args)]
struct SearchArgs {
    #[arg(long, default_value = "candidate")]
    doc_type: DocumentType,

    /// lexical, semantic or both
    #[arg(long)]
    mode: Option<SearchMode>,

    #[arg(long = "skill")]
    skills: Vec<String>,

    #[arg(long = "role")]
    roles: Vec<String>,

    #[arg(long = "title")]
    titles: Vec<String>,

    #[arg(long = "location")]
    locations: Vec<String>,

    /// Years
    #[arg(long, allow_negative_numbers = true)]
    experience_min: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    experience_max: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    compensation_min: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    compensation_max: Option<f64>,

    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    page: String,

    #[arg(long, default_value = "10", allow_hyphen_values = true)]
    page_size: String,

    /// JSON request body; flags given on the command line are applied on top
    #[arg(long)]
    request: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct FeedArgs {
    #[arg(long, default_value = "candidate")]
    doc_type: DocumentType,

    /// Document id; defaults to the `id` in the file
    #[arg(long)]
    id: Option<String>,

    /// Recorded as created_by/updated_by on candidate profiles
    #[arg(long, default_value = "talentdb-cli")]
    actor: String,

    file: PathBuf,
}

impl SearchArgs {
    fn params(&self) -> anyhow::Result<SearchParams> {
        let mut params = match &self.request {
            Some(path) => read_json::<SearchParams>(path)?,
            None => SearchParams::default(),
        };
        if self.mode.is_some() {
            params.mode = self.mode;
        }
        params.skills.extend(self.skills.iter().cloned());
        params.job_roles.extend(self.roles.iter().cloned());
        params.job_titles.extend(self.titles.iter().cloned());
        params.locations.extend(self.locations.iter().cloned());
        params.experience_min = self.experience_min.or(params.experience_min);
        params.experience_max = self.experience_max.or(params.experience_max);
        params.compensation_min = self.compensation_min.or(params.compensation_min);
        params.compensation_max = self.compensation_max.or(params.compensation_max);
        Ok(params)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Config::load()?.settings()?;
    let client = VespaClient::new(&settings.backend)?;
    let service = SearchService::new(&settings, client);

    match cli.command {
        Command::Search(args) => {
            let params = args.params()?;
            let results = service.search(params, args.doc_type, &args.page, &args.page_size).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Compile(args) => {
            let params = args.params()?;
            let query = service.prepare(params, args.doc_type, &args.page, &args.page_size)?;
            println!("{}", serde_json::to_string_pretty(&query)?);
        }
        Command::Feed(args) => feed(&service, args).await?,
    }
    Ok(())
}

async fn feed(service: &SearchService<VespaClient>, args: FeedArgs) -> anyhow::Result<()> {
    match args.doc_type {
        DocumentType::Candidate => {
            let mut profile: CandidateProfile = read_json(&args.file)?;
            if let Some(id) = args.id {
                profile.id = id;
            }
            if profile.id.trim().is_empty() {
                bail!("candidate profile in {} has no id", args.file.display());
            }
            let id = service.feed_candidate(profile, &args.actor).await?;
            info!(id, "candidate fed");
        }
        DocumentType::Job => {
            let fields: Map<String, Value> = read_json(&args.file)?;
            let id = match (args.id, fields.get("id")) {
                (Some(id), _) => id,
                (None, Some(Value::String(id))) => id.clone(),
                (None, _) => bail!("no --id given and {} has no string `id`", args.file.display()),
            };
            service.feed(DocumentType::Job, &id, &fields).await?;
            info!(id, "job fed");
        }
    }
    Ok(())
}

fn init_tracing(cli: &Cli) {
    let filter = match cli.verbose {
        0 => "warn,talentdb=info",
        1 => "info,talentdb=debug",
        _ => "debug,talentdb=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_build_params() {
        let cli = Cli::try_parse_from([
            "talentdb", "-v", "search", "--doc-type", "job", "--mode", "semantic", "--skill", "Python", "--skill",
            "Go", "--location", "Pune", "--experience-min", "3", "--page-size", "20",
        ])
        .expect("parse");
        assert_eq!(cli.verbose, 1);
        let Command::Search(args) = cli.command else { panic!("expected search") };
        assert_eq!(args.doc_type, DocumentType::Job);
        assert_eq!(args.page, "1");
        assert_eq!(args.page_size, "20");
        let params = args.params().expect("params");
        assert_eq!(params.mode, Some(SearchMode::Semantic));
        assert_eq!(params.skills, vec!["Python", "Go"]);
        assert_eq!(params.locations, vec!["Pune"]);
        assert_eq!(params.experience_min, Some(3));
    }

    #[test]
    fn negative_values_reach_validation() {
        let cli = Cli::try_parse_from(["talentdb", "compile", "--skill", "go", "--experience-min", "-1"]).expect("parse");
        let Command::Compile(args) = cli.command else { panic!("expected compile") };
        assert_eq!(args.params().expect("params").experience_min, Some(-1));
    }

    #[test]
    fn feed_takes_a_file() {
        let cli = Cli::try_parse_from(["talentdb", "--json-logs", "feed", "--doc-type", "job", "--id", "j-1", "job.json"])
            .expect("parse");
        assert!(cli.json_logs);
        let Command::Feed(args) = cli.command else { panic!("expected feed") };
        assert_eq!(args.id.as_deref(), Some("j-1"));
        assert_eq!(args.file, PathBuf::from("job.json"));
    }
}
