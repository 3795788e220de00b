use anyhow::{Context, Result};
use clap::Parser;
use mvnrepo_workflow::alfred::{send_fatal, AlfredEnv, Feedback, HostRuntime, LocalRuntime};
use mvnrepo_workflow::config::{
    default_cache_dir, default_data_dir, find_config_file, load_config, Config,
};
use mvnrepo_workflow::utils::{HttpClient, TitleCache, UpdateChecker};
use mvnrepo_workflow::workflow::{Query, Workflow};
use mvnrepo_workflow::MvnRepositorySource;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Alfred Script Filter for mvnrepository.com
#[derive(Parser, Debug)]
#[command(name = "mvnrepo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search mvnrepository.com and print Alfred feedback", long_about = None)]
struct Cli {
    /// Query: `keyword`, `group artifact` or `group artifact version`
    args: Vec<String>,

    /// Check GitHub for a newer release and record the result, then exit
    #[arg(long)]
    check: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging (-v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Install the tracing subscriber. Logs go to stderr; stdout carries the feedback.
fn init_tracing(verbose: u8, alfred_debug: bool) {
    let level = match (verbose, alfred_debug) {
        (0, false) => "warn",
        (0, true) | (1, _) => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("mvnrepo_workflow={},mvnrepo={}", level, level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

struct Paths {
    cache_dir: PathBuf,
    data_dir: PathBuf,
}

fn load(cli: &Cli, env: &AlfredEnv) -> Result<(Config, Paths)> {
    let config_path = cli.config.clone().or_else(|| find_config_file(env));
    if let Some(path) = &config_path {
        tracing::debug!("Using config file: {}", path.display());
    }

    let config = load_config(config_path.as_deref()).context("Invalid configuration")?;

    let paths = Paths {
        cache_dir: config
            .cache
            .directory
            .clone()
            .or_else(|| env.cache_dir())
            .unwrap_or_else(default_cache_dir),
        data_dir: env.data_dir().unwrap_or_else(default_data_dir),
    };

    Ok((config, paths))
}

fn runtime(config: &Config, paths: &Paths, client: HttpClient) -> Arc<LocalRuntime> {
    let updater = UpdateChecker::new(client, config.update.clone(), &paths.data_dir);
    Arc::new(LocalRuntime::new(updater, &paths.cache_dir))
}

/// Build the workflow for this invocation and answer the query
async fn answer(cli: &Cli, env: &AlfredEnv, query: &Query) -> Result<Feedback> {
    let (config, paths) = load(cli, env)?;

    let client = HttpClient::from_config(&config.site)?;
    let repository = MvnRepositorySource::with_client(client.clone(), &config.site.base_url)?;

    let workflow = Workflow::new(
        Arc::new(repository),
        TitleCache::new(&paths.cache_dir),
        runtime(&config, &paths, client),
    );

    Ok(workflow.run(query).await?)
}

/// Background job started from the empty query. Errors are plain text.
async fn check_for_update(cli: &Cli, env: &AlfredEnv) -> Result<()> {
    let (config, paths) = load(cli, env)?;
    let client = HttpClient::from_config(&config.site)?;

    tracing::info!("Checking for updates...");
    let state = runtime(&config, &paths, client).check_for_update().await?;
    if state.update_available {
        tracing::info!(
            "Update available: {}",
            state.latest_version.unwrap_or_default()
        );
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let env = AlfredEnv::from_env();

    init_tracing(cli.verbose, env.debug);

    if cli.check {
        return check_for_update(&cli, &env).await;
    }

    let query = Query::parse(cli.args.as_slice());
    tracing::debug!("Query: {:?}", query);

    let stdout = std::io::stdout();
    match answer(&cli, &env, &query).await {
        Ok(feedback) => feedback.send(stdout.lock())?,
        Err(e) => {
            tracing::error!("{:#}", e);
            send_fatal(stdout.lock(), &format!("{:#}", e), query.text_errors())?;
            std::process::exit(1);
        }
    }

    Ok(())
}
