use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use langscope::{
    init_logging, render, AnalysisClient, AnalysisInput, AppConfig, StatusLine, SubmitError,
};
use tracing::error;

#[derive(Parser)]
#[command(name = "langscope")]
#[command(about = "Detect, translate and transcribe with a remote analysis service")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to ./langscope.{toml,yaml,json} when present)
    #[arg(short, long, global = true, env = "LANGSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Analysis service root URL (overrides settings)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print the result as JSON instead of a panel
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a piece of text; `-` reads it from stdin
    Text { text: String },
    /// Transcribe and analyze an audio, video or document file
    File { path: PathBuf },
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let cfg = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::from(2);
        }
    };
    init_logging(&cfg);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: failed to start runtime: {err}");
            return ExitCode::from(2);
        }
    };

    match runtime.block_on(run(cli, cfg)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<SubmitError>() {
            Some(submit) => {
                error!(error = %submit, "submit_failed");
                eprintln!("{}", submit.user_message());
                ExitCode::FAILURE
            }
            None => {
                eprintln!("error: {err:#}");
                ExitCode::from(2)
            }
        },
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut cfg = AppConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        cfg = cfg.with_base_url(base_url.clone());
        cfg.validate()?;
    }
    if cli.verbose {
        cfg.log_level = "debug".to_string();
    }
    Ok(cfg)
}

async fn run(cli: Cli, cfg: AppConfig) -> anyhow::Result<()> {
    let input = match &cli.command {
        Command::Text { text } if text == "-" => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read text from stdin")?;
            AnalysisInput::text(buf)
        }
        Command::Text { text } => AnalysisInput::text(text.clone()),
        Command::File { path } => read_file(path).await?,
    };

    let client = AnalysisClient::new(cfg.client)?.with_observer(Arc::new(StatusLine::stderr()));
    let model = client.submit(input).await?;

    if cli.json {
        println!("{}", render::render_json(&model)?);
    } else {
        print!("{}", render::render_text(&model));
    }
    Ok(())
}

async fn read_file(path: &Path) -> Result<AnalysisInput, SubmitError> {
    Ok(AnalysisInput::from_path(path).await?)
}
