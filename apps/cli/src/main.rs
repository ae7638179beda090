use std::{
    io::IsTerminal,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tokio::{fs, io::AsyncReadExt};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tubekit_core::{
    DEFAULT_MAX_TITLES, ExportFormat, GenerationClient, GenerationOptions, GenerationRequest,
    HttpGenerationClient, Pipeline, Provider, RetryPolicy, RunReport, SessionState,
    TargetAudience, Tone, TubekitError, VideoLength, VideoType, default_secrets_path,
    format_session_readable, resolve_api_key, write_export,
};

use crate::progress::{StepProgress, format_duration};

mod interactive;
mod progress;

#[derive(Parser)]
#[command(name = "tubekit")]
#[command(
    about = "Generate YouTube titles, descriptions, tags and thumbnail concepts with AI"
)]
struct Cli {
    /// Video script or summary
    #[arg(short, long, conflicts_with = "script_file")]
    script: Option<String>,

    /// Read the script or summary from a file (stdin is used when piped)
    #[arg(short = 'f', long)]
    script_file: Option<PathBuf>,

    /// tutorial, review, entertainment, educational, gaming, vlog, how-to, unboxing, reaction, other
    #[arg(short = 't', long, default_value = "tutorial")]
    video_type: VideoType,

    /// general, beginners, intermediate, advanced, professionals, students, kids, teens, adults
    #[arg(short, long, default_value = "general")]
    audience: TargetAudience,

    /// professional, casual, energetic, educational, funny, serious, inspirational, conversational
    #[arg(long, default_value = "professional")]
    tone: Tone,

    /// under-5, 5-10, 10-20, 20-30, 30-plus
    #[arg(short, long, default_value = "under-5")]
    length: VideoLength,

    /// Primary keywords, comma-separated
    #[arg(short, long, default_value = "")]
    keywords: String,

    /// Style preferences, e.g. "Use numbers, avoid caps"
    #[arg(long, default_value = "")]
    style: String,

    /// Brief description of the channel
    #[arg(long, default_value = "")]
    channel: String,

    /// Keywords competitors are using
    #[arg(long, default_value = "")]
    competitors: String,

    /// Number of titles to generate (3-10)
    #[arg(long, default_value_t = DEFAULT_MAX_TITLES as u8, value_parser = clap::value_parser!(u8).range(3..=10))]
    max_titles: u8,

    #[arg(long)]
    no_titles: bool,

    #[arg(long)]
    no_description: bool,

    #[arg(long)]
    no_tags: bool,

    #[arg(long)]
    no_thumbnails: bool,

    /// Skip word counts and keyword analysis of the script
    #[arg(long)]
    no_analytics: bool,

    /// Do not record this run in the session history
    #[arg(long)]
    no_history: bool,

    /// Generate all enabled assets concurrently
    #[arg(long)]
    parallel: bool,

    /// AI provider for generation: gemini, openai or grok
    #[arg(short, long, default_value = "gemini")]
    provider: Provider,

    /// Override the provider's default model
    #[arg(long)]
    model: Option<String>,

    /// Attempts per generation request
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Pause between attempts, in milliseconds
    #[arg(long, default_value_t = 1000)]
    retry_delay_ms: u64,

    /// Secrets file holding the API key (defaults to the user config dir)
    #[arg(long)]
    secrets: Option<PathBuf>,

    /// Export the results: json, csv or txt
    #[arg(short, long)]
    export: Option<ExportFormat>,

    /// Directory for exported files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Stay in a menu after generating (select title, export, history, ...)
    #[arg(short, long)]
    interactive: bool,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            titles: !self.no_titles,
            description: !self.no_description,
            tags: !self.no_tags,
            thumbnails: !self.no_thumbnails,
            analytics: !self.no_analytics,
            history: !self.no_history,
            max_titles: usize::from(self.max_titles),
            parallel: self.parallel,
        }
    }

    async fn read_content(&self) -> Result<String> {
        if let Some(script) = &self.script {
            return Ok(script.clone());
        }
        if let Some(path) = &self.script_file {
            return fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read script file {}", path.display()));
        }
        if !std::io::stdin().is_terminal() {
            let mut content = String::new();
            tokio::io::stdin().read_to_string(&mut content).await?;
            return Ok(content);
        }
        Ok(String::new())
    }

    async fn request(&self) -> Result<GenerationRequest> {
        Ok(GenerationRequest {
            content: self.read_content().await?,
            video_type: self.video_type,
            target_audience: self.audience,
            tone: self.tone,
            keywords: self.keywords.clone(),
            style_preferences: self.style.clone(),
            channel_info: self.channel.clone(),
            competitor_keywords: self.competitors.clone(),
            video_length: self.length,
        })
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Runs the pipeline with a progress bar and prints a one-line verdict.
pub(crate) async fn generate<C: GenerationClient>(
    pipeline: &Pipeline<C>,
    session: &mut SessionState,
    request: &GenerationRequest,
    options: &GenerationOptions,
) -> Result<RunReport> {
    let started = Instant::now();
    let mut progress = StepProgress::new(options.enabled_steps().len())?;
    let result = pipeline.run(session, request, options, &mut progress).await;
    progress.finish();
    let report = result?;

    let failed = report.failed_steps().count();
    if failed == 0 {
        println!(
            "{} Content generated successfully! {}",
            style("✓").green().bold(),
            style(format!("[{}]", format_duration(started.elapsed()))).dim()
        );
    } else {
        println!(
            "{} {} of {} steps failed",
            style("!").yellow().bold(),
            failed,
            report.steps.len()
        );
    }
    Ok(report)
}

pub(crate) fn print_results(session: &SessionState) {
    println!("{}", style("─".repeat(60)).dim());
    let readable = format_session_readable(session);
    if readable.is_empty() {
        println!("{}", style("Nothing generated.").dim());
    } else {
        println!("{}", readable);
    }
}

/// Exports and reports the file; an empty session is only a warning.
pub(crate) async fn export(
    session: &SessionState,
    format: ExportFormat,
    output_dir: &std::path::Path,
) -> Result<()> {
    match write_export(session, format, output_dir).await {
        Ok(path) => {
            info!(path = %path.display(), %format, "exported session");
            println!(
                "\n{} {}\n",
                style("Saved:").dim(),
                style(path.display()).cyan()
            );
            Ok(())
        }
        Err(TubekitError::NothingToExport) => {
            debug!(%format, "export skipped, session is empty");
            println!("{} No content to export", style("!").yellow().bold());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let provider = cli.provider;

    // Resolve API key early
    let secrets_path = cli.secrets.clone().unwrap_or_else(default_secrets_path);
    debug!(secrets = %secrets_path.display(), %provider, "resolving API key");
    let api_key = match resolve_api_key(provider, &secrets_path) {
        Ok(key) => key,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let client = HttpGenerationClient::for_provider(provider, api_key, cli.model.clone())?;
    let retry = RetryPolicy {
        max_attempts: cli.retries,
        delay: Duration::from_millis(cli.retry_delay_ms),
    };
    info!(%provider, model = client.model(), attempts = retry.max_attempts, "client ready");

    println!(
        "\n{}  {}\n",
        style("tubekit").cyan().bold(),
        style(format!("YouTube Content Generator ({}, {})", provider.name(), client.model())).dim()
    );

    let pipeline = Pipeline::new(client, retry);
    let request = cli.request().await?;
    let options = cli.generation_options();
    let mut session = SessionState::new();

    match generate(&pipeline, &mut session, &request, &options).await {
        Ok(_) => print_results(&session),
        Err(e) if matches!(e.downcast_ref::<TubekitError>(), Some(TubekitError::EmptyContent)) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
        Err(e) => return Err(e),
    }

    if let Some(format) = cli.export {
        export(&session, format, &cli.output_dir).await?;
    }

    if cli.interactive {
        interactive::run(
            &pipeline,
            &mut session,
            &request,
            &options,
            &cli.output_dir,
            cli.export.unwrap_or_default(),
        )
        .await?;
    }

    Ok(())
}
