use anyhow::Context;
use clap::Parser;
use covid_dash_core::config::Settings;
use covid_dash_core::pipeline::{self, PipelineOptions, Reconciled};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod output;

#[derive(Debug, Parser)]
#[command(name = "covid_dash_worker")]
struct Args {
    /// Source dashboard document (JSON). Falls back to DASH_INPUT_PATH.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory receiving daily.json and weekly.json. Falls back to DASH_OUTPUT_DIR, then ./data.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Week start (0-6 with 0 = Sunday, or a weekday name). Overrides WEEK_START.
    #[arg(long)]
    week_start: Option<String>,

    /// Run the pipeline and log the outcome without writing anything.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    match run(&settings, &args) {
        Ok(()) => Ok(()),
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %format!("{err:#}"), "normalization run failed");
            Err(err)
        }
    }
}

fn run(settings: &Settings, args: &Args) -> anyhow::Result<()> {
    let input = match args.input.as_deref() {
        Some(p) => p,
        None => settings.require_input_path()?,
    };
    let out_dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| settings.output_dir_or_default());

    let mut opts = PipelineOptions::from_env();
    if let Some(s) = args.week_start.as_deref() {
        opts.week_start = covid_dash_core::time::week::parse_week_start(s)
            .context("--week-start")?;
    }

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("read input {}", input.display()))?;
    let raw = covid_dash_core::ingest::json::parse_document(&text)
        .with_context(|| format!("parse input {}", input.display()))?;

    let reconciled = pipeline::run(&raw, &opts);
    report(&reconciled, &opts);

    if args.dry_run {
        tracing::info!(input = %input.display(), dry_run = true, "normalization done (dry-run)");
        return Ok(());
    }

    let daily = output::write_document(&out_dir, output::DAILY_FILE, &reconciled.daily)?;
    let weekly = output::write_document(&out_dir, output::WEEKLY_FILE, &reconciled.weekly)?;
    tracing::info!(daily = %daily.display(), weekly = %weekly.display(), "wrote dashboard documents");

    Ok(())
}

fn report(reconciled: &Reconciled, opts: &PipelineOptions) {
    let diag = &reconciled.diagnostics;
    for skipped in &diag.skipped {
        tracing::warn!(series = skipped.series, detail = %skipped.detail, "series left out of output");
    }
    if !diag.unmatched.is_empty() {
        tracing::warn!(len = diag.unmatched.len(), "records outside every week range");
    }

    if let Some(latest) = reconciled
        .daily
        .main_summary_history
        .as_ref()
        .and_then(|h| h.latest())
    {
        tracing::info!(
            date = %latest.date,
            hospitalized = ?latest.hospitalized,
            severe = ?latest.severe,
            deceased = ?latest.deceased,
            discharged = ?latest.discharged,
            "latest status"
        );
    }

    tracing::info!(
        week_start = ?opts.week_start,
        average_window = opts.average_window,
        clean = diag.is_clean(),
        "normalization summary"
    );
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
