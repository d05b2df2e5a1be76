mod chart;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;
mod reveal;

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::chart::{member_chart_rows, overview_rows, team_chart_rows};
use crate::input::synthetic::{SyntheticSource, write_dataset};
use crate::input::{CsvLayout, CsvSource, InputError, RecordSource, load_or_empty};
use crate::model::config::{ConfigError, DashboardConfig, Milestone};
use crate::model::record::PerformanceRecord;
use crate::pipeline::stage1_aggregate::team_series;
use crate::pipeline::stage2_rank::worst_performing;
use crate::pipeline::stage5_report::{ReportError, ReportInput, write_reports};
use crate::reveal::{
    ManualScheduler, Maskable, RevealController, RevealPhase, play, project, visible_milestones,
};

const TOOL_NAME: &str = "annoqc";

#[derive(Debug, Parser)]
#[command(name = "annoqc", version, about = "Annotation team quality scoring and cost reports")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank members, estimate rework cost and write report files.
    Report(ReportArgs),
    /// Stream animation frames of a chart as JSON lines on stdout.
    Animate(AnimateArgs),
    /// Write a seeded synthetic dataset as CSV.
    Generate(GenerateArgs),
}

#[derive(Debug, Clone, Args)]
struct SourceArgs {
    /// Per-member weekly CSV (optionally .gz).
    #[arg(long)]
    individual: Option<PathBuf>,
    /// Team weekly CSV; rolled up from member rows when omitted.
    #[arg(long)]
    team: Option<PathBuf>,
    /// Use the synthetic generator with this seed instead of a member CSV.
    #[arg(long, conflicts_with = "individual")]
    synthetic_seed: Option<u64>,
    /// JSON config overriding the default scoring, cost and animation settings.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct ReportArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[arg(long)]
    out: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ChartKind {
    Team,
    Member,
    Overview,
}

#[derive(Debug, Clone, Args)]
struct AnimateArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[arg(long, value_enum, default_value_t = ChartKind::Team)]
    chart: ChartKind,
    /// Member for `--chart member`; defaults to the worst performer.
    #[arg(long)]
    member: Option<String>,
    /// Sleep one tick interval between frames.
    #[arg(long)]
    realtime: bool,
}

#[derive(Debug, Clone, Args)]
struct GenerateArgs {
    #[arg(long)]
    out: PathBuf,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no input given (use --individual, --team or --synthetic-seed)")]
    NoSource,
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);
    if let Err(err) = run(cli) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Report(args) => run_report(&args),
        Command::Animate(args) => run_animate(&args),
        Command::Generate(args) => run_generate(&args),
    }
}

#[derive(Debug, Clone)]
struct Dataset {
    members: Vec<PerformanceRecord>,
    team: Vec<PerformanceRecord>,
    individual_source: Option<String>,
    team_source: String,
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig, CliError> {
    let cfg = match path {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default_v1(),
    };
    cfg.validate()?;
    Ok(cfg)
}

fn member_source(args: &SourceArgs) -> Option<Box<dyn RecordSource>> {
    if let Some(seed) = args.synthetic_seed {
        return Some(Box::new(SyntheticSource::new(seed)));
    }
    args.individual
        .as_ref()
        .map(|path| Box::new(CsvSource::new(path, CsvLayout::Individual)) as Box<dyn RecordSource>)
}

fn load_dataset(args: &SourceArgs) -> Result<Dataset, CliError> {
    let source = member_source(args);
    if source.is_none() && args.team.is_none() {
        return Err(CliError::NoSource);
    }

    let (members, individual_source) = match &source {
        Some(src) => (load_or_empty(src.as_ref()), Some(src.describe())),
        None => (Vec::new(), None),
    };

    let (team, team_source) = match &args.team {
        Some(path) => {
            let src = CsvSource::new(path, CsvLayout::Team);
            (load_or_empty(&src), src.describe())
        }
        None => (team_series(&members), "rollup of member rows".to_string()),
    };

    Ok(Dataset {
        members,
        team,
        individual_source,
        team_source,
    })
}

fn run_report(args: &ReportArgs) -> Result<(), CliError> {
    let cfg = load_config(args.source.config.as_deref())?;
    let dataset = load_dataset(&args.source)?;
    let input = ReportInput {
        members: &dataset.members,
        team: &dataset.team,
        individual_source: dataset.individual_source.clone(),
        team_source: dataset.team_source.clone(),
        config: &cfg,
        tool_name: TOOL_NAME.to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let summary = write_reports(&input, &args.out)?;
    match &summary.worst_performer {
        Some(member) => info!("worst performer: {member}"),
        None => warn!("no member data; rankings are empty"),
    }
    info!("estimated total cost: {}", summary.cost.total_display);
    Ok(())
}

#[derive(Debug, Serialize)]
struct Frame<'a, T: Serialize> {
    step: usize,
    series_len: usize,
    phase: RevealPhase,
    rows: Vec<T>,
    milestones: Vec<&'a Milestone>,
}

fn run_animate(args: &AnimateArgs) -> Result<(), CliError> {
    let cfg = load_config(args.source.config.as_deref())?;
    let dataset = load_dataset(&args.source)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let frames = match args.chart {
        ChartKind::Team => {
            let rows = team_chart_rows(&dataset.team, cfg.horizon);
            animate_rows(&rows, &cfg, args.realtime, &mut out)?
        }
        ChartKind::Overview => {
            let rows = overview_rows(&dataset.members, cfg.horizon);
            animate_rows(&rows, &cfg, args.realtime, &mut out)?
        }
        ChartKind::Member => {
            let member = args
                .member
                .clone()
                .or_else(|| worst_performing(&dataset.members, &cfg.scoring))
                .unwrap_or_default();
            if member.is_empty() {
                warn!("no member to animate; emitting an empty chart");
            } else {
                info!("animating member {member}");
            }
            let rows = member_chart_rows(&dataset.members, &member, cfg.horizon);
            animate_rows(&rows, &cfg, args.realtime, &mut out)?
        }
    };
    info!("emitted {frames} frames");
    Ok(())
}

fn animate_rows<T, W>(
    rows: &[T],
    cfg: &DashboardConfig,
    realtime: bool,
    out: &mut W,
) -> Result<usize, CliError>
where
    T: Maskable + Clone + Serialize,
    W: Write,
{
    let scheduler = ManualScheduler::new();
    let mut controller = RevealController::new(scheduler.clone(), 0, &cfg.animation);
    let mut frames = 0usize;
    let mut result: Result<(), CliError> = Ok(());

    play(&mut controller, &scheduler, rows.len(), realtime, |state| {
        if result.is_err() {
            return;
        }
        let frame = Frame {
            step: state.current_step,
            series_len: state.series_len,
            phase: state.phase,
            rows: project(rows, state.current_step),
            milestones: visible_milestones(&cfg.milestones, state.current_step),
        };
        result = serde_json::to_string(&frame)
            .map_err(CliError::from)
            .and_then(|line| writeln!(out, "{line}").map_err(CliError::from));
        frames += 1;
    });

    result?;
    out.flush()?;
    Ok(frames)
}

fn run_generate(args: &GenerateArgs) -> Result<(), CliError> {
    let source = SyntheticSource::new(args.seed);
    let records = source.load()?;
    write_dataset(&args.out, &records)?;
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
