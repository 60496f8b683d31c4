#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for planning XP progressions and drawing matching rosters.

mod config;
mod render;

use std::{io, path::PathBuf};

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use xp_planner_core::{
    ChartSeries, Command, Event, FilterCriteria, CHART_RESOLUTION, MAX_PRE_MILESTONE_RATIO,
    MIN_POST_MILESTONE_RATIO, STRENGTH_MAX_FACTOR, STRENGTH_MIN_FACTOR,
};
use xp_planner_session::{apply, query, Session};
use xp_planner_system_curve_sampler::{CurveSampler, RangeBand};
use xp_planner_system_population::PopulationFilter;
use xp_planner_system_segments::{final_milestone, SegmentPlanner};
use xp_planner_system_selection::{export_rows, RngSource, Selection};

use crate::{
    config::PlanFile,
    render::{Charts, Format, IvMode, RosterReport},
};

/// Plans XP delivery across milestones and draws opponents to match.
#[derive(Debug, Parser)]
#[command(name = "xp-planner", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Splits the required experience into one segment per milestone.
    Plan(PlanArgs),
    /// Samples the strength curve and milestone bands for charting.
    Chart(ChartArgs),
    /// Draws leveled entities for every planned segment.
    Roster(RosterArgs),
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Plan file in TOML; built-in defaults are used when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output encoding.
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(Debug, Args)]
struct ChartArgs {
    /// Plan file in TOML; built-in defaults are used when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of strength samples past the first one.
    #[arg(long, default_value_t = CHART_RESOLUTION)]
    resolution: u32,
}

#[derive(Debug, Args)]
struct RosterArgs {
    /// Plan file in TOML; built-in defaults are used when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Candidate entities in JSON.
    #[arg(long, value_name = "PATH")]
    roster: PathBuf,
    /// Comma-separated entity numbers restricting the candidates.
    #[arg(long, value_name = "PATH")]
    allow_list: Option<PathBuf>,
    /// Seed for reproducible draws.
    #[arg(long)]
    seed: Option<u64>,
    /// Output encoding.
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
    /// Individual values attached to each drawn entity.
    #[arg(long, value_enum, default_value_t = IvMode::Scaled)]
    ivs: IvMode,
    #[command(flatten)]
    exclusions: ExclusionArgs,
}

#[derive(Debug, Default, Args)]
struct ExclusionArgs {
    /// Excludes legendary entities.
    #[arg(long)]
    no_legends: bool,
    /// Excludes ultra beasts.
    #[arg(long)]
    no_beasts: bool,
    /// Excludes paradox entities.
    #[arg(long)]
    no_paradox: bool,
    /// Excludes starter lines.
    #[arg(long)]
    no_starters: bool,
}

impl ExclusionArgs {
    /// Raises every flag given on the command line; flags never lower file settings.
    fn apply_to(&self, criteria: &mut FilterCriteria) {
        criteria.no_legends |= self.no_legends;
        criteria.no_beasts |= self.no_beasts;
        criteria.no_paradox |= self.no_paradox;
        criteria.no_starters |= self.no_starters;
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Plan(args) => run_plan(&args),
        Commands::Chart(args) => run_chart(&args),
        Commands::Roster(args) => run_roster(&args),
    }
}

fn load_plan_file(path: Option<&PathBuf>) -> Result<PlanFile> {
    let file = PlanFile::load(path.map(PathBuf::as_path))?;
    config::validate(&file.progression)?;
    Ok(file)
}

fn run_plan(args: &PlanArgs) -> Result<()> {
    let file = load_plan_file(args.config.as_ref())?;
    let plan = SegmentPlanner.plan(&file.progression)?;
    info!(
        segments = plan.segments.len(),
        total_exp = plan.total_exp,
        max_level = plan.max_level,
        "planned progression"
    );
    render::write_plan(&plan, args.format, io::stdout().lock())
}

fn run_chart(args: &ChartArgs) -> Result<()> {
    let file = load_plan_file(args.config.as_ref())?;
    let progression = &file.progression;

    let mut strength = ChartSeries::default();
    CurveSampler.sample_strength(
        &progression.strength_curve(),
        args.resolution,
        RangeBand::new(STRENGTH_MIN_FACTOR, STRENGTH_MAX_FACTOR),
        &mut strength,
    );

    let mut milestones = progression.milestones.clone();
    milestones.extend(final_milestone(
        progression.use_champion,
        &progression.league_milestones,
    ));
    let mut levels = ChartSeries::default();
    CurveSampler.sample_milestones(
        &milestones,
        RangeBand::new(MIN_POST_MILESTONE_RATIO, MAX_PRE_MILESTONE_RATIO),
        progression.first_level,
        &mut levels,
    );
    info!(
        strength = strength.len(),
        levels = levels.len(),
        "sampled charts"
    );

    render::write_charts(
        &Charts {
            strength: &strength,
            levels: &levels,
        },
        io::stdout().lock(),
    )
}

fn run_roster(args: &RosterArgs) -> Result<()> {
    let mut file = load_plan_file(args.config.as_ref())?;
    args.exclusions.apply_to(&mut file.filter);
    if let Some(path) = &args.allow_list {
        file.filter.identifiers = Some(config::load_allow_list(path)?);
    }
    config::validate_filter(&file.filter)?;

    let reference = config::load_reference(&args.roster)?;
    let mut session = Session::new(reference);
    let mut events = Vec::new();

    let plan = SegmentPlanner.plan(&file.progression)?;
    apply(&mut session, Command::RecordPlan { plan }, &mut events);

    let roster = {
        let reference = query::reference(&session);
        let filtered = PopulationFilter::new(reference.categories(), reference.generations())
            .filter(reference.entities(), &file.filter)?;
        info!(
            candidates = reference.entities().len(),
            eligible = filtered.len(),
            "filtered roster"
        );
        let segments = query::plan(&session).map_or(&[][..], |plan| plan.segments.as_slice());
        let mut rng = args
            .seed
            .map_or_else(RngSource::from_entropy, RngSource::seeded);
        Selection.generate(&filtered, segments, file.filter.mature_after_level, &mut rng)?
    };
    apply(&mut session, Command::RecordRoster { roster }, &mut events);

    for event in &events {
        if let Event::RosterRejected { reason } = event {
            bail!("roster was not recorded: {reason}");
        }
    }

    let (Some(plan), Some(roster)) = (query::plan(&session), query::roster(&session)) else {
        bail!("session holds no roster after selection");
    };
    let rows = export_rows(roster);
    render::write_roster(
        &RosterReport {
            rows: &rows,
            segments: roster.len(),
            first_level: file.progression.first_level,
            max_level: plan.max_level,
            ivs: args.ivs,
        },
        args.format,
        io::stdout().lock(),
    )
}
