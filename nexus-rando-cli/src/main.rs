mod reports;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use nexus_rando::{
    Catalog, ManualNexus, MemoryScoreStore, NexusConfig, NexusMode, NexusRng, NexusSession,
    SeedEntry, SeedKey, SlotIndex, fold_seed,
};
use reports::{MapReport, ReconcileSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored terminal output
    Console,
    /// Pretty-printed JSON
    Json,
    /// Markdown tables
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "nexus-rando", version)]
#[command(about = "Seeded nexus randomizer - inspect door maps and fix stored key types")]
struct Cli {
    /// Verbose logging (debug level unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the door map for a seed
    Map(MapArgs),
    /// Correct stored key types in a score file for a seed
    Reconcile(ReconcileArgs),
    /// Generate random seeds
    Roll(RollArgs),
    /// Print the generator seed derived from seed text
    Fold(FoldArgs),
}

#[derive(Debug, Clone, Default, Args)]
struct SourceArgs {
    /// Catalog JSON to select from instead of the built-in catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Randomizer configuration JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON object mapping level names to their authors
    #[arg(long)]
    authors: Option<PathBuf>,

    #[command(flatten)]
    filter: FilterArgs,
}

/// Command-line overrides for the configuration's catalog filter.
#[derive(Debug, Clone, Default, Args)]
struct FilterArgs {
    /// Start of the difficulty window, 0 (easiest) to 1000
    #[arg(long)]
    min_difficulty: Option<u32>,

    /// End of the difficulty window, 0 to 1000 (hardest)
    #[arg(long)]
    max_difficulty: Option<u32>,

    /// Level never to select (repeatable)
    #[arg(long = "ban-level", value_name = "LEVEL")]
    banned_levels: Vec<String>,

    /// Author whose levels are never selected (repeatable)
    #[arg(long = "block-author", value_name = "AUTHOR")]
    blocked_authors: Vec<String>,

    /// Only select levels by these authors (repeatable)
    #[arg(long = "require-author", value_name = "AUTHOR")]
    required_authors: Vec<String>,
}

impl FilterArgs {
    fn apply_to(&self, config: &mut NexusConfig) {
        let filter = &mut config.filter;
        if let Some(min) = self.min_difficulty {
            filter.min_difficulty = min;
        }
        if let Some(max) = self.max_difficulty {
            filter.max_difficulty = max;
        }
        filter.banned_levels.extend(self.banned_levels.iter().cloned());
        filter.blocked_authors.extend(self.blocked_authors.iter().cloned());
        filter.required_authors.extend(self.required_authors.iter().cloned());
    }
}

#[derive(Debug, Clone, Args)]
struct OutputArgs {
    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct MapArgs {
    /// Seed text
    #[arg(long)]
    seed: String,

    #[command(flatten)]
    sources: SourceArgs,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Clone, Args)]
struct ReconcileArgs {
    /// Seed text
    #[arg(long)]
    seed: String,

    /// Score file: a JSON object mapping level names to records
    #[arg(long)]
    scores: PathBuf,

    /// Report corrections without rewriting the score file
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    sources: SourceArgs,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Clone, Args)]
struct RollArgs {
    /// Number of seeds to generate
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// Seed the generator for reproducible output
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Randomizer configuration JSON (seed lengths)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Optional path to write the seeds instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct FoldArgs {
    /// Seed text
    #[arg(long)]
    seed: String,

    /// Number of generator draws to print after the seed
    #[arg(long, default_value_t = 0)]
    draws: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Map(args) => run_map(&args),
        Command::Reconcile(args) => run_reconcile(&args),
        Command::Roll(args) => run_roll(&args),
        Command::Fold(args) => run_fold(&args),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn announce_banner(output: &OutputArgs) {
    // Keep machine-readable stdout clean.
    if output.report != ReportFormat::Console || output.output.is_some() {
        return;
    }
    println!("{}", "🎲 Nexus Randomizer".bright_cyan().bold());
    println!("{}", "===================".cyan());
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<NexusConfig> {
    let Some(path) = path else {
        return Ok(NexusConfig::default());
    };
    NexusConfig::from_json(&read_text(path)?)
        .with_context(|| format!("invalid configuration {}", path.display()))
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        let catalog = Catalog::builtin();
        if catalog.is_empty() {
            bail!("built-in catalog is unavailable");
        }
        return Ok(catalog.clone());
    };
    Catalog::from_json(&read_text(path)?)
        .with_context(|| format!("invalid catalog {}", path.display()))
}

fn load_authors(path: &Path) -> Result<BTreeMap<String, String>> {
    serde_json::from_str(&read_text(path)?)
        .with_context(|| format!("invalid author list {}", path.display()))
}

fn load_session(sources: &SourceArgs, seed: &str) -> Result<NexusSession> {
    let mut catalog = load_catalog(sources.catalog.as_deref())?;
    if let Some(path) = &sources.authors {
        catalog = catalog.with_authors(&load_authors(path)?);
    }
    let mut config = load_config(sources.config.as_deref())?;
    sources.filter.apply_to(&mut config);
    log::info!(
        "loaded {} catalog levels for a {}-slot nexus",
        catalog.len(),
        config.slot_count
    );
    let mut session = NexusSession::new(catalog, SlotIndex::stock(), config)
        .context("catalog and configuration do not fit the stock nexus")?;
    session.set_seed(seed);
    Ok(session)
}

fn build_map_report(session: &mut NexusSession) -> Result<Option<MapReport>> {
    let Some(slots) = session.plan()? else {
        return Ok(None);
    };
    Ok(Some(MapReport {
        seed: session.seed().to_string(),
        prng_seed: fold_seed(session.seed()),
        catalog_levels: session.catalog().len(),
        catalog_fingerprint: format!("{:016x}", session.catalog().fingerprint()),
        slots,
    }))
}

fn run_map(args: &MapArgs) -> Result<()> {
    let mut session = load_session(&args.sources, &args.seed)?;
    if session.config().mode == NexusMode::Manual {
        bail!("configuration selects manual mode; door maps only exist for seeded nexuses");
    }
    announce_banner(&args.output);

    let mut output_target = OutputTarget::new(args.output.output.clone())?;
    match build_map_report(&mut session)? {
        None => writeln!(
            &mut output_target,
            "No seed set: every door keeps its stock level."
        )?,
        Some(report) => match args.output.report {
            ReportFormat::Console => {
                reports::generate_map_console_report(&mut output_target, &report)?;
            }
            ReportFormat::Json => reports::generate_map_json_report(&mut output_target, &report)?,
            ReportFormat::Markdown => {
                reports::generate_map_markdown_report(&mut output_target, &report)?;
            }
        },
    }
    output_target.flush_inner()?;
    Ok(())
}

fn run_reconcile(args: &ReconcileArgs) -> Result<()> {
    let mut store = MemoryScoreStore::from_json(&read_text(&args.scores)?)
        .with_context(|| format!("invalid score file {}", args.scores.display()))?;
    let mut session = load_session(&args.sources, &args.seed)?;
    announce_banner(&args.output);

    let report = match session.config().mode {
        NexusMode::Manual => {
            if !args.seed.is_empty() {
                log::warn!("manual mode ignores seed {:?}", args.seed);
            }
            ManualNexus::from_config(session.config()).on_level_start(&mut store)
        }
        NexusMode::Seeded => session.reconcile(&mut store)?.unwrap_or_default(),
    };

    if !args.dry_run && report.writes() > 0 {
        std::fs::write(&args.scores, store.to_json()?)
            .with_context(|| format!("failed to write {}", args.scores.display()))?;
        log::info!("wrote {} corrections to {}", report.writes(), args.scores.display());
    }

    let summary = ReconcileSummary {
        seed: args.seed.clone(),
        scores: args.scores.display().to_string(),
        dry_run: args.dry_run,
        report,
    };
    let mut output_target = OutputTarget::new(args.output.output.clone())?;
    match args.output.report {
        ReportFormat::Console => {
            reports::generate_reconcile_console_report(&mut output_target, &summary)?;
        }
        ReportFormat::Json => reports::generate_reconcile_json_report(&mut output_target, &summary)?,
        ReportFormat::Markdown => {
            reports::generate_reconcile_markdown_report(&mut output_target, &summary)?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

/// Roll `count` seeds the way the on-screen keyboard does: random, then enter.
fn roll_seeds<R>(entry: &mut SeedEntry, rng: &mut R, count: usize) -> Vec<String>
where
    R: Rng + ?Sized,
{
    (0..count)
        .filter_map(|_| {
            entry.press(SeedKey::Random, rng);
            entry.press(SeedKey::Enter, rng)
        })
        .collect()
}

fn run_roll(args: &RollArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut entry = SeedEntry::from_config(&config);
    let mut rng = match args.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut output_target = OutputTarget::new(args.output.clone())?;
    for seed in roll_seeds(&mut entry, &mut rng, args.count) {
        writeln!(&mut output_target, "{seed}")?;
    }
    output_target.flush_inner()?;
    Ok(())
}

fn run_fold(args: &FoldArgs) -> Result<()> {
    let mut out = stdout().lock();
    writeln!(out, "{}", fold_seed(&args.seed))?;
    let mut rng = NexusRng::from_seed_text(&args.seed);
    for _ in 0..args.draws {
        writeln!(out, "{}", rng.draw())?;
    }
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
