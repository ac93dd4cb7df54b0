use anyhow::Result;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::io::Write;

use nexus_rando::{KeyTier, ReconcileReport, SlotPlan, World};

/// Door layout produced for one seed.
#[derive(Debug, Clone, Serialize)]
pub struct MapReport {
    pub seed: String,
    pub prng_seed: u32,
    pub catalog_levels: usize,
    pub catalog_fingerprint: String,
    pub slots: Vec<SlotPlan>,
}

/// Outcome of a reconcile run against a score file.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileSummary {
    pub seed: String,
    pub scores: String,
    pub dry_run: bool,
    #[serde(flatten)]
    pub report: ReconcileReport,
}

fn tier_label(tier: KeyTier) -> ColoredString {
    let label = format!("{:<6}", tier.to_string());
    match tier {
        KeyTier::Wood => label.yellow(),
        KeyTier::Silver => label.white(),
        KeyTier::Gold => label.bright_yellow().bold(),
        KeyTier::Red => label.red().bold(),
    }
}

/// Slots in world order, one run per world.
fn world_runs(slots: &[SlotPlan]) -> impl Iterator<Item = (World, &[SlotPlan])> {
    let span = slots.len() / World::ALL.len();
    World::ALL
        .into_iter()
        .zip(slots.chunks(span.max(1)))
}

pub fn generate_map_console_report(out: &mut dyn Write, report: &MapReport) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!("🗺️  Door map for seed {:?}", report.seed)
            .bright_cyan()
            .bold()
    )?;
    writeln!(out, "{}", "==============================".cyan())?;
    writeln!(out, "PRNG seed: {}", report.prng_seed)?;
    writeln!(
        out,
        "Catalog: {} levels ({})",
        report.catalog_levels, report.catalog_fingerprint
    )?;

    for (world, run) in world_runs(&report.slots) {
        writeln!(out)?;
        writeln!(out, "{}", format!("🚪 {world:?}").bright_yellow().bold())?;
        for entry in run {
            let author = if entry.author.is_empty() {
                String::new()
            } else {
                format!(" by {}", entry.author.dimmed())
            };
            writeln!(
                out,
                "  {:>2}  {}  {}  {}{author}",
                entry.slot,
                entry.door,
                tier_label(entry.tier),
                entry.level.bold()
            )?;
        }
    }
    Ok(())
}

pub fn generate_map_json_report(out: &mut dyn Write, report: &MapReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_map_markdown_report(out: &mut dyn Write, report: &MapReport) -> Result<()> {
    writeln!(out, "# Nexus Door Map\n")?;
    writeln!(out, "- **Seed**: `{}`", report.seed)?;
    writeln!(out, "- **PRNG seed**: {}", report.prng_seed)?;
    writeln!(
        out,
        "- **Catalog**: {} levels (`{}`)\n",
        report.catalog_levels, report.catalog_fingerprint
    )?;

    for (world, run) in world_runs(&report.slots) {
        writeln!(out, "## {world:?}\n")?;
        writeln!(out, "| Slot | Door | Key | Level | Author |")?;
        writeln!(out, "|-----:|-----:|-----|-------|--------|")?;
        for entry in run {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                entry.slot, entry.door, entry.tier, entry.level, entry.author
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_reconcile_console_report(
    out: &mut dyn Write,
    summary: &ReconcileSummary,
) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        "🔑 Key Reconciliation Summary".bright_cyan().bold()
    )?;
    writeln!(out, "{}", "==============================".cyan())?;
    writeln!(out, "Seed: {:?}", summary.seed)?;
    writeln!(out, "Scores: {}", summary.scores)?;
    writeln!(out, "Checked: {}", summary.report.checked)?;
    writeln!(out, "Never completed: {}", summary.report.missing)?;

    let writes = summary.report.writes();
    if summary.dry_run {
        writeln!(out, "Writes (dry run): {}", writes.to_string().yellow())?;
    } else {
        writeln!(out, "Writes: {}", writes.to_string().green())?;
    }

    if !summary.report.corrections.is_empty() {
        writeln!(out)?;
        for correction in &summary.report.corrections {
            writeln!(
                out,
                "  • {} {} → {}",
                correction.level.bold(),
                correction.from.to_string().red(),
                correction.to.to_string().green()
            )?;
        }
    }
    Ok(())
}

pub fn generate_reconcile_json_report(
    out: &mut dyn Write,
    summary: &ReconcileSummary,
) -> Result<()> {
    let json_output = serde_json::to_string_pretty(summary)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_reconcile_markdown_report(
    out: &mut dyn Write,
    summary: &ReconcileSummary,
) -> Result<()> {
    writeln!(out, "# Key Reconciliation\n")?;
    writeln!(out, "- **Seed**: `{}`", summary.seed)?;
    writeln!(out, "- **Scores**: `{}`", summary.scores)?;
    writeln!(out, "- **Checked**: {}", summary.report.checked)?;
    writeln!(out, "- **Never completed**: {}", summary.report.missing)?;
    writeln!(
        out,
        "- **Writes**: {}{}\n",
        summary.report.writes(),
        if summary.dry_run { " (dry run)" } else { "" }
    )?;

    if summary.report.corrections.is_empty() {
        writeln!(out, "_No key types needed correcting._")?;
        return Ok(());
    }
    writeln!(out, "| Level | Stored | Expected |")?;
    writeln!(out, "|-------|-------:|---------:|")?;
    for correction in &summary.report.corrections {
        writeln!(
            out,
            "| {} | {} | {} |",
            correction.level, correction.from, correction.to
        )?;
    }
    Ok(())
}
