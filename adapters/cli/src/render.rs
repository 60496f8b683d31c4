use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use xp_planner_core::{ChartSeries, ProgressionPlan};
use xp_planner_system_selection::{individual_value, ExportRow, MAX_INDIVIDUAL_VALUE};

/// Output encodings supported by the plan and roster commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// Aligned, human-readable columns.
    Table,
    /// Comma-separated values with a header row.
    Csv,
    /// Pretty-printed JSON.
    Json,
    /// Plain text grouped under one heading per segment, ready to paste into a team builder.
    Text,
}

/// How individual values are attached to roster entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum IvMode {
    /// No individual values.
    #[value(name = "none")]
    Omit,
    /// Scaled by level across the run's level band.
    Scaled,
    /// Every value set to 0.
    Zero,
    /// Every value set to the maximum.
    Max,
}

impl IvMode {
    fn value(self, level: u32, first_level: f64, max_level: f64) -> Option<u8> {
        match self {
            Self::Omit => None,
            Self::Scaled => Some(individual_value(f64::from(level), first_level, max_level)),
            Self::Zero => Some(0),
            Self::Max => Some(MAX_INDIVIDUAL_VALUE),
        }
    }
}

/// Generated roster together with the context needed to present it.
#[derive(Debug)]
pub(crate) struct RosterReport<'a> {
    /// Flattened roster rows in segment order.
    pub(crate) rows: &'a [ExportRow],
    /// Number of planned segments, including those that drew nothing.
    pub(crate) segments: usize,
    /// Level of the first battle; lower edge of the scaled band.
    pub(crate) first_level: f64,
    /// Final level of the plan; upper edge of the scaled band.
    pub(crate) max_level: f64,
    /// Individual value mode.
    pub(crate) ivs: IvMode,
}

/// Roster entry enriched with its individual value.
#[derive(Debug, PartialEq, Serialize)]
struct RosterLine<'a> {
    segment: usize,
    name: &'a str,
    level: u32,
    strength: u32,
    base_value: f64,
    id: u32,
    iv: Option<u8>,
}

/// Strength and milestone-level chart series emitted together.
#[derive(Debug, Serialize)]
pub(crate) struct Charts<'a> {
    /// Sampled strength curve.
    pub(crate) strength: &'a ChartSeries,
    /// Milestone levels with their tolerated bands.
    pub(crate) levels: &'a ChartSeries,
}

/// Heading of the one-based segment `position` out of `count`; the last one leads into the league.
fn section_heading(position: usize, count: usize) -> String {
    if position == count {
        "/* Before League: */".to_owned()
    } else {
        format!("/* Before Badge {position}: */")
    }
}

/// Writes the segments of `plan` followed by its totals.
pub(crate) fn write_plan<W: Write>(plan: &ProgressionPlan, format: Format, out: W) -> Result<()> {
    match format {
        Format::Table => write_plan_table(plan, out),
        Format::Csv => write_plan_csv(plan, out),
        Format::Json => write_json(plan, out),
        Format::Text => write_plan_text(plan, out),
    }
}

fn write_plan_table<W: Write>(plan: &ProgressionPlan, mut out: W) -> Result<()> {
    writeln!(
        out,
        "{:>3}  {:>11}  {:>15}  {:>9}  {:>8}  {:>5}  {:>12}",
        "#", "levels", "strength", "base exp", "yield", "units", "exp"
    )?;
    for segment in &plan.segments {
        writeln!(
            out,
            "{:>3}  {:>3}-{:<3}({:>3})  {:>4}-{:<4}({:>4})  {:>9.1}  {:>8.1}  {:>5}  {:>12.0}",
            segment.position,
            segment.min_level,
            segment.max_level,
            segment.average_level,
            segment.min_strength.round(),
            segment.max_strength.round(),
            segment.average_strength.round(),
            segment.average_base_value,
            segment.average_yield_per_unit,
            segment.unit_count,
            segment.total_exp,
        )?;
    }
    writeln!(out, "total exp: {:.0}", plan.total_exp)?;
    writeln!(out, "max level: {}", plan.max_level)?;
    Ok(())
}

/// Segment records followed by two-field `total_exp` and `max_level` trailer records.
fn write_plan_csv<W: Write>(plan: &ProgressionPlan, out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);
    for segment in &plan.segments {
        writer.serialize(segment).context("failed to encode csv record")?;
    }
    let total_exp = plan.total_exp.to_string();
    let max_level = plan.max_level.to_string();
    writer
        .write_record(["total_exp", total_exp.as_str()])
        .context("failed to encode csv trailer")?;
    writer
        .write_record(["max_level", max_level.as_str()])
        .context("failed to encode csv trailer")?;
    writer.flush().context("failed to flush csv output")?;
    Ok(())
}

fn write_plan_text<W: Write>(plan: &ProgressionPlan, mut out: W) -> Result<()> {
    let count = plan.segments.len();
    for segment in &plan.segments {
        writeln!(out, "{}\n", section_heading(segment.position, count))?;
        writeln!(
            out,
            "Levels: {}-{} (average {})",
            segment.min_level, segment.max_level, segment.average_level
        )?;
        writeln!(
            out,
            "Strength: {:.0}-{:.0}",
            segment.min_strength, segment.max_strength
        )?;
        writeln!(out, "Battles: {}", segment.unit_count)?;
        writeln!(out, "Exp: {:.0}\n", segment.total_exp)?;
    }
    writeln!(out, "Total exp: {:.0}", plan.total_exp)?;
    writeln!(out, "Max level: {}", plan.max_level)?;
    Ok(())
}

/// Writes roster rows in the requested format.
pub(crate) fn write_roster<W: Write>(
    report: &RosterReport<'_>,
    format: Format,
    mut out: W,
) -> Result<()> {
    let lines: Vec<RosterLine<'_>> = report
        .rows
        .iter()
        .map(|row| RosterLine {
            segment: row.segment,
            name: &row.name,
            level: row.level,
            strength: row.strength,
            base_value: row.base_value,
            id: row.id,
            iv: report
                .ivs
                .value(row.level, report.first_level, report.max_level),
        })
        .collect();

    match format {
        Format::Table => {
            writeln!(
                out,
                "{:>3}  {:<16}  {:>5}  {:>8}  {:>4}  {:>5}",
                "#", "name", "level", "strength", "iv", "id"
            )?;
            for line in &lines {
                let iv = line.iv.map_or_else(|| "-".to_owned(), |iv| iv.to_string());
                writeln!(
                    out,
                    "{:>3}  {:<16}  {:>5}  {:>8}  {:>4}  {:>5}",
                    line.segment, line.name, line.level, line.strength, iv, line.id
                )?;
            }
            Ok(())
        }
        Format::Csv => write_csv(&lines, out),
        Format::Json => write_json(&lines, out),
        Format::Text => {
            for position in 1..=report.segments {
                writeln!(out, "{}\n", section_heading(position, report.segments))?;
                for line in lines.iter().filter(|line| line.segment == position) {
                    writeln!(out, "{}", line.name)?;
                    writeln!(out, "Level: {}", line.level)?;
                    if let Some(iv) = line.iv {
                        writeln!(
                            out,
                            "IVs: {iv} HP / {iv} Atk / {iv} Def / {iv} SpA / {iv} SpD / {iv} Spd"
                        )?;
                    }
                    writeln!(out)?;
                }
            }
            Ok(())
        }
    }
}

/// Writes both chart series as JSON.
pub(crate) fn write_charts<W: Write>(charts: &Charts<'_>, out: W) -> Result<()> {
    write_json(charts, out)
}

fn write_csv<T: Serialize, W: Write>(records: &[T], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for record in records {
        writer.serialize(record).context("failed to encode csv record")?;
    }
    writer.flush().context("failed to flush csv output")?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized, W: Write>(value: &T, mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value).context("failed to encode json output")?;
    writeln!(out)?;
    Ok(())
}
