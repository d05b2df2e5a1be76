use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::chart::{member_chart_rows, overview_rows, team_chart_rows};
use crate::model::config::DashboardConfig;
use crate::model::record::PerformanceRecord;
use crate::pipeline::stage1_aggregate::distinct_entities;
use crate::pipeline::stage2_rank::rank;
use crate::pipeline::stage3_cost::{cost_breakdown, estimate_cost};
use crate::pipeline::stage4_diagnostics::member_diagnostics;
use crate::report::json::{render_rows_json, render_summary_json};
use crate::report::text::render_report_text;
use crate::report::{CostSummary, InputSummary, SummaryData, format_currency};

const WORST_EXAMPLES: usize = 4;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub members: &'a [PerformanceRecord],
    pub team: &'a [PerformanceRecord],
    pub individual_source: Option<String>,
    pub team_source: String,
    pub config: &'a DashboardConfig,
    pub tool_name: String,
    pub tool_version: String,
}

pub fn build_summary(input: &ReportInput<'_>) -> SummaryData {
    let cfg = input.config;
    let rankings = rank(input.members, &cfg.scoring);
    let worst_performer = rankings.first().map(|s| s.entity_id.clone());

    let estimate = estimate_cost(input.team, &cfg.cost);
    let breakdown = cost_breakdown(input.team, &cfg.cost);
    let benchmark_week = input.team.get(cfg.cost.benchmark_index).map(|r| r.period);

    let members = distinct_entities(input.members);
    let diagnostics = members
        .iter()
        .map(|m| member_diagnostics(input.members, m, WORST_EXAMPLES))
        .collect();

    SummaryData {
        tool: input.tool_name.clone(),
        tool_version: input.tool_version.clone(),
        input: InputSummary {
            individual_source: input.individual_source.clone(),
            team_source: input.team_source.clone(),
            n_member_records: input.members.len(),
            n_members: members.len(),
            n_team_periods: input.team.len(),
            horizon: cfg.horizon,
        },
        worst_performer,
        rankings,
        cost: CostSummary {
            estimate,
            benchmark_week,
            rework_cost_display: format_currency(estimate.rework_cost),
            downstream_impact_display: format_currency(estimate.downstream_impact),
            total_display: format_currency(estimate.total),
            breakdown,
        },
        diagnostics,
        config: cfg.clone(),
    }
}

pub fn write_reports(input: &ReportInput<'_>, out_dir: &Path) -> Result<SummaryData, ReportError> {
    fs::create_dir_all(out_dir)?;
    let summary = build_summary(input);

    write_rankings_tsv(&summary, &out_dir.join("rankings.tsv"))?;
    write_text(&out_dir.join("summary.json"), &render_summary_json(&summary)?)?;
    write_text(&out_dir.join("report.txt"), &render_report_text(&summary))?;

    let charts_dir = out_dir.join("charts");
    fs::create_dir_all(&charts_dir)?;
    let horizon = input.config.horizon;
    write_text(
        &charts_dir.join("team.json"),
        &render_rows_json(&team_chart_rows(input.team, horizon))?,
    )?;
    write_text(
        &charts_dir.join("overview.json"),
        &render_rows_json(&overview_rows(input.members, horizon))?,
    )?;
    for (member, path) in member_chart_paths(&charts_dir, &distinct_entities(input.members)) {
        write_text(
            &path,
            &render_rows_json(&member_chart_rows(input.members, &member, horizon))?,
        )?;
    }

    info!(
        "wrote reports for {} members to {}",
        summary.input.n_members,
        out_dir.display()
    );
    Ok(summary)
}

fn write_rankings_tsv(summary: &SummaryData, path: &Path) -> Result<(), ReportError> {
    let mut w = csv::WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    w.write_record([
        "rank",
        "member",
        "score",
        "avg_throughput",
        "avg_rework_rate",
        "avg_iou",
        "avg_alpha",
        "weeks",
    ])?;
    for (i, s) in summary.rankings.iter().enumerate() {
        w.write_record([
            (i + 1).to_string(),
            s.entity_id.clone(),
            format!("{:.6}", s.score),
            format!("{:.6}", s.averages.avg_throughput),
            format!("{:.6}", s.averages.avg_rework_rate),
            format!("{:.6}", s.averages.avg_precision),
            format!("{:.6}", s.averages.avg_agreement),
            s.averages.periods.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

fn member_slug(member: &str) -> String {
    member
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// One chart file per member. Names that slug to the same file get `_2`, `_3`, ...
/// in first-appearance order.
pub fn member_chart_paths(charts_dir: &Path, members: &[String]) -> Vec<(String, PathBuf)> {
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(members.len());
    for member in members {
        let base = member_slug(member);
        let mut slug = base.clone();
        let mut n = 2usize;
        while !used.insert(slug.clone()) {
            slug = format!("{base}_{n}");
            n += 1;
        }
        if slug != base {
            warn!("chart name for member {member:?} collides with another member; writing member_{slug}.json");
        }
        out.push((member.clone(), charts_dir.join(format!("member_{slug}.json"))));
    }
    out
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    fs::write(path, contents)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;
