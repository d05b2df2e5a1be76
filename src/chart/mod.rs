use serde::Serialize;

use crate::model::record::{PerformanceRecord, SeriesSlot, TEAM_ENTITY};
use crate::pipeline::stage1_aggregate::{complete_series, weekly_means};
use crate::report::round_to;
use crate::reveal::Maskable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamChartRow {
    pub week: u32,
    #[serde(rename = "Weekly Throughput")]
    pub throughput: Option<f64>,
    #[serde(rename = "Rework Rate (%)")]
    pub rework_rate_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberChartRow {
    pub name: String,
    #[serde(rename = "Throughput")]
    pub throughput: Option<f64>,
    #[serde(rename = "Reworked Annotations")]
    pub reworked: Option<f64>,
    #[serde(rename = "Mean IoU (%)")]
    pub precision_pct: Option<f64>,
    #[serde(rename = "Krippendorff's Alpha (%)")]
    pub agreement_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewRow {
    pub name: String,
    #[serde(rename = "Avg. Agreement (Alpha)")]
    pub agreement: Option<f64>,
    #[serde(rename = "Avg. Precision (IoU)")]
    pub precision: Option<f64>,
    #[serde(rename = "Rework Rate")]
    pub rework_rate: Option<f64>,
}

impl Maskable for TeamChartRow {
    fn masked(&self) -> Self {
        Self {
            week: self.week,
            throughput: None,
            rework_rate_pct: None,
        }
    }
}

impl Maskable for MemberChartRow {
    fn masked(&self) -> Self {
        Self {
            name: self.name.clone(),
            throughput: None,
            reworked: None,
            precision_pct: None,
            agreement_pct: None,
        }
    }
}

impl Maskable for OverviewRow {
    fn masked(&self) -> Self {
        Self {
            name: self.name.clone(),
            agreement: None,
            precision: None,
            rework_rate: None,
        }
    }
}

pub fn team_chart_rows(team: &[PerformanceRecord], horizon: u32) -> Vec<TeamChartRow> {
    complete_series(team, TEAM_ENTITY, horizon)
        .into_iter()
        .zip(1..=horizon)
        .map(|(slot, week)| TeamChartRow {
            week,
            throughput: slot.as_ref().map(|r| r.throughput),
            rework_rate_pct: slot.as_ref().map(|r| round_to(r.rework_rate * 100.0, 2)),
        })
        .collect()
}

pub fn member_chart_rows(
    records: &[PerformanceRecord],
    entity_id: &str,
    horizon: u32,
) -> Vec<MemberChartRow> {
    complete_series(records, entity_id, horizon)
        .into_iter()
        .zip(1..=horizon)
        .map(|(slot, week)| member_row(week, &slot))
        .collect()
}

fn member_row(week: u32, slot: &SeriesSlot) -> MemberChartRow {
    MemberChartRow {
        name: format!("W{week}"),
        throughput: slot.as_ref().map(|r| r.throughput),
        reworked: slot.as_ref().map(|r| r.reworked),
        precision_pct: slot.as_ref().map(|r| round_to(r.precision * 100.0, 1)),
        agreement_pct: slot.as_ref().map(|r| round_to(r.agreement * 100.0, 1)),
    }
}

pub fn overview_rows(records: &[PerformanceRecord], horizon: u32) -> Vec<OverviewRow> {
    let means = weekly_means(records);
    (1..=horizon)
        .map(|week| {
            let mean = means.iter().find(|m| m.period == week);
            OverviewRow {
                name: format!("Week {week}"),
                agreement: mean.map(|m| round_to(m.agreement, 3)),
                precision: mean.map(|m| round_to(m.precision, 3)),
                rework_rate: mean.map(|m| round_to(m.rework_rate, 3)),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/chart/mod.rs"]
mod tests;
