pub mod json;
pub mod text;

use serde::Serialize;

use crate::model::config::DashboardConfig;
use crate::model::cost::{CostEstimate, PeriodCost};
use crate::model::scores::CompositeScore;
use crate::pipeline::stage4_diagnostics::MemberDiagnostics;

#[derive(Debug, Clone, Serialize)]
pub struct InputSummary {
    pub individual_source: Option<String>,
    pub team_source: String,
    pub n_member_records: usize,
    pub n_members: usize,
    pub n_team_periods: usize,
    pub horizon: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostSummary {
    #[serde(flatten)]
    pub estimate: CostEstimate,
    pub benchmark_week: Option<u32>,
    pub rework_cost_display: String,
    pub downstream_impact_display: String,
    pub total_display: String,
    pub breakdown: Vec<PeriodCost>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: String,
    pub tool_version: String,
    pub input: InputSummary,
    pub worst_performer: Option<String>,
    pub rankings: Vec<CompositeScore>,
    pub cost: CostSummary,
    pub diagnostics: Vec<MemberDiagnostics>,
    pub config: DashboardConfig,
}

impl SummaryData {
    pub fn has_data(&self) -> bool {
        self.input.n_member_records > 0 || self.input.n_team_periods > 0
    }
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn round_to(x: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (x * f).round() / f
}

/// Whole dollars with thousands separators, e.g. `-$1,234,568`.
pub fn format_currency(v: f64) -> String {
    if !v.is_finite() {
        return "n/a".to_string();
    }
    let rounded = v.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}

pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
