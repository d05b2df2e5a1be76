use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::input::{InputError, RecordSource, individual, team};
use crate::model::record::PerformanceRecord;
use crate::pipeline::stage1_aggregate::team_series;
use crate::report::round_to;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftParams {
    pub rework_base: f64,
    pub rework_exp: f64,
    pub iou_base: f64,
    pub iou_exp: f64,
    pub alpha_base: f64,
    pub alpha_exp: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticParams {
    pub total_weeks: u32,
    pub core_members: Vec<String>,
    pub new_hire: String,
    pub new_hire_start_week: u32,

    pub training_impact_weeks: u32,
    pub throughput_dip: f64,
    pub quality_dip_multiplier: f64,

    pub core_drift: DriftParams,
    pub new_hire_drift: DriftParams,

    pub core_throughput: (f64, f64),
    pub core_rework: (f64, f64),
    pub core_iou: (f64, f64),
    pub core_alpha: (f64, f64),

    pub new_hire_throughput: (f64, f64),
    pub new_hire_rework: (f64, f64),
    pub new_hire_iou: (f64, f64),
    pub new_hire_alpha: (f64, f64),
}

impl SyntheticParams {
    pub fn default_v1() -> Self {
        Self {
            total_weeks: 24,
            core_members: ["Wang", "Sarah", "Michael", "Amir"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            new_hire: "Alex".to_string(),
            new_hire_start_week: 9,
            training_impact_weeks: 4,
            throughput_dip: 0.20,
            quality_dip_multiplier: 1.5,
            core_drift: DriftParams {
                rework_base: 0.0008,
                rework_exp: 1.2,
                iou_base: 0.00020,
                iou_exp: 1.8,
                alpha_base: 0.00008,
                alpha_exp: 1.8,
            },
            new_hire_drift: DriftParams {
                rework_base: 0.0012,
                rework_exp: 1.3,
                iou_base: 0.0003,
                iou_exp: 1.9,
                alpha_base: 0.00012,
                alpha_exp: 1.9,
            },
            // (mean, std)
            core_throughput: (1075.0, 50.0),
            core_rework: (0.02, 0.005),
            core_iou: (0.98, 0.005),
            core_alpha: (0.95, 0.01),
            // (start, end)
            new_hire_throughput: (650.0, 950.0),
            new_hire_rework: (0.18, 0.12),
            new_hire_iou: (0.88, 0.95),
            new_hire_alpha: (0.75, 0.90),
        }
    }
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self::default_v1()
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticSource {
    pub seed: u64,
    pub params: SyntheticParams,
}

impl SyntheticSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            params: SyntheticParams::default_v1(),
        }
    }
}

impl RecordSource for SyntheticSource {
    fn describe(&self) -> String {
        format!("synthetic(seed={})", self.seed)
    }

    fn load(&self) -> Result<Vec<PerformanceRecord>, InputError> {
        Ok(generate_records(&self.params, self.seed))
    }
}

pub fn generate_records(params: &SyntheticParams, seed: u64) -> Vec<PerformanceRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::new();

    for member in &params.core_members {
        for week in 1..=params.total_weeks {
            out.push(core_week(params, &mut rng, member, week));
        }
    }

    let start = params.new_hire_start_week;
    if start <= params.total_weeks {
        for week in start..=params.total_weeks {
            out.push(new_hire_week(params, &mut rng, week));
        }
    }

    out.sort_by(|a, b| {
        a.period
            .cmp(&b.period)
            .then_with(|| a.entity_id.cmp(&b.entity_id))
    });
    out
}

fn core_week(params: &SyntheticParams, rng: &mut StdRng, member: &str, week: u32) -> PerformanceRecord {
    let mut throughput = normal(rng, params.core_throughput.0, params.core_throughput.1);
    let mut rework = normal(rng, params.core_rework.0, params.core_rework.1);
    let mut iou = normal(rng, params.core_iou.0, params.core_iou.1);
    let mut alpha = normal(rng, params.core_alpha.0, params.core_alpha.1);

    let start = params.new_hire_start_week;
    if week >= start && week < start + params.training_impact_weeks {
        // Training tax is strongest on the new hire's first week and recovers linearly.
        let progress = (week - start) as f64 / params.training_impact_weeks as f64;
        let throughput_dip = params.throughput_dip * (1.0 - progress);
        let quality_dip = (params.quality_dip_multiplier - 1.0) * (1.0 - progress);
        throughput *= 1.0 - throughput_dip;
        rework *= 1.0 + quality_dip;
        iou *= 1.0 - throughput_dip / 4.0;
        alpha *= 1.0 - throughput_dip / 3.0;
    }

    let w = week as f64;
    let drift = &params.core_drift;
    rework = (rework + drift.rework_base * w.powf(drift.rework_exp)).max(0.0);
    iou = clamp01(iou * (1.0 - drift.iou_base * w.powf(drift.iou_exp)));
    alpha = clamp01(alpha * (1.0 - drift.alpha_base * w.powf(drift.alpha_exp)));

    finish(member, week, throughput, rework, iou, alpha)
}

fn new_hire_week(params: &SyntheticParams, rng: &mut StdRng, week: u32) -> PerformanceRecord {
    let span = (params.total_weeks - params.new_hire_start_week + 1) as f64;
    let idx = (week - params.new_hire_start_week) as f64;
    let lerp = |(start, end): (f64, f64)| start + (end - start) / span * idx;

    let w = week as f64;
    let drift = &params.new_hire_drift;
    let base_throughput = lerp(params.new_hire_throughput);
    let base_rework = lerp(params.new_hire_rework) + drift.rework_base * w.powf(drift.rework_exp);
    let base_iou = lerp(params.new_hire_iou) * (1.0 - drift.iou_base * w.powf(drift.iou_exp));
    let base_alpha =
        lerp(params.new_hire_alpha) * (1.0 - drift.alpha_base * w.powf(drift.alpha_exp));

    let throughput = normal(rng, base_throughput, params.core_throughput.1);
    let rework = normal(rng, base_rework, params.core_rework.1 * 1.5).max(0.0);
    let iou = clamp01(normal(rng, base_iou, params.core_iou.1 * 1.5));
    let alpha = clamp01(normal(rng, base_alpha, params.core_alpha.1 * 1.5));

    finish(&params.new_hire, week, throughput, rework, iou, alpha)
}

fn finish(
    member: &str,
    week: u32,
    throughput: f64,
    rework: f64,
    iou: f64,
    alpha: f64,
) -> PerformanceRecord {
    let throughput = throughput.round().max(0.0);
    // Rates are kept at the 4-decimal precision the CSV export uses, so a written
    // dataset reads back identical.
    let rework_rate = round_to(rework, 4);
    PerformanceRecord {
        period: week,
        entity_id: member.to_string(),
        throughput,
        reworked: (throughput * rework).round(),
        rework_rate,
        precision: round_to(iou, 4),
        agreement: round_to(alpha, 4),
    }
}

fn normal(rng: &mut StdRng, mean: f64, std: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    mean + std * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

pub fn write_individual_csv(path: &Path, records: &[PerformanceRecord]) -> Result<(), InputError> {
    let mut w = csv::Writer::from_path(path)?;
    w.write_record([
        individual::COL_WEEK,
        individual::COL_MEMBER,
        individual::COL_THROUGHPUT,
        individual::COL_REWORKED,
        individual::COL_REWORK_RATE,
        individual::COL_IOU,
        individual::COL_ALPHA,
    ])?;
    for r in records {
        w.write_record([
            r.period.to_string(),
            r.entity_id.clone(),
            format!("{}", r.throughput),
            format!("{}", r.reworked),
            format!("{:.4}", r.rework_rate),
            format!("{:.4}", r.precision),
            format!("{:.4}", r.agreement),
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_team_csv(path: &Path, team_rows: &[PerformanceRecord]) -> Result<(), InputError> {
    let mut w = csv::Writer::from_path(path)?;
    w.write_record([
        team::COL_WEEK,
        team::COL_THROUGHPUT,
        team::COL_REWORK_PCT,
        team::COL_ALPHA,
        team::COL_IOU,
        team::COL_CUMULATIVE,
    ])?;
    let mut cumulative = 0.0;
    for r in team_rows {
        cumulative += r.throughput;
        w.write_record([
            r.period.to_string(),
            format!("{}", r.throughput),
            format!("{}", round_to(r.rework_rate * 100.0, 2)),
            format!("{}", round_to(r.agreement, 4)),
            format!("{}", round_to(r.precision, 4)),
            format!("{}", cumulative),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Writes `individual_performance.csv` and `team_performance.csv` into `out_dir`.
pub fn write_dataset(out_dir: &Path, records: &[PerformanceRecord]) -> Result<(), InputError> {
    fs::create_dir_all(out_dir)?;
    let individual_path = out_dir.join("individual_performance.csv");
    write_individual_csv(&individual_path, records)?;
    let team_rows = team_series(records);
    let team_path = out_dir.join("team_performance.csv");
    write_team_csv(&team_path, &team_rows)?;
    info!(
        "wrote {} member rows to {} and {} team rows to {}",
        records.len(),
        individual_path.display(),
        team_rows.len(),
        team_path.display()
    );
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/synthetic.rs"]
mod tests;
