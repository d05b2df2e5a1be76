use tracing::warn;

use crate::model::config::CostModel;
use crate::model::cost::{CostEstimate, PeriodCost};
use crate::model::record::PerformanceRecord;

/// Signed: a period with less rework than the benchmark lowers the cost.
pub fn rework_delta(period: &PerformanceRecord, benchmark: &PerformanceRecord, model: &CostModel) -> f64 {
    (period.rework_count() - benchmark.rework_count()) * model.hours_per_item * model.hourly_rate
}

/// Only precision loss against the benchmark counts; gains contribute zero.
pub fn downstream_delta(
    period: &PerformanceRecord,
    benchmark: &PerformanceRecord,
    model: &CostModel,
) -> f64 {
    let loss = benchmark.precision - period.precision;
    let loss = if loss < 0.0 { 0.0 } else { loss };
    loss * model.sales_impact_per_precision_point
}

pub fn cost_breakdown(series: &[PerformanceRecord], model: &CostModel) -> Vec<PeriodCost> {
    let Some(benchmark) = series.get(model.benchmark_index) else {
        if !series.is_empty() {
            warn!(
                "benchmark index {} is outside the {}-period series; cost is zero",
                model.benchmark_index,
                series.len()
            );
        }
        return Vec::new();
    };

    series[model.benchmark_index + 1..]
        .iter()
        .map(|p| PeriodCost {
            period: p.period,
            rework_delta: rework_delta(p, benchmark, model),
            downstream_delta: downstream_delta(p, benchmark, model),
        })
        .collect()
}

pub fn estimate_cost(series: &[PerformanceRecord], model: &CostModel) -> CostEstimate {
    let breakdown = cost_breakdown(series, model);
    let mut rework_cost = 0f64;
    let mut downstream_impact = 0f64;
    for p in &breakdown {
        rework_cost += p.rework_delta;
        downstream_impact += p.downstream_delta;
    }
    CostEstimate {
        rework_cost,
        downstream_impact,
        total: rework_cost + downstream_impact,
        periods_compared: breakdown.len(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_cost.rs"]
mod tests;
