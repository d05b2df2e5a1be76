use tracing::debug;

use crate::model::config::{ScoringConfig, ScoringWeights};
use crate::model::record::PerformanceRecord;
use crate::model::scores::{CompositeScore, MemberAverages, NormalizedMetrics};
use crate::pipeline::stage1_aggregate::{aggregate, distinct_entities};

// Comparisons are written so a NaN input stays NaN instead of being absorbed
// the way f64::min / f64::max would.
fn saturate_at_one(x: f64) -> f64 {
    if x > 1.0 { 1.0 } else { x }
}

fn floor_at_zero(x: f64) -> f64 {
    if x < 0.0 { 0.0 } else { x }
}

pub fn normalize(averages: &MemberAverages, throughput_cap: f64) -> NormalizedMetrics {
    NormalizedMetrics {
        throughput: saturate_at_one(averages.avg_throughput / throughput_cap),
        rework: floor_at_zero(1.0 - averages.avg_rework_rate),
        precision: averages.avg_precision,
        agreement: averages.avg_agreement,
    }
}

pub fn composite(metrics: &NormalizedMetrics, weights: &ScoringWeights) -> f64 {
    metrics.throughput * weights.throughput
        + metrics.rework * weights.rework
        + metrics.precision * weights.precision
        + metrics.agreement * weights.agreement
}

pub fn score_entity(
    records: &[PerformanceRecord],
    entity_id: &str,
    cfg: &ScoringConfig,
) -> CompositeScore {
    let averages = aggregate(records, entity_id);
    let score = if averages.periods == 0 {
        0.0
    } else {
        composite(&normalize(&averages, cfg.throughput_cap), &cfg.weights)
    };
    CompositeScore {
        entity_id: entity_id.to_string(),
        score,
        averages,
    }
}

/// Lowest score first. The sort is stable, so ties keep first-appearance order.
pub fn rank(records: &[PerformanceRecord], cfg: &ScoringConfig) -> Vec<CompositeScore> {
    let mut rankings = distinct_entities(records)
        .iter()
        .map(|entity| score_entity(records, entity, cfg))
        .collect::<Vec<_>>();
    rankings.sort_by(|a, b| a.score.total_cmp(&b.score));
    debug!("ranked {} entities", rankings.len());
    rankings
}

pub fn worst_performing(records: &[PerformanceRecord], cfg: &ScoringConfig) -> Option<String> {
    rank(records, cfg).into_iter().next().map(|s| s.entity_id)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_rank.rs"]
mod tests;
