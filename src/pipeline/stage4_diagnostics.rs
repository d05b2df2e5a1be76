use serde::Serialize;

use crate::model::record::PerformanceRecord;

pub const PRECISION_BUCKETS: [&str; 4] = ["0.6-0.7", "0.7-0.8", "0.8-0.9", "0.9-1.0"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketCount {
    pub name: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberDiagnostics {
    pub entity_id: String,
    pub precision_histogram: Vec<BucketCount>,
    pub lowest_precision_weeks: Vec<u32>,
}

/// Anything under 0.7 lands in the first bucket. Non-finite precision is not counted.
pub fn precision_histogram(records: &[PerformanceRecord], entity_id: &str) -> Vec<BucketCount> {
    let mut counts = [0usize; 4];
    for r in records.iter().filter(|r| r.entity_id == entity_id) {
        if !r.precision.is_finite() {
            continue;
        }
        let idx = if r.precision < 0.7 {
            0
        } else if r.precision < 0.8 {
            1
        } else if r.precision < 0.9 {
            2
        } else {
            3
        };
        counts[idx] += 1;
    }
    PRECISION_BUCKETS
        .iter()
        .zip(counts)
        .map(|(&name, count)| BucketCount { name, count })
        .collect()
}

pub fn lowest_precision_periods<'a>(
    records: &'a [PerformanceRecord],
    entity_id: &str,
    n: usize,
) -> Vec<&'a PerformanceRecord> {
    let mut rows = records
        .iter()
        .filter(|r| r.entity_id == entity_id)
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| a.precision.total_cmp(&b.precision));
    rows.truncate(n);
    rows
}

pub fn member_diagnostics(
    records: &[PerformanceRecord],
    entity_id: &str,
    worst_n: usize,
) -> MemberDiagnostics {
    MemberDiagnostics {
        entity_id: entity_id.to_string(),
        precision_histogram: precision_histogram(records, entity_id),
        lowest_precision_weeks: lowest_precision_periods(records, entity_id, worst_n)
            .iter()
            .map(|r| r.period)
            .collect(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_diagnostics.rs"]
mod tests;
