use std::collections::{BTreeMap, HashSet};

use tracing::warn;

use crate::model::record::{PerformanceRecord, SeriesSlot, TEAM_ENTITY, WeeklyMean};
use crate::model::scores::MemberAverages;

pub fn aggregate(records: &[PerformanceRecord], entity_id: &str) -> MemberAverages {
    let mut n = 0usize;
    let mut throughput = 0f64;
    let mut rework = 0f64;
    let mut precision = 0f64;
    let mut agreement = 0f64;

    for r in records.iter().filter(|r| r.entity_id == entity_id) {
        n += 1;
        throughput += r.throughput;
        rework += r.rework_rate;
        precision += r.precision;
        agreement += r.agreement;
    }

    if n == 0 {
        return MemberAverages::default();
    }

    let denom = n as f64;
    MemberAverages {
        avg_throughput: throughput / denom,
        avg_rework_rate: rework / denom,
        avg_precision: precision / denom,
        avg_agreement: agreement / denom,
        periods: n,
    }
}

pub fn distinct_entities(records: &[PerformanceRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for r in records {
        if seen.insert(r.entity_id.as_str()) {
            out.push(r.entity_id.clone());
        }
    }
    out
}

/// Exactly `horizon` slots for periods `1..=horizon`.
pub fn complete_series(
    records: &[PerformanceRecord],
    entity_id: &str,
    horizon: u32,
) -> Vec<SeriesSlot> {
    let mut slots: Vec<SeriesSlot> = vec![None; horizon as usize];
    for r in records.iter().filter(|r| r.entity_id == entity_id) {
        if r.period == 0 || r.period > horizon {
            continue;
        }
        let slot = &mut slots[(r.period - 1) as usize];
        if slot.is_some() {
            warn!(
                "duplicate record for {} week {}; keeping first",
                entity_id, r.period
            );
            continue;
        }
        *slot = Some(r.clone());
    }
    slots
}

#[derive(Default)]
struct WeekTotals {
    throughput: f64,
    reworked: f64,
    weighted_precision: f64,
    weighted_agreement: f64,
}

/// Rolls member rows up into one throughput-weighted team row per week.
pub fn team_series(records: &[PerformanceRecord]) -> Vec<PerformanceRecord> {
    let mut weeks: BTreeMap<u32, WeekTotals> = BTreeMap::new();
    for r in records {
        let totals = weeks.entry(r.period).or_default();
        totals.throughput += r.throughput;
        totals.reworked += r.reworked;
        totals.weighted_precision += r.precision * r.throughput;
        totals.weighted_agreement += r.agreement * r.throughput;
    }

    weeks
        .into_iter()
        .map(|(period, t)| {
            // Only an exact zero total is a defined empty week; NaN stays NaN.
            let ratio = |num: f64| if t.throughput == 0.0 { 0.0 } else { num / t.throughput };
            PerformanceRecord {
                period,
                entity_id: TEAM_ENTITY.to_string(),
                throughput: t.throughput,
                reworked: t.reworked,
                rework_rate: ratio(t.reworked),
                precision: ratio(t.weighted_precision),
                agreement: ratio(t.weighted_agreement),
            }
        })
        .collect()
}

/// Unweighted per-week means across every member, ascending by week.
pub fn weekly_means(records: &[PerformanceRecord]) -> Vec<WeeklyMean> {
    let mut weeks: BTreeMap<u32, (usize, f64, f64, f64)> = BTreeMap::new();
    for r in records {
        let acc = weeks.entry(r.period).or_insert((0, 0.0, 0.0, 0.0));
        acc.0 += 1;
        acc.1 += r.agreement;
        acc.2 += r.precision;
        acc.3 += r.rework_rate;
    }
    weeks
        .into_iter()
        .map(|(period, (n, agreement, precision, rework))| {
            let denom = n as f64;
            WeeklyMean {
                period,
                agreement: agreement / denom,
                precision: precision / denom,
                rework_rate: rework / denom,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_aggregate.rs"]
mod tests;
