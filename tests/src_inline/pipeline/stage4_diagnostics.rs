use super::*;

fn rec(period: u32, entity: &str, iou: f64) -> PerformanceRecord {
    PerformanceRecord {
        period,
        entity_id: entity.to_string(),
        throughput: 800.0,
        reworked: 80.0,
        rework_rate: 0.1,
        precision: iou,
        agreement: 0.8,
    }
}

fn counts(hist: &[BucketCount]) -> Vec<usize> {
    hist.iter().map(|b| b.count).collect()
}

#[test]
fn test_histogram_buckets() {
    let records = vec![
        rec(1, "Alex", 0.55),
        rec(2, "Alex", 0.65),
        rec(3, "Alex", 0.72),
        rec(4, "Alex", 0.85),
        rec(5, "Alex", 0.90),
        rec(6, "Alex", 0.97),
        rec(6, "Wang", 0.99),
    ];
    let hist = precision_histogram(&records, "Alex");
    assert_eq!(hist.len(), PRECISION_BUCKETS.len());
    assert_eq!(hist[0].name, "0.6-0.7");
    assert_eq!(counts(&hist), vec![2, 1, 1, 2]);
}

#[test]
fn test_histogram_skips_non_finite() {
    let records = vec![rec(1, "Alex", f64::NAN), rec(2, "Alex", 0.91)];
    assert_eq!(counts(&precision_histogram(&records, "Alex")), vec![0, 0, 0, 1]);
}

#[test]
fn test_lowest_precision_periods_ordered() {
    let records = vec![
        rec(1, "Alex", 0.90),
        rec(2, "Alex", 0.80),
        rec(3, "Alex", 0.95),
        rec(4, "Alex", 0.85),
        rec(1, "Wang", 0.10),
    ];
    let worst = lowest_precision_periods(&records, "Alex", 2);
    let weeks: Vec<u32> = worst.iter().map(|r| r.period).collect();
    assert_eq!(weeks, vec![2, 4]);
    assert_eq!(lowest_precision_periods(&records, "Alex", 10).len(), 4);
}

#[test]
fn test_member_diagnostics_unknown_member() {
    let diag = member_diagnostics(&[rec(1, "Alex", 0.9)], "Nobody", 4);
    assert_eq!(diag.entity_id, "Nobody");
    assert_eq!(counts(&diag.precision_histogram), vec![0, 0, 0, 0]);
    assert!(diag.lowest_precision_weeks.is_empty());
}
