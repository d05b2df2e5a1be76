use super::*;
use crate::model::cost::CostEstimate;
use crate::model::scores::MemberAverages;
use crate::report::json::render_summary_json;
use crate::report::text::render_report_text;

fn empty_summary() -> SummaryData {
    SummaryData {
        tool: "annoqc".to_string(),
        tool_version: "0.0.0".to_string(),
        input: InputSummary {
            individual_source: None,
            team_source: "rollup of member rows".to_string(),
            n_member_records: 0,
            n_members: 0,
            n_team_periods: 0,
            horizon: 24,
        },
        worst_performer: None,
        rankings: Vec::new(),
        cost: CostSummary {
            estimate: CostEstimate::default(),
            benchmark_week: None,
            rework_cost_display: format_currency(0.0),
            downstream_impact_display: format_currency(0.0),
            total_display: format_currency(0.0),
            breakdown: Vec::new(),
        },
        diagnostics: Vec::new(),
        config: DashboardConfig::default_v1(),
    }
}

#[test]
fn test_format_currency() {
    assert_eq!(format_currency(0.0), "$0");
    assert_eq!(format_currency(999.4), "$999");
    assert_eq!(format_currency(1234.0), "$1,234");
    assert_eq!(format_currency(600_000.0000001), "$600,000");
    assert_eq!(format_currency(1_234_567.8), "$1,234,568");
    assert_eq!(format_currency(-1234.0), "-$1,234");
    assert_eq!(format_currency(f64::NAN), "n/a");
    assert_eq!(format_currency(f64::INFINITY), "n/a");
}

#[test]
fn test_format_helpers() {
    assert_eq!(format_f64_6(0.5), "0.500000");
    assert_eq!(format_percent(0.0234), "2.34%");
    assert_eq!(round_to(0.9876, 3), 0.988);
    assert_eq!(round_to(12.345, 0), 12.0);
}

#[test]
fn test_text_report_without_data() {
    let text = render_report_text(&empty_summary());
    assert!(text.contains("No data available."));
    assert!(!text.contains("Member ranking"));
}

#[test]
fn test_text_report_with_rankings() {
    let mut data = empty_summary();
    data.input.n_member_records = 2;
    data.input.n_members = 1;
    data.rankings.push(CompositeScore {
        entity_id: "Alex".to_string(),
        score: 0.75,
        averages: MemberAverages {
            avg_throughput: 650.0,
            avg_rework_rate: 0.18,
            avg_precision: 0.88,
            avg_agreement: 0.75,
            periods: 2,
        },
    });
    data.worst_performer = Some("Alex".to_string());
    let text = render_report_text(&data);
    assert!(text.contains("Alex"));
    assert!(text.contains("score=0.750000"));
    assert!(text.contains("Worst performer: Alex"));
    assert!(text.contains("No team series; cost not estimated."));
}

#[test]
fn test_summary_json_flattens_estimate() {
    let json = render_summary_json(&empty_summary()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["tool"], "annoqc");
    assert_eq!(value["cost"]["total"], 0.0);
    assert_eq!(value["cost"]["total_display"], "$0");
    assert!(value["worst_performer"].is_null());
    assert_eq!(value["config"]["horizon"], 24);
}
