use crate::report::{SummaryData, format_currency, format_f64_6, format_percent};

pub fn render_report_text(data: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("Annotation Quality & Cost Report\n");
    out.push_str("================================\n\n");

    if !data.has_data() {
        out.push_str("No data available.\n");
        return out;
    }

    out.push_str(&format!(
        "Members: {}  Member rows: {}  Team weeks: {}  Horizon: {} weeks\n\n",
        data.input.n_members,
        data.input.n_member_records,
        data.input.n_team_periods,
        data.input.horizon
    ));

    out.push_str("1. Member ranking (lowest score first)\n");
    if data.rankings.is_empty() {
        out.push_str("No member data.\n");
    }
    for (i, s) in data.rankings.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {:<16} score={} throughput={:.1} rework={} iou={:.4} alpha={:.4}\n",
            i + 1,
            s.entity_id,
            format_f64_6(s.score),
            s.averages.avg_throughput,
            format_percent(s.averages.avg_rework_rate),
            s.averages.avg_precision,
            s.averages.avg_agreement
        ));
    }
    out.push_str(&format!(
        "Worst performer: {}\n\n",
        data.worst_performer.as_deref().unwrap_or("none")
    ));

    out.push_str("2. Cost of quality drift\n");
    match data.cost.benchmark_week {
        Some(week) => {
            out.push_str(&format!("Benchmark: week {}\n", week));
            out.push_str(&format!(
                "Rework cost: {}\nDownstream impact: {}\nTotal: {}\n",
                data.cost.rework_cost_display,
                data.cost.downstream_impact_display,
                data.cost.total_display
            ));
            out.push_str(&format!("{}\n", cost_statement(data.cost.estimate.total)));
            for p in &data.cost.breakdown {
                out.push_str(&format!(
                    "  W{:<3} rework={:>12} downstream={:>12}\n",
                    p.period,
                    format_currency(p.rework_delta),
                    format_currency(p.downstream_delta)
                ));
            }
        }
        None => out.push_str("No team series; cost not estimated.\n"),
    }
    out.push('\n');

    out.push_str("3. Precision diagnostics\n");
    for d in &data.diagnostics {
        let buckets = d
            .precision_histogram
            .iter()
            .map(|b| format!("{}={}", b.name, b.count))
            .collect::<Vec<_>>()
            .join(", ");
        let weeks = d
            .lowest_precision_weeks
            .iter()
            .map(|w| format!("W{w}"))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "{}: {}; lowest IoU weeks: {}\n",
            d.entity_id, buckets, weeks
        ));
    }

    out
}

fn cost_statement(total: f64) -> &'static str {
    if total > 0.0 {
        "Quality has drifted below the benchmark."
    } else if total < 0.0 {
        "Quality has improved on the benchmark."
    } else {
        "Quality matches the benchmark."
    }
}
