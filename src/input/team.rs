use std::io::Read;

use tracing::warn;

use crate::input::{
    HeaderIndex, InputError, csv_reader, line_of, numeric_cell, period_cell, skip_blank,
};
use crate::model::record::{PerformanceRecord, TEAM_ENTITY};

pub const COL_WEEK: &str = "Week";
pub const COL_THROUGHPUT: &str = "Weekly Throughput";
pub const COL_REWORK_PCT: &str = "Rework Rate (%)";
pub const COL_ALPHA: &str = "Krippendorff's Alpha";
pub const COL_IOU: &str = "Mean IoU";
pub const COL_CUMULATIVE: &str = "Cumulative Annotations";

/// Team rows carry the rework rate as a percentage; it is stored as a fraction.
pub fn parse_team<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<Vec<PerformanceRecord>, InputError> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    let index = HeaderIndex::new(&headers, source_name);

    let week_col = index.required(COL_WEEK)?;
    let throughput_col = index.required(COL_THROUGHPUT)?;
    let pct_col = index.required(COL_REWORK_PCT)?;
    let alpha_col = index.required(COL_ALPHA)?;
    let iou_col = index.required(COL_IOU)?;

    let mut out: Vec<PerformanceRecord> = Vec::new();
    for (row_idx, row) in rdr.records().enumerate() {
        let row = row?;
        let line = line_of(&row, row_idx + 2);
        if skip_blank(&row, source_name, line) {
            continue;
        }
        let Some(period) = period_cell(&row, week_col, source_name, line) else {
            continue;
        };

        let throughput = numeric_cell(&row, throughput_col, COL_THROUGHPUT, source_name, line);
        let rework_rate = numeric_cell(&row, pct_col, COL_REWORK_PCT, source_name, line) / 100.0;

        out.push(PerformanceRecord {
            period,
            entity_id: TEAM_ENTITY.to_string(),
            throughput,
            reworked: (throughput * rework_rate).round(),
            rework_rate,
            precision: numeric_cell(&row, iou_col, COL_IOU, source_name, line),
            agreement: numeric_cell(&row, alpha_col, COL_ALPHA, source_name, line),
        });
    }

    if out.windows(2).any(|w| w[1].period < w[0].period) {
        warn!("{source_name}: weeks are out of order; sorting by week");
        out.sort_by_key(|r| r.period);
    }
    // One row per week, first occurrence in the file wins.
    out.dedup_by(|later, earlier| {
        if later.period != earlier.period {
            return false;
        }
        warn!(
            "{source_name}: duplicate week {}; keeping first",
            later.period
        );
        true
    });
    if out.is_empty() {
        warn!("{source_name}: no team rows found");
    }
    Ok(out)
}
