use std::io::Read;

use tracing::warn;

use crate::input::{
    HeaderIndex, InputError, csv_reader, line_of, numeric_cell, period_cell, skip_blank,
};
use crate::model::record::PerformanceRecord;

pub const COL_WEEK: &str = "Week";
pub const COL_MEMBER: &str = "Member";
pub const COL_THROUGHPUT: &str = "Throughput";
pub const COL_REWORKED: &str = "Reworked Annotations";
pub const COL_REWORK_RATE: &str = "Rework Rate";
pub const COL_IOU: &str = "Mean IoU";
pub const COL_ALPHA: &str = "Krippendorff's Alpha";

pub fn parse_individual<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<Vec<PerformanceRecord>, InputError> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    let index = HeaderIndex::new(&headers, source_name);

    let week_col = index.required(COL_WEEK)?;
    let member_col = index.required(COL_MEMBER)?;
    let throughput_col = index.required(COL_THROUGHPUT)?;
    let rate_col = index.required(COL_REWORK_RATE)?;
    let iou_col = index.required(COL_IOU)?;
    let alpha_col = index.required(COL_ALPHA)?;
    let reworked_col = index.optional(COL_REWORKED);

    let mut out = Vec::new();
    for (row_idx, row) in rdr.records().enumerate() {
        let row = row?;
        let line = line_of(&row, row_idx + 2);
        if skip_blank(&row, source_name, line) {
            continue;
        }
        let Some(period) = period_cell(&row, week_col, source_name, line) else {
            continue;
        };
        let entity_id = row.get(member_col).unwrap_or("").trim().to_string();
        if entity_id.is_empty() {
            warn!("{source_name}: empty member name (line {line}); skipping row");
            continue;
        }

        let throughput = numeric_cell(&row, throughput_col, COL_THROUGHPUT, source_name, line);
        let rework_rate = numeric_cell(&row, rate_col, COL_REWORK_RATE, source_name, line);
        let reworked = match reworked_col {
            Some(col) => numeric_cell(&row, col, COL_REWORKED, source_name, line),
            None => (throughput * rework_rate).round(),
        };

        out.push(PerformanceRecord {
            period,
            entity_id,
            throughput,
            reworked,
            rework_rate,
            precision: numeric_cell(&row, iou_col, COL_IOU, source_name, line),
            agreement: numeric_cell(&row, alpha_col, COL_ALPHA, source_name, line),
        });
    }

    if out.is_empty() {
        warn!("{source_name}: no member rows found");
    }
    Ok(out)
}
