use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::record::PerformanceRecord;

pub mod individual;
pub mod synthetic;
pub mod team;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("{source_name}: missing required column \"{column}\"")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    Individual,
    Team,
}

/// Anything that can hand the dashboard a set of performance rows.
pub trait RecordSource {
    fn describe(&self) -> String;
    fn load(&self) -> Result<Vec<PerformanceRecord>, InputError>;
}

#[derive(Debug, Clone)]
pub struct CsvSource {
    pub path: PathBuf,
    pub layout: CsvLayout,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>, layout: CsvLayout) -> Self {
        Self {
            path: path.into(),
            layout,
        }
    }
}

impl RecordSource for CsvSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<PerformanceRecord>, InputError> {
        if !self.path.exists() {
            return Err(InputError::MissingInput(self.path.display().to_string()));
        }
        let reader = open_maybe_gz(&self.path)?;
        let name = self.describe();
        let records = match self.layout {
            CsvLayout::Individual => individual::parse_individual(reader, &name)?,
            CsvLayout::Team => team::parse_team(reader, &name)?,
        };
        info!(
            "loaded {} {:?} records from {}",
            records.len(),
            self.layout,
            name
        );
        Ok(records)
    }
}

/// Loads a source, logging failures and falling back to an empty set so callers
/// always have something to render.
pub fn load_or_empty(source: &dyn RecordSource) -> Vec<PerformanceRecord> {
    match source.load() {
        Ok(records) => records,
        Err(err) => {
            tracing::error!("failed to load {}: {err}; continuing with no data", source.describe());
            Vec::new()
        }
    }
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>, InputError> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub(crate) fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

#[derive(Debug)]
pub(crate) struct HeaderIndex {
    by_name: HashMap<String, usize>,
    source_name: String,
}

impl HeaderIndex {
    pub(crate) fn new(headers: &csv::StringRecord, source_name: &str) -> Self {
        let mut by_name = HashMap::new();
        for (idx, name) in headers.iter().enumerate() {
            let key = normalize_header(name);
            if by_name.contains_key(&key) {
                warn!("{source_name}: duplicate column \"{name}\"; keeping first");
                continue;
            }
            by_name.insert(key, idx);
        }
        Self {
            by_name,
            source_name: source_name.to_string(),
        }
    }

    pub(crate) fn required(&self, column: &'static str) -> Result<usize, InputError> {
        self.optional(column).ok_or_else(|| InputError::MissingColumn {
            source_name: self.source_name.clone(),
            column,
        })
    }

    pub(crate) fn optional(&self, column: &str) -> Option<usize> {
        self.by_name.get(&normalize_header(column)).copied()
    }
}

fn normalize_header(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

pub(crate) fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

pub(crate) fn line_of(record: &csv::StringRecord, fallback: usize) -> u64 {
    record
        .position()
        .map(|p| p.line())
        .unwrap_or(fallback as u64)
}

pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

pub(crate) fn numeric_cell(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    source_name: &str,
    line: u64,
) -> f64 {
    let raw = record.get(idx).unwrap_or("");
    match parse_numeric(raw) {
        Some(v) => v,
        None => {
            warn!(
                "{source_name}: non-numeric value {raw:?} in column \"{column}\" (line {line}); using NaN"
            );
            f64::NAN
        }
    }
}

pub(crate) fn period_cell(
    record: &csv::StringRecord,
    idx: usize,
    source_name: &str,
    line: u64,
) -> Option<u32> {
    let raw = record.get(idx).unwrap_or("").trim();
    match raw.parse::<u32>() {
        Ok(0) | Err(_) => {
            warn!("{source_name}: invalid week {raw:?} (line {line}); skipping row");
            None
        }
        Ok(week) => Some(week),
    }
}

pub(crate) fn skip_blank(record: &csv::StringRecord, source_name: &str, line: u64) -> bool {
    if is_blank(record) {
        debug!("{source_name}: skipping blank row (line {line})");
        return true;
    }
    false
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
