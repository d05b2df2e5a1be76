use serde::Serialize;

pub const TEAM_ENTITY: &str = "team";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    pub period: u32,
    pub entity_id: String,
    pub throughput: f64,
    pub reworked: f64,
    /// Fraction of throughput needing correction, never a percentage.
    pub rework_rate: f64,
    pub precision: f64,
    pub agreement: f64,
}

impl PerformanceRecord {
    pub fn rework_count(&self) -> f64 {
        self.throughput * self.rework_rate
    }
}

/// One slot per period of a fixed horizon; `None` is an explicit gap.
pub type SeriesSlot = Option<PerformanceRecord>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyMean {
    pub period: u32,
    pub agreement: f64,
    pub precision: f64,
    pub rework_rate: f64,
}
