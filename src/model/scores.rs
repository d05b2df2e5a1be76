use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MemberAverages {
    pub avg_throughput: f64,
    pub avg_rework_rate: f64,
    pub avg_precision: f64,
    pub avg_agreement: f64,
    pub periods: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeScore {
    pub entity_id: String,
    pub score: f64,
    #[serde(flatten)]
    pub averages: MemberAverages,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NormalizedMetrics {
    pub throughput: f64,
    pub rework: f64,
    pub precision: f64,
    pub agreement: f64,
}
