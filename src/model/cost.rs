use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CostEstimate {
    pub rework_cost: f64,
    pub downstream_impact: f64,
    pub total: f64,
    pub periods_compared: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodCost {
    pub period: u32,
    pub rework_delta: f64,
    pub downstream_delta: f64,
}
