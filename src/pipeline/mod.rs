pub mod stage1_aggregate;
pub mod stage2_rank;
pub mod stage3_cost;
pub mod stage4_diagnostics;
pub mod stage5_report;
