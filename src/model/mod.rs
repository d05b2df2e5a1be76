pub mod config;
pub mod cost;
pub mod record;
pub mod scores;
