use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("annoqc_config_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_default_profile_is_valid() {
    let cfg = DashboardConfig::default_v1();
    cfg.validate().unwrap();
    assert_eq!(cfg.horizon, 24);
    assert_eq!(cfg.scoring.throughput_cap, 1200.0);
    assert_eq!(cfg.scoring.weights.sum(), 1.0);
    assert_eq!(cfg.animation.start_step, 0);
    assert_eq!(cfg.milestones.len(), 1);
    assert_eq!(cfg.milestones[0].period, 9);
}

#[test]
fn test_weights_must_sum_to_one() {
    let mut cfg = DashboardConfig::default_v1();
    cfg.scoring.weights.agreement = 0.5;
    match cfg.validate() {
        Err(ConfigError::InvalidWeights { sum }) => assert!((sum - 1.25).abs() < 1e-12),
        other => panic!("expected InvalidWeights, got {other:?}"),
    }
}

#[test]
fn test_negative_weight_rejected() {
    let mut cfg = DashboardConfig::default_v1();
    cfg.scoring.weights = ScoringWeights {
        throughput: -0.25,
        rework: 0.5,
        precision: 0.5,
        agreement: 0.25,
    };
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::InvalidWeights { .. })
    ));
}

#[test]
fn test_invalid_scalar_values() {
    let mut cfg = DashboardConfig::default_v1();
    cfg.scoring.throughput_cap = 0.0;
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::InvalidValue { field: "scoring.throughput_cap", .. })
    ));

    let mut cfg = DashboardConfig::default_v1();
    cfg.cost.hourly_rate = f64::NAN;
    assert!(cfg.validate().is_err());

    let mut cfg = DashboardConfig::default_v1();
    cfg.animation.start_step = 2;
    assert!(cfg.validate().is_err());

    let mut cfg = DashboardConfig::default_v1();
    cfg.animation.tick_interval_ms = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_load_partial_json_keeps_defaults() {
    let dir = make_temp_dir();
    let path = dir.join("config.json");
    fs::write(
        &path,
        r#"{"scoring":{"throughput_cap":1000},"cost":{"hourly_rate":60},"animation":{"tick_interval_ms":75}}"#,
    )
    .unwrap();
    let cfg = DashboardConfig::load(&path).unwrap();
    assert_eq!(cfg.scoring.throughput_cap, 1000.0);
    assert_eq!(cfg.scoring.weights, ScoringWeights::default());
    assert_eq!(cfg.cost.hourly_rate, 60.0);
    assert_eq!(cfg.cost.hours_per_item, 0.25);
    assert_eq!(cfg.animation.tick_interval_ms, 75);
    assert_eq!(cfg.horizon, 24);
}

#[test]
fn test_load_rejects_bad_weights_and_unknown_keys() {
    let dir = make_temp_dir();
    let bad_weights = dir.join("weights.json");
    fs::write(
        &bad_weights,
        r#"{"scoring":{"weights":{"throughput":0.4,"rework":0.4,"precision":0.4,"agreement":0.4}}}"#,
    )
    .unwrap();
    assert!(matches!(
        DashboardConfig::load(&bad_weights),
        Err(ConfigError::InvalidWeights { .. })
    ));

    let unknown = dir.join("unknown.json");
    fs::write(&unknown, r#"{"horizn":12}"#).unwrap();
    assert!(matches!(
        DashboardConfig::load(&unknown),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn test_load_missing_file() {
    let dir = make_temp_dir();
    let err = DashboardConfig::load(&dir.join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
