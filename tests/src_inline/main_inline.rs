use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("annoqc_main_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn source(individual: Option<PathBuf>, team: Option<PathBuf>, seed: Option<u64>) -> SourceArgs {
    SourceArgs {
        individual,
        team,
        synthetic_seed: seed,
        config: None,
    }
}

#[test]
fn test_parse_report_args() {
    let cli = Cli::try_parse_from([
        "annoqc",
        "report",
        "--individual",
        "ind.csv",
        "--team",
        "team.csv",
        "--out",
        "out",
    ])
    .unwrap();
    assert_eq!(cli.verbose, 0);
    match cli.command {
        Command::Report(args) => {
            assert_eq!(args.source.individual, Some(PathBuf::from("ind.csv")));
            assert_eq!(args.source.team, Some(PathBuf::from("team.csv")));
            assert_eq!(args.out, PathBuf::from("out"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_animate_defaults_and_verbosity() {
    let cli = Cli::try_parse_from(["annoqc", "animate", "--synthetic-seed", "7", "-vv"]).unwrap();
    assert_eq!(cli.verbose, 2);
    match cli.command {
        Command::Animate(args) => {
            assert_eq!(args.chart, ChartKind::Team);
            assert_eq!(args.member, None);
            assert!(!args.realtime);
            assert_eq!(args.source.synthetic_seed, Some(7));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_animate_member_chart() {
    let cli = Cli::try_parse_from([
        "annoqc",
        "animate",
        "--individual",
        "ind.csv",
        "--chart",
        "member",
        "--member",
        "Alex",
    ])
    .unwrap();
    match cli.command {
        Command::Animate(args) => {
            assert_eq!(args.chart, ChartKind::Member);
            assert_eq!(args.member.as_deref(), Some("Alex"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_generate_default_seed() {
    let cli = Cli::try_parse_from(["annoqc", "generate", "--out", "data"]).unwrap();
    match cli.command {
        Command::Generate(args) => assert_eq!(args.seed, 42),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_rejects_bad_input() {
    assert!(Cli::try_parse_from(["annoqc", "report"]).is_err());
    assert!(Cli::try_parse_from(["annoqc", "animate", "--chart", "pie"]).is_err());
    assert!(
        Cli::try_parse_from([
            "annoqc",
            "report",
            "--individual",
            "a.csv",
            "--synthetic-seed",
            "1",
            "--out",
            "o",
        ])
        .is_err()
    );
}

#[test]
fn test_load_dataset_requires_a_source() {
    assert!(matches!(
        load_dataset(&source(None, None, None)),
        Err(CliError::NoSource)
    ));
}

#[test]
fn test_load_dataset_missing_file_is_empty_not_fatal() {
    let dir = make_temp_dir();
    let data = load_dataset(&source(Some(dir.join("missing.csv")), None, None)).unwrap();
    assert!(data.members.is_empty());
    assert!(data.team.is_empty());
}

#[test]
fn test_load_dataset_rolls_up_team() {
    let data = load_dataset(&source(None, None, Some(42))).unwrap();
    assert_eq!(data.members.len(), 112);
    assert_eq!(data.team.len(), 24);
    assert_eq!(data.individual_source.as_deref(), Some("synthetic(seed=42)"));
}

#[test]
fn test_bad_config_is_fatal() {
    let dir = make_temp_dir();
    let path = dir.join("config.json");
    fs::write(&path, r#"{"horizon": 0}"#).unwrap();
    assert!(matches!(load_config(Some(path.as_path())), Err(CliError::Config(_))));
    assert!(load_config(None).is_ok());
}

#[test]
fn test_animate_rows_writes_one_line_per_frame() {
    let cfg = DashboardConfig::default_v1();
    let members = SyntheticSource::new(42).load().unwrap();
    let rows = team_chart_rows(&team_series(&members), cfg.horizon);
    let mut buf = Vec::new();
    let frames = animate_rows(&rows, &cfg, false, &mut buf).unwrap();
    assert_eq!(frames, 25);

    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 25);

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["step"], 0);
    assert_eq!(first["phase"], "Revealing");
    assert_eq!(first["rows"].as_array().map(|a| a.len()), Some(24));
    assert!(first["rows"][0]["Weekly Throughput"].is_null());
    assert_eq!(first["milestones"].as_array().map(|a| a.len()), Some(0));

    let last: serde_json::Value = serde_json::from_str(lines[24]).unwrap();
    assert_eq!(last["step"], 24);
    assert_eq!(last["phase"], "Complete");
    assert!(!last["rows"][23]["Weekly Throughput"].is_null());
    assert_eq!(last["milestones"][0]["period"], 9);
}

#[test]
fn test_generate_then_report() {
    let dir = make_temp_dir();
    let data_dir = dir.join("data");
    run_generate(&GenerateArgs {
        out: data_dir.clone(),
        seed: 42,
    })
    .unwrap();

    let out = dir.join("out");
    run_report(&ReportArgs {
        source: source(
            Some(data_dir.join("individual_performance.csv")),
            Some(data_dir.join("team_performance.csv")),
            None,
        ),
        out: out.clone(),
    })
    .unwrap();
    assert!(out.join("summary.json").exists());
    assert!(out.join("charts/member_alex.json").exists());
}
