use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "nexus-rando-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_fold_prints_generator_seed() {
    let exe = env!("CARGO_BIN_EXE_nexus-rando");
    let output = Command::new(exe)
        .args(["fold", "--seed", "555", "--draws", "2"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, ["635141271", "421142338", "347177782"]);
}

#[test]
fn cli_map_writes_json_report() {
    let exe = env!("CARGO_BIN_EXE_nexus-rando");
    let output_path = temp_path("map");
    let status = Command::new(exe)
        .args(["map", "--seed", "555", "--report", "json", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    assert_eq!(report["seed"], "555");
    assert_eq!(report["slots"].as_array().unwrap().len(), 64);
    assert_eq!(report["slots"][0]["level"], "Highway-121");
    assert_eq!(report["slots"][0]["door"], 1627);
}

#[test]
fn cli_map_applies_difficulty_window_and_authors() {
    let exe = env!("CARGO_BIN_EXE_nexus-rando");
    let authors_path = temp_path("authors");
    std::fs::write(&authors_path, r#"{"Highway-121": "Someone"}"#).expect("write authors");
    let output_path = temp_path("window-map");
    let status = Command::new(exe)
        .args(["map", "--seed", "555", "--max-difficulty", "250", "--report", "json"])
        .arg("--authors")
        .arg(&authors_path)
        .arg("--output")
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    // The quarter window holds 50 levels and widens to one per door.
    assert_eq!(report["catalog_levels"], 64);
    let slots = report["slots"].as_array().unwrap();
    let highway = slots
        .iter()
        .find(|slot| slot["level"] == "Highway-121")
        .expect("easy level selected");
    assert_eq!(highway["author"], "Someone");
    assert_eq!(slots.iter().filter(|slot| slot["author"] == "Someone").count(), 1);
}

#[test]
fn cli_map_rejects_out_of_range_difficulty() {
    let exe = env!("CARGO_BIN_EXE_nexus-rando");
    let output = Command::new(exe)
        .args(["map", "--seed", "555", "--min-difficulty", "1500"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("min_difficulty 1500 must be at most 1000"));
}

#[test]
fn cli_map_rejects_manual_config() {
    let exe = env!("CARGO_BIN_EXE_nexus-rando");
    let config_path = temp_path("manual-config");
    std::fs::write(&config_path, r#"{"mode": "manual"}"#).expect("write config");
    let output = Command::new(exe)
        .args(["map", "--seed", "555", "--config"])
        .arg(&config_path)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("manual mode"));
}

#[test]
fn cli_reconcile_rewrites_scores() {
    let exe = env!("CARGO_BIN_EXE_nexus-rando");
    let scores_path = temp_path("scores");
    std::fs::write(
        &scores_path,
        r#"{
            "Highway-121": {"thorough": 5, "finesse": 5, "time": 30.0, "key_type": 0},
            "Ruined-Tower-809": {"thorough": 4, "finesse": 3, "time": 55.5, "key_type": 1}
        }"#,
    )
    .expect("write scores");
    let report_path = temp_path("reconcile-report");
    let status = Command::new(exe)
        .args(["reconcile", "--seed", "555", "--report", "markdown", "--scores"])
        .arg(&scores_path)
        .arg("--output")
        .arg(&report_path)
        .status()
        .expect("run cli");
    assert!(status.success());

    let report = std::fs::read_to_string(report_path).expect("read report");
    assert!(report.contains("- **Writes**: 1"));
    let scores: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(scores_path).expect("read scores"))
            .expect("scores json");
    assert_eq!(scores["Highway-121"]["key_type"], 4);
    assert_eq!(scores["Highway-121"]["thorough"], 5);
    assert_eq!(scores["Ruined-Tower-809"]["key_type"], 1);
}

#[test]
fn cli_roll_is_reproducible_with_rng_seed() {
    let exe = env!("CARGO_BIN_EXE_nexus-rando");
    let run = || {
        let output = Command::new(exe)
            .args(["roll", "--count", "3", "--rng-seed", "42"])
            .output()
            .expect("run cli");
        assert!(output.status.success());
        String::from_utf8_lossy(&output.stdout).into_owned()
    };
    let first = run();
    assert_eq!(first, run());
    let seeds: Vec<&str> = first.lines().collect();
    assert_eq!(seeds.len(), 3);
    assert!(seeds.iter().all(|seed| seed.len() == 6));
}
