use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// Build a minimal valid TOML config for the simulator
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[exploration]
strategy = "curious"
seed = 7

[session]
max_moves = 2000

[sampling]
period_ms = 5

[simulation]
maze = "maze_6x6"
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["solve"], 0, "finished", "stdout")]
#[case(&["solve", "--maze", "simple_3x3", "--seed", "3"], 0, "simple_3x3", "stdout")]
#[case(&["stats", "--runs", "5", "--seed", "1"], 0, "5/5 finished", "stdout")]
#[case(&["self-check"], 0, "self-check ok", "stdout")]
#[case(&["solve", "--maze", "nowhere"], 1, "Unknown maze 'nowhere'", "stderr")]
#[case(&["solve", "--strategy", "greedy"], 2, "unknown strategy", "stderr")]
#[case(&["solve", "--max-moves", "1"], 3, "gave up after 1 moves", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("mazebot").unwrap();

    // Always include a valid config to avoid relying on defaults
    cmd.arg("--config").arg(&cfg).arg("--log-level").arg("error");

    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
fn solve_json_line_has_stable_schema() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let out = Command::cargo_bin("mazebot")
        .unwrap()
        .arg("--json")
        .arg("--log-level")
        .arg("error")
        .arg("--config")
        .arg(&cfg)
        .arg("solve")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8_lossy(&out);
    let line = stdout
        .lines()
        .find(|l| l.contains("\"moves\""))
        .unwrap_or_else(|| panic!("no JSON line with moves; stdout was: {stdout}"));
    let v: serde_json::Value = serde_json::from_str(line).expect("valid JSON");

    assert!(v.get("timestamp").and_then(|x| x.as_i64()).is_some());
    assert_eq!(v["maze"], "maze_6x6");
    assert_eq!(v["strategy"], "curious");
    assert_eq!(v["seed"], 7);
    assert_eq!(v["outcome"], "finished");
    assert!(v["moves"].as_u64().is_some_and(|m| m > 0));
    assert!(v["motion_time_s"].as_f64().is_some());
    assert!(v["visited"].as_u64().is_some());
    assert!(v["dead_ends"].as_u64().is_some());
}

#[rstest]
fn exhausted_run_prints_report_then_json_error() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let assert = Command::cargo_bin("mazebot")
        .unwrap()
        .args(["--json", "--log-level", "error", "--config"])
        .arg(&cfg)
        .args(["solve", "--max-moves", "2"])
        .assert()
        .code(3);
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("every stdout line is JSON"))
        .collect();
    assert_eq!(lines.len(), 2, "stdout was: {stdout}");
    assert_eq!(lines[0]["outcome"], "exhausted");
    assert_eq!(lines[0]["moves"], 2);
    assert_eq!(lines[1]["reason"], "Exhausted");
    assert_eq!(lines[1]["details"]["max_moves"], 2);
}

#[rstest]
fn same_seed_gives_same_solve() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let run = || {
        Command::cargo_bin("mazebot")
            .unwrap()
            .args(["--json", "--log-level", "error", "--config"])
            .arg(&cfg)
            .args(["solve", "--strategy", "random", "--maze", "simple_3x3", "--seed", "99"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };
    let moves = |out: Vec<u8>| {
        let v: serde_json::Value =
            serde_json::from_str(String::from_utf8_lossy(&out).trim()).expect("json");
        v["moves"].clone()
    };
    assert_eq!(moves(run()), moves(run()));
}

#[rstest]
fn maze_file_is_loaded_from_csv() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let csv = dir.path().join("corridor.csv");
    let mut f = fs::File::create(&csv).unwrap();
    writeln!(f, "x,y,x_plus,x_minus,y_plus,y_minus,is_start,is_finish").unwrap();
    writeln!(f, "1,1,false,false,true,false,true,false").unwrap();
    writeln!(f, "1,2,false,false,false,true,false,true").unwrap();
    drop(f);

    Command::cargo_bin("mazebot")
        .unwrap()
        .args(["--log-level", "error", "--config"])
        .arg(&cfg)
        .arg("solve")
        .arg("--maze-file")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("corridor: finished after 1 moves"));
}

#[rstest]
fn cli_reports_bad_maze_header() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let bad_csv = dir.path().join("maze.csv");
    let mut f = fs::File::create(&bad_csv).unwrap();
    writeln!(f, "x,y,east,west,north,south,start,finish").unwrap();
    writeln!(f, "1,1,true,false,false,false,true,true").unwrap();
    drop(f);

    Command::cargo_bin("mazebot")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("solve")
        .arg("--maze-file")
        .arg(&bad_csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid headers"));
}

#[rstest]
fn invalid_config_is_explained() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[session]\nmax_moves = 0\n").unwrap();

    Command::cargo_bin("mazebot")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .arg("self-check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration is invalid"))
        .stderr(predicate::str::contains("max_moves"));
}
