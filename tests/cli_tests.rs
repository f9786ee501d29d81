//! `stubgen` command-line tests.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use common::{read_stub, write_dump, write_dumps};

fn stubgen() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("stubgen").unwrap();
    cmd.env_remove("STUBGEN_LOG")
        .env_remove("STUBGEN_NS_A")
        .env_remove("STUBGEN_NS_B")
        .env_remove("STUBGEN_NS_COMMON");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    stubgen()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("reconcile"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn test_staged_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let (dump_a, dump_b) = write_dumps(temp_dir.path());
    let snapshots = temp_dir.path().join("snapshots");
    let out = temp_dir.path().join("stubs");

    stubgen()
        .args(["extract", "--variant", "a", "--dump"])
        .arg(&dump_a)
        .arg("--out")
        .arg(&snapshots)
        .assert()
        .success()
        .stdout(predicate::str::contains("extract variant_a: 5 classes"));

    stubgen()
        .args(["extract", "--variant", "b", "--dump"])
        .arg(&dump_b)
        .arg("--out")
        .arg(&snapshots)
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped Engine.Actor.Broken"));

    stubgen()
        .arg("reconcile")
        .arg("--snapshots")
        .arg(&snapshots)
        .assert()
        .success()
        .stdout(predicate::str::contains("vetoed WillowGame.WillowPawn"))
        .stdout(predicate::str::contains("pruned Engine.Pawn.Controller"));
    assert!(snapshots.join("common.json").exists());

    // Stamped snapshots are not valid reconciliation input.
    stubgen()
        .arg("reconcile")
        .arg("--snapshots")
        .arg(&snapshots)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already reconciled"));

    stubgen()
        .arg("render")
        .arg("--snapshots")
        .arg(&snapshots)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("render common: 3 classes"));

    let actor = read_stub(&out, "game_b/Engine/Actor.pyi");
    assert!(actor.contains("class Actor(common.Actor, game_b.Object):"));
}

#[test]
fn test_render_requires_reconciled_snapshots() {
    let temp_dir = TempDir::new().unwrap();
    let (dump_a, _) = write_dumps(temp_dir.path());
    let snapshots = temp_dir.path().join("snapshots");

    stubgen()
        .args(["extract", "--variant", "a", "--dump"])
        .arg(&dump_a)
        .arg("--out")
        .arg(&snapshots)
        .assert()
        .success();

    stubgen()
        .arg("render")
        .arg("--snapshots")
        .arg(&snapshots)
        .arg("--out")
        .arg(temp_dir.path().join("stubs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("common.json"));
}

#[test]
fn test_generate_json_summary() {
    let temp_dir = TempDir::new().unwrap();
    let (dump_a, dump_b) = write_dumps(temp_dir.path());
    let out = temp_dir.path().join("stubs");

    let output = stubgen()
        .arg("generate")
        .arg("--dump-a")
        .arg(&dump_a)
        .arg("--dump-b")
        .arg(&dump_b)
        .arg("--out")
        .arg(&out)
        .args(["--ns-b", "tps", "--sequential", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["command"], "generate");
    assert_eq!(json["failed"], 1);
    assert_eq!(json["excluded"], 3);
    assert_eq!(json["summary"]["reconcile"]["common_classes"], 3);
    assert_eq!(json["summary"]["extract"][1]["skipped"][0]["item"], "Engine.Actor.Broken");
    assert!(out.join("tps/WillowGame/WillowPawn.pyi").exists());
}

#[test]
fn test_no_input_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let empty = serde_json::json!({ "classes": [] });
    let dump_a = write_dump(temp_dir.path(), "a.json", &empty);
    let dump_b = write_dump(temp_dir.path(), "b.json", &empty);

    stubgen()
        .arg("generate")
        .arg("--dump-a")
        .arg(&dump_a)
        .arg("--dump-b")
        .arg(&dump_b)
        .arg("--out")
        .arg(temp_dir.path().join("stubs"))
        .arg("--json")
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("no input"));
}

#[test]
fn test_bad_variant_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let (dump_a, _) = write_dumps(temp_dir.path());

    stubgen()
        .args(["extract", "--variant", "c", "--dump"])
        .arg(&dump_a)
        .arg("--out")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown affinity"));
}
