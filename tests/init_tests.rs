//! Integration tests for the init command

mod common;

use common::TestWorkspace;
use predicates::prelude::*;

#[test]
fn test_init_creates_config_from_probes() {
    let ws = TestWorkspace::new().with_vite_project();

    ws.glacial(&["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created components.json"));

    let config = ws.read_file("components.json");
    assert!(config.contains("\"style\": \"new-york\""));
    assert!(config.contains("\"css\": \"src/assets/main.css\""));
    assert!(config.contains("\"components\": \"@/components\""));
    assert!(config.contains("\"utils\": \"@/lib/utils\""));
}

#[test]
fn test_init_is_idempotent_without_force() {
    let ws = TestWorkspace::new().with_vite_project();

    ws.glacial(&["init"]).assert().success();
    ws.glacial(&["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_recreates() {
    let ws = TestWorkspace::new().with_vite_project();

    ws.glacial(&["init"]).assert().success();
    ws.write_file("components.json", "{}");
    ws.glacial(&["init", "--force"]).assert().success();

    let config = ws.read_file("components.json");
    assert!(config.contains("\"aliases\""));
}

#[test]
fn test_init_fails_without_tailwind() {
    let ws = TestWorkspace::new();
    ws.write_file("vite.config.ts", "export default {}\n");
    ws.write_file("tsconfig.json", "{}");

    ws.glacial(&["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Tailwind"));
}

#[test]
fn test_init_then_add_round_trip() {
    let ws = TestWorkspace::new().with_vite_project();
    ws.write_button_item();

    ws.glacial(&["init"]).assert().success();
    ws.glacial(&["add", "button"]).assert().success();

    assert!(ws.file_exists("src/components/ui/button/Button.vue"));
}
