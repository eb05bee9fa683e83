//! Integration tests for the add command's installation pipeline

mod common;

use common::TestWorkspace;
use predicates::prelude::*;

#[test]
fn test_add_creates_files_under_resolved_ui_root() {
    let ws = TestWorkspace::new().with_vite_project().with_config();
    ws.write_button_item();

    ws.glacial(&["add", "button"]).assert().success();

    assert!(ws.file_exists("src/components/ui/button/Button.vue"));
    assert!(ws.file_exists("src/components/ui/button/index.ts"));

    // Registry-internal imports come out in the project's alias scheme.
    let button = ws.read_file("src/components/ui/button/Button.vue");
    assert!(button.contains("from '@/lib/utils'"));
    assert!(!button.contains("@/registry/"));
}

#[test]
fn test_add_reports_created_files() {
    let ws = TestWorkspace::new().with_vite_project().with_config();
    ws.write_button_item();

    ws.glacial(&["add", "button"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 2 files"));
}

#[test]
fn test_second_add_skips_identical_files() {
    let ws = TestWorkspace::new().with_vite_project().with_config();
    ws.write_button_item();

    ws.glacial(&["add", "button"]).assert().success();
    let before = ws.read_file("src/components/ui/button/Button.vue");

    ws.glacial(&["add", "button"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped 2 files"));

    assert_eq!(before, ws.read_file("src/components/ui/button/Button.vue"));
}

#[test]
fn test_add_with_custom_directory_path_flattens_nesting() {
    let ws = TestWorkspace::new().with_vite_project().with_config();
    ws.write_button_item();

    ws.glacial(&["add", "button", "--path", "./widgets"])
        .assert()
        .success();

    assert!(ws.file_exists("widgets/Button.vue"));
    assert!(ws.file_exists("widgets/index.ts"));
    assert!(!ws.file_exists("src/components/ui/button/Button.vue"));
}

#[test]
fn test_add_with_traversal_path_fails() {
    let ws = TestWorkspace::new().with_vite_project().with_config();
    ws.write_button_item();

    ws.glacial(&["add", "button", "--path", "../outside"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("project root"));
}

#[test]
fn test_add_env_item_merges_existing_keys() {
    let ws = TestWorkspace::new().with_vite_project().with_config();
    ws.write_file(".env", "OTHER=2\n");
    ws.write_registry_item(
        "default",
        "env-setup",
        r#"{
  "name": "env-setup",
  "type": "registry:lib",
  "files": [
    {
      "path": ".env",
      "type": "registry:file",
      "target": "~/.env",
      "content": "API_KEY=1\n"
    }
  ]
}"#,
    );

    ws.glacial(&["add", "env-setup"]).assert().success();

    let env = ws.read_file(".env");
    assert!(env.contains("OTHER=2"));
    assert!(env.contains("API_KEY=1"));
}

#[test]
fn test_add_overwrite_updates_changed_file() {
    let ws = TestWorkspace::new().with_vite_project().with_config();
    ws.write_button_item();

    ws.glacial(&["add", "button"]).assert().success();

    // Local edit diverges from the registry content.
    ws.write_file(
        "src/components/ui/button/Button.vue",
        "<template><button>mine</button></template>\n",
    );

    ws.glacial(&["add", "button", "--overwrite"])
        .assert()
        .success();

    let button = ws.read_file("src/components/ui/button/Button.vue");
    assert!(!button.contains("mine"));
    assert!(button.contains("inline-flex"));
}

#[test]
fn test_add_unknown_item_reports_not_found() {
    let ws = TestWorkspace::new().with_vite_project().with_config();
    ws.write_button_item();

    ws.glacial(&["add", "accordion"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_add_without_config_points_to_init() {
    let ws = TestWorkspace::new().with_vite_project();
    ws.write_button_item();

    ws.glacial(&["add", "button"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_add_lists_item_dependencies() {
    let ws = TestWorkspace::new().with_vite_project().with_config();
    ws.write_button_item();

    ws.glacial(&["add", "button"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reka-ui"));
}
