//! Common test utilities for Glacial integration tests

// Each test binary compiles this module separately and uses a subset.
#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;

/// A test project for integration tests
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to the project root
    pub path: PathBuf,
}

impl TestWorkspace {
    /// Create a new empty test project
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Set up a minimal Vite + TypeScript project with `@/* -> ./src/*`
    pub fn with_vite_project(self) -> Self {
        self.write_file("vite.config.ts", "export default {}\n");
        self.write_file(
            "tsconfig.json",
            r#"{ "compilerOptions": { "paths": { "@/*": ["./src/*"] } } }"#,
        );
        self.write_file(
            "package.json",
            r#"{ "name": "fixture", "devDependencies": { "tailwindcss": "^4.0.0" } }"#,
        );
        self.write_file("src/assets/main.css", "@import \"tailwindcss\";\n");
        self
    }

    /// Write a components.json wired for the Vite fixture
    pub fn with_config(self) -> Self {
        self.write_file(
            "components.json",
            r#"{
  "$schema": "https://glacial-ui.dev/schema.json",
  "style": "default",
  "typescript": true,
  "tailwind": {
    "config": "",
    "css": "src/assets/main.css",
    "baseColor": "zinc",
    "cssVariables": true
  },
  "aliases": {
    "components": "@/components",
    "utils": "@/lib/utils",
    "ui": "@/components/ui",
    "lib": "@/lib",
    "composables": "@/composables"
  }
}"#,
        );
        self
    }

    /// Write a registry item under the default registry directory
    pub fn write_registry_item(&self, style: &str, name: &str, json: &str) {
        self.write_file(&format!("registry/styles/{style}/{name}.json"), json);
    }

    /// The button fixture: two files under ui/button, available in every
    /// style the tests configure
    pub fn write_button_item(&self) {
        for style in ["default", "new-york"] {
            self.write_button_item_for(style);
        }
    }

    fn write_button_item_for(&self, style: &str) {
        self.write_registry_item(
            style,
            "button",
            r#"{
  "name": "button",
  "type": "registry:ui",
  "dependencies": ["reka-ui"],
  "files": [
    {
      "path": "ui/button/Button.vue",
      "type": "registry:ui",
      "content": "<script setup lang=\"ts\">\nimport { cn } from '@/registry/default/lib/utils'\n</script>\n\n<template>\n  <button :class=\"cn('inline-flex items-center', $attrs.class ?? '')\">\n    <slot />\n  </button>\n</template>\n"
    },
    {
      "path": "ui/button/index.ts",
      "type": "registry:ui",
      "content": "export { default as Button } from './Button.vue'\n"
    }
  ]
}"#,
        );
    }

    /// Run the glacial binary against this project
    pub fn glacial(&self, args: &[&str]) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("glacial").expect("binary builds");
        cmd.arg("--cwd").arg(&self.path).args(args);
        cmd
    }
}
