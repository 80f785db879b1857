#![allow(deprecated)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const SESSION: &str = "s1";

pub struct TestEnv {
    pub root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("devpool.yaml")
    }

    pub fn write_config(&self, gmsaas_path: &str) {
        let content = format!(
            "gmsaas_path: '{}'\nregistry_path: '{}'\nsession_id: {}\nclaim_attempts: 2\n",
            gmsaas_path,
            self.path().join("busy.json").display(),
            SESSION
        );
        fs::write(self.config_path(), content).unwrap();
    }

    /// A gmsaas stand-in that prints `instances_json` for any command
    #[cfg(unix)]
    pub fn write_fake_gmsaas(&self, instances_json: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path().join("gmsaas");
        fs::write(
            &path,
            format!("#!/bin/sh\ncat <<'EOF'\n{}\nEOF\n", instances_json),
        )
        .unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().to_string()
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("devpool").unwrap();
        cmd.arg("--config")
            .arg(self.config_path())
            .env("NO_COLOR", "1")
            .env_remove("DEVPOOL_CONFIG_PATH")
            .env_remove("DEVPOOL_GMSAAS_PATH")
            .env_remove("DEVPOOL_REGISTRY_PATH")
            .env_remove("DEVPOOL_SESSION_ID")
            .env_remove("RUST_LOG");
        cmd
    }
}
