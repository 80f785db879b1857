//! gmsaas CLI wrapper
//!
//! Every command runs as `gmsaas --format compactjson <args>`, so both
//! results and failures come back as JSON on stdout.

use crate::error::{GmsaasError, Result};
use devpool_core::{Instance, InstanceList};
use serde::Deserialize;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::process::Command;

pub const DEFAULT_BINARY: &str = "gmsaas";

/// gmsaas CLI wrapper
#[derive(Debug, Clone)]
pub struct Gmsaas {
    binary: String,
}

impl Default for Gmsaas {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

impl Gmsaas {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run a gmsaas command and return stdout
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["--format", "compactjson"]);
        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!(
            "Running: {} --format compactjson {}",
            self.binary,
            args.join(" ")
        );

        let output = cmd.output().await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => GmsaasError::NotFound(self.binary.clone()),
            _ => GmsaasError::IoError(e),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GmsaasError::CommandFailed(failure_message(&stdout, &stderr)));
        }

        Ok(stdout)
    }

    /// gmsaas version string
    pub async fn version(&self) -> Result<String> {
        let output = self.run_command(&["--version"]).await?;
        Ok(parse_version(&output))
    }

    /// List all instances of the account
    pub async fn list_instances(&self) -> Result<InstanceList> {
        let output = self.run_command(&["instances", "list", "-q"]).await?;

        if output.trim().is_empty() {
            return Ok(InstanceList::default());
        }

        let list: InstanceList = serde_json::from_str(&output)?;
        Ok(list)
    }

    /// Read a single instance
    pub async fn get_instance(&self, uuid: &str) -> Result<Instance> {
        let output = self.run_command(&["instances", "get", uuid]).await?;

        if output.trim().is_empty() {
            return Err(GmsaasError::InstanceNotFound(uuid.to_string()));
        }

        let response: InstanceResponse = serde_json::from_str(&output)?;
        Ok(response.instance)
    }
}

#[derive(Debug, Deserialize)]
struct InstanceResponse {
    instance: Instance,
}

#[derive(Debug, Deserialize)]
struct VersionResponse {
    version: String,
}

/// Error payload printed by gmsaas on failure
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    details: Option<String>,
}

fn parse_version(output: &str) -> String {
    serde_json::from_str::<VersionResponse>(output)
        .map(|v| v.version)
        .unwrap_or_else(|_| output.trim().to_string())
}

/// Best message for a failed command: the JSON error if gmsaas printed one,
/// otherwise stderr, otherwise stdout.
fn failure_message(stdout: &str, stderr: &str) -> String {
    for candidate in [stdout, stderr] {
        if let Ok(response) = serde_json::from_str::<ErrorResponse>(candidate.trim()) {
            return match response.error.details {
                Some(details) if !details.is_empty() => {
                    format!("{} ({})", response.error.message, details)
                }
                _ => response.error.message,
            };
        }
    }

    if stderr.trim().is_empty() {
        stdout.trim().to_string()
    } else {
        stderr.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devpool_core::InstanceState;

    const LIST_OUTPUT: &str = r#"{"instances":[{"uuid":"6b2c","name":"Detox.s1.1700000000000","created_at":"2024-02-01T10:00:00.000Z","state":"ONLINE","adb_serial":"localhost:35001","adb_serial_port":35001,"recipe":{"uuid":"r-pixel","name":"Google Pixel 3a"}},{"uuid":"77aa","name":"manual","state":"CREATING","adb_serial":"0.0.0.0","recipe":{"uuid":"r-pixel","name":"Google Pixel 3a"}}]}"#;

    #[test]
    fn test_parse_instance_list() {
        let list: InstanceList = serde_json::from_str(LIST_OUTPUT).unwrap();
        assert_eq!(list.instances.len(), 2);
        assert_eq!(list.instances[0].connection_address, "localhost:35001");
        assert_eq!(list.instances[1].state, InstanceState::Creating);
        assert!(!list.instances[1].is_adb_connected());
    }

    #[test]
    fn test_failure_message_from_json() {
        let stdout = r#"{"error":{"message":"Unauthorized","details":"Please log in"}}"#;
        assert_eq!(failure_message(stdout, ""), "Unauthorized (Please log in)");

        let stdout = r#"{"error":{"message":"Unauthorized"}}"#;
        assert_eq!(failure_message(stdout, "warning"), "Unauthorized");
    }

    #[test]
    fn test_failure_message_fallbacks() {
        assert_eq!(failure_message("", "boom\n"), "boom");
        assert_eq!(failure_message("plain text\n", ""), "plain text");
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version(r#"{"version":"1.10.0"}"#), "1.10.0");
        assert_eq!(parse_version("gmsaas 1.10.0\n"), "gmsaas 1.10.0");
    }

    // Every check that spawns a process lives in this one test so that no
    // other test forks while a script file is still open for writing.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_against_fake_binary() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let write_script = |name: &str, body: &str| {
            let path = temp_dir.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path.to_string_lossy().to_string()
        };

        let echo_args = write_script("echo-args", r#"echo "$@" >&2; exit 3"#);
        let listing = write_script("listing", &format!("cat <<'EOF'\n{}\nEOF", LIST_OUTPUT));
        let getting = write_script(
            "getting",
            r#"echo '{"instance":{"uuid":"6b2c","name":"n","state":"RECYCLED","adb_serial":"0.0.0.0","recipe":{"uuid":"r"}}}'"#,
        );
        let failing = write_script(
            "failing",
            r#"echo '{"error":{"message":"Not logged in"}}'; exit 1"#,
        );

        let err = Gmsaas::new("/nonexistent/bin/gmsaas")
            .list_instances()
            .await
            .unwrap_err();
        assert!(matches!(err, GmsaasError::NotFound(ref b) if b == "/nonexistent/bin/gmsaas"));

        let err = Gmsaas::new(&echo_args).list_instances().await.unwrap_err();
        assert!(
            matches!(err, GmsaasError::CommandFailed(ref m) if m == "--format compactjson instances list -q")
        );

        let list = Gmsaas::new(&listing).list_instances().await.unwrap();
        assert_eq!(list.instances.len(), 2);
        assert_eq!(list.instances[0].id, "6b2c");

        let instance = Gmsaas::new(&getting).get_instance("6b2c").await.unwrap();
        assert_eq!(instance.state, InstanceState::Recycled);

        let err = Gmsaas::new(&failing).list_instances().await.unwrap_err();
        assert_eq!(err.to_string(), "gmsaas command failed: Not logged in");
    }
}
