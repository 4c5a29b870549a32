use super::{ExecutionResult, OutboundRequest, Transport, run_cancellable};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Exit code used when the program could not be started at all (shell convention).
const SPAWN_FAILURE: i32 = 127;

/// Transport that shells out to `curl`.
///
/// `-k` disables certificate validation, `-sS` keeps progress output quiet but still writes
/// failures to stderr. Note that headers (and therefore credentials) are visible in the
/// process list while the request runs.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    program: String,
    timeout: Option<Duration>,
}

impl CurlTransport {
    #[must_use]
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Argument list passed to the curl binary, in order.
    #[must_use]
    pub fn args(&self, request: &OutboundRequest) -> Vec<String> {
        let mut args = vec!["-sS".to_string(), "-k".to_string()];
        if let Some(t) = self.timeout {
            args.push("--max-time".to_string());
            args.push(t.as_secs().max(1).to_string());
        }
        args.push("-X".to_string());
        args.push(request.method.as_str().to_string());
        for (name, value) in &request.headers {
            args.push("-H".to_string());
            args.push(format!("{name}: {value}"));
        }
        if let Some(body) = &request.body {
            args.push("-d".to_string());
            args.push(body.to_string());
        }
        args.push(request.url.clone());
        args
    }

    async fn execute(&self, request: &OutboundRequest) -> ExecutionResult {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match cmd.output().await {
            Ok(o) => o,
            Err(e) => {
                return ExecutionResult::failure(
                    SPAWN_FAILURE,
                    format!("failed to run '{}': {e}", self.program),
                );
            }
        };

        let code = output.status.code().unwrap_or(-1);
        debug!(program = %self.program, code, "curl finished");
        ExecutionResult {
            code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

#[async_trait]
impl Transport for CurlTransport {
    async fn send(
        &self,
        request: &OutboundRequest,
        cancel: &CancellationToken,
    ) -> ExecutionResult {
        // Dropping the `output()` future kills the child (`kill_on_drop`).
        run_cancellable(cancel, self.execute(request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::CANCELLED_CODE;
    use serde_json::json;

    #[test]
    fn args_carry_method_headers_body_and_url_last() {
        let t = CurlTransport::new("curl", Some(Duration::from_secs(30)));
        let req = OutboundRequest::post("https://aap/api/v2/job_templates/3/launch/")
            .header("Authorization", "Basic abc")
            .json_body(json!({"limit": "web1"}));

        assert_eq!(
            t.args(&req),
            vec![
                "-sS",
                "-k",
                "--max-time",
                "30",
                "-X",
                "POST",
                "-H",
                "Authorization: Basic abc",
                "-H",
                "Content-Type: application/json",
                "-d",
                r#"{"limit":"web1"}"#,
                "https://aap/api/v2/job_templates/3/launch/",
            ]
        );
    }

    #[test]
    fn args_without_timeout_or_body() {
        let t = CurlTransport::new("curl", None);
        let req = OutboundRequest::get("https://nb/api/dcim/devices/?name=r1");
        assert_eq!(
            t.args(&req),
            vec!["-sS", "-k", "-X", "GET", "https://nb/api/dcim/devices/?name=r1"]
        );
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_failure() {
        let t = CurlTransport::new("/nonexistent/curl-binary", None);
        let result = t
            .send(&OutboundRequest::get("https://x/"), &CancellationToken::new())
            .await;
        assert_eq!(result.code, SPAWN_FAILURE);
        assert!(result.stderr.contains("/nonexistent/curl-binary"));
    }

    #[cfg(unix)]
    fn fake_curl(script: &str) -> tempfile::TempPath {
        use std::io::Write as _;
        use std::os::unix::fs::PermissionsExt as _;

        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "#!/bin/sh\n{script}\n").expect("write script");
        let path = file.into_temp_path();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_stdout_stderr_and_exit_code() {
        let ok = fake_curl(r#"printf '%s' "$6""#);
        let t = CurlTransport::new(ok.to_string_lossy(), None);
        let req = OutboundRequest::get("https://nb/api/?name=x").header("Authorization", "Token t");
        let result = t.send(&req, &CancellationToken::new()).await;
        assert_eq!(result, ExecutionResult::success("Authorization: Token t"));

        let failing = fake_curl("echo 'curl: (6) Could not resolve host' >&2; exit 6");
        let t = CurlTransport::new(failing.to_string_lossy(), None);
        let result = t.send(&req, &CancellationToken::new()).await;
        assert_eq!(result.code, 6);
        assert_eq!(result.stderr.trim(), "curl: (6) Could not resolve host");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn cancellation_kills_the_wait() {
        let slow = fake_curl("sleep 30; echo done");
        let t = CurlTransport::new(slow.to_string_lossy(), None);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let result = t.send(&OutboundRequest::get("https://x/"), &cancel).await;
        assert_eq!(result.code, CANCELLED_CODE);
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
