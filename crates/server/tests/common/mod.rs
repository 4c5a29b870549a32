use anyhow::Context as _;
use serde_json::{Value, json};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

pub use homelab_test_support::MockServer;

pub const CREDENTIAL_VARS: [&str; 3] = [
    "NAUTOBOT_API_TOKEN",
    "PROXMOX_SRE_BOT_API_TOKEN",
    "CONTROLLER_PASSWORD",
];

/// Write a config that points every system at `base_url`.
pub fn write_config(base_url: &str) -> anyhow::Result<tempfile::NamedTempFile> {
    let cfg = format!(
        r#"
timeoutSecs: 5
nautobot:
  baseUrl: "{base_url}"
proxmox:
  baseUrl: "{base_url}"
aap:
  baseUrl: "{base_url}"
"#
    );
    let file = tempfile::NamedTempFile::new().context("create temp config")?;
    std::fs::write(file.path(), cfg).context("write temp config")?;
    Ok(file)
}

/// A running `homelab-mcp-tools` process driven over its stdio.
pub struct StdioSession {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl StdioSession {
    /// Spawn the server with only the credentials in `env` set.
    pub fn spawn(config: &Path, env: &[(&str, &str)]) -> anyhow::Result<Self> {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_homelab-mcp-tools"));
        cmd.arg("--config")
            .arg(config)
            .arg("--log-level")
            .arg("warn")
            .env_remove("RUST_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        for var in CREDENTIAL_VARS {
            cmd.env_remove(var);
        }
        for (k, v) in env {
            cmd.env(k, v);
        }

        let mut child = cmd.spawn().context("spawn homelab-mcp-tools")?;
        let stdin = child.stdin.take().context("child stdin")?;
        let stdout = child.stdout.take().context("child stdout")?;
        Ok(Self {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout).lines(),
        })
    }

    pub async fn send(&mut self, msg: &Value) -> anyhow::Result<()> {
        let stdin = self.stdin.as_mut().context("stdin already closed")?;
        let mut line = serde_json::to_string(msg)?;
        line.push('\n');
        stdin.write_all(line.as_bytes()).await?;
        stdin.flush().await?;
        Ok(())
    }

    pub async fn recv(&mut self) -> anyhow::Result<Value> {
        let line = tokio::time::timeout(Duration::from_secs(10), self.stdout.next_line())
            .await
            .context("timed out waiting for response")??
            .context("server closed stdout")?;
        serde_json::from_str(&line).with_context(|| format!("non-JSON line: {line}"))
    }

    pub async fn request(&mut self, id: i64, method: &str, params: Value) -> anyhow::Result<Value> {
        self.send(&json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}))
            .await?;
        loop {
            let msg = self.recv().await?;
            if msg.get("id") == Some(&json!(id)) {
                return Ok(msg);
            }
        }
    }

    pub async fn initialize(&mut self) -> anyhow::Result<Value> {
        let resp = self
            .request(
                0,
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": "it", "version": "0"}
                }),
            )
            .await?;
        self.send(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await?;
        Ok(resp)
    }

    pub fn close_stdin(&mut self) {
        self.stdin = None;
    }

    pub async fn wait(mut self) -> anyhow::Result<ExitStatus> {
        self.close_stdin();
        tokio::time::timeout(Duration::from_secs(10), self.child.wait())
            .await
            .context("server did not exit")?
            .context("wait for server")
    }
}

/// The first text content of a `tools/call` response, plus its `isError` flag.
pub fn tool_text(msg: &Value) -> anyhow::Result<(String, bool)> {
    let result = msg.get("result").context("response has no result")?;
    let text = result
        .pointer("/content/0/text")
        .and_then(Value::as_str)
        .context("result has no text content")?
        .to_string();
    let is_error = result
        .get("isError")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Ok((text, is_error))
}
