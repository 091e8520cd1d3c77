use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use policy_maker_core::error::InvokeError;
use policy_maker_core::runner::AgentInvoker;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

use crate::backend::{require_strategy, resolve_binary};

const STDERR_EXCERPT_CHARS: usize = 500;

/// Runs an agent CLI once per prompt: prompt on stdin, stdout as the result.
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    name: String,
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessInvoker {
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
        }
    }

    /// Build an invoker for a known agent CLI, resolving its binary up front.
    /// `extra_args` go after the strategy's own arguments.
    pub fn for_cli(cli: &str, extra_args: &[String]) -> anyhow::Result<Self> {
        let strategy = require_strategy(cli)?;
        let program = resolve_binary(strategy.bin)?;
        let args = strategy
            .args
            .iter()
            .map(|a| a.to_string())
            .chain(extra_args.iter().cloned())
            .collect();
        tracing::info!(cli = strategy.name, program = %program.display(), "agent cli resolved");
        Ok(Self::new(strategy.name, program, args))
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl AgentInvoker for ProcessInvoker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, prompt: &str) -> Result<String, InvokeError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| InvokeError::Spawn {
                program: self.program.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut stdin = child.stdin.take();
        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();

        // Feed stdin while both pipes drain, or a chatty agent blocks on a full pipe.
        let write = async {
            let Some(mut pipe) = stdin.take() else {
                return Ok(());
            };
            let written = match pipe.write_all(prompt.as_bytes()).await {
                Ok(()) => pipe.shutdown().await,
                Err(e) => Err(e),
            };
            match written {
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    tracing::debug!(agent = %self.name, "agent closed stdin early");
                    Ok(())
                }
                other => other,
            }
        };
        let read_out = async {
            let mut buf = Vec::new();
            if let Some(pipe) = stdout.as_mut() {
                pipe.read_to_end(&mut buf).await?;
            }
            Ok::<_, io::Error>(buf)
        };
        let read_err = async {
            let mut buf = Vec::new();
            if let Some(pipe) = stderr.as_mut() {
                if let Err(e) = pipe.read_to_end(&mut buf).await {
                    tracing::warn!(agent = %self.name, error = %e, "stderr read failed");
                }
            }
            buf
        };

        let (written, out, err) = tokio::join!(write, read_out, read_err);

        let status = child.wait().await.map_err(|e| InvokeError::Spawn {
            program: self.program.display().to_string(),
            reason: e.to_string(),
        })?;

        let outcome = settle(status, written, out, &err);
        if let Err(e) = &outcome {
            tracing::warn!(agent = %self.name, error = %e, "agent invocation failed");
        }
        outcome
    }
}

/// Decide an invocation from its exit status and pipe results. A non-zero exit
/// wins over pipe errors; stdout is only returned when it was read to the end
/// and the whole prompt was delivered.
fn settle(
    status: ExitStatus,
    written: io::Result<()>,
    out: io::Result<Vec<u8>>,
    err: &[u8],
) -> Result<String, InvokeError> {
    if !status.success() {
        return Err(InvokeError::Execution {
            exit_code: status.code().unwrap_or(-1),
            stderr_excerpt: excerpt(&String::from_utf8_lossy(err)),
        });
    }
    written.map_err(|e| InvokeError::Io {
        stream: "stdin".to_string(),
        reason: e.to_string(),
    })?;
    let out = out.map_err(|e| InvokeError::Io {
        stream: "stdout".to_string(),
        reason: e.to_string(),
    })?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn excerpt(stderr: &str) -> String {
    stderr.chars().take(STDERR_EXCERPT_CHARS).collect()
}
